pub mod file_dto;

pub use file_dto::{DeleteFileResponseDto, FileResponseDto, UploadFileDto, DEFAULT_MEDIA_TYPE};
