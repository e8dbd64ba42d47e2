pub mod inline;

mod file_service;

pub use file_service::{FileDownload, FileService};
