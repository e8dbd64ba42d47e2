use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

/// Upload file request DTO for OpenAPI documentation
/// Note: This struct is for Swagger UI documentation only.
/// The actual handler uses axum's Multipart extractor directly.
#[derive(Debug, ToSchema)]
#[allow(dead_code)]
pub struct UploadFileDto {
    /// The file to upload
    #[schema(format = Binary, content_media_type = "application/octet-stream")]
    pub file: String,
}

/// Response DTO for file operations
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct FileResponseDto {
    /// Unique identifier for the file
    pub id: Uuid,
    /// Original filename as uploaded
    pub name: String,
    /// Declared MIME type of the file
    pub media_type: String,
    /// Size of the file in bytes
    pub size: i64,
    /// Timestamp when the file was uploaded
    pub uploaded_at: DateTime<Utc>,
    /// Inline data URL for small text/image files, placeholder reference otherwise
    pub url: String,
    /// Decoded text for text files, the inline data URL for images
    pub preview: Option<String>,
}

/// Response DTO for delete operations
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct DeleteFileResponseDto {
    /// Confirmation that the file was deleted
    pub deleted: bool,
}

/// Media type recorded when the caller does not declare one
pub const DEFAULT_MEDIA_TYPE: &str = "application/octet-stream";
