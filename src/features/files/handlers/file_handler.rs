use axum::{
    body::Body,
    extract::{Multipart, Path, State},
    http::header,
    response::Response,
    Json,
};
use std::sync::Arc;
use tracing::debug;
use uuid::Uuid;

use crate::core::error::AppError;
use crate::features::files::dtos::{
    DeleteFileResponseDto, FileResponseDto, UploadFileDto, DEFAULT_MEDIA_TYPE,
};
use crate::features::files::services::FileService;
use crate::shared::types::{ApiResponse, Meta};

/// Generate a safe Content-Disposition header value for file downloads.
///
/// Control characters are stripped to prevent header injection, and
/// non-ASCII filenames get an RFC 5987 `filename*` parameter.
fn content_disposition_header(filename: &str) -> String {
    if filename.is_ascii() && !filename.chars().any(|c| c.is_control() || c == '"' || c == '\\') {
        return format!("attachment; filename=\"{}\"", filename);
    }

    // ASCII fallback parameter, with quotes/backslashes replaced
    let sanitized: String = filename
        .chars()
        .filter(|c| !c.is_control())
        .map(|c| match c {
            '"' | '\\' => '_',
            _ => c,
        })
        .collect();

    let encoded = urlencoding::encode(filename);

    format!(
        "attachment; filename=\"{}\"; filename*=UTF-8''{}",
        sanitized, encoded
    )
}

/// Upload a file
///
/// Accepts multipart/form-data with a single `file` field. Small text and
/// image files are stored with a self-contained inline preview.
#[utoipa::path(
    post,
    path = "/api/files/upload",
    tag = "files",
    request_body(
        content = UploadFileDto,
        content_type = "multipart/form-data",
        description = "File upload form",
    ),
    responses(
        (status = 200, description = "File uploaded successfully", body = ApiResponse<FileResponseDto>),
        (status = 400, description = "Missing or empty file"),
        (status = 500, description = "Unexpected internal error")
    )
)]
pub async fn upload_file(
    State(service): State<Arc<FileService>>,
    mut multipart: Multipart,
) -> Result<Json<ApiResponse<FileResponseDto>>, AppError> {
    let mut file_data: Option<Vec<u8>> = None;
    let mut file_name: Option<String> = None;
    let mut media_type: Option<String> = None;

    // Process multipart fields
    while let Some(field) = multipart.next_field().await.map_err(|e| {
        debug!("Failed to read multipart field: {}", e);
        AppError::BadRequest(format!("Failed to read multipart data: {}", e))
    })? {
        let field_name = field.name().unwrap_or("").to_string();

        match field_name.as_str() {
            "file" => {
                let ct = field
                    .content_type()
                    .map(|s| s.to_string())
                    .unwrap_or_else(|| DEFAULT_MEDIA_TYPE.to_string());

                let fname = field
                    .file_name()
                    .map(|s| s.to_string())
                    .unwrap_or_else(|| "unnamed".to_string());

                let data = field.bytes().await.map_err(|e| {
                    debug!("Failed to read file bytes: {}", e);
                    AppError::BadRequest(format!("Failed to read file data: {}", e))
                })?;

                file_data = Some(data.to_vec());
                file_name = Some(fname);
                media_type = Some(ct);
            }
            _ => {
                // Ignore unknown fields
                debug!("Ignoring unknown field: {}", field_name);
            }
        }
    }

    let file_data = file_data.ok_or_else(|| AppError::BadRequest("No file provided.".to_string()))?;
    let file_name = file_name.unwrap_or_else(|| "unnamed".to_string());
    let media_type = media_type.unwrap_or_default();

    let response = service
        .upload_file(&file_name, &media_type, file_data)
        .await?;

    Ok(Json(ApiResponse::success(Some(response), None, None)))
}

/// List all uploaded files, most recent first
#[utoipa::path(
    get,
    path = "/api/files",
    tag = "files",
    responses(
        (status = 200, description = "List of uploaded files", body = ApiResponse<Vec<FileResponseDto>>)
    )
)]
pub async fn list_files(
    State(service): State<Arc<FileService>>,
) -> Json<ApiResponse<Vec<FileResponseDto>>> {
    let files = service.list_files().await;
    let total = files.len() as i64;

    Json(ApiResponse::success(Some(files), None, Some(Meta { total })))
}

/// Get metadata for a single file
#[utoipa::path(
    get,
    path = "/api/files/{id}",
    tag = "files",
    params(
        ("id" = Uuid, Path, description = "File ID")
    ),
    responses(
        (status = 200, description = "File metadata", body = ApiResponse<FileResponseDto>),
        (status = 404, description = "File not found")
    )
)]
pub async fn get_file(
    State(service): State<Arc<FileService>>,
    Path(file_id): Path<Uuid>,
) -> Result<Json<ApiResponse<FileResponseDto>>, AppError> {
    let file = service.get_file(file_id).await?;

    Ok(Json(ApiResponse::success(Some(file), None, None)))
}

/// Download the content of an inline-stored file
#[utoipa::path(
    get,
    path = "/api/files/{id}/download",
    tag = "files",
    params(
        ("id" = Uuid, Path, description = "File ID")
    ),
    responses(
        (status = 200, description = "File content", content_type = "application/octet-stream"),
        (status = 400, description = "File content is not stored inline"),
        (status = 404, description = "File not found")
    )
)]
pub async fn download_file(
    State(service): State<Arc<FileService>>,
    Path(file_id): Path<Uuid>,
) -> Result<Response, AppError> {
    let download = service.download_file(file_id).await?;

    let response = Response::builder()
        .header(header::CONTENT_TYPE, download.media_type)
        .header(
            header::CONTENT_DISPOSITION,
            content_disposition_header(&download.name),
        )
        .header(header::CONTENT_LENGTH, download.bytes.len())
        .body(Body::from(download.bytes))
        .map_err(|e| AppError::Internal(format!("Failed to build response: {}", e)))?;

    Ok(response)
}

/// Delete a file
#[utoipa::path(
    delete,
    path = "/api/files/{id}",
    tag = "files",
    params(
        ("id" = Uuid, Path, description = "File ID")
    ),
    responses(
        (status = 200, description = "File deleted", body = ApiResponse<DeleteFileResponseDto>),
        (status = 404, description = "File not found")
    )
)]
pub async fn delete_file(
    State(service): State<Arc<FileService>>,
    Path(file_id): Path<Uuid>,
) -> Result<Json<ApiResponse<DeleteFileResponseDto>>, AppError> {
    service.delete_file(file_id).await?;

    Ok(Json(ApiResponse::success(
        Some(DeleteFileResponseDto { deleted: true }),
        Some("File deleted successfully.".to_string()),
        None,
    )))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_content_disposition_header_simple_ascii() {
        let result = content_disposition_header("document.txt");
        assert_eq!(result, "attachment; filename=\"document.txt\"");
    }

    #[test]
    fn test_content_disposition_header_unicode() {
        let result = content_disposition_header("résumé.txt");
        assert!(result.starts_with("attachment; filename=\""));
        assert!(result.contains("filename*=UTF-8''"));
        assert!(result.contains("r%C3%A9sum%C3%A9.txt"));
    }

    #[test]
    fn test_content_disposition_header_strips_injection_attempts() {
        let result = content_disposition_header("file\"\r\nX-Evil: header.txt");
        assert!(!result.contains('\r'));
        assert!(!result.contains('\n'));
        assert!(result.starts_with("attachment; filename="));
    }
}
