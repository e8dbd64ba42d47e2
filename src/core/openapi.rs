use utoipa::{Modify, OpenApi};

use crate::features::files::{dtos as files_dtos, handlers as files_handlers};
use crate::shared::types::{ApiResponse, Meta};

#[derive(OpenApi)]
#[openapi(
    paths(
        // Files
        files_handlers::upload_file,
        files_handlers::list_files,
        files_handlers::get_file,
        files_handlers::download_file,
        files_handlers::delete_file,
    ),
    components(
        schemas(
            // Shared
            Meta,
            // Files
            files_dtos::UploadFileDto,
            files_dtos::FileResponseDto,
            files_dtos::DeleteFileResponseDto,
            ApiResponse<files_dtos::FileResponseDto>,
            ApiResponse<Vec<files_dtos::FileResponseDto>>,
            ApiResponse<files_dtos::DeleteFileResponseDto>,
        )
    ),
    tags(
        (name = "files", description = "File upload and management"),
    ),
    info(
        title = "Filedrop API",
        version = "0.1.0",
        description = "API documentation for Filedrop",
    )
)]
pub struct ApiDoc;

/// Modifier to override OpenAPI info from config
pub struct SwaggerInfoModifier {
    pub title: String,
    pub version: String,
    pub description: String,
}

impl Modify for SwaggerInfoModifier {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        openapi.info.title = self.title.clone();
        openapi.info.version = self.version.clone();
        openapi.info.description = Some(self.description.clone());
    }
}
