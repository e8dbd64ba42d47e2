use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};
use std::sync::Arc;

use crate::features::files::handlers::{
    delete_file, download_file, get_file, list_files, upload_file,
};
use crate::features::files::services::FileService;

/// Create routes for the files feature
pub fn routes(file_service: Arc<FileService>, max_body_size: usize) -> Router {
    Router::new()
        .route(
            "/api/files/upload",
            post(upload_file).layer(DefaultBodyLimit::max(max_body_size)),
        )
        .route("/api/files", get(list_files))
        .route("/api/files/{id}", get(get_file).delete(delete_file))
        .route("/api/files/{id}/download", get(download_file))
        .with_state(file_service)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum_test::multipart::{MultipartForm, Part};
    use axum_test::TestServer;
    use serde_json::Value;

    fn test_server() -> TestServer {
        let router = routes(Arc::new(FileService::new()), 64 * 1024 * 1024);
        TestServer::new(router).expect("Failed to create test server")
    }

    fn file_form(name: &str, content: &[u8], media_type: &str) -> MultipartForm {
        MultipartForm::new().add_part(
            "file",
            Part::bytes(content.to_vec())
                .file_name(name)
                .mime_type(media_type),
        )
    }

    async fn upload(server: &TestServer, name: &str, content: &[u8], media_type: &str) -> Value {
        let response = server
            .post("/api/files/upload")
            .multipart(file_form(name, content, media_type))
            .await;
        response.assert_status_ok();
        response.json::<Value>()
    }

    #[tokio::test]
    async fn test_upload_returns_created_record() {
        let server = test_server();

        let body = upload(&server, "hello.txt", b"hello", "text/plain").await;

        assert_eq!(body["success"], true);
        assert_eq!(body["data"]["name"], "hello.txt");
        assert_eq!(body["data"]["media_type"], "text/plain");
        assert_eq!(body["data"]["size"], 5);
        assert_eq!(body["data"]["preview"], "hello");
        assert!(body["data"]["id"].as_str().is_some());
    }

    #[tokio::test]
    async fn test_upload_without_file_part_is_rejected() {
        let server = test_server();

        let response = server
            .post("/api/files/upload")
            .multipart(MultipartForm::new().add_text("note", "no file here"))
            .await;

        response.assert_status_bad_request();
        let body = response.json::<Value>();
        assert_eq!(body["success"], false);
        assert_eq!(body["message"], "No file provided.");
    }

    #[tokio::test]
    async fn test_upload_empty_file_is_rejected() {
        let server = test_server();

        let response = server
            .post("/api/files/upload")
            .multipart(file_form("empty.txt", b"", "text/plain"))
            .await;

        response.assert_status_bad_request();
        let body = response.json::<Value>();
        assert_eq!(body["message"], "File is empty.");
    }

    #[tokio::test]
    async fn test_list_returns_uploads_most_recent_first() {
        let server = test_server();
        upload(&server, "first.txt", b"1", "text/plain").await;
        tokio::time::sleep(std::time::Duration::from_millis(5)).await;
        upload(&server, "second.txt", b"2", "text/plain").await;

        let response = server.get("/api/files").await;

        response.assert_status_ok();
        let body = response.json::<Value>();
        assert_eq!(body["meta"]["total"], 2);
        assert_eq!(body["data"][0]["name"], "second.txt");
        assert_eq!(body["data"][1]["name"], "first.txt");
    }

    #[tokio::test]
    async fn test_get_returns_metadata() {
        let server = test_server();
        let uploaded = upload(&server, "pixel.png", &[0x89, 0x50, 0x4e, 0x47], "image/png").await;
        let id = uploaded["data"]["id"].as_str().unwrap();

        let response = server.get(&format!("/api/files/{}", id)).await;

        response.assert_status_ok();
        let body = response.json::<Value>();
        assert_eq!(body["data"]["name"], "pixel.png");
        assert_eq!(body["data"]["url"], body["data"]["preview"]);
    }

    #[tokio::test]
    async fn test_get_unknown_id_is_not_found() {
        let server = test_server();

        let response = server
            .get(&format!("/api/files/{}", uuid::Uuid::new_v4()))
            .await;

        response.assert_status_not_found();
        let body = response.json::<Value>();
        assert_eq!(body["message"], "File not found.");
    }

    #[tokio::test]
    async fn test_download_text_file_serves_original_bytes() {
        let server = test_server();
        let uploaded = upload(&server, "hello.txt", b"hello", "text/plain").await;
        let id = uploaded["data"]["id"].as_str().unwrap();

        let response = server.get(&format!("/api/files/{}/download", id)).await;

        response.assert_status_ok();
        assert_eq!(response.text(), "hello");
        let disposition = response
            .headers()
            .get("content-disposition")
            .unwrap()
            .to_str()
            .unwrap()
            .to_string();
        assert!(disposition.contains("hello.txt"));
    }

    #[tokio::test]
    async fn test_download_opaque_file_is_rejected() {
        let server = test_server();
        let uploaded = upload(&server, "doc.pdf", b"%PDF-1.4", "application/pdf").await;
        let id = uploaded["data"]["id"].as_str().unwrap();

        let response = server.get(&format!("/api/files/{}/download", id)).await;

        response.assert_status_bad_request();
    }

    #[tokio::test]
    async fn test_delete_then_list_no_longer_returns_file() {
        let server = test_server();
        let uploaded = upload(&server, "doomed.txt", b"bye", "text/plain").await;
        let id = uploaded["data"]["id"].as_str().unwrap();
        upload(&server, "kept.txt", b"hi", "text/plain").await;

        let response = server.delete(&format!("/api/files/{}", id)).await;
        response.assert_status_ok();
        let body = response.json::<Value>();
        assert_eq!(body["data"]["deleted"], true);

        let listing = server.get("/api/files").await.json::<Value>();
        assert_eq!(listing["meta"]["total"], 1);
        assert_eq!(listing["data"][0]["name"], "kept.txt");

        let again = server.delete(&format!("/api/files/{}", id)).await;
        again.assert_status_not_found();
        assert_eq!(again.json::<Value>()["message"], "File not found.");
    }
}
