use chrono::Utc;
use tokio::sync::{watch, RwLock};
use tracing::{debug, info};
use uuid::Uuid;

use crate::core::error::{AppError, Result};
use crate::features::files::dtos::{FileResponseDto, DEFAULT_MEDIA_TYPE};
use crate::features::files::models::StoredFile;
use crate::features::files::services::inline::{self, InlineBody, MAX_INLINE_SIZE};

/// Raw content recovered from an inline-stored file, ready to serve
#[derive(Debug)]
pub struct FileDownload {
    pub name: String,
    pub media_type: String,
    pub bytes: Vec<u8>,
}

/// Service owning the process-wide upload collection
///
/// The collection lives entirely in memory and is lost on restart. All
/// mutation goes through the write lock; every successful mutation bumps
/// the revision watch channel so listing views can refresh.
pub struct FileService {
    files: RwLock<Vec<StoredFile>>,
    revision: watch::Sender<u64>,
}

impl FileService {
    pub fn new() -> Self {
        let (revision, _) = watch::channel(0);
        Self {
            files: RwLock::new(Vec::new()),
            revision,
        }
    }

    /// Observer hook for collection changes
    ///
    /// The receiver sees a bumped revision after every successful upload
    /// or delete; failed operations leave the revision untouched.
    pub fn subscribe_changes(&self) -> watch::Receiver<u64> {
        self.revision.subscribe()
    }

    fn mark_changed(&self) {
        self.revision.send_modify(|rev| *rev += 1);
    }

    fn to_dto(file: &StoredFile) -> FileResponseDto {
        FileResponseDto {
            id: file.id,
            name: file.name.clone(),
            media_type: file.media_type.clone(),
            size: file.size,
            uploaded_at: file.uploaded_at,
            url: file.url.clone(),
            preview: file.preview.clone(),
        }
    }

    /// Store an uploaded payload and decide its preview representation
    ///
    /// Payloads below the inline threshold get a self-contained `data:`
    /// URL when they decode as text or are declared as images; everything
    /// else keeps a placeholder reference and no preview.
    pub async fn upload_file(
        &self,
        name: &str,
        media_type: &str,
        payload: Vec<u8>,
    ) -> Result<FileResponseDto> {
        if payload.is_empty() {
            return Err(AppError::BadRequest("File is empty.".to_string()));
        }

        let media_type = if media_type.is_empty() {
            DEFAULT_MEDIA_TYPE
        } else {
            media_type
        };

        let id = Uuid::new_v4();
        let mut url = format!("mock:///{}/{}", id, name);
        let mut preview = None;

        if payload.len() < MAX_INLINE_SIZE {
            match inline::encode_inline(media_type, &payload) {
                InlineBody::Text { data_url, text } => {
                    preview = Some(text);
                    url = data_url;
                }
                InlineBody::Image { data_url } => {
                    preview = Some(data_url.clone());
                    url = data_url;
                }
                InlineBody::Opaque => {}
            }
        }

        let record = StoredFile {
            id,
            name: name.to_string(),
            media_type: media_type.to_string(),
            size: payload.len() as i64,
            uploaded_at: Utc::now(),
            url,
            preview,
        };
        let response = Self::to_dto(&record);

        {
            let mut files = self.files.write().await;
            files.push(record);
        }
        self.mark_changed();

        info!(
            "File stored: id={}, name={}, type={}, size={}",
            response.id, response.name, response.media_type, response.size
        );

        Ok(response)
    }

    /// List all uploads, most recent first
    pub async fn list_files(&self) -> Vec<FileResponseDto> {
        let files = self.files.read().await;
        let mut records: Vec<&StoredFile> = files.iter().collect();
        records.sort_by(|a, b| b.uploaded_at.cmp(&a.uploaded_at));
        records.into_iter().map(Self::to_dto).collect()
    }

    /// Get metadata for a single upload
    pub async fn get_file(&self, id: Uuid) -> Result<FileResponseDto> {
        let files = self.files.read().await;
        files
            .iter()
            .find(|f| f.id == id)
            .map(Self::to_dto)
            .ok_or_else(|| AppError::NotFound("File not found.".to_string()))
    }

    /// Recover the raw bytes of an inline-stored upload
    ///
    /// Uploads that only carry a placeholder reference have no stored
    /// content to serve.
    pub async fn download_file(&self, id: Uuid) -> Result<FileDownload> {
        let files = self.files.read().await;
        let file = files
            .iter()
            .find(|f| f.id == id)
            .ok_or_else(|| AppError::NotFound("File not found.".to_string()))?;

        let bytes = inline::decode_inline(&file.url).ok_or_else(|| {
            AppError::BadRequest("File content is not stored inline.".to_string())
        })?;

        Ok(FileDownload {
            name: file.name.clone(),
            media_type: file.media_type.clone(),
            bytes,
        })
    }

    /// Remove an upload by id
    pub async fn delete_file(&self, id: Uuid) -> Result<()> {
        {
            let mut files = self.files.write().await;
            let initial_len = files.len();
            files.retain(|f| f.id != id);
            if files.len() == initial_len {
                return Err(AppError::NotFound("File not found.".to_string()));
            }
        }
        self.mark_changed();

        debug!("File removed: id={}", id);

        Ok(())
    }
}

impl Default for FileService {
    fn default() -> Self {
        Self::new()
    }
}
