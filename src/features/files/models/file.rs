use chrono::{DateTime, Utc};
use uuid::Uuid;

/// In-memory record for an uploaded file
///
/// Records are immutable once created: uploads append, deletes remove,
/// nothing updates in place.
#[derive(Debug, Clone)]
pub struct StoredFile {
    pub id: Uuid,
    pub name: String,
    pub media_type: String,
    pub size: i64,
    pub uploaded_at: DateTime<Utc>,
    /// Inline `data:` URL for small text/image payloads, placeholder
    /// `mock:///` reference otherwise
    pub url: String,
    /// Decoded text for text payloads, the inline data URL for images
    pub preview: Option<String>,
}
