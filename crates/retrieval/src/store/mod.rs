//! Document stores: where candidate documents are searched and fetched from.

pub mod drive;
pub mod local;

pub use drive::DriveStore;
pub use local::LocalStore;

use docseek_core::config::{AppConfig, StoreConfig};
use docseek_core::AppResult;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;

/// Classification that decides how a document's text is obtained.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ContentKind {
    Pdf,
    ExportedDocument,
    PlainText,
    Unsupported,
}

impl ContentKind {
    /// Classify a MIME type.
    pub fn from_mime_type(mime_type: &str) -> Self {
        match mime_type {
            "application/pdf" => Self::Pdf,
            "application/vnd.google-apps.document" => Self::ExportedDocument,
            m if m.starts_with("text/") => Self::PlainText,
            _ => Self::Unsupported,
        }
    }

    pub fn is_supported(&self) -> bool {
        !matches!(self, Self::Unsupported)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pdf => "pdf",
            Self::ExportedDocument => "exported-document",
            Self::PlainText => "plain-text",
            Self::Unsupported => "unsupported",
        }
    }
}

/// Metadata for one document returned by a store search.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DocumentDescriptor {
    /// Store-specific identifier (Drive file id, local path)
    pub id: String,

    /// Display name shown to the user
    pub name: String,

    /// MIME type as reported by the store
    pub mime_type: String,

    /// Content classification derived from the MIME type
    pub kind: ContentKind,
}

impl DocumentDescriptor {
    pub fn new(id: impl Into<String>, name: impl Into<String>, mime_type: impl Into<String>) -> Self {
        let mime_type = mime_type.into();
        Self {
            id: id.into(),
            name: name.into(),
            kind: ContentKind::from_mime_type(&mime_type),
            mime_type,
        }
    }
}

/// A searchable source of documents.
#[async_trait::async_trait]
pub trait DocumentStore: Send + Sync {
    /// Short store name for logs.
    fn store_name(&self) -> &str;

    /// Find documents whose content mentions any of the keywords.
    async fn search(&self, keywords: &[String]) -> AppResult<Vec<DocumentDescriptor>>;

    /// Retrieve and decode one document's full text.
    async fn fetch_text(&self, document: &DocumentDescriptor) -> AppResult<String>;
}

/// Build the store selected by the configuration.
pub fn create_store(config: &AppConfig) -> AppResult<Arc<dyn DocumentStore>> {
    match &config.store {
        StoreConfig::Drive { endpoint, .. } => {
            let token = config.resolve_drive_token()?;
            let timeout = Duration::from_secs(config.pipeline.request_timeout_secs);
            Ok(Arc::new(DriveStore::new(endpoint, token, Some(timeout))?))
        }
        StoreConfig::Local { root } => Ok(Arc::new(LocalStore::new(root.clone()))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_content_kind_from_mime_type() {
        assert_eq!(ContentKind::from_mime_type("application/pdf"), ContentKind::Pdf);
        assert_eq!(
            ContentKind::from_mime_type("application/vnd.google-apps.document"),
            ContentKind::ExportedDocument
        );
        assert_eq!(ContentKind::from_mime_type("text/plain"), ContentKind::PlainText);
        assert_eq!(ContentKind::from_mime_type("text/markdown"), ContentKind::PlainText);
        assert_eq!(
            ContentKind::from_mime_type("application/vnd.google-apps.spreadsheet"),
            ContentKind::Unsupported
        );
        assert_eq!(ContentKind::from_mime_type("image/png"), ContentKind::Unsupported);
    }

    #[test]
    fn test_descriptor_derives_kind() {
        let doc = DocumentDescriptor::new("1", "notes.txt", "text/plain");
        assert_eq!(doc.kind, ContentKind::PlainText);
        assert!(doc.kind.is_supported());

        let json = serde_json::to_value(&doc).unwrap();
        assert_eq!(json["mimeType"], "text/plain");
        assert_eq!(json["kind"], "plain-text");
    }

    #[test]
    fn test_create_local_store() {
        let temp = tempfile::TempDir::new().unwrap();
        let mut config = AppConfig::default();
        config.store = StoreConfig::Local {
            root: temp.path().to_path_buf(),
        };
        let store = create_store(&config).unwrap();
        assert_eq!(store.store_name(), "local");
    }
}
