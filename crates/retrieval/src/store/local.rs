//! Local filesystem document store.

use super::{ContentKind, DocumentDescriptor, DocumentStore};
use crate::decode::{decode_pdf, decode_pdf_blocking, decode_text};
use docseek_core::{AppError, AppResult};
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

const TEXT_EXTENSIONS: [&str; 10] = [
    "txt", "md", "markdown", "rst", "csv", "log", "json", "yaml", "yml", "html",
];

/// MIME type inferred from a file extension.
fn mime_type_for(path: &Path) -> &'static str {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_lowercase())
        .unwrap_or_default();

    if ext == "pdf" {
        "application/pdf"
    } else if TEXT_EXTENSIONS.contains(&ext.as_str()) {
        "text/plain"
    } else {
        "application/octet-stream"
    }
}

/// Document store over a directory tree.
///
/// Search reads every supported file and keeps those whose text contains
/// any keyword, case-insensitively. Descriptor ids are file paths.
pub struct LocalStore {
    root: PathBuf,
}

impl LocalStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }
}

fn read_text(path: &Path, kind: ContentKind) -> AppResult<String> {
    let bytes = std::fs::read(path)?;
    match kind {
        ContentKind::Pdf => decode_pdf(&bytes),
        _ => Ok(decode_text(&bytes)),
    }
}

fn scan_tree(root: &Path, keywords: &[String]) -> Vec<DocumentDescriptor> {
    let needles: Vec<String> = keywords
        .iter()
        .map(|k| k.trim().to_lowercase())
        .filter(|k| !k.is_empty())
        .collect();
    if needles.is_empty() {
        return Vec::new();
    }

    let mut found = Vec::new();
    for entry in WalkDir::new(root)
        .sort_by_file_name()
        .into_iter()
        .filter_map(|e| e.ok())
        .filter(|e| e.file_type().is_file())
    {
        let path = entry.path();
        let mime_type = mime_type_for(path);
        let kind = ContentKind::from_mime_type(mime_type);
        if !kind.is_supported() {
            continue;
        }

        let text = match read_text(path, kind) {
            Ok(text) => text.to_lowercase(),
            Err(e) => {
                tracing::debug!("Skipping {:?} during search: {}", path, e);
                continue;
            }
        };

        if needles.iter().any(|needle| text.contains(needle.as_str())) {
            let name = path
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_default();
            found.push(DocumentDescriptor::new(
                path.to_string_lossy().into_owned(),
                name,
                mime_type,
            ));
        }
    }
    found
}

#[async_trait::async_trait]
impl DocumentStore for LocalStore {
    fn store_name(&self) -> &str {
        "local"
    }

    async fn search(&self, keywords: &[String]) -> AppResult<Vec<DocumentDescriptor>> {
        let root = self.root.clone();
        let keywords = keywords.to_vec();

        let found = tokio::task::spawn_blocking(move || scan_tree(&root, &keywords))
            .await
            .map_err(|e| AppError::Store(format!("Local search task failed: {}", e)))?;

        tracing::info!("Local search in {:?} returned {} files", self.root, found.len());
        Ok(found)
    }

    async fn fetch_text(&self, document: &DocumentDescriptor) -> AppResult<String> {
        let path = PathBuf::from(&document.id);
        match document.kind {
            ContentKind::Pdf => decode_pdf_blocking(tokio::fs::read(&path).await?).await,
            ContentKind::PlainText | ContentKind::ExportedDocument => {
                Ok(decode_text(&tokio::fs::read(&path).await?))
            }
            ContentKind::Unsupported => Err(AppError::Store(format!(
                "Unsupported content type: {}",
                document.mime_type
            ))),
        }
    }
}
