//! Google Drive document store.
//!
//! Uses the Drive v3 REST API with an already-issued OAuth access token:
//! `files.list` with a full-text query for search, `alt=media` downloads for
//! binary and text files, and `files.export` for native Google Docs.

use super::{ContentKind, DocumentDescriptor, DocumentStore};
use crate::decode::{decode_pdf_blocking, decode_text};
use docseek_core::{AppError, AppResult};
use serde::Deserialize;
use std::time::Duration;

const LIST_FIELDS: &str = "files(id,name,mimeType)";
const PAGE_SIZE: &str = "100";
const EXPORT_MIME_TYPE: &str = "text/plain";

#[derive(Debug, Deserialize)]
struct FileList {
    #[serde(default)]
    files: Vec<DriveFile>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct DriveFile {
    id: String,
    name: String,
    #[serde(default)]
    mime_type: String,
}

impl From<DriveFile> for DocumentDescriptor {
    fn from(file: DriveFile) -> Self {
        DocumentDescriptor::new(file.id, file.name, file.mime_type)
    }
}

/// Document store backed by Google Drive.
pub struct DriveStore {
    base_url: String,
    token: String,
    client: reqwest::Client,
}

impl DriveStore {
    pub fn new(
        base_url: impl Into<String>,
        token: impl Into<String>,
        timeout: Option<Duration>,
    ) -> AppResult<Self> {
        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder
            .build()
            .map_err(|e| AppError::Store(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            token: token.into(),
            client,
        })
    }

    async fn get_bytes(&self, url: &str, query: &[(&str, &str)], what: &str) -> AppResult<Vec<u8>> {
        let response = self
            .client
            .get(url)
            .bearer_auth(&self.token)
            .query(query)
            .send()
            .await
            .map_err(|e| AppError::Store(format!("Failed to {}: {}", what, e)))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(AppError::Store(format!(
                "Drive API error while trying to {} ({}): {}",
                what, status, body
            )));
        }

        let bytes = response
            .bytes()
            .await
            .map_err(|e| AppError::Store(format!("Failed to read response body: {}", e)))?;
        Ok(bytes.to_vec())
    }
}

/// Quote a keyword as a Drive query string literal.
fn quote_term(keyword: &str) -> String {
    let escaped = keyword.replace('\\', "\\\\").replace('\'', "\\'");
    format!("'{}'", escaped)
}

/// Build the `files.list` query: any keyword in the full text, not trashed.
///
/// Returns `None` when no keyword survives trimming.
pub(crate) fn build_search_query(keywords: &[String]) -> Option<String> {
    let clauses: Vec<String> = keywords
        .iter()
        .map(|k| k.trim())
        .filter(|k| !k.is_empty())
        .map(|k| format!("fullText contains {}", quote_term(k)))
        .collect();

    if clauses.is_empty() {
        return None;
    }

    Some(format!("({}) and trashed = false", clauses.join(" or ")))
}

#[async_trait::async_trait]
impl DocumentStore for DriveStore {
    fn store_name(&self) -> &str {
        "drive"
    }

    async fn search(&self, keywords: &[String]) -> AppResult<Vec<DocumentDescriptor>> {
        let Some(query) = build_search_query(keywords) else {
            return Ok(Vec::new());
        };

        tracing::debug!("Drive query: {}", query);

        let url = format!("{}/files", self.base_url);
        let body = self
            .get_bytes(
                &url,
                &[("q", query.as_str()), ("fields", LIST_FIELDS), ("pageSize", PAGE_SIZE)],
                "search files",
            )
            .await?;

        let list: FileList = serde_json::from_slice(&body)
            .map_err(|e| AppError::Store(format!("Failed to parse file list: {}", e)))?;

        tracing::info!("Drive search returned {} files", list.files.len());
        Ok(list.files.into_iter().map(DocumentDescriptor::from).collect())
    }

    async fn fetch_text(&self, document: &DocumentDescriptor) -> AppResult<String> {
        let file_url = format!("{}/files/{}", self.base_url, document.id);

        match document.kind {
            ContentKind::Pdf => {
                let bytes = self
                    .get_bytes(&file_url, &[("alt", "media")], "download file")
                    .await?;
                decode_pdf_blocking(bytes).await
            }
            ContentKind::PlainText => {
                let bytes = self
                    .get_bytes(&file_url, &[("alt", "media")], "download file")
                    .await?;
                Ok(decode_text(&bytes))
            }
            ContentKind::ExportedDocument => {
                let export_url = format!("{}/export", file_url);
                let bytes = self
                    .get_bytes(&export_url, &[("mimeType", EXPORT_MIME_TYPE)], "export document")
                    .await?;
                Ok(decode_text(&bytes))
            }
            ContentKind::Unsupported => Err(AppError::Store(format!(
                "Unsupported content type: {}",
                document.mime_type
            ))),
        }
    }
}
