//! Per-query orchestration.
//!
//! keywords → store search → per-document fetch → match scan → windows →
//! snippet set → answer synthesis. Every failure past keyword extraction is
//! reported as a value in the [`QueryReport`]; one bad document never stops
//! the others.

use crate::keywords::{normalize_keywords, KeywordFragment};
use crate::locate::MatchLocator;
use crate::snippet::{assemble_snippets, SnippetOptions, SnippetOutcome};
use crate::store::DocumentDescriptor;
use docseek_core::config::AppConfig;
use docseek_core::AppResult;
use futures::stream::{self, StreamExt};
use serde::Serialize;
use std::sync::Arc;
use tracing::Instrument;

pub use crate::store::DocumentStore;

/// Answer returned when the context does not ground an answer.
pub const NOT_FOUND_ANSWER: &str = "Not found in this document context.";

/// Turns a question into search keywords.
#[async_trait::async_trait]
pub trait KeywordExtractor: Send + Sync {
    /// Keywords for the question; empty when extraction fails.
    async fn extract_keywords(&self, question: &str) -> Vec<String>;
}

/// Answers a question from snippet context only.
#[async_trait::async_trait]
pub trait AnswerSynthesizer: Send + Sync {
    async fn synthesize(&self, question: &str, context: &str) -> AppResult<String>;
}

/// Pipeline tuning.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PipelineOptions {
    pub snippets: SnippetOptions,

    /// Documents processed at once; results keep search order
    pub concurrency: usize,
}

impl Default for PipelineOptions {
    fn default() -> Self {
        Self {
            snippets: SnippetOptions::default(),
            concurrency: 1,
        }
    }
}

impl From<&AppConfig> for PipelineOptions {
    fn from(config: &AppConfig) -> Self {
        Self {
            snippets: SnippetOptions::from(config.snippets),
            concurrency: config.pipeline.concurrency,
        }
    }
}

/// Synthesized answer for one document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", content = "text", rename_all = "camelCase")]
pub enum Answer {
    Grounded(String),
    /// Nothing in the document supports an answer.
    NotFound,
    Failed(String),
}

impl Answer {
    /// Text shown to the user.
    pub fn display_text(&self) -> String {
        match self {
            Self::Grounded(text) => text.clone(),
            Self::NotFound => NOT_FOUND_ANSWER.to_string(),
            Self::Failed(reason) => format!("Answer unavailable: {}", reason),
        }
    }
}

/// What happened to one searched document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "camelCase")]
pub enum DocumentOutcome {
    /// Content type the pipeline cannot read; never fetched.
    Unsupported,
    /// Fetching or decoding failed.
    Unavailable { reason: String },
    Processed {
        snippets: SnippetOutcome,
        answer: Answer,
    },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DocumentReport {
    pub document: DocumentDescriptor,
    pub outcome: DocumentOutcome,
}

/// Query-level result.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "camelCase")]
pub enum QueryOutcome {
    /// Extraction produced no usable keyword; nothing was searched.
    NoKeywords,
    SearchFailed { reason: String },
    NoDocuments,
    Documents { documents: Vec<DocumentReport> },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct QueryReport {
    pub question: String,
    pub keywords: Vec<String>,
    pub outcome: QueryOutcome,
}

impl QueryReport {
    /// Per-document reports, empty unless documents were found.
    pub fn documents(&self) -> &[DocumentReport] {
        match &self.outcome {
            QueryOutcome::Documents { documents } => documents,
            _ => &[],
        }
    }
}

/// Orchestrates one question at a time against injected collaborators.
pub struct Pipeline {
    extractor: Arc<dyn KeywordExtractor>,
    store: Arc<dyn DocumentStore>,
    synthesizer: Arc<dyn AnswerSynthesizer>,
    options: PipelineOptions,
}

impl Pipeline {
    pub fn new(
        extractor: Arc<dyn KeywordExtractor>,
        store: Arc<dyn DocumentStore>,
        synthesizer: Arc<dyn AnswerSynthesizer>,
        options: PipelineOptions,
    ) -> Self {
        Self {
            extractor,
            store,
            synthesizer,
            options,
        }
    }

    pub fn options(&self) -> &PipelineOptions {
        &self.options
    }

    /// Answer one question.
    pub async fn run(&self, question: &str) -> QueryReport {
        let raw = self.extractor.extract_keywords(question).await;
        let fragments = normalize_keywords(&raw);
        let keywords: Vec<String> = fragments.iter().map(|f| f.literal.clone()).collect();

        tracing::info!("Extracted keywords: {:?}", keywords);

        let outcome = self.search_and_process(question, &keywords, &fragments).await;

        QueryReport {
            question: question.to_string(),
            keywords,
            outcome,
        }
    }

    async fn search_and_process(
        &self,
        question: &str,
        keywords: &[String],
        fragments: &[KeywordFragment],
    ) -> QueryOutcome {
        if fragments.is_empty() {
            return QueryOutcome::NoKeywords;
        }

        let found = match self.store.search(keywords).await {
            Ok(found) => found,
            Err(e) => {
                tracing::error!("Search in {} store failed: {}", self.store.store_name(), e);
                return QueryOutcome::SearchFailed {
                    reason: e.to_string(),
                };
            }
        };

        if found.is_empty() {
            return QueryOutcome::NoDocuments;
        }

        tracing::info!("Processing {} documents", found.len());

        // One compiled alternation serves every document of this query
        let locator = MatchLocator::new(fragments);

        let documents = stream::iter(found)
            .map(|document| {
                let span = tracing::info_span!("document", name = %document.name);
                self.process_document(document, question, &locator)
                    .instrument(span)
            })
            .buffered(self.options.concurrency.max(1))
            .collect::<Vec<_>>()
            .await;

        QueryOutcome::Documents { documents }
    }

    async fn process_document(
        &self,
        document: DocumentDescriptor,
        question: &str,
        locator: &MatchLocator,
    ) -> DocumentReport {
        if !document.kind.is_supported() {
            tracing::info!(
                "Skipping '{}': unsupported content type {}",
                document.name,
                document.mime_type
            );
            return DocumentReport {
                document,
                outcome: DocumentOutcome::Unsupported,
            };
        }

        let text = match self.store.fetch_text(&document).await {
            Ok(text) => text,
            Err(e) => {
                tracing::warn!("Could not read '{}': {}", document.name, e);
                return DocumentReport {
                    document,
                    outcome: DocumentOutcome::Unavailable {
                        reason: e.to_string(),
                    },
                };
            }
        };

        let options = &self.options.snippets;
        let scan = locator.scan(&text, options.max_matches);
        let snippets = assemble_snippets(&text, &scan, options);
        let answer = self.answer(question, &snippets).await;

        DocumentReport {
            document,
            outcome: DocumentOutcome::Processed { snippets, answer },
        }
    }

    async fn answer(&self, question: &str, snippets: &SnippetOutcome) -> Answer {
        if !snippets.has_snippets() {
            return Answer::NotFound;
        }

        match self.synthesizer.synthesize(question, &snippets.context()).await {
            Ok(text) if is_not_found(&text) => Answer::NotFound,
            Ok(text) => Answer::Grounded(text),
            Err(e) => {
                tracing::warn!("Answer synthesis failed: {}", e);
                Answer::Failed(e.to_string())
            }
        }
    }
}

fn is_not_found(answer: &str) -> bool {
    answer.trim().trim_matches('"').trim() == NOT_FOUND_ANSWER
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_not_found() {
        assert!(is_not_found(NOT_FOUND_ANSWER));
        assert!(is_not_found("  \"Not found in this document context.\"\n"));
        assert!(!is_not_found("The meeting is at **3pm**."));
    }

    #[test]
    fn test_options_from_config() {
        let mut config = AppConfig::default();
        config.snippets.buffer_size = 40;
        config.pipeline.concurrency = 4;

        let options = PipelineOptions::from(&config);
        assert_eq!(options.snippets.buffer_size, 40);
        assert_eq!(options.concurrency, 4);
    }

    #[test]
    fn test_answer_display_text() {
        assert_eq!(Answer::NotFound.display_text(), NOT_FOUND_ANSWER);
        assert_eq!(Answer::Grounded("yes".into()).display_text(), "yes");
        assert!(Answer::Failed("timeout".into()).display_text().contains("timeout"));
    }

    #[test]
    fn test_report_serialization() {
        let report = QueryReport {
            question: "q".to_string(),
            keywords: vec!["k".to_string()],
            outcome: QueryOutcome::Documents {
                documents: vec![DocumentReport {
                    document: DocumentDescriptor::new("1", "a.txt", "text/plain"),
                    outcome: DocumentOutcome::Processed {
                        snippets: SnippetOutcome::NoMatch,
                        answer: Answer::NotFound,
                    },
                }],
            },
        };

        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["outcome"]["status"], "documents");
        let doc = &json["outcome"]["documents"][0];
        assert_eq!(doc["outcome"]["status"], "processed");
        assert_eq!(doc["outcome"]["snippets"]["outcome"], "noMatch");
        assert_eq!(doc["outcome"]["answer"]["status"], "notFound");
    }
}
