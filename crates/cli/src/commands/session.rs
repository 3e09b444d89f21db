//! Pipeline construction and report rendering shared by `ask` and `chat`.

use docseek_core::config::{AppConfig, ProviderConfig};
use docseek_core::{AppError, AppResult};
use docseek_llm::create_client;
use docseek_retrieval::{
    create_store, DocumentOutcome, LlmAnswerSynthesizer, LlmKeywordExtractor, Pipeline,
    PipelineOptions, QueryOutcome, QueryReport,
};
use std::sync::Arc;
use std::time::Duration;

/// Wire the configured LLM provider and document store into a pipeline.
pub fn build_pipeline(config: &AppConfig) -> AppResult<Pipeline> {
    let provider_config = config.get_provider_config(&config.provider);
    let endpoint = provider_config.and_then(|pc| pc.endpoint());
    let timeout_secs = match provider_config {
        Some(ProviderConfig::Ollama {
            timeout: Some(secs),
            ..
        }) => *secs,
        _ => config.pipeline.request_timeout_secs,
    };
    let api_key = config.resolve_api_key(&config.provider);

    let client = create_client(
        &config.provider,
        endpoint,
        api_key.as_deref(),
        Some(Duration::from_secs(timeout_secs)),
    )
    .map_err(AppError::Config)?;

    tracing::debug!(
        "Using {} with model {}",
        client.provider_name(),
        config.model
    );

    let extractor = LlmKeywordExtractor::new(client.clone(), &config.model, &config.workspace)?;
    let synthesizer = LlmAnswerSynthesizer::new(client, &config.model, &config.workspace)?;
    let store = create_store(config)?;

    Ok(Pipeline::new(
        Arc::new(extractor),
        store,
        Arc::new(synthesizer),
        PipelineOptions::from(config),
    ))
}

/// Print a report to stdout, as text or pretty JSON.
pub fn print_report(report: &QueryReport, json: bool) -> AppResult<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(report)?);
    } else {
        print!("{}", render_report(report));
    }
    Ok(())
}

/// Plain-text rendering of a report.
pub fn render_report(report: &QueryReport) -> String {
    let mut out = String::new();

    match &report.outcome {
        QueryOutcome::NoKeywords => {
            out.push_str("No keywords could be extracted from the question.\n");
        }
        QueryOutcome::SearchFailed { reason } => {
            out.push_str(&format!("Search failed: {}\n", reason));
        }
        QueryOutcome::NoDocuments => {
            out.push_str(&format!(
                "No documents matched keywords: {}\n",
                report.keywords.join(", ")
            ));
        }
        QueryOutcome::Documents { documents } => {
            out.push_str(&format!("Keywords: {}\n", report.keywords.join(", ")));

            for doc in documents {
                out.push('\n');
                out.push_str(&format!("File: {}\n", doc.document.name));

                match &doc.outcome {
                    DocumentOutcome::Unsupported => {
                        out.push_str(&format!(
                            "Skipped: unsupported content type {}\n",
                            doc.document.mime_type
                        ));
                    }
                    DocumentOutcome::Unavailable { reason } => {
                        out.push_str(&format!("Could not read document: {}\n", reason));
                    }
                    DocumentOutcome::Processed { snippets, answer } => {
                        out.push_str("Snippets:\n");
                        out.push_str(&snippets.context());
                        out.push_str("\n\nAnswer:\n");
                        out.push_str(&answer.display_text());
                        out.push('\n');
                    }
                }
            }
        }
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use docseek_retrieval::{Answer, DocumentDescriptor, DocumentReport, SnippetOutcome};

    fn report(outcome: QueryOutcome) -> QueryReport {
        QueryReport {
            question: "When is the meeting?".to_string(),
            keywords: vec!["meeting".to_string(), "Tuesday".to_string()],
            outcome,
        }
    }

    #[test]
    fn test_render_query_level_outcomes() {
        assert!(render_report(&report(QueryOutcome::NoKeywords)).contains("No keywords"));
        assert!(render_report(&report(QueryOutcome::NoDocuments)).contains("meeting, Tuesday"));
        assert!(render_report(&report(QueryOutcome::SearchFailed {
            reason: "401".to_string()
        }))
        .contains("Search failed: 401"));
    }

    #[test]
    fn test_render_documents() {
        let text = render_report(&report(QueryOutcome::Documents {
            documents: vec![
                DocumentReport {
                    document: DocumentDescriptor::new("1", "minutes.txt", "text/plain"),
                    outcome: DocumentOutcome::Processed {
                        snippets: SnippetOutcome::NoMatch,
                        answer: Answer::NotFound,
                    },
                },
                DocumentReport {
                    document: DocumentDescriptor::new("2", "broken.pdf", "application/pdf"),
                    outcome: DocumentOutcome::Unavailable {
                        reason: "bad xref".to_string(),
                    },
                },
            ],
        }));

        assert!(text.contains("File: minutes.txt"));
        assert!(text.contains("No direct keyword match found."));
        assert!(text.contains("Not found in this document context."));
        assert!(text.contains("File: broken.pdf"));
        assert!(text.contains("Could not read document: bad xref"));
    }

    #[test]
    fn test_build_pipeline_with_local_store() {
        let temp = tempfile::TempDir::new().unwrap();
        let mut config = AppConfig::default();
        config.workspace = temp.path().to_path_buf();
        config.provider = "ollama".to_string();
        config.store = docseek_core::config::StoreConfig::Local {
            root: temp.path().to_path_buf(),
        };

        let pipeline = build_pipeline(&config).unwrap();
        assert_eq!(pipeline.options().concurrency, 1);
    }
}
