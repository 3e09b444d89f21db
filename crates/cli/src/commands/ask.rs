//! Ask command handler.
//!
//! Answers one question from the documents in the configured store.

use super::session::{build_pipeline, print_report};
use clap::Args;
use docseek_core::{config::AppConfig, AppError, AppResult};
use std::path::PathBuf;

/// Ask a question about your documents
#[derive(Args, Debug)]
pub struct AskCommand {
    /// The question to ask
    pub question: Option<String>,

    /// Read the question from a file
    #[arg(short, long, conflicts_with = "question")]
    pub file: Option<PathBuf>,

    /// Characters of context around each keyword match
    #[arg(long)]
    pub buffer: Option<usize>,

    /// Keyword matches kept per document
    #[arg(long)]
    pub max_matches: Option<usize>,

    /// Snippets kept per document
    #[arg(long)]
    pub max_snippets: Option<usize>,

    /// Documents processed concurrently
    #[arg(long)]
    pub concurrency: Option<usize>,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

impl AskCommand {
    /// Execute the ask command.
    pub async fn execute(&self, config: &AppConfig) -> AppResult<()> {
        tracing::info!("Executing ask command");
        tracing::debug!("Ask command options: {:?}", self);

        let question = self.get_question()?;

        let config = config.clone().with_snippet_overrides(
            self.buffer,
            self.max_matches,
            self.max_snippets,
            self.concurrency,
        );
        config.validate()?;

        let pipeline = build_pipeline(&config)?;
        let report = pipeline.run(&question).await;

        print_report(&report, self.json)
    }

    fn get_question(&self) -> AppResult<String> {
        let question = match (&self.question, &self.file) {
            (Some(question), _) => question.clone(),
            (None, Some(path)) => std::fs::read_to_string(path)?,
            (None, None) => {
                return Err(AppError::Config("No question provided".to_string()));
            }
        };

        let question = question.trim();
        if question.is_empty() {
            return Err(AppError::Config("Question is empty".to_string()));
        }
        Ok(question.to_string())
    }
}
