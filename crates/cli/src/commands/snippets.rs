//! Snippets command handler.
//!
//! Runs keyword snippeting on one local file without calling an LLM.

use clap::Args;
use docseek_core::{config::AppConfig, AppResult};
use docseek_retrieval::decode::{decode_pdf, decode_text};
use docseek_retrieval::{extract_snippets, SnippetOptions, SnippetOutcome};
use std::path::{Path, PathBuf};

/// Extract keyword snippets from a local file
#[derive(Args, Debug)]
pub struct SnippetsCommand {
    /// File to scan (PDF or text)
    pub file: PathBuf,

    /// Keyword or phrase to look for (repeatable)
    #[arg(short, long = "keyword", required = true)]
    pub keywords: Vec<String>,

    /// Characters of context around each keyword match
    #[arg(long)]
    pub buffer: Option<usize>,

    /// Keyword matches kept
    #[arg(long)]
    pub max_matches: Option<usize>,

    /// Snippets kept
    #[arg(long)]
    pub max_snippets: Option<usize>,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

impl SnippetsCommand {
    pub async fn execute(&self, config: &AppConfig) -> AppResult<()> {
        tracing::info!("Executing snippets command");
        tracing::debug!("Snippets options: {:?}", self);

        let config = config.clone().with_snippet_overrides(
            self.buffer,
            self.max_matches,
            self.max_snippets,
            None,
        );
        config.snippets.validate()?;
        let options = SnippetOptions::from(config.snippets);

        let text = read_document(&self.file)?;
        let outcome = extract_snippets(&text, &self.keywords, &options);

        if self.json {
            println!("{}", serde_json::to_string_pretty(&outcome)?);
        } else {
            println!("{}", outcome);
        }

        if let SnippetOutcome::Snippets(set) = &outcome {
            tracing::debug!("{} snippets from {:?}", set.len(), self.file);
        }

        Ok(())
    }
}

fn read_document(path: &Path) -> AppResult<String> {
    let bytes = std::fs::read(path)?;

    let is_pdf = path
        .extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("pdf"));

    if is_pdf {
        decode_pdf(&bytes)
    } else {
        Ok(decode_text(&bytes))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[derive(Parser)]
    struct TestCli {
        #[command(flatten)]
        snippets: SnippetsCommand,
    }

    #[test]
    fn test_parse_repeated_keywords() {
        let cli = TestCli::parse_from([
            "docseek",
            "notes.txt",
            "-k",
            "Tuesday",
            "--keyword",
            "Room",
        ]);
        assert_eq!(cli.snippets.keywords, vec!["Tuesday", "Room"]);
        assert_eq!(cli.snippets.file, PathBuf::from("notes.txt"));
    }

    #[test]
    fn test_keywords_required() {
        assert!(TestCli::try_parse_from(["docseek", "notes.txt"]).is_err());
    }

    #[test]
    fn test_read_text_document() {
        let temp = tempfile::TempDir::new().unwrap();
        let path = temp.path().join("notes.md");
        std::fs::write(&path, "Room 204").unwrap();
        assert_eq!(read_document(&path).unwrap(), "Room 204");
    }

    #[test]
    fn test_read_missing_document_is_io_error() {
        let result = read_document(Path::new("/nonexistent/notes.txt"));
        assert!(matches!(result, Err(docseek_core::AppError::Io(_))));
    }

    #[tokio::test]
    async fn test_zero_caps_rejected() {
        let temp = tempfile::TempDir::new().unwrap();
        let path = temp.path().join("notes.txt");
        std::fs::write(&path, "Meeting on Tuesday in Room 204.").unwrap();
        let file = path.to_str().unwrap();

        for cap in ["--max-snippets", "--max-matches"] {
            let cli = TestCli::parse_from(["docseek", file, "-k", "Tuesday", cap, "0"]);
            let result = cli.snippets.execute(&AppConfig::default()).await;
            assert!(matches!(result, Err(docseek_core::AppError::Config(_))));
        }
    }
}
