//! Chat command handler: answer questions until the user types `exit`.

use super::session::{build_pipeline, print_report};
use clap::Args;
use docseek_core::{config::AppConfig, AppResult};
use std::io::Write;
use tokio::io::{AsyncBufReadExt, BufReader};

const EXIT_COMMAND: &str = "exit";

/// Ask questions interactively
#[derive(Args, Debug)]
pub struct ChatCommand {
    /// Output each report as JSON
    #[arg(long)]
    pub json: bool,
}

impl ChatCommand {
    pub async fn execute(&self, config: &AppConfig) -> AppResult<()> {
        tracing::info!("Executing chat command");

        config.validate()?;
        let pipeline = build_pipeline(config)?;

        let mut lines = BufReader::new(tokio::io::stdin()).lines();

        loop {
            print!("Ask a question (or '{}' to quit): ", EXIT_COMMAND);
            std::io::stdout().flush()?;

            let Some(line) = lines.next_line().await? else {
                break;
            };
            let question = line.trim();

            if is_exit(question) {
                break;
            }
            if question.is_empty() {
                continue;
            }

            let report = pipeline.run(question).await;
            print_report(&report, self.json)?;
            println!();
        }

        tracing::info!("Chat session ended");
        Ok(())
    }
}

fn is_exit(input: &str) -> bool {
    input.eq_ignore_ascii_case(EXIT_COMMAND)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_exit() {
        assert!(is_exit("exit"));
        assert!(is_exit("EXIT"));
        assert!(!is_exit("exit now"));
        assert!(!is_exit(""));
    }
}
