//! Command handlers for the docseek CLI.

pub mod ask;
pub mod chat;
pub mod prompts;
pub mod session;
pub mod snippets;

pub use ask::AskCommand;
pub use chat::ChatCommand;
pub use prompts::PromptsCommand;
pub use snippets::SnippetsCommand;
