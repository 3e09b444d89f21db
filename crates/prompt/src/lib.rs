//! Prompt system for docseek.
//!
//! This crate provides structured prompt management with:
//! - YAML-based prompt definitions
//! - Built-in prompts for keyword extraction and grounded answering
//! - Workspace overrides in `.docseek/prompts/`
//! - Handlebars template rendering

pub mod builder;
pub mod loader;
pub mod types;

// Re-export main types
pub use builder::build_prompt;
pub use loader::{list_prompts, load_prompt, ANSWER_PROMPT_ID, KEYWORDS_PROMPT_ID};
pub use types::{
    BuiltPrompt, BuiltPromptMetadata, PromptDefinition, PromptListing, PromptOrigin,
    PromptOutputSpec,
};
