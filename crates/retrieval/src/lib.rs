//! Keyword retrieval and snippeting for docseek.
//!
//! The core turns a keyword list into word-safe context windows inside
//! arbitrary document text:
//!
//! - [`keywords`]: normalize and order keywords, parse LLM keyword lists
//! - [`locate`]: one case-insensitive scan for non-overlapping matches
//! - [`window`]: expand matches to word-safe windows
//! - [`snippet`]: cap, deduplicate and join windows, or return a sentinel
//!
//! Around it, [`pipeline`] runs a whole question against a
//! [`store::DocumentStore`] with LLM-backed collaborators from [`assist`].
//!
//! # Example
//! ```
//! use docseek_retrieval::{extract_snippets, SnippetOptions};
//!
//! let text = "Meeting scheduled for 3pm on Tuesday in Room 204.";
//! let options = SnippetOptions { buffer_size: 20, ..SnippetOptions::default() };
//! let outcome = extract_snippets(text, &["Tuesday"], &options);
//! assert_eq!(outcome.context(), "for 3pm on Tuesday in Room 204");
//! ```

pub mod assist;
pub mod decode;
pub mod keywords;
pub mod locate;
pub mod pipeline;
pub mod snippet;
pub mod store;
pub mod window;

#[cfg(test)]
mod tests;

// Re-export commonly used types
pub use assist::{LlmAnswerSynthesizer, LlmKeywordExtractor};
pub use keywords::{normalize_keywords, parse_keyword_list, KeywordFragment};
pub use locate::{locate_matches, Match, MatchLocator, MatchScan};
pub use pipeline::{
    Answer, AnswerSynthesizer, DocumentOutcome, DocumentReport, KeywordExtractor, Pipeline,
    PipelineOptions, QueryOutcome, QueryReport, NOT_FOUND_ANSWER,
};
pub use snippet::{
    assemble_snippets, extract_snippets, SnippetOptions, SnippetOutcome, SnippetSet,
    NO_KEYWORDS_SENTINEL, NO_MATCH_SENTINEL, SNIPPET_SEPARATOR,
};
pub use store::{create_store, ContentKind, DocumentDescriptor, DocumentStore};
pub use window::{expand_window, Snippet};
