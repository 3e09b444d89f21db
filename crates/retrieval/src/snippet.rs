//! Snippet assembly.
//!
//! Compresses a document into a capped, document-ordered set of word-safe
//! windows around keyword matches, or into one of two sentinel outcomes.

use crate::keywords::{normalize_keywords, KeywordFragment};
use crate::locate::{MatchLocator, MatchScan, DEFAULT_MAX_MATCHES};
use crate::window::{expand_window, DEFAULT_BUFFER_SIZE};
use serde::Serialize;
use std::fmt;

/// Shown when there were no usable keywords.
pub const NO_KEYWORDS_SENTINEL: &str = "No keywords found.";

/// Shown when keywords were present but none occurred in the text.
pub const NO_MATCH_SENTINEL: &str = "No direct keyword match found.";

/// Line placed between consecutive windows.
pub const SNIPPET_SEPARATOR: &str = "\n...\n";

/// Knobs for snippet extraction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SnippetOptions {
    /// Characters of context around each match, split evenly before/after
    pub buffer_size: usize,

    /// Matches kept from the scan
    pub max_matches: usize,

    /// Windows kept in the final set
    pub max_snippets: usize,
}

impl Default for SnippetOptions {
    fn default() -> Self {
        Self {
            buffer_size: DEFAULT_BUFFER_SIZE,
            max_matches: DEFAULT_MAX_MATCHES,
            max_snippets: DEFAULT_MAX_MATCHES,
        }
    }
}

impl From<docseek_core::config::SnippetConfig> for SnippetOptions {
    fn from(config: docseek_core::config::SnippetConfig) -> Self {
        Self {
            buffer_size: config.buffer_size,
            max_matches: config.max_matches,
            max_snippets: config.max_snippets,
        }
    }
}

/// Ordered windows extracted from one document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SnippetSet {
    snippets: Vec<String>,
}

impl SnippetSet {
    /// Individual windows in document order.
    pub fn snippets(&self) -> &[String] {
        &self.snippets
    }

    pub fn len(&self) -> usize {
        self.snippets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.snippets.is_empty()
    }

    /// Windows joined by the ellipsis separator line.
    pub fn joined(&self) -> String {
        self.snippets.join(SNIPPET_SEPARATOR)
    }
}

/// What snippet extraction produced for one document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "camelCase")]
pub enum SnippetOutcome {
    /// The keyword list was empty; no scan happened.
    NoKeywords,
    /// The text was scanned and no keyword occurred.
    NoMatch,
    /// At least one window was produced.
    Snippets(SnippetSet),
}

impl SnippetOutcome {
    /// The string handed to answer synthesis: joined windows or a sentinel.
    pub fn context(&self) -> String {
        match self {
            Self::NoKeywords => NO_KEYWORDS_SENTINEL.to_string(),
            Self::NoMatch => NO_MATCH_SENTINEL.to_string(),
            Self::Snippets(set) => set.joined(),
        }
    }

    /// Whether any document text backs this outcome.
    pub fn has_snippets(&self) -> bool {
        matches!(self, Self::Snippets(_))
    }
}

impl fmt::Display for SnippetOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.context())
    }
}

/// Turn a capped match scan into windows, or a sentinel outcome.
///
/// Windows follow match order and are capped at `options.max_snippets`
/// (a cap of 0 is treated as 1). A window whose bounds equal the previous
/// one's (two matches inside the same clamped region) is emitted once and
/// does not count against the cap.
pub fn assemble_snippets(text: &str, scan: &MatchScan, options: &SnippetOptions) -> SnippetOutcome {
    let matches = match scan {
        MatchScan::NoKeywords => return SnippetOutcome::NoKeywords,
        MatchScan::Matches(matches) if matches.is_empty() => return SnippetOutcome::NoMatch,
        MatchScan::Matches(matches) => matches,
    };

    let cap = options.max_snippets.max(1);
    let mut snippets = Vec::new();
    let mut previous = None;

    for m in matches {
        if snippets.len() == cap {
            break;
        }
        let window = expand_window(text, *m, options.buffer_size);
        let bounds = (window.start, window.end);
        if previous == Some(bounds) {
            continue;
        }
        previous = Some(bounds);
        snippets.push(window.text.to_string());
    }

    tracing::debug!(
        "Assembled {} snippets from {} matches",
        snippets.len(),
        matches.len()
    );

    SnippetOutcome::Snippets(SnippetSet { snippets })
}

/// Normalize keywords, scan, and assemble in one call.
pub fn extract_snippets<S: AsRef<str>>(
    text: &str,
    keywords: &[S],
    options: &SnippetOptions,
) -> SnippetOutcome {
    let fragments = normalize_keywords(keywords);
    extract_with_fragments(text, &fragments, options)
}

/// Scan and assemble with already-normalized fragments.
pub fn extract_with_fragments(
    text: &str,
    fragments: &[KeywordFragment],
    options: &SnippetOptions,
) -> SnippetOutcome {
    let scan = MatchLocator::new(fragments).scan(text, options.max_matches);
    assemble_snippets(text, &scan, options)
}
