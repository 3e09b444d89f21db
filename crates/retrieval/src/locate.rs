//! Keyword match location.
//!
//! Compiles normalized keyword fragments into a single case-insensitive
//! alternation and scans document text once, left to right.

use crate::keywords::KeywordFragment;
use regex::{Regex, RegexBuilder};

/// Default number of matches kept from a scan.
pub const DEFAULT_MAX_MATCHES: usize = 10;

/// Half-open byte range `[start, end)` of one keyword occurrence.
///
/// Both offsets lie on `char` boundaries of the scanned text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Match {
    pub start: usize,
    pub end: usize,
}

/// Result of a scan.
///
/// `NoKeywords` means no scan was attempted; `Matches(vec![])` means the text
/// was scanned and nothing matched.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MatchScan {
    NoKeywords,
    Matches(Vec<Match>),
}

impl MatchScan {
    /// Matches found, empty for both outcomes without matches.
    pub fn matches(&self) -> &[Match] {
        match self {
            Self::NoKeywords => &[],
            Self::Matches(matches) => matches,
        }
    }
}

/// A compiled keyword alternation.
#[derive(Debug, Clone)]
pub struct MatchLocator {
    regex: Option<Regex>,
    has_keywords: bool,
}

impl MatchLocator {
    /// Compile fragments (already ordered longest-first) into one alternation.
    pub fn new(fragments: &[KeywordFragment]) -> Self {
        if fragments.is_empty() {
            return Self {
                regex: None,
                has_keywords: false,
            };
        }

        let pattern = fragments
            .iter()
            .map(|fragment| fragment.pattern.as_str())
            .collect::<Vec<_>>()
            .join("|");

        // Escaped literals always parse; only the compiled-size limit can reject them
        let regex = match RegexBuilder::new(&pattern).case_insensitive(true).build() {
            Ok(regex) => Some(regex),
            Err(e) => {
                tracing::warn!(
                    "Keyword pattern rejected ({} keywords), scanning will find nothing: {}",
                    fragments.len(),
                    e
                );
                None
            }
        };

        Self {
            regex,
            has_keywords: true,
        }
    }

    /// Scan `text` and keep the first `max_matches` matches in document order.
    ///
    /// A cap of 0 is treated as 1, so a text containing a keyword never
    /// reports no match.
    pub fn scan(&self, text: &str, max_matches: usize) -> MatchScan {
        if !self.has_keywords {
            return MatchScan::NoKeywords;
        }

        let matches = match &self.regex {
            Some(regex) => regex
                .find_iter(text)
                .take(max_matches.max(1))
                .map(|m| Match {
                    start: m.start(),
                    end: m.end(),
                })
                .collect(),
            None => Vec::new(),
        };

        tracing::trace!("Scanned {} bytes, kept {} matches", text.len(), matches.len());
        MatchScan::Matches(matches)
    }
}

/// Locate keyword matches in one call.
pub fn locate_matches(text: &str, fragments: &[KeywordFragment], max_matches: usize) -> MatchScan {
    MatchLocator::new(fragments).scan(text, max_matches)
}
