//! Keyword normalization and keyword-list parsing.
//!
//! Turns free-text keywords into escaped alternation fragments ordered
//! longest-first, and parses the bracketed list an LLM returns for a
//! keyword-extraction prompt without evaluating it.

use regex::Regex;
use std::collections::HashSet;
use std::sync::OnceLock;

/// A keyword ready to be used as one branch of an alternation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeywordFragment {
    /// The trimmed keyword as the user or extractor spelled it
    pub literal: String,

    /// `literal` with every regex metacharacter escaped
    pub pattern: String,
}

impl KeywordFragment {
    fn new(literal: &str) -> Self {
        Self {
            literal: literal.to_string(),
            pattern: regex::escape(literal),
        }
    }

    /// Length used for precedence, in characters of the original spelling.
    pub fn len(&self) -> usize {
        self.literal.chars().count()
    }

    pub fn is_empty(&self) -> bool {
        self.literal.is_empty()
    }
}

/// Normalize raw keywords into fragments sorted by descending length.
///
/// Keywords are trimmed, blank ones dropped, and case-insensitive duplicates
/// removed (first spelling wins). The sort is stable, so equal-length
/// keywords keep their input order. Longer keywords come first so an
/// alternation never commits to a shorter keyword that is a prefix of a
/// longer one at the same position.
pub fn normalize_keywords<S: AsRef<str>>(raw: &[S]) -> Vec<KeywordFragment> {
    let mut seen = HashSet::new();
    let mut fragments: Vec<KeywordFragment> = raw
        .iter()
        .map(|keyword| keyword.as_ref().trim())
        .filter(|keyword| !keyword.is_empty())
        .filter(|keyword| seen.insert(keyword.to_lowercase()))
        .map(KeywordFragment::new)
        .collect();

    fragments.sort_by(|a, b| b.len().cmp(&a.len()));
    fragments
}

fn bracketed_list() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?s)\[.*?\]").expect("static regex"))
}

fn quoted_item() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r#""((?:[^"\\]|\\.)*)"|'((?:[^'\\]|\\.)*)'"#).expect("static regex")
    })
}

/// Parse the keyword list out of an LLM reply.
///
/// The first `[...]` span is read as a JSON array of strings; failing that,
/// as a comma-separated list of single- or double-quoted items. Replies with
/// no list, or with anything other than quoted strings between the brackets,
/// yield an empty list.
///
/// ```
/// use docseek_retrieval::keywords::parse_keyword_list;
///
/// let reply = "Sure! ['meeting', \"Room 204\"]";
/// assert_eq!(parse_keyword_list(reply), vec!["meeting", "Room 204"]);
/// assert!(parse_keyword_list("no list here").is_empty());
/// ```
pub fn parse_keyword_list(reply: &str) -> Vec<String> {
    let Some(list) = bracketed_list().find(reply) else {
        return Vec::new();
    };
    let list = list.as_str();

    if let Ok(items) = serde_json::from_str::<Vec<String>>(list) {
        return items;
    }

    parse_quoted_items(&list[1..list.len() - 1]).unwrap_or_default()
}

/// Strictly scan `'a', "b", ...`; `None` when anything else appears between items.
fn parse_quoted_items(body: &str) -> Option<Vec<String>> {
    let mut items = Vec::new();
    let mut cursor = 0;
    let mut expect_item = true;

    for captures in quoted_item().captures_iter(body) {
        let whole = captures.get(0)?;
        let gap = body[cursor..whole.start()].trim();
        let separator_ok = if expect_item && items.is_empty() {
            gap.is_empty()
        } else {
            gap == ","
        };
        if !separator_ok {
            return None;
        }

        let raw = captures
            .get(1)
            .or_else(|| captures.get(2))
            .map(|m| m.as_str())
            .unwrap_or_default();
        items.push(unescape(raw));
        cursor = whole.end();
        expect_item = false;
    }

    let tail = body[cursor..].trim();
    if tail.is_empty() || (tail == "," && !items.is_empty()) {
        Some(items)
    } else {
        None
    }
}

fn unescape(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    let mut chars = raw.chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.next() {
            Some('n') => out.push('\n'),
            Some('t') => out.push('\t'),
            Some(other) => out.push(other),
            None => out.push('\\'),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn literals(fragments: &[KeywordFragment]) -> Vec<&str> {
        fragments.iter().map(|f| f.literal.as_str()).collect()
    }

    #[test]
    fn test_empty_input_yields_empty_output() {
        let raw: Vec<String> = Vec::new();
        assert!(normalize_keywords(&raw).is_empty());
    }

    #[test]
    fn test_sorted_longest_first_and_stable() {
        let fragments = normalize_keywords(&["cat", "category", "dog", "room 204"]);
        assert_eq!(literals(&fragments), vec!["category", "room 204", "cat", "dog"]);

        for pair in fragments.windows(2) {
            assert!(pair[0].len() >= pair[1].len());
        }
    }

    #[test]
    fn test_duplicates_removed_case_insensitively() {
        let fragments = normalize_keywords(&["Room", "room", " ROOM ", "Tuesday"]);
        assert_eq!(literals(&fragments), vec!["Tuesday", "Room"]);
    }

    #[test]
    fn test_blank_keywords_dropped() {
        let fragments = normalize_keywords(&["", "   ", "budget"]);
        assert_eq!(literals(&fragments), vec!["budget"]);
    }

    #[test]
    fn test_metacharacters_escaped() {
        let fragments = normalize_keywords(&["C++", "a.b", "(draft)"]);
        let patterns: Vec<&str> = fragments.iter().map(|f| f.pattern.as_str()).collect();
        assert_eq!(patterns, vec![r"\(draft\)", r"C\+\+", r"a\.b"]);
    }

    #[test]
    fn test_length_counts_characters_not_bytes() {
        // "café" is 4 chars but 5 bytes; "cafes" is 5 chars
        let fragments = normalize_keywords(&["café", "cafes"]);
        assert_eq!(literals(&fragments), vec!["cafes", "café"]);
    }

    #[test]
    fn test_parse_json_list() {
        let reply = "Here you go:\n```json\n[\"quarterly budget\", \"Q3\", \"finance\"]\n```";
        assert_eq!(
            parse_keyword_list(reply),
            vec!["quarterly budget", "Q3", "finance"]
        );
    }

    #[test]
    fn test_parse_single_quoted_list() {
        let reply = "['meeting', 'Tuesday', \"Room 204\",]";
        assert_eq!(parse_keyword_list(reply), vec!["meeting", "Tuesday", "Room 204"]);
    }

    #[test]
    fn test_parse_escaped_quotes() {
        let reply = r#"['O\'Brien', 'plan']"#;
        assert_eq!(parse_keyword_list(reply), vec!["O'Brien", "plan"]);
    }

    #[test]
    fn test_parse_multiline_list() {
        let reply = "[\n  'alpha',\n  'beta'\n]";
        assert_eq!(parse_keyword_list(reply), vec!["alpha", "beta"]);
    }

    #[test]
    fn test_malformed_list_is_empty() {
        assert!(parse_keyword_list("[__import__('os').system('rm -rf /')]").is_empty());
        assert!(parse_keyword_list("['a' 'b']").is_empty());
        assert!(parse_keyword_list("[1, 2, 3]").is_empty());
        assert!(parse_keyword_list("no brackets at all").is_empty());
        assert!(parse_keyword_list("['unterminated]").is_empty());
    }

    #[test]
    fn test_empty_list() {
        assert!(parse_keyword_list("[]").is_empty());
    }
}
