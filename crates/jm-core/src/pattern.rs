//! Blocklist to single-regex compilation.
//!
//! Every word is escaped and alternated into one case-insensitive,
//! boundary-anchored pattern that also accepts one trailing `s`:
//!
//! ```text
//! \b(?:job|career|...)s?\b
//! ```

use log::debug;
use regex::{Match, Regex, RegexBuilder};

use crate::blocklist::Blocklist;
use crate::error::{Error, Result};

/// Upper bound on the number of words compiled into one pattern.
pub const MAX_WORDS: usize = 4096;

/// Compiled regex size limit.
pub const PATTERN_SIZE_LIMIT: usize = 10 * (1 << 20);

/// Compiled whole-word matcher for a blocklist.
///
/// An empty blocklist compiles to a matcher with no regex at all, which never
/// matches.
#[derive(Debug, Clone)]
pub struct WordPattern {
    regex: Option<Regex>,
    word_count: usize,
}

impl WordPattern {
    pub fn compile(blocklist: &Blocklist) -> Result<Self> {
        let words = blocklist.words();
        if words.len() > MAX_WORDS {
            return Err(Error::BlocklistTooLarge {
                count: words.len(),
                max: MAX_WORDS,
            });
        }

        if words.is_empty() {
            debug!("Empty blocklist, pattern will never match");
            return Ok(Self { regex: None, word_count: 0 });
        }

        let alternation = words
            .iter()
            .map(|w| regex::escape(w))
            .collect::<Vec<_>>()
            .join("|");
        let source = format!(r"\b(?:{alternation})s?\b");

        let regex = RegexBuilder::new(&source)
            .case_insensitive(true)
            .size_limit(PATTERN_SIZE_LIMIT)
            .build()?;

        debug!("Compiled word pattern over {} words", words.len());

        Ok(Self {
            regex: Some(regex),
            word_count: words.len(),
        })
    }

    /// Number of words the pattern alternates over.
    pub fn len(&self) -> usize {
        self.word_count
    }

    pub fn is_empty(&self) -> bool {
        self.regex.is_none()
    }

    pub fn is_match(&self, text: &str) -> bool {
        self.regex.as_ref().is_some_and(|r| r.is_match(text))
    }

    /// All non-overlapping matches, left to right.
    pub fn find_iter<'a>(&'a self, text: &'a str) -> impl Iterator<Item = Match<'a>> + 'a {
        self.regex
            .as_ref()
            .into_iter()
            .flat_map(move |r| r.find_iter(text))
    }

    /// Regex source, or an empty string for the never-matching pattern.
    pub fn as_str(&self) -> &str {
        self.regex.as_ref().map(Regex::as_str).unwrap_or("")
    }

    pub(crate) fn regex(&self) -> Option<&Regex> {
        self.regex.as_ref()
    }
}
