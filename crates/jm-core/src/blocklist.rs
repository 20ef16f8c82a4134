//! Built-in vocabulary and word-list parsing.

/// Words redacted out of the box.
pub const DEFAULT_WORDS: &[&str] = &[
    "job", "career", "employment", "resume", "application",
    "interview", "applicant", "reference", "contract",
    "portfolio", "intern", "internship", "promotion", "hiring", "recruitment",
    "qualification", "certification", "license", "upskilling",
    "experience", "skills", "discipline", "focus",
    "motivation", "independence", "initiative", "reliable",
    "punctuality", "attendance", "responsibility", "dedication",
    "commitment", "effort", "professionalism", "confidence",
    "attitude", "growth", "ambition",
    "credibility", "presentation", "readiness", "drive",
    "preparation", "training", "onboarding", "learning",
    "selfstarter", "talent", "aptitude", "suitability",
];

/// An ordered list of lowercase words subject to redaction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Blocklist {
    words: Vec<String>,
}

impl Blocklist {
    pub fn new<I, S>(words: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let words = words
            .into_iter()
            .map(|w| w.as_ref().trim().to_lowercase())
            .filter(|w| !w.is_empty())
            .collect();
        Self { words }
    }

    pub fn builtin() -> Self {
        Self::new(DEFAULT_WORDS.iter().copied())
    }

    /// Append words parsed from a word-list file.
    pub fn extend_from_list(&mut self, text: &str) {
        self.words.extend(parse_word_list(text));
    }

    pub fn extend<I, S>(&mut self, words: I)
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.words.extend(Self::new(words).words);
    }

    pub fn words(&self) -> &[String] {
        &self.words
    }

    pub fn len(&self) -> usize {
        self.words.len()
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }
}

impl Default for Blocklist {
    fn default() -> Self {
        Self::builtin()
    }
}

/// Parse a word list: one word per line, `#` or `!` starts a comment line.
pub fn parse_word_list(text: &str) -> Vec<String> {
    let mut words = Vec::new();

    for raw_line in text.lines() {
        let line = raw_line.trim();
        if line.is_empty() || is_comment_line(line) {
            continue;
        }
        words.push(line.to_lowercase());
    }

    words
}

fn is_comment_line(line: &str) -> bool {
    line.starts_with('#') || line.starts_with('!')
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_words_are_lowercase() {
        for word in DEFAULT_WORDS {
            assert_eq!(*word, word.to_lowercase());
        }
        assert_eq!(Blocklist::builtin().len(), DEFAULT_WORDS.len());
    }

    #[test]
    fn test_parse_word_list_skips_comments_and_blanks() {
        let text = "# header\nPayroll\n\n  ! note\n  salary  \n";
        assert_eq!(parse_word_list(text), vec!["payroll", "salary"]);
    }

    #[test]
    fn test_new_drops_empty_words() {
        let list = Blocklist::new(["", "  ", "Job"]);
        assert_eq!(list.words(), &["job".to_string()]);
    }

    #[test]
    fn test_extend_from_list() {
        let mut list = Blocklist::new(["job"]);
        list.extend_from_list("boss\n#comment\n");
        assert_eq!(list.words(), &["job".to_string(), "boss".to_string()]);
    }
}
