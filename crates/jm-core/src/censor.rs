//! String-level censoring.

use std::borrow::Cow;

use regex::Captures;

use crate::blocklist::Blocklist;
use crate::config::EngineConfig;
use crate::error::{Error, Result};
use crate::mask::{is_valid_mask, mask_token};
use crate::pattern::WordPattern;

/// A compiled pattern paired with the mask symbol used to redact its matches.
#[derive(Debug, Clone)]
pub struct Censor {
    pattern: WordPattern,
    mask: char,
}

impl Censor {
    pub fn new(pattern: WordPattern, mask: char) -> Result<Self> {
        if !is_valid_mask(mask) {
            return Err(Error::InvalidMask(mask));
        }
        Ok(Self { pattern, mask })
    }

    /// Build from the built-in blocklist plus any configured extra words.
    pub fn from_config(config: &EngineConfig) -> Result<Self> {
        let mut blocklist = Blocklist::builtin();
        blocklist.extend(&config.extra_words);
        Self::with_blocklist(&blocklist, config)
    }

    pub fn with_blocklist(blocklist: &Blocklist, config: &EngineConfig) -> Result<Self> {
        config.validate()?;
        Self::new(WordPattern::compile(blocklist)?, config.mask)
    }

    pub fn pattern(&self) -> &WordPattern {
        &self.pattern
    }

    pub fn mask(&self) -> char {
        self.mask
    }

    /// Mask every match in `text`, borrowing when nothing matched.
    pub fn apply<'t>(&self, text: &'t str) -> Cow<'t, str> {
        let Some(regex) = self.pattern.regex() else {
            return Cow::Borrowed(text);
        };
        let mask = self.mask;
        let replaced = regex.replace_all(text, |caps: &Captures<'_>| mask_token(&caps[0], mask));
        match replaced {
            // Tokens of one char mask to themselves.
            Cow::Owned(s) if s == text => Cow::Borrowed(text),
            other => other,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::blocklist::DEFAULT_WORDS;
    use proptest::prelude::*;

    fn censor() -> Censor {
        Censor::from_config(&EngineConfig::default()).unwrap()
    }

    #[test]
    fn test_sentence() {
        assert_eq!(
            censor().apply("I need a job reference for my resume"),
            "I need a j*b r*******e for my r****e"
        );
    }

    #[test]
    fn test_plurals_and_case() {
        let c = censor();
        assert_eq!(c.apply("JOB and Jobs"), "J*B and J**s");
        assert_eq!(c.apply("Internships, interns!"), "I*********s, i*****s!");
    }

    #[test]
    fn test_no_match_borrows() {
        let c = censor();
        assert!(matches!(c.apply("nothing to see here"), Cow::Borrowed(_)));
        assert!(matches!(c.apply("jobless"), Cow::Borrowed(_)));
    }

    #[test]
    fn test_single_char_word_borrows() {
        let c = Censor::with_blocklist(&Blocklist::new(["a"]), &EngineConfig::default()).unwrap();
        assert!(matches!(c.apply("a cat"), Cow::Borrowed(_)));
    }

    #[test]
    fn test_idempotent() {
        let c = censor();
        let once = c.apply("Resume, interview and job training skills").into_owned();
        assert_eq!(c.apply(&once), once);
    }

    #[test]
    fn test_custom_mask() {
        let config = EngineConfig { mask: '#', ..EngineConfig::default() };
        let c = Censor::from_config(&config).unwrap();
        assert_eq!(c.apply("career"), "c####r");
    }

    #[test]
    fn test_extra_words() {
        let config = EngineConfig {
            extra_words: vec!["Payroll".to_string()],
            ..EngineConfig::default()
        };
        let c = Censor::from_config(&config).unwrap();
        assert_eq!(c.apply("payroll"), "p*****l");
    }

    #[test]
    fn test_invalid_mask() {
        let pattern = WordPattern::compile(&Blocklist::builtin()).unwrap();
        assert!(matches!(Censor::new(pattern, 'a'), Err(Error::InvalidMask('a'))));
    }

    fn mixed_text() -> impl Strategy<Value = String> {
        let token = prop_oneof![
            prop::sample::select(DEFAULT_WORDS.to_vec()).prop_map(str::to_uppercase),
            prop::sample::select(DEFAULT_WORDS.to_vec()).prop_map(|w| format!("{w}s")),
            "[a-zA-Z]{1,8}",
            "[ ,.!*-]{1,3}",
        ];
        prop::collection::vec(token, 0..16).prop_map(|tokens| tokens.join(" "))
    }

    proptest! {
        /// Censoring already-censored text changes nothing.
        #[test]
        fn prop_censor_idempotent(text in mixed_text()) {
            let c = censor();
            let once = c.apply(&text).into_owned();
            prop_assert_eq!(c.apply(&once), once.as_str());
        }

        /// Censoring never changes the UTF-16 length of a string.
        #[test]
        fn prop_censor_preserves_length(text in mixed_text()) {
            let c = censor();
            prop_assert_eq!(c.apply(&text).encode_utf16().count(), text.encode_utf16().count());
        }
    }
}
