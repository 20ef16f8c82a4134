//! Engine configuration.

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::mask::{is_valid_mask, DEFAULT_MASK};

/// Storage key of the persisted enabled flag.
pub const STORAGE_KEY: &str = "censoringEnabled";

/// Elements whose content is never read or rewritten.
pub const DEFAULT_EXCLUDED_TAGS: &[&str] = &["script", "style", "textarea", "input"];

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct EngineConfig {
    /// Symbol that replaces the interior of matched words.
    pub mask: char,
    /// Lowercase tag names of content-excluded elements.
    pub excluded_tags: Vec<String>,
    pub storage_key: String,
    /// Words appended to the built-in blocklist.
    pub extra_words: Vec<String>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            mask: DEFAULT_MASK,
            excluded_tags: DEFAULT_EXCLUDED_TAGS.iter().map(|t| t.to_string()).collect(),
            storage_key: STORAGE_KEY.to_string(),
            extra_words: Vec::new(),
        }
    }
}

impl EngineConfig {
    pub fn from_json(text: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if !is_valid_mask(self.mask) {
            return Err(Error::InvalidMask(self.mask));
        }
        Ok(())
    }

    pub fn is_excluded_tag(&self, tag: &str) -> bool {
        self.excluded_tags.iter().any(|t| t.eq_ignore_ascii_case(tag))
    }
}
