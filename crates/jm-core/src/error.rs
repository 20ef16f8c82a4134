//! Error type shared across the core crate.

/// Errors raised while building or driving the redaction engine.
///
/// Runtime page operations never return these; they fail silently. Only
/// setup (pattern compilation, config validation) and the toggle plumbing
/// surface an `Error`.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Failed to compile word pattern: {0}")]
    Pattern(#[from] regex::Error),
    #[error("Blocklist too large: {count} words (max {max})")]
    BlocklistTooLarge { count: usize, max: usize },
    #[error("Invalid mask symbol {0:?}: must be a single non-word BMP character")]
    InvalidMask(char),
    #[error("Failed to persist flag: {0}")]
    Store(String),
    #[error("Failed to deliver message: {0}")]
    Delivery(String),
    #[error("Malformed message: {0}")]
    Message(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
