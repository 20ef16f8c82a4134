//! jobmask Core Library
//!
//! Redacts a fixed vocabulary of job and career words from page text and
//! editable fields, and keeps doing so as the page changes.
//!
//! # Architecture
//!
//! The blocklist compiles once into a single boundary-anchored regex. The
//! engine walks a host-provided tree through the traits in [`host`], masking
//! matches in place without changing their length, and processes observed
//! change batches with observation paused so its own writes never feed back.
//!
//! # Modules
//!
//! - `blocklist`: built-in vocabulary and word-list parsing
//! - `pattern`: blocklist to regex compilation
//! - `mask`: length-preserving token masking
//! - `censor`: string-level censoring
//! - `engine`: tree scanning, field listeners, mutation batches, state machine
//! - `host`: traits a page implements, and the observation guard
//! - `memory`: in-memory document implementing the host traits
//! - `toggle`: popup toggle controller
//! - `message`, `state`, `config`, `error`: shared types

pub mod blocklist;
pub mod censor;
pub mod config;
pub mod engine;
pub mod error;
pub mod host;
pub mod mask;
pub mod memory;
pub mod message;
pub mod pattern;
pub mod state;
pub mod toggle;

// Re-export commonly used types
pub use blocklist::{Blocklist, DEFAULT_WORDS};
pub use censor::Censor;
pub use config::{EngineConfig, STORAGE_KEY};
pub use engine::{BatchReport, RedactionEngine};
pub use error::{Error, Result};
pub use host::{ChangeSource, DocumentTree, FieldHost, Mutation, NodeKind, Page, PausedObservation};
pub use memory::MemoryDocument;
pub use message::{Ack, ContentMessage};
pub use pattern::WordPattern;
pub use state::EngineState;
pub use toggle::{ActivePage, FlagStore, ToggleController, ToggleOutcome};
