//! Curator Domain Layer
//!
//! This crate contains the domain model for the learning-data retention engine.
//! It performs no I/O and defines the value objects and trait interfaces that
//! the storage and janitor layers depend upon.
//!
//! ## Key Concepts
//!
//! - **Record**: an opaque learning-data document, never mutated by the engine
//! - **Tier**: one of three named collections (success-patterns, high-engagement, effective-topics)
//! - **Value score**: multi-factor quality measure driving keep-vs-evict decisions
//! - **Archive bundle**: a write-once, timestamped batch of evicted-but-valuable records
//!
//! ## Architecture
//!
//! - Pure data and logic only
//! - Infrastructure implementations live in other crates
//! - Trait definitions for all storage interactions

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod archive;
pub mod record;
pub mod run;
pub mod score;
pub mod tier;
pub mod traits;

// Re-exports for convenience
pub use archive::ArchiveBundle;
pub use record::Record;
pub use run::RunId;
pub use score::ValueScore;
pub use tier::Tier;
pub use traits::{ArchiveSink, ContentHasher, TierHealth, TierStore};
