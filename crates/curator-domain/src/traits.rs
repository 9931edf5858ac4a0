//! Trait definitions for external interactions
//!
//! These traits define the boundaries between the retention engine and its
//! storage collaborators. File-backed implementations live in curator-store.

use crate::{ArchiveBundle, Record, Tier};
use chrono::{DateTime, Utc};

/// Trait for loading and rewriting tier collections
///
/// Implemented by the infrastructure layer (curator-store). The engine
/// assumes it is the only writer for the duration of a run.
pub trait TierStore {
    /// Error type for store operations
    type Error;

    /// Load every record currently stored for a tier
    ///
    /// A missing tier loads as an empty collection. An unparsable tier is an
    /// error; use [`TierStore::inspect`] to tell corruption apart from I/O
    /// failure.
    fn load(&self, tier: Tier) -> Result<Vec<Record>, Self::Error>;

    /// Replace a tier's contents with `records`
    fn save(&mut self, tier: Tier, records: &[Record]) -> Result<(), Self::Error>;

    /// Report whether a tier exists and parses as a record collection
    fn inspect(&self, tier: Tier) -> Result<TierHealth, Self::Error>;

    /// Create an empty collection for a tier that does not exist yet
    fn initialize(&mut self, tier: Tier) -> Result<(), Self::Error>;

    /// Move a corrupted tier aside and reinitialize it as empty
    ///
    /// Returns a description of where the quarantined copy now lives.
    fn quarantine(&mut self, tier: Tier, at: DateTime<Utc>) -> Result<String, Self::Error>;

    /// On-disk size of a tier in bytes (0 when missing)
    fn size_bytes(&self, tier: Tier) -> Result<u64, Self::Error>;
}

/// Health of a single tier as seen by [`TierStore::inspect`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TierHealth {
    /// No collection exists for the tier
    Missing,

    /// Collection parses
    Healthy {
        /// Number of records
        entries: usize,
        /// On-disk size in bytes
        bytes: u64,
    },

    /// Collection exists but cannot be parsed
    Corrupted {
        /// Parser message
        reason: String,
    },
}

/// Trait for persisting archive bundles
///
/// Implementations must never overwrite an existing bundle and must leave no
/// partial bundle behind on failure.
pub trait ArchiveSink {
    /// Error type for archive operations
    type Error;

    /// Persist a bundle, returning the location it was written to
    fn write_bundle(&mut self, bundle: &ArchiveBundle) -> Result<String, Self::Error>;
}

/// Content-addressable digest used for deduplication
pub trait ContentHasher {
    /// Digest canonical record bytes into a hash string
    fn digest(&self, bytes: &[u8]) -> String;
}

impl<H: ContentHasher + ?Sized> ContentHasher for &H {
    fn digest(&self, bytes: &[u8]) -> String {
        (**self).digest(bytes)
    }
}

impl<H: ContentHasher + ?Sized> ContentHasher for Box<H> {
    fn digest(&self, bytes: &[u8]) -> String {
        (**self).digest(bytes)
    }
}
