//! Curator Storage Layer
//!
//! File-backed implementations of the domain storage traits.
//!
//! # Architecture
//!
//! - [`YamlTierStore`]: one YAML sequence file per tier, rewritten atomically
//!   (temp file + rename), with quarantine support for corrupted files
//! - [`FsArchive`]: write-once archive bundles filed under
//!   `archives/{YYYY}-{MM}/learning/{tier}-archive-{runStamp}.yaml`
//!
//! # Examples
//!
//! ```no_run
//! use curator_domain::{Tier, TierStore};
//! use curator_store::YamlTierStore;
//!
//! let store = YamlTierStore::new("data/learning");
//! let records = store.load(Tier::SuccessPatterns).unwrap();
//! println!("{} success patterns", records.len());
//! ```

#![warn(missing_docs)]

mod archive;
mod error;
mod yaml_store;

pub use archive::FsArchive;
pub use error::StoreError;
pub use yaml_store::YamlTierStore;
