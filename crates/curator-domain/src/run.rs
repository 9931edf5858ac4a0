//! Run identifiers for cleanup passes

use serde::{Deserialize, Serialize};
use std::fmt;

/// Unique identifier for one deep-clean run, based on UUIDv7
///
/// Time-ordered, so run ids sort chronologically in logs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct RunId(uuid::Uuid);

impl RunId {
    /// Generate a new run id
    ///
    /// # Examples
    ///
    /// ```
    /// use curator_domain::RunId;
    ///
    /// let a = RunId::new();
    /// let b = RunId::new();
    /// assert_ne!(a, b);
    /// ```
    pub fn new() -> Self {
        Self(uuid::Uuid::now_v7())
    }

    /// Get the underlying UUID
    pub fn as_uuid(&self) -> uuid::Uuid {
        self.0
    }
}

impl Default for RunId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for RunId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
