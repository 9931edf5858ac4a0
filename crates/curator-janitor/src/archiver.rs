//! Archive bundle writer

use crate::JanitorError;
use chrono::{DateTime, Utc};
use curator_domain::{ArchiveBundle, ArchiveSink, Record, Tier};
use std::fmt::Display;

/// Persists evicted-but-valuable records as one bundle per tier run
///
/// An empty batch writes nothing. In dry-run mode the bundle is built but
/// not persisted.
pub struct Archiver<'a, A: ArchiveSink> {
    sink: &'a mut A,
    dry_run: bool,
}

impl<'a, A> Archiver<'a, A>
where
    A: ArchiveSink,
    A::Error: Display,
{
    /// Wrap an archive sink
    pub fn new(sink: &'a mut A, dry_run: bool) -> Self {
        Self { sink, dry_run }
    }

    /// Write `entries` as a bundle for `tier`
    ///
    /// Returns the bundle location, or `None` when nothing was written.
    /// Any sink failure becomes [`JanitorError::ArchiveWrite`].
    pub fn archive(
        &mut self,
        tier: Tier,
        at: DateTime<Utc>,
        entries: &[Record],
    ) -> Result<Option<String>, JanitorError> {
        if entries.is_empty() {
            return Ok(None);
        }

        let bundle = ArchiveBundle::new(tier, at, entries.to_vec());
        if self.dry_run {
            tracing::debug!(
                "Dry run: would archive {} {} records as {}",
                entries.len(),
                tier,
                bundle.identifier()
            );
            return Ok(None);
        }

        let location = self
            .sink
            .write_bundle(&bundle)
            .map_err(|e| JanitorError::ArchiveWrite {
                tier,
                reason: e.to_string(),
            })?;
        tracing::info!("Archived {} {} records to {}", entries.len(), tier, location);
        Ok(Some(location))
    }
}
