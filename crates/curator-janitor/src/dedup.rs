//! Content-hash deduplication

use curator_domain::{ContentHasher, Record};
use std::collections::HashSet;

/// Default content hasher: blake3 over canonical record bytes, hex encoded
#[derive(Debug, Clone, Copy, Default)]
pub struct Blake3Hasher;

impl ContentHasher for Blake3Hasher {
    fn digest(&self, bytes: &[u8]) -> String {
        blake3::hash(bytes).to_hex().to_string()
    }
}

/// Removes repeat records, keeping the first occurrence
///
/// The set of seen hashes persists across calls, so one deduplicator shared
/// by every tier in a pass removes duplicates dataset-wide: a record already
/// seen in an earlier tier is dropped from later ones.
///
/// # Examples
///
/// ```
/// use curator_domain::Record;
/// use curator_janitor::{Blake3Hasher, Deduplicator};
/// use serde_json::json;
///
/// let mut dedup = Deduplicator::new(Blake3Hasher);
/// let records = vec![
///     Record::new(json!({ "a": 1, "b": 2 })),
///     Record::new(json!({ "b": 2, "a": 1 })),
/// ];
/// let (unique, removed) = dedup.dedup(records);
/// assert_eq!(unique.len(), 1);
/// assert_eq!(removed, 1);
/// ```
#[derive(Debug)]
pub struct Deduplicator<H: ContentHasher> {
    hasher: H,
    seen: HashSet<String>,
}

impl<H: ContentHasher> Deduplicator<H> {
    /// Create a deduplicator with an empty seen-set
    pub fn new(hasher: H) -> Self {
        Self {
            hasher,
            seen: HashSet::new(),
        }
    }

    /// Canonical content hash of a record (field-order independent)
    pub fn hash(&self, record: &Record) -> String {
        self.hasher.digest(&record.canonical_bytes())
    }

    /// Drop every record whose hash has been seen before
    ///
    /// Returns the surviving records in input order and the number removed.
    pub fn dedup(&mut self, records: Vec<Record>) -> (Vec<Record>, usize) {
        let before = records.len();
        let unique: Vec<Record> = records
            .into_iter()
            .filter(|record| {
                let hash = self.hasher.digest(&record.canonical_bytes());
                self.seen.insert(hash)
            })
            .collect();
        let removed = before - unique.len();
        (unique, removed)
    }

    /// Number of distinct hashes seen so far
    pub fn seen_count(&self) -> usize {
        self.seen.len()
    }
}
