//! YAML file-backed tier store

use crate::StoreError;
use chrono::{DateTime, Utc};
use curator_domain::{Record, Tier, TierHealth, TierStore};
use std::collections::HashMap;
use std::fs;
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};

const EMPTY_COLLECTION: &str = "[]\n";

/// Tier store keeping each tier in its own YAML sequence file
///
/// By default tier files live at `{data_dir}/{tier}.yaml`; individual tiers
/// can be pointed elsewhere with [`YamlTierStore::with_tier_path`].
///
/// Rewrites go through a sibling temp file followed by a rename, so a crash
/// mid-write leaves either the old or the new collection on disk.
#[derive(Debug, Clone)]
pub struct YamlTierStore {
    paths: HashMap<Tier, PathBuf>,
}

impl YamlTierStore {
    /// Create a store rooted at `data_dir`
    pub fn new<P: AsRef<Path>>(data_dir: P) -> Self {
        let dir = data_dir.as_ref();
        let paths = Tier::ALL
            .iter()
            .map(|tier| (*tier, dir.join(format!("{}.yaml", tier.as_str()))))
            .collect();
        Self { paths }
    }

    /// Override the file used for one tier
    pub fn with_tier_path<P: Into<PathBuf>>(mut self, tier: Tier, path: P) -> Self {
        self.paths.insert(tier, path.into());
        self
    }

    /// Path of the file backing a tier
    pub fn path(&self, tier: Tier) -> &Path {
        // Every tier is inserted in `new`, and entries are only ever replaced.
        &self.paths[&tier]
    }

    fn read(&self, tier: Tier) -> Result<Option<String>, StoreError> {
        let path = self.path(tier);
        match fs::read_to_string(path) {
            Ok(contents) => Ok(Some(contents)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(StoreError::io(path, e)),
        }
    }

    fn parse(path: &Path, contents: &str) -> Result<Vec<Record>, StoreError> {
        if contents.trim().is_empty() {
            return Ok(Vec::new());
        }
        serde_yaml::from_str(contents).map_err(|e| StoreError::Parse {
            path: path.display().to_string(),
            reason: e.to_string(),
        })
    }
}

/// Write `contents` to `path` via a sibling temp file and rename
fn write_atomic(path: &Path, contents: &[u8]) -> Result<(), StoreError> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(|e| StoreError::io(parent, e))?;
    }

    let mut tmp_name = path.as_os_str().to_os_string();
    tmp_name.push(".tmp");
    let tmp = PathBuf::from(tmp_name);

    let write = || -> std::io::Result<()> {
        let mut file = fs::File::create(&tmp)?;
        file.write_all(contents)?;
        file.sync_all()?;
        fs::rename(&tmp, path)
    };

    write().map_err(|e| {
        let _ = fs::remove_file(&tmp);
        StoreError::io(path, e)
    })
}

/// Pick a quarantine path that does not exist yet
fn quarantine_path(path: &Path, at: DateTime<Utc>) -> PathBuf {
    let stamp = at.format("%Y%m%dT%H%M%SZ");
    let base = format!("{}.corrupted-{}", path.display(), stamp);
    let mut candidate = PathBuf::from(&base);
    let mut n = 1;
    while candidate.exists() {
        candidate = PathBuf::from(format!("{}-{}", base, n));
        n += 1;
    }
    candidate
}

impl TierStore for YamlTierStore {
    type Error = StoreError;

    fn load(&self, tier: Tier) -> Result<Vec<Record>, Self::Error> {
        match self.read(tier)? {
            Some(contents) => Self::parse(self.path(tier), &contents),
            None => Ok(Vec::new()),
        }
    }

    fn save(&mut self, tier: Tier, records: &[Record]) -> Result<(), Self::Error> {
        let contents = serde_yaml::to_string(records)?;
        write_atomic(self.path(tier), contents.as_bytes())
    }

    fn inspect(&self, tier: Tier) -> Result<TierHealth, Self::Error> {
        let path = self.path(tier);
        let Some(contents) = self.read(tier)? else {
            return Ok(TierHealth::Missing);
        };
        match Self::parse(path, &contents) {
            Ok(records) => Ok(TierHealth::Healthy {
                entries: records.len(),
                bytes: contents.len() as u64,
            }),
            Err(StoreError::Parse { reason, .. }) => Ok(TierHealth::Corrupted { reason }),
            Err(e) => Err(e),
        }
    }

    fn initialize(&mut self, tier: Tier) -> Result<(), Self::Error> {
        let path = self.path(tier);
        if path.exists() {
            return Ok(());
        }
        write_atomic(path, EMPTY_COLLECTION.as_bytes())
    }

    fn quarantine(&mut self, tier: Tier, at: DateTime<Utc>) -> Result<String, Self::Error> {
        let path = self.path(tier).to_path_buf();
        let target = quarantine_path(&path, at);
        fs::rename(&path, &target).map_err(|e| StoreError::io(&path, e))?;
        write_atomic(&path, EMPTY_COLLECTION.as_bytes())?;
        Ok(target.display().to_string())
    }

    fn size_bytes(&self, tier: Tier) -> Result<u64, Self::Error> {
        let path = self.path(tier);
        match fs::metadata(path) {
            Ok(meta) => Ok(meta.len()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(0),
            Err(e) => Err(StoreError::io(path, e)),
        }
    }
}
