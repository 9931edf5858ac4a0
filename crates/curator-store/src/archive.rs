//! Write-once archive bundles on the file system

use crate::StoreError;
use curator_domain::{ArchiveBundle, ArchiveSink};
use std::fs::{self, OpenOptions};
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};

/// File-system archive for evicted records
///
/// Bundles are filed by year-month and never overwritten:
///
/// ```text
/// {root}/archives/2024-03/learning/high-engagement-archive-20240307T093015000Z.yaml
/// ```
///
/// Each bundle is opened with create-new semantics. If the identifier is
/// already taken, a numeric suffix is appended. A bundle whose write fails is
/// removed so no partial bundle is left behind.
#[derive(Debug, Clone)]
pub struct FsArchive {
    root: PathBuf,
}

impl FsArchive {
    /// Create an archive rooted at `root`
    pub fn new<P: Into<PathBuf>>(root: P) -> Self {
        Self { root: root.into() }
    }

    /// Directory a bundle is filed under
    pub fn bundle_dir(&self, bundle: &ArchiveBundle) -> PathBuf {
        self.root
            .join("archives")
            .join(bundle.bucket())
            .join("learning")
    }

    /// Read a previously written bundle
    pub fn read_bundle<P: AsRef<Path>>(path: P) -> Result<ArchiveBundle, StoreError> {
        let path = path.as_ref();
        let contents = fs::read_to_string(path).map_err(|e| StoreError::io(path, e))?;
        serde_yaml::from_str(&contents).map_err(|e| StoreError::Parse {
            path: path.display().to_string(),
            reason: e.to_string(),
        })
    }

    /// List every bundle file under the archive root, sorted by path
    pub fn list_bundles(&self) -> Result<Vec<PathBuf>, StoreError> {
        let archives = self.root.join("archives");
        let mut bundles = Vec::new();

        let months = match fs::read_dir(&archives) {
            Ok(entries) => entries,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(bundles),
            Err(e) => return Err(StoreError::io(&archives, e)),
        };

        for month in months {
            let month = month.map_err(|e| StoreError::io(&archives, e))?;
            let learning = month.path().join("learning");
            let Ok(entries) = fs::read_dir(&learning) else {
                continue;
            };
            for entry in entries {
                let path = entry.map_err(|e| StoreError::io(&learning, e))?.path();
                if path.extension().is_some_and(|ext| ext == "yaml") {
                    bundles.push(path);
                }
            }
        }

        bundles.sort();
        Ok(bundles)
    }
}

impl ArchiveSink for FsArchive {
    type Error = StoreError;

    fn write_bundle(&mut self, bundle: &ArchiveBundle) -> Result<String, Self::Error> {
        let dir = self.bundle_dir(bundle);
        fs::create_dir_all(&dir).map_err(|e| StoreError::io(&dir, e))?;

        let contents = serde_yaml::to_string(bundle)?;
        let identifier = bundle.identifier();

        let mut attempt = 0;
        let (path, mut file) = loop {
            let name = if attempt == 0 {
                format!("{}.yaml", identifier)
            } else {
                format!("{}-{}.yaml", identifier, attempt)
            };
            let path = dir.join(name);
            match OpenOptions::new().write(true).create_new(true).open(&path) {
                Ok(file) => break (path, file),
                Err(e) if e.kind() == ErrorKind::AlreadyExists => attempt += 1,
                Err(e) => return Err(StoreError::io(&path, e)),
            }
        };

        let written = file
            .write_all(contents.as_bytes())
            .and_then(|_| file.sync_all());
        if let Err(e) = written {
            drop(file);
            let _ = fs::remove_file(&path);
            return Err(StoreError::io(&path, e));
        }

        Ok(path.display().to_string())
    }
}
