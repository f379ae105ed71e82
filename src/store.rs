use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::results::PageRecord;

/// Failure to persist a category's records
#[derive(Debug, Error)]
pub enum StoreError {
    /// Filesystem failure reading or writing a category file
    #[error("store I/O failure: {0}")]
    Io(#[from] io::Error),

    /// Failure encoding the merged record array
    #[error("failed to encode records: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// Persists per-category record arrays as JSON files under one directory
#[derive(Debug, Clone)]
pub struct ResultStore {
    dir: PathBuf,
}

impl ResultStore {
    /// Open a store rooted at `dir`, creating the directory if needed
    pub fn open(dir: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let dir = dir.into();
        fs::create_dir_all(&dir)?;
        Ok(Self { dir })
    }

    /// Path of the JSON file backing `category`
    pub fn category_path(&self, category: &str) -> PathBuf {
        self.dir.join(format!("{category}.json"))
    }

    /// Append `records` to whatever the category file already holds and
    /// rewrite the file atomically. Returns the merged record count.
    ///
    /// Records are never deduplicated across runs; a URL scraped twice is
    /// stored twice.
    pub fn merge(&self, category: &str, records: Vec<PageRecord>) -> Result<usize, StoreError> {
        let path = self.category_path(category);
        let mut merged = load_existing(&path)?;
        merged.extend(records);

        let json = serde_json::to_string_pretty(&merged)?;
        let tmp = path.with_extension("json.tmp");
        fs::write(&tmp, json)?;
        fs::rename(&tmp, &path)?;

        ::log::debug!("Wrote {} records to {:?}", merged.len(), path);
        Ok(merged.len())
    }
}

/// Existing records for a category file.
///
/// An absent file is an empty store. A present but unparseable file is
/// backed up as `<category>.json.corrupt` and treated as empty, so a run is
/// never aborted by a corrupt store.
fn load_existing(path: &Path) -> Result<Vec<PageRecord>, StoreError> {
    let raw = match fs::read(path) {
        Ok(raw) => raw,
        Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(Vec::new()),
        Err(e) => return Err(e.into()),
    };

    match serde_json::from_slice(&raw) {
        Ok(records) => Ok(records),
        Err(e) => {
            let backup = path.with_extension("json.corrupt");
            ::log::warn!(
                "Existing store {:?} is unparseable ({}), backing it up to {:?}",
                path,
                e,
                backup
            );
            fs::rename(path, &backup)?;
            Ok(Vec::new())
        }
    }
}
