//! Local JSON persistence for the folder tree.
//!
//! The tree is stored as `{"folders": [...]}`, mirroring the Folder and
//! FolderItem shapes field for field. Writes are atomic via a temp-rename
//! pattern so a crash mid-write never leaves a truncated file behind.

use std::io;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::PersistError;
use crate::host::{BrowserHost, Notice};
use crate::model::{Folder, TabId};

/// On-disk document wrapping the folder list.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
struct Dashboard {
    folders: Vec<Folder>,
}

/// A folder tree stored in a single JSON file.
///
/// Also usable as a minimal headless [`BrowserHost`]: it persists the tree
/// and logs tab-close requests and notices instead of acting on them.
#[derive(Debug, Clone)]
pub struct FolderFile {
    path: PathBuf,
}

impl FolderFile {
    /// Point at `path`. The file does not need to exist yet.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Save the folder tree atomically.
    ///
    /// Writes to `<path>.tmp` in the same directory, then renames it over
    /// `path`, creating parent directories as needed.
    ///
    /// # Errors
    ///
    /// Returns [`PersistError::Io`] if directory creation, writing, or
    /// renaming fails, and [`PersistError::Encode`] if serialization fails.
    pub fn save(&self, folders: &[Folder]) -> Result<(), PersistError> {
        if let Some(dir) = self.path.parent()
            && !dir.as_os_str().is_empty()
        {
            std::fs::create_dir_all(dir)?;
        }
        let doc = Dashboard {
            folders: folders.to_vec(),
        };
        let json = serde_json::to_vec_pretty(&doc)?;
        let tmp_path = self.tmp_path();
        std::fs::write(&tmp_path, &json)?;
        std::fs::rename(&tmp_path, &self.path)?;
        Ok(())
    }

    /// Load the folder tree.
    ///
    /// # Returns
    ///
    /// - `Ok(Some(folders))` if the file exists and parses.
    /// - `Ok(None)` if the file does not exist or holds invalid JSON.
    ///   Parse failures are logged via `tracing::warn!`.
    ///
    /// # Errors
    ///
    /// Returns [`PersistError::Io`] only for unexpected I/O failures.
    pub fn load(&self) -> Result<Option<Vec<Folder>>, PersistError> {
        let bytes = match std::fs::read(&self.path) {
            Ok(b) => b,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };

        match serde_json::from_slice::<Dashboard>(&bytes) {
            Ok(doc) => Ok(Some(doc.folders)),
            Err(e) => {
                tracing::warn!(
                    path = %self.path.display(),
                    error = %e,
                    "failed to parse folder tree; treating as empty"
                );
                Ok(None)
            }
        }
    }

    fn tmp_path(&self) -> PathBuf {
        let mut name = self.path.clone().into_os_string();
        name.push(".tmp");
        PathBuf::from(name)
    }
}

impl BrowserHost for FolderFile {
    fn close_tabs(&self, tab_ids: &[TabId]) {
        tracing::debug!(count = tab_ids.len(), "close-tabs request ignored by file host");
    }

    fn persist_folders(&self, folders: &[Folder]) -> Result<(), PersistError> {
        self.save(folders)
    }

    fn notify(&self, notice: Notice) {
        tracing::info!(message = %notice.message, undoable = notice.undoable, "notice");
    }
}
