//! Boundary with the browser-host collaborator.
//!
//! The store never talks to the browser directly. Closing tabs, persisting
//! the folder tree and showing transient messages all go through
//! [`BrowserHost`]. Every call is fire-and-forget from the store's side:
//! failures are logged, never propagated to the dispatcher's caller.

use std::sync::{Mutex, PoisonError};

use crate::error::PersistError;
use crate::model::{Folder, TabId};

/// A transient user-facing message, optionally offering an undo affordance.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub message: String,
    /// Whether the message should offer an "Undo" button.
    pub undoable: bool,
}

impl Notice {
    /// A message that offers undo.
    pub fn undoable(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            undoable: true,
        }
    }

    /// A purely informational message.
    pub fn plain(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            undoable: false,
        }
    }
}

/// Side-effecting operations the store requests from the host.
///
/// Implementations must not call back into the store: the store is
/// single-writer and is mid-dispatch when these run.
pub trait BrowserHost {
    /// Close the given tabs.
    fn close_tabs(&self, tab_ids: &[TabId]);

    /// Write the folder tree after a mutation.
    ///
    /// # Errors
    ///
    /// Returns [`PersistError`] when the write fails. The store logs the
    /// failure and carries on; retry and durability belong to the host.
    fn persist_folders(&self, folders: &[Folder]) -> Result<(), PersistError>;

    /// Show a transient message.
    fn notify(&self, notice: Notice);
}

/// Host that ignores every request. Useful headless and in tests.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopHost;

impl BrowserHost for NoopHost {
    fn close_tabs(&self, _tab_ids: &[TabId]) {}

    fn persist_folders(&self, _folders: &[Folder]) -> Result<(), PersistError> {
        Ok(())
    }

    fn notify(&self, _notice: Notice) {}
}

/// Everything a [`RecordingHost`] has been asked to do, in call order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HostLog {
    pub closed_tabs: Vec<Vec<TabId>>,
    pub persisted: Vec<Vec<Folder>>,
    pub notices: Vec<Notice>,
}

/// Host double that records requests so callers can inspect them.
#[derive(Debug, Default)]
pub struct RecordingHost {
    log: Mutex<HostLog>,
    fail_persist: bool,
}

impl RecordingHost {
    pub fn new() -> Self {
        Self::default()
    }

    /// A host whose persistence always fails.
    pub fn failing_persist() -> Self {
        Self {
            fail_persist: true,
            ..Self::default()
        }
    }

    /// Copy of everything recorded so far.
    pub fn log(&self) -> HostLog {
        self.log
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    fn with_log(&self, f: impl FnOnce(&mut HostLog)) {
        let mut log = self.log.lock().unwrap_or_else(PoisonError::into_inner);
        f(&mut log);
    }
}

impl BrowserHost for RecordingHost {
    fn close_tabs(&self, tab_ids: &[TabId]) {
        self.with_log(|log| log.closed_tabs.push(tab_ids.to_vec()));
    }

    fn persist_folders(&self, folders: &[Folder]) -> Result<(), PersistError> {
        if self.fail_persist {
            return Err(PersistError::Rejected("persistence disabled".into()));
        }
        self.with_log(|log| log.persisted.push(folders.to_vec()));
        Ok(())
    }

    fn notify(&self, notice: Notice) {
        self.with_log(|log| log.notices.push(notice));
    }
}

// Lets a caller keep a handle on the host it gave to the store.
impl<H: BrowserHost + ?Sized> BrowserHost for std::sync::Arc<H> {
    fn close_tabs(&self, tab_ids: &[TabId]) {
        (**self).close_tabs(tab_ids);
    }

    fn persist_folders(&self, folders: &[Folder]) -> Result<(), PersistError> {
        (**self).persist_folders(folders)
    }

    fn notify(&self, notice: Notice) {
        (**self).notify(notice);
    }
}
