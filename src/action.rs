//! The action family: every intent the presentation layer or the host can
//! express, as one tagged sum type.
//!
//! Mutating actions come in pairs with the actions that reverse them. The
//! restore variants ([`Action::InsertFolder`], [`Action::InsertFolderItems`])
//! are what the reducer records as inverses for deletions; they are also
//! legal to dispatch directly.

use serde::{Deserialize, Deserializer, Serialize};

use crate::model::{Folder, FolderId, FolderItem, HistoryItem, ItemId, Tab, TabId, WindowId};

/// An item together with the place it occupied (or should occupy).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlacedItem {
    pub folder_id: FolderId,
    pub index: usize,
    pub item: FolderItem,
}

/// Shallow patch over the UI-mode fields of the snapshot.
///
/// Fields left as `None` are not touched. `item_in_edit` is doubly optional:
/// `Some(None)` leaves edit mode, `Some(Some(id))` enters it for `id`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppStatePatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub search: Option<String>,
    #[serde(
        default,
        deserialize_with = "double_option",
        skip_serializing_if = "Option::is_none"
    )]
    pub item_in_edit: Option<Option<ItemId>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sidebar_collapsed: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sidebar_hovered: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub show_not_used: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub app_loaded: Option<bool>,
}

/// Distinguish an absent field from an explicit `null`.
fn double_option<'de, D, T>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

impl AppStatePatch {
    /// Patch that only changes the search string.
    pub fn search(value: impl Into<String>) -> Self {
        Self {
            search: Some(value.into()),
            ..Self::default()
        }
    }

    /// Patch that enters (or, with `None`, leaves) inline rename mode.
    pub fn item_in_edit(id: Option<ItemId>) -> Self {
        Self {
            item_in_edit: Some(id),
            ..Self::default()
        }
    }
}

/// Everything that can be dispatched to the store.
///
/// Uses adjacently tagged serde serialization so actions can be logged or
/// relayed as `{"type": "...", "data": {...}}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "data")]
pub enum Action {
    /// Append a new folder. A missing id is generated, a missing colour
    /// becomes the configured default.
    CreateFolder {
        id: Option<FolderId>,
        title: String,
        color: Option<String>,
        #[serde(default)]
        items: Vec<FolderItem>,
    },
    /// Merge the given fields into a folder.
    UpdateFolder {
        folder_id: FolderId,
        title: Option<String>,
        color: Option<String>,
    },
    /// Remove a folder and everything in it.
    DeleteFolder { folder_id: FolderId },
    /// Put a whole folder back at `index`.
    InsertFolder { index: usize, folder: Folder },
    /// Move a folder to `index` in the folder list.
    MoveFolder { folder_id: FolderId, index: usize },

    /// Insert an item into a folder, at `index` or at the end.
    CreateFolderItem {
        folder_id: FolderId,
        item: FolderItem,
        index: Option<usize>,
    },
    /// Merge the given fields into the item with `item_id`, wherever it is.
    UpdateFolderItem {
        item_id: ItemId,
        title: Option<String>,
        url: Option<String>,
        archived: Option<bool>,
    },
    /// Remove one item.
    DeleteFolderItem { item_id: ItemId },
    /// Remove several items, possibly spread across folders.
    DeleteFolderItems { item_ids: Vec<ItemId> },
    /// Put items back at their recorded places, in order.
    InsertFolderItems { entries: Vec<PlacedItem> },
    /// Move an item to `target_folder_id`, at `index` or at the end.
    MoveFolderItem {
        item_id: ItemId,
        target_folder_id: FolderId,
        index: Option<usize>,
    },

    /// Shallow-merge UI flags. Never undo-tracked.
    UpdateAppState { patch: AppStatePatch },
    /// Ask the host to close tabs. Does not touch the snapshot.
    CloseTabs { tab_ids: Vec<TabId> },

    /// Initial delivery of the folder tree. Resets the undo log.
    LoadFolders { folders: Vec<Folder> },
    /// Replace the open-tab mirror.
    SetTabs { tabs: Vec<Tab> },
    /// Replace the history mirror.
    SetHistory { items: Vec<HistoryItem> },
    /// Replace the host window context used by view computation.
    SetHostContext {
        current_window_id: Option<WindowId>,
        last_active_tab_ids: Vec<TabId>,
    },

    /// Reverse the most recent transaction.
    Undo,
}

impl Action {
    /// Stable tag name, used as a structured logging field.
    pub fn name(&self) -> &'static str {
        match self {
            Action::CreateFolder { .. } => "CreateFolder",
            Action::UpdateFolder { .. } => "UpdateFolder",
            Action::DeleteFolder { .. } => "DeleteFolder",
            Action::InsertFolder { .. } => "InsertFolder",
            Action::MoveFolder { .. } => "MoveFolder",
            Action::CreateFolderItem { .. } => "CreateFolderItem",
            Action::UpdateFolderItem { .. } => "UpdateFolderItem",
            Action::DeleteFolderItem { .. } => "DeleteFolderItem",
            Action::DeleteFolderItems { .. } => "DeleteFolderItems",
            Action::InsertFolderItems { .. } => "InsertFolderItems",
            Action::MoveFolderItem { .. } => "MoveFolderItem",
            Action::UpdateAppState { .. } => "UpdateAppState",
            Action::CloseTabs { .. } => "CloseTabs",
            Action::LoadFolders { .. } => "LoadFolders",
            Action::SetTabs { .. } => "SetTabs",
            Action::SetHistory { .. } => "SetHistory",
            Action::SetHostContext { .. } => "SetHostContext",
            Action::Undo => "Undo",
        }
    }

    /// Whether applying this action records an inverse in the undo log.
    pub fn is_undo_tracked(&self) -> bool {
        matches!(
            self,
            Action::CreateFolder { .. }
                | Action::UpdateFolder { .. }
                | Action::DeleteFolder { .. }
                | Action::InsertFolder { .. }
                | Action::MoveFolder { .. }
                | Action::CreateFolderItem { .. }
                | Action::UpdateFolderItem { .. }
                | Action::DeleteFolderItem { .. }
                | Action::DeleteFolderItems { .. }
                | Action::InsertFolderItems { .. }
                | Action::MoveFolderItem { .. }
        )
    }
}
