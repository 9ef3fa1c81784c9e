//! The `Reversible` trait and the folder-state reducer.
//!
//! Each mutating action has one handler that applies the change and, in the
//! same step, builds the action that reverses it from the values it is about
//! to overwrite. Capturing the inverse inside the handler means the prior
//! position or field value is always read before it is lost.

use std::collections::HashSet;

use crate::action::{Action, AppStatePatch, PlacedItem};
use crate::host::Notice;
use crate::model::{
    AppState, DEFAULT_FOLDER_COLOR, Folder, FolderId, FolderItem, HistoryItem, ItemId, Tab, TabId,
    WindowId,
};

/// A state type whose mutations can be reversed.
///
/// # Contract
///
/// - [`apply`](Reversible::apply) must be total: an action that references a
///   missing id returns [`Outcome::unchanged`] and leaves the state alone.
/// - When `apply` reports an inverse, applying that inverse to the resulting
///   state must restore a state observationally equal to the one before.
pub trait Reversible {
    /// The set of operations this state accepts.
    type Action: Clone + std::fmt::Debug;

    /// Apply one action in place and report what happened.
    fn apply(&mut self, action: &Self::Action) -> Outcome<Self::Action>;
}

/// Side effect requested by the reducer, performed by the store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    /// Ask the host to close these tabs.
    CloseTabs(Vec<TabId>),
    /// Show a transient message to the user.
    Notify(Notice),
}

/// Result of applying a single action.
#[derive(Debug, Clone, PartialEq)]
pub struct Outcome<A> {
    /// The action that reverses this one, if it is undo-tracked and changed something.
    pub inverse: Option<A>,
    /// Whether any part of the snapshot changed.
    pub changed: bool,
    /// Whether the folder tree changed and should be persisted.
    pub folders_changed: bool,
    /// Requests for the store to carry out after the state is updated.
    pub effects: Vec<Effect>,
}

impl<A> Outcome<A> {
    /// Nothing happened.
    pub fn unchanged() -> Self {
        Self {
            inverse: None,
            changed: false,
            folders_changed: false,
            effects: Vec::new(),
        }
    }

    /// The folder tree changed; `inverse` reverses it.
    fn folders(inverse: A) -> Self {
        Self {
            inverse: Some(inverse),
            changed: true,
            folders_changed: true,
            effects: Vec::new(),
        }
    }

    /// A non-folder part of the snapshot changed.
    fn ephemeral() -> Self {
        Self {
            changed: true,
            ..Self::unchanged()
        }
    }

    fn with_notice(mut self, notice: Notice) -> Self {
        self.effects.push(Effect::Notify(notice));
        self
    }
}

impl Reversible for AppState {
    type Action = Action;

    fn apply(&mut self, action: &Action) -> Outcome<Action> {
        match action {
            Action::CreateFolder {
                id,
                title,
                color,
                items,
            } => create_folder(self, *id, title, color.as_deref(), items),
            Action::UpdateFolder {
                folder_id,
                title,
                color,
            } => update_folder(self, *folder_id, title.as_deref(), color.as_deref()),
            Action::DeleteFolder { folder_id } => delete_folder(self, *folder_id),
            Action::InsertFolder { index, folder } => insert_folder(self, *index, folder),
            Action::MoveFolder { folder_id, index } => move_folder(self, *folder_id, *index),
            Action::CreateFolderItem {
                folder_id,
                item,
                index,
            } => create_folder_item(self, *folder_id, item, *index),
            Action::UpdateFolderItem {
                item_id,
                title,
                url,
                archived,
            } => update_folder_item(self, *item_id, title.as_deref(), url.as_deref(), *archived),
            Action::DeleteFolderItem { item_id } => delete_folder_items(self, &[*item_id]),
            Action::DeleteFolderItems { item_ids } => delete_folder_items(self, item_ids),
            Action::InsertFolderItems { entries } => insert_folder_items(self, entries),
            Action::MoveFolderItem {
                item_id,
                target_folder_id,
                index,
            } => move_folder_item(self, *item_id, *target_folder_id, *index),
            Action::UpdateAppState { patch } => update_app_state(self, patch),
            Action::CloseTabs { tab_ids } => close_tabs(tab_ids),
            Action::LoadFolders { folders } => load_folders(self, folders),
            Action::SetTabs { tabs } => set_tabs(self, tabs),
            Action::SetHistory { items } => set_history(self, items),
            Action::SetHostContext {
                current_window_id,
                last_active_tab_ids,
            } => set_host_context(self, *current_window_id, last_active_tab_ids),
            // Undo is intercepted by the store before it reaches the reducer.
            Action::Undo => Outcome::unchanged(),
        }
    }
}

// ---------------------------------------------------------------------------
// Folders
// ---------------------------------------------------------------------------

fn create_folder(
    state: &mut AppState,
    id: Option<FolderId>,
    title: &str,
    color: Option<&str>,
    items: &[FolderItem],
) -> Outcome<Action> {
    let folder = Folder {
        id: id.unwrap_or_else(FolderId::generate),
        title: title.to_owned(),
        color: color.unwrap_or(DEFAULT_FOLDER_COLOR).to_owned(),
        items: items.to_vec(),
    };
    let folder_id = folder.id;
    state.folders.push(folder);
    Outcome::folders(Action::DeleteFolder { folder_id })
}

fn update_folder(
    state: &mut AppState,
    folder_id: FolderId,
    title: Option<&str>,
    color: Option<&str>,
) -> Outcome<Action> {
    let Some(folder) = state.folders.iter_mut().find(|f| f.id == folder_id) else {
        return Outcome::unchanged();
    };
    let prior_title = swap_if_changed(&mut folder.title, title);
    let prior_color = swap_if_changed(&mut folder.color, color);
    if prior_title.is_none() && prior_color.is_none() {
        return Outcome::unchanged();
    }
    Outcome::folders(Action::UpdateFolder {
        folder_id,
        title: prior_title,
        color: prior_color,
    })
}

fn delete_folder(state: &mut AppState, folder_id: FolderId) -> Outcome<Action> {
    let Some(index) = state.folder_index(folder_id) else {
        return Outcome::unchanged();
    };
    let folder = state.folders.remove(index);
    clear_edit_if_gone(state);
    Outcome::folders(Action::InsertFolder { index, folder })
        .with_notice(Notice::undoable("Folder has been deleted"))
}

fn insert_folder(state: &mut AppState, index: usize, folder: &Folder) -> Outcome<Action> {
    let index = index.min(state.folders.len());
    state.folders.insert(index, folder.clone());
    Outcome::folders(Action::DeleteFolder {
        folder_id: folder.id,
    })
}

fn move_folder(state: &mut AppState, folder_id: FolderId, index: usize) -> Outcome<Action> {
    let Some(from) = state.folder_index(folder_id) else {
        return Outcome::unchanged();
    };
    let folder = state.folders.remove(from);
    let to = index.min(state.folders.len());
    state.folders.insert(to, folder);
    if to == from {
        return Outcome::unchanged();
    }
    Outcome::folders(Action::MoveFolder {
        folder_id,
        index: from,
    })
}

// ---------------------------------------------------------------------------
// Folder items
// ---------------------------------------------------------------------------

fn create_folder_item(
    state: &mut AppState,
    folder_id: FolderId,
    item: &FolderItem,
    index: Option<usize>,
) -> Outcome<Action> {
    let Some(folder) = state.folders.iter_mut().find(|f| f.id == folder_id) else {
        return Outcome::unchanged();
    };
    let at = index.unwrap_or(folder.items.len()).min(folder.items.len());
    folder.items.insert(at, item.clone());
    Outcome::folders(Action::DeleteFolderItem { item_id: item.id })
}

fn update_folder_item(
    state: &mut AppState,
    item_id: ItemId,
    title: Option<&str>,
    url: Option<&str>,
    archived: Option<bool>,
) -> Outcome<Action> {
    let Some((fi, ii)) = state.locate_item(item_id) else {
        return Outcome::unchanged();
    };
    let item = &mut state.folders[fi].items[ii];

    // Sections have no url and are never archived.
    let archived = archived.filter(|_| !item.is_section);
    let url = url.filter(|_| !item.is_section);
    let prior_archived = match archived {
        Some(value) if value != item.archived => Some(std::mem::replace(&mut item.archived, value)),
        _ => None,
    };
    let prior_url = swap_if_changed(&mut item.url, url);
    let prior_title = swap_if_changed(&mut item.title, title);

    let notice = match (prior_archived, &prior_url, &prior_title) {
        (Some(false), _, _) => Notice::undoable("Item has been archived"),
        (Some(true), _, _) => Notice::plain("Item has been restored"),
        (None, Some(_), _) => Notice::undoable("URL has been updated"),
        (None, None, Some(_)) => Notice::undoable("Item has been renamed"),
        (None, None, None) => return Outcome::unchanged(),
    };
    Outcome::folders(Action::UpdateFolderItem {
        item_id,
        title: prior_title,
        url: prior_url,
        archived: prior_archived,
    })
    .with_notice(notice)
}

fn delete_folder_items(state: &mut AppState, item_ids: &[ItemId]) -> Outcome<Action> {
    let wanted: HashSet<ItemId> = item_ids.iter().copied().collect();

    // Positions are captured from the tree as it is before any removal.
    let mut entries = Vec::new();
    for folder in &state.folders {
        for (index, item) in folder.items.iter().enumerate() {
            if wanted.contains(&item.id) {
                entries.push(PlacedItem {
                    folder_id: folder.id,
                    index,
                    item: item.clone(),
                });
            }
        }
    }
    if entries.is_empty() {
        return Outcome::unchanged();
    }

    for folder in &mut state.folders {
        folder.items.retain(|item| !wanted.contains(&item.id));
    }
    clear_edit_if_gone(state);

    let notice = if entries.len() == 1 {
        Notice::undoable("Link has been deleted")
    } else {
        Notice::undoable(format!("{} links have been deleted", entries.len()))
    };
    Outcome::folders(Action::InsertFolderItems { entries }).with_notice(notice)
}

/// Reinsert items in the order given.
///
/// Entries produced by a deletion are grouped per folder in ascending index
/// order, so inserting them one by one lands each at its original position.
fn insert_folder_items(state: &mut AppState, entries: &[PlacedItem]) -> Outcome<Action> {
    let mut inserted = Vec::new();
    for entry in entries {
        let Some(folder) = state.folders.iter_mut().find(|f| f.id == entry.folder_id) else {
            continue;
        };
        let at = entry.index.min(folder.items.len());
        folder.items.insert(at, entry.item.clone());
        inserted.push(entry.item.id);
    }
    if inserted.is_empty() {
        return Outcome::unchanged();
    }
    Outcome::folders(Action::DeleteFolderItems { item_ids: inserted })
}

fn move_folder_item(
    state: &mut AppState,
    item_id: ItemId,
    target_folder_id: FolderId,
    index: Option<usize>,
) -> Outcome<Action> {
    let Some(target) = state.folder_index(target_folder_id) else {
        return Outcome::unchanged();
    };
    let Some((source, from)) = state.locate_item(item_id) else {
        return Outcome::unchanged();
    };
    let source_folder_id = state.folders[source].id;

    let item = state.folders[source].items.remove(from);
    let items = &mut state.folders[target].items;
    let to = index.unwrap_or(items.len()).min(items.len());
    items.insert(to, item);

    if source == target && to == from {
        return Outcome::unchanged();
    }
    Outcome::folders(Action::MoveFolderItem {
        item_id,
        target_folder_id: source_folder_id,
        index: Some(from),
    })
}

// ---------------------------------------------------------------------------
// UI flags and host mirrors (not undo-tracked)
// ---------------------------------------------------------------------------

fn update_app_state(state: &mut AppState, patch: &AppStatePatch) -> Outcome<Action> {
    let mut changed = false;
    if let Some(search) = &patch.search
        && state.search != *search
    {
        state.search = search.clone();
        changed = true;
    }
    if let Some(item_in_edit) = patch.item_in_edit
        && state.item_in_edit != item_in_edit
    {
        state.item_in_edit = item_in_edit;
        changed = true;
    }
    changed |= assign_flag(&mut state.sidebar_collapsed, patch.sidebar_collapsed);
    changed |= assign_flag(&mut state.sidebar_hovered, patch.sidebar_hovered);
    changed |= assign_flag(&mut state.show_not_used, patch.show_not_used);
    changed |= assign_flag(&mut state.app_loaded, patch.app_loaded);

    if changed {
        Outcome::ephemeral()
    } else {
        Outcome::unchanged()
    }
}

fn close_tabs(tab_ids: &[TabId]) -> Outcome<Action> {
    if tab_ids.is_empty() {
        return Outcome::unchanged();
    }
    Outcome {
        effects: vec![Effect::CloseTabs(tab_ids.to_vec())],
        ..Outcome::unchanged()
    }
}

fn load_folders(state: &mut AppState, folders: &[Folder]) -> Outcome<Action> {
    state.folders = folders.to_vec();
    state.app_loaded = true;
    clear_edit_if_gone(state);
    Outcome::ephemeral()
}

fn set_tabs(state: &mut AppState, tabs: &[Tab]) -> Outcome<Action> {
    state.tabs = tabs.to_vec();
    Outcome::ephemeral()
}

fn set_history(state: &mut AppState, items: &[HistoryItem]) -> Outcome<Action> {
    state.history_items = items.to_vec();
    Outcome::ephemeral()
}

fn set_host_context(
    state: &mut AppState,
    current_window_id: Option<WindowId>,
    last_active_tab_ids: &[TabId],
) -> Outcome<Action> {
    state.current_window_id = current_window_id;
    state.last_active_tab_ids = last_active_tab_ids.to_vec();
    Outcome::ephemeral()
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Overwrite `field` with `next` when it differs, returning the prior value.
fn swap_if_changed(field: &mut String, next: Option<&str>) -> Option<String> {
    match next {
        Some(value) if field != value => Some(std::mem::replace(field, value.to_owned())),
        _ => None,
    }
}

fn assign_flag(field: &mut bool, next: Option<bool>) -> bool {
    match next {
        Some(value) if *field != value => {
            *field = value;
            true
        }
        _ => false,
    }
}

/// Leave rename mode if the item being edited no longer exists.
fn clear_edit_if_gone(state: &mut AppState) {
    if let Some(id) = state.item_in_edit
        && state.locate_item(id).is_none()
    {
        state.item_in_edit = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{ItemId, create_folder_item as new_item, create_section};

    fn item(id: u64, url: &str, title: &str) -> FolderItem {
        FolderItem {
            id: ItemId(id),
            ..new_item(Some(url), Some(title), None)
        }
    }

    fn folder(id: u64, items: Vec<FolderItem>) -> Folder {
        Folder {
            id: FolderId(id),
            title: format!("folder {id}"),
            color: DEFAULT_FOLDER_COLOR.into(),
            items,
        }
    }

    fn fixture() -> AppState {
        AppState {
            folders: vec![
                folder(
                    1,
                    vec![
                        item(10, "https://a.com", "A"),
                        item(11, "https://b.com", "B"),
                        item(12, "https://c.com", "C"),
                    ],
                ),
                folder(2, vec![item(20, "https://d.com", "D")]),
                folder(3, vec![]),
            ],
            ..AppState::default()
        }
    }

    /// Apply `action`, then its inverse, and check the state round-trips.
    fn assert_round_trip(action: Action) -> AppState {
        let original = fixture();
        let mut state = original.clone();
        let outcome = state.apply(&action);
        assert!(outcome.changed, "{} should change state", action.name());
        assert_ne!(state, original);
        let inverse = outcome.inverse.expect("mutating action must record an inverse");
        let mut restored = state.clone();
        restored.apply(&inverse);
        assert_eq!(restored, original, "inverse of {} must restore", action.name());
        state
    }

    #[test]
    fn create_folder_appends_with_default_color() {
        let state = assert_round_trip(Action::CreateFolder {
            id: Some(FolderId(9)),
            title: "New".into(),
            color: None,
            items: vec![],
        });
        let created = state.folders.last().unwrap();
        assert_eq!(created.id, FolderId(9));
        assert_eq!(created.color, DEFAULT_FOLDER_COLOR);
    }

    #[test]
    fn create_folder_generates_missing_id() {
        let mut state = fixture();
        let outcome = state.apply(&Action::CreateFolder {
            id: None,
            title: "Gen".into(),
            color: Some("#ffcdd2".into()),
            items: vec![],
        });
        let created = state.folders.last().unwrap();
        assert_eq!(
            outcome.inverse,
            Some(Action::DeleteFolder {
                folder_id: created.id
            })
        );
    }

    #[test]
    fn update_folder_round_trips_prior_fields() {
        let state = assert_round_trip(Action::UpdateFolder {
            folder_id: FolderId(2),
            title: Some("Renamed".into()),
            color: Some("#b2dfdb".into()),
        });
        assert_eq!(state.folders[1].title, "Renamed");
    }

    #[test]
    fn delete_folder_restores_at_original_index() {
        let state = assert_round_trip(Action::DeleteFolder {
            folder_id: FolderId(1),
        });
        assert_eq!(state.folders.len(), 2);
    }

    #[test]
    fn move_folder_round_trips() {
        let state = assert_round_trip(Action::MoveFolder {
            folder_id: FolderId(1),
            index: 2,
        });
        assert_eq!(state.folders[2].id, FolderId(1));
    }

    #[test]
    fn create_item_at_index_round_trips() {
        let state = assert_round_trip(Action::CreateFolderItem {
            folder_id: FolderId(1),
            item: item(99, "https://z.com", "Z"),
            index: Some(1),
        });
        assert_eq!(state.folders[0].items[1].id, ItemId(99));
    }

    #[test]
    fn create_item_past_end_appends() {
        let mut state = fixture();
        state.apply(&Action::CreateFolderItem {
            folder_id: FolderId(2),
            item: item(99, "https://z.com", "Z"),
            index: Some(50),
        });
        assert_eq!(state.folders[1].items.last().unwrap().id, ItemId(99));
    }

    #[test]
    fn update_item_round_trips_all_fields() {
        let state = assert_round_trip(Action::UpdateFolderItem {
            item_id: ItemId(11),
            title: Some("Bee".into()),
            url: Some("https://bee.com".into()),
            archived: Some(true),
        });
        let updated = &state.folders[0].items[1];
        assert_eq!(updated.title, "Bee");
        assert!(updated.archived);
    }

    #[test]
    fn update_item_inverse_only_names_changed_fields() {
        let mut state = fixture();
        let outcome = state.apply(&Action::UpdateFolderItem {
            item_id: ItemId(10),
            title: Some("Renamed".into()),
            url: Some("https://a.com".into()),
            archived: None,
        });
        assert_eq!(
            outcome.inverse,
            Some(Action::UpdateFolderItem {
                item_id: ItemId(10),
                title: Some("A".into()),
                url: None,
                archived: None,
            })
        );
        assert_eq!(
            outcome.effects,
            vec![Effect::Notify(Notice::undoable("Item has been renamed"))]
        );
    }

    #[test]
    fn update_item_with_identical_values_is_noop() {
        let mut state = fixture();
        let outcome = state.apply(&Action::UpdateFolderItem {
            item_id: ItemId(10),
            title: Some("A".into()),
            url: None,
            archived: Some(false),
        });
        assert_eq!(outcome, Outcome::unchanged());
    }

    #[test]
    fn archiving_a_section_is_ignored() {
        let mut state = fixture();
        let section = FolderItem {
            id: ItemId(50),
            ..create_section()
        };
        state.folders[2].items.push(section);
        let outcome = state.apply(&Action::UpdateFolderItem {
            item_id: ItemId(50),
            title: None,
            url: None,
            archived: Some(true),
        });
        assert!(!outcome.changed);
        assert!(!state.folders[2].items[0].archived);
    }

    #[test]
    fn section_url_cannot_be_set() {
        let mut state = fixture();
        let section = FolderItem {
            id: ItemId(50),
            ..create_section()
        };
        state.folders[2].items.push(section);

        let outcome = state.apply(&Action::UpdateFolderItem {
            item_id: ItemId(50),
            title: None,
            url: Some("https://example.com".into()),
            archived: None,
        });
        assert!(!outcome.changed);
        assert!(state.folders[2].items[0].url.is_empty());

        // A rename in the same update still applies.
        let outcome = state.apply(&Action::UpdateFolderItem {
            item_id: ItemId(50),
            title: Some("Reading".into()),
            url: Some("https://example.com".into()),
            archived: None,
        });
        assert_eq!(
            outcome.inverse,
            Some(Action::UpdateFolderItem {
                item_id: ItemId(50),
                title: Some(crate::model::DEFAULT_SECTION_TITLE.into()),
                url: None,
                archived: None,
            })
        );
        let section = &state.folders[2].items[0];
        assert_eq!(section.title, "Reading");
        assert!(section.url.is_empty());
    }

    #[test]
    fn restore_notice_is_not_undoable() {
        let mut state = fixture();
        state.folders[0].items[0].archived = true;
        let outcome = state.apply(&Action::UpdateFolderItem {
            item_id: ItemId(10),
            title: None,
            url: None,
            archived: Some(false),
        });
        assert_eq!(
            outcome.effects,
            vec![Effect::Notify(Notice::plain("Item has been restored"))]
        );
    }

    #[test]
    fn delete_single_item_round_trips() {
        let state = assert_round_trip(Action::DeleteFolderItem {
            item_id: ItemId(11),
        });
        assert_eq!(state.folders[0].items.len(), 2);
    }

    #[test]
    fn delete_items_across_folders_round_trips() {
        let state = assert_round_trip(Action::DeleteFolderItems {
            item_ids: vec![12, 10, 20].into_iter().map(ItemId).collect(),
        });
        assert_eq!(state.folders[0].items.len(), 1);
        assert!(state.folders[1].items.is_empty());
    }

    #[test]
    fn delete_items_skips_unknown_ids() {
        let mut state = fixture();
        let outcome = state.apply(&Action::DeleteFolderItems {
            item_ids: vec![ItemId(10), ItemId(777)],
        });
        match outcome.inverse {
            Some(Action::InsertFolderItems { entries }) => assert_eq!(entries.len(), 1),
            other => panic!("unexpected inverse: {other:?}"),
        }
    }

    #[test]
    fn deleting_item_in_edit_leaves_edit_mode() {
        let mut state = fixture();
        state.item_in_edit = Some(ItemId(11));
        state.apply(&Action::DeleteFolderItem {
            item_id: ItemId(11),
        });
        assert_eq!(state.item_in_edit, None);
    }

    #[test]
    fn move_item_to_other_folder_round_trips() {
        let state = assert_round_trip(Action::MoveFolderItem {
            item_id: ItemId(11),
            target_folder_id: FolderId(2),
            index: Some(0),
        });
        assert_eq!(state.folders[1].items[0].id, ItemId(11));
        assert_eq!(state.folders[0].items.len(), 2);
    }

    #[test]
    fn reorder_within_folder_round_trips() {
        let state = assert_round_trip(Action::MoveFolderItem {
            item_id: ItemId(10),
            target_folder_id: FolderId(1),
            index: None,
        });
        let ids: Vec<_> = state.folders[0].items.iter().map(|i| i.id.0).collect();
        assert_eq!(ids, vec![11, 12, 10]);
    }

    #[test]
    fn move_to_same_position_is_noop() {
        let mut state = fixture();
        let outcome = state.apply(&Action::MoveFolderItem {
            item_id: ItemId(11),
            target_folder_id: FolderId(1),
            index: Some(1),
        });
        assert!(!outcome.changed);
        assert_eq!(state, fixture());
    }

    #[test]
    fn missing_ids_leave_state_unchanged() {
        let actions = vec![
            Action::UpdateFolder {
                folder_id: FolderId(404),
                title: Some("x".into()),
                color: None,
            },
            Action::DeleteFolder {
                folder_id: FolderId(404),
            },
            Action::MoveFolder {
                folder_id: FolderId(404),
                index: 0,
            },
            Action::CreateFolderItem {
                folder_id: FolderId(404),
                item: item(1, "https://x.com", "x"),
                index: None,
            },
            Action::UpdateFolderItem {
                item_id: ItemId(404),
                title: Some("x".into()),
                url: None,
                archived: None,
            },
            Action::DeleteFolderItem {
                item_id: ItemId(404),
            },
            Action::MoveFolderItem {
                item_id: ItemId(404),
                target_folder_id: FolderId(1),
                index: None,
            },
            Action::MoveFolderItem {
                item_id: ItemId(10),
                target_folder_id: FolderId(404),
                index: None,
            },
        ];
        for action in actions {
            let mut state = fixture();
            let outcome = state.apply(&action);
            assert_eq!(outcome, Outcome::unchanged(), "{} should be a no-op", action.name());
            assert_eq!(state, fixture());
        }
    }

    #[test]
    fn app_state_patch_is_not_undo_tracked() {
        let mut state = fixture();
        let outcome = state.apply(&Action::UpdateAppState {
            patch: AppStatePatch {
                search: Some("doc".into()),
                sidebar_collapsed: Some(true),
                ..AppStatePatch::default()
            },
        });
        assert!(outcome.changed);
        assert!(!outcome.folders_changed);
        assert!(outcome.inverse.is_none());
        assert_eq!(state.search, "doc");
        assert!(state.sidebar_collapsed);
    }

    #[test]
    fn close_tabs_only_emits_effect() {
        let mut state = fixture();
        let outcome = state.apply(&Action::CloseTabs {
            tab_ids: vec![3, 4],
        });
        assert!(!outcome.changed);
        assert_eq!(outcome.effects, vec![Effect::CloseTabs(vec![3, 4])]);
        assert_eq!(state, fixture());
    }

    #[test]
    fn load_folders_marks_app_loaded() {
        let mut state = AppState::default();
        let outcome = state.apply(&Action::LoadFolders {
            folders: fixture().folders,
        });
        assert!(outcome.inverse.is_none());
        assert!(state.app_loaded);
        assert_eq!(state.folders.len(), 3);
    }
}
