//! Entity model: folders, folder items, the host mirrors, and the
//! application state snapshot.
//!
//! These are plain data definitions. Persisted JSON uses the camelCase field
//! names of the dashboard's storage format (`favIconUrl`, `isSection`), so a
//! folder tree written by the host collaborator deserializes directly.

use std::fmt;
use std::time::{SystemTime, UNIX_EPOCH};

use rand::Rng;
use serde::{Deserialize, Serialize};

/// Colour assigned to folders created without an explicit colour.
pub const DEFAULT_FOLDER_COLOR: &str = "#f0f0f0";

/// Built-in icon for section markers: a blank white square as an SVG data URI.
pub const SECTION_ICON: &str = "data:image/svg+xml;base64,PHN2ZyB4bWxucz0iaHR0cDovL3d3dy53My5vcmcvMjAwMC9zdmciIHdpZHRoPSIxMDAiIGhlaWdodD0iMTAwIj4KICA8cmVjdCB3aWR0aD0iMTAwIiBoZWlnaHQ9IjEwMCIgZmlsbD0iI2ZmZiIgLz4KPC9zdmc+Cg==";

/// Title given to freshly created section markers.
pub const DEFAULT_SECTION_TITLE: &str = "Section title";

/// Upper bound of the random offset added to the millisecond clock when
/// generating ids.
const ID_SALT_RANGE: u64 = 10_000_000;

// ---------------------------------------------------------------------------
// Identifiers
// ---------------------------------------------------------------------------

/// Identifier of a [`Folder`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FolderId(pub u64);

/// Identifier of a [`FolderItem`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ItemId(pub u64);

/// Browser tab identifier, as handed out by the host.
pub type TabId = i64;

/// Browser window identifier, as handed out by the host.
pub type WindowId = i64;

impl fmt::Display for FolderId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl fmt::Display for ItemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Generate a process-unique id from the wall clock plus a random offset.
///
/// Uniqueness is best-effort: two ids minted in the same millisecond collide
/// with probability roughly `1 / ID_SALT_RANGE`. Nothing guards against that.
pub fn gen_uniq_id() -> u64 {
    let millis = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or_default();
    millis + rand::thread_rng().gen_range(0..=ID_SALT_RANGE)
}

impl FolderId {
    /// Mint a fresh folder id. See [`gen_uniq_id`].
    pub fn generate() -> Self {
        Self(gen_uniq_id())
    }
}

impl ItemId {
    /// Mint a fresh item id. See [`gen_uniq_id`].
    pub fn generate() -> Self {
        Self(gen_uniq_id())
    }
}

// ---------------------------------------------------------------------------
// Folder tree
// ---------------------------------------------------------------------------

/// A bookmark or a section marker inside a folder.
///
/// Sections are non-navigable grouping headers: their `url` is empty and
/// they are never archived.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FolderItem {
    pub id: ItemId,
    pub title: String,
    pub url: String,
    #[serde(default)]
    pub fav_icon_url: String,
    #[serde(default, skip_serializing_if = "is_false")]
    pub is_section: bool,
    #[serde(default, skip_serializing_if = "is_false")]
    pub archived: bool,
}

/// A named, coloured, ordered collection of items.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Folder {
    pub id: FolderId,
    pub title: String,
    pub color: String,
    /// Display order; preserved by every mutation except explicit moves.
    #[serde(default)]
    pub items: Vec<FolderItem>,
}

fn is_false(value: &bool) -> bool {
    !*value
}

/// Create a bookmark item with a fresh id. Missing fields become empty strings.
pub fn create_folder_item(
    url: Option<&str>,
    title: Option<&str>,
    fav_icon_url: Option<&str>,
) -> FolderItem {
    FolderItem {
        id: ItemId::generate(),
        title: title.unwrap_or_default().to_owned(),
        url: url.unwrap_or_default().to_owned(),
        fav_icon_url: fav_icon_url.unwrap_or_default().to_owned(),
        is_section: false,
        archived: false,
    }
}

/// Create a section marker with a fresh id and the built-in icon.
pub fn create_section() -> FolderItem {
    FolderItem {
        id: ItemId::generate(),
        title: DEFAULT_SECTION_TITLE.to_owned(),
        url: String::new(),
        fav_icon_url: SECTION_ICON.to_owned(),
        is_section: true,
        archived: false,
    }
}

/// Turn an open tab into a bookmark item with a fresh id.
pub fn convert_tab_to_item(tab: &Tab) -> FolderItem {
    create_folder_item(
        Some(tab.url.as_str()),
        Some(tab.title.as_str()),
        Some(tab.fav_icon_url.as_str()),
    )
}

impl Folder {
    /// Create an empty folder with a fresh id.
    pub fn new(title: impl Into<String>, color: impl Into<String>) -> Self {
        Self {
            id: FolderId::generate(),
            title: title.into(),
            color: color.into(),
            items: Vec::new(),
        }
    }

    /// Position of the item with `id` in this folder.
    pub fn position_of(&self, id: ItemId) -> Option<usize> {
        self.items.iter().position(|item| item.id == id)
    }
}

// ---------------------------------------------------------------------------
// Host mirrors
// ---------------------------------------------------------------------------

/// An open browser tab, mirrored from the host.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Tab {
    pub id: Option<TabId>,
    pub url: String,
    pub title: String,
    pub fav_icon_url: String,
    pub active: bool,
    pub window_id: WindowId,
}

/// A browsing history entry, mirrored from the host.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct HistoryItem {
    pub url: String,
    pub title: String,
    pub visit_count: u32,
    /// Milliseconds since the Unix epoch.
    pub last_visit_time: f64,
}

// ---------------------------------------------------------------------------
// Snapshot
// ---------------------------------------------------------------------------

/// The complete application state at a point in time.
///
/// Only the dispatcher writes `folders`. `tabs` and `history_items` are
/// read-only mirrors replaced wholesale when the host pushes a fresh read.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AppState {
    pub folders: Vec<Folder>,
    pub search: String,
    /// Item currently in inline rename mode; at most one at a time.
    pub item_in_edit: Option<ItemId>,
    pub tabs: Vec<Tab>,
    pub history_items: Vec<HistoryItem>,
    pub sidebar_collapsed: bool,
    pub sidebar_hovered: bool,
    pub show_not_used: bool,
    pub app_loaded: bool,
    pub current_window_id: Option<WindowId>,
    pub last_active_tab_ids: Vec<TabId>,
}

impl AppState {
    /// Index of the folder with `id`.
    pub fn folder_index(&self, id: FolderId) -> Option<usize> {
        self.folders.iter().position(|folder| folder.id == id)
    }

    /// The folder with `id`.
    pub fn folder(&self, id: FolderId) -> Option<&Folder> {
        self.folders.iter().find(|folder| folder.id == id)
    }

    /// `(folder index, item index)` of the first item with `id`.
    pub fn locate_item(&self, id: ItemId) -> Option<(usize, usize)> {
        self.folders
            .iter()
            .enumerate()
            .find_map(|(fi, folder)| folder.position_of(id).map(|ii| (fi, ii)))
    }
}
