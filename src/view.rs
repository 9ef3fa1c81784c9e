//! Derived views over the snapshot and the live tab/history mirrors.
//!
//! Every function here is pure: it reads slices of an [`AppState`] plus the
//! host mirrors and returns a computed value without touching either. Url
//! comparisons are exact string equality; no trailing-slash or query
//! normalization is performed.

use std::borrow::Cow;
use std::collections::HashMap;

use regex::RegexBuilder;

use crate::model::{AppState, Folder, FolderItem, HistoryItem, ItemId, Tab, WindowId};

/// Url of the browser's own new-tab page, never listed in the sidebar.
pub const NEW_TAB_URL: &str = "chrome://newtab/";

/// Something with a title and url that search can match against.
pub trait Searchable {
    fn title(&self) -> &str;
    fn url(&self) -> &str;

    /// Case-insensitive substring match on title or url.
    ///
    /// `query_lc` must already be lowercase.
    fn contains_search(&self, query_lc: &str) -> bool {
        self.title().to_lowercase().contains(query_lc) || self.url().to_lowercase().contains(query_lc)
    }
}

impl Searchable for FolderItem {
    fn title(&self) -> &str {
        &self.title
    }

    fn url(&self) -> &str {
        &self.url
    }
}

impl Searchable for Tab {
    fn title(&self) -> &str {
        &self.title
    }

    fn url(&self) -> &str {
        &self.url
    }
}

impl Searchable for HistoryItem {
    fn title(&self) -> &str {
        &self.title
    }

    fn url(&self) -> &str {
        &self.url
    }
}

// ---------------------------------------------------------------------------
// Search
// ---------------------------------------------------------------------------

/// Items whose title or url contains `query`, case-insensitively.
///
/// An empty query returns the input slice itself, borrowed and in order.
pub fn filter_by_search<'a, T>(items: &'a [T], query: &str) -> Cow<'a, [T]>
where
    T: Searchable + Clone,
{
    if query.is_empty() {
        return Cow::Borrowed(items);
    }
    let query_lc = query.to_lowercase();
    Cow::Owned(
        items
            .iter()
            .filter(|item| item.contains_search(&query_lc))
            .cloned()
            .collect(),
    )
}

/// Wrap the first case-insensitive occurrence of `query` in `title` with a
/// highlight span.
///
/// The matched text keeps its original casing. Regex metacharacters in
/// `query` are matched literally. An empty query, or no match, returns
/// `title` unchanged.
pub fn highlight_match(title: &str, query: &str) -> String {
    if query.is_empty() {
        return title.to_owned();
    }
    let re = match RegexBuilder::new(&regex::escape(query))
        .case_insensitive(true)
        .build()
    {
        Ok(re) => re,
        Err(e) => {
            tracing::warn!(query, error = %e, "highlight pattern rejected; leaving title plain");
            return title.to_owned();
        }
    };
    re.replacen(title, 1, |caps: &regex::Captures<'_>| {
        format!(r#"<span class="searched">{}</span>"#, &caps[0])
    })
    .into_owned()
}

// ---------------------------------------------------------------------------
// Open / unused
// ---------------------------------------------------------------------------

/// `true` iff some tab's url equals the item's url exactly.
pub fn is_item_open(item: &FolderItem, tabs: &[Tab]) -> bool {
    tabs.iter().any(|tab| tab.url == item.url)
}

/// `true` for a bookmark with no history entry of the same url.
///
/// Sections are never unused.
pub fn is_item_unused(item: &FolderItem, history: &[HistoryItem]) -> bool {
    if item.is_section {
        return false;
    }
    !history.iter().any(|entry| entry.url == item.url)
}

pub fn has_archived_items(folders: &[Folder]) -> bool {
    folders.iter().any(|f| f.items.iter().any(|i| i.archived))
}

/// `true` if any item in the tree would be flagged unused.
pub fn has_items_to_highlight(folders: &[Folder], history: &[HistoryItem]) -> bool {
    folders
        .iter()
        .any(|f| f.items.iter().any(|i| is_item_unused(i, history)))
}

// ---------------------------------------------------------------------------
// Lookups
// ---------------------------------------------------------------------------

pub fn find_item_by_id(state: &AppState, id: ItemId) -> Option<&FolderItem> {
    state
        .folders
        .iter()
        .find_map(|f| f.items.iter().find(|i| i.id == id))
}

pub fn find_folder_by_item_id(state: &AppState, id: ItemId) -> Option<&Folder> {
    state
        .folders
        .iter()
        .find(|f| f.items.iter().any(|i| i.id == id))
}

/// Tabs whose url equals `url` exactly.
pub fn find_tabs_by_url<'a>(url: &str, tabs: &'a [Tab]) -> Vec<&'a Tab> {
    tabs.iter().filter(|tab| tab.url == url).collect()
}

// ---------------------------------------------------------------------------
// Sidebar
// ---------------------------------------------------------------------------

pub fn can_display_tab_in_sidebar(tab: &Tab) -> bool {
    tab.url != NEW_TAB_URL
}

/// Displayable tabs, narrowed by `query` when it is non-empty.
pub fn filter_tabs_by_search<'a>(tabs: &'a [Tab], query: &str) -> Vec<&'a Tab> {
    let query_lc = query.to_lowercase();
    tabs.iter()
        .filter(|tab| can_display_tab_in_sidebar(tab))
        .filter(|tab| query.is_empty() || tab.contains_search(&query_lc))
        .collect()
}

/// History entries whose url is not open in any tab.
pub fn filter_opened_tabs_from_history<'a>(
    tabs: &[Tab],
    history: &'a [HistoryItem],
) -> Vec<&'a HistoryItem> {
    history
        .iter()
        .filter(|entry| !tabs.iter().any(|tab| tab.url == entry.url))
        .collect()
}

/// The `limit` most visited entries, most visited first.
///
/// The sort is stable, so entries with equal counts keep their input order.
pub fn top_visited(history: &[HistoryItem], limit: usize) -> Vec<&HistoryItem> {
    let mut sorted: Vec<&HistoryItem> = history.iter().collect();
    sorted.sort_by(|a, b| b.visit_count.cmp(&a.visit_count));
    sorted.truncate(limit);
    sorted
}

/// Tabs in `window_id` that repeat the url of another tab in that window.
///
/// Tabs are scanned newest first, so the most recently opened tab of each url
/// survives. An active tab for which `is_own_tab` holds always survives
/// instead, so the dashboard never closes itself. Tabs without a url, and
/// tabs whose id is missing or `0`, are never reported. Passing `None` for
/// `window_id` considers every tab.
pub fn duplicated_tabs<'a, F>(
    tabs: &'a [Tab],
    window_id: Option<WindowId>,
    is_own_tab: F,
) -> Vec<&'a Tab>
where
    F: Fn(&Tab) -> bool,
{
    let mut groups: Vec<Vec<&'a Tab>> = Vec::new();
    let mut by_url: HashMap<&'a str, usize> = HashMap::new();

    for tab in tabs.iter().rev() {
        if tab.url.is_empty() || window_id.is_some_and(|w| w != tab.window_id) {
            continue;
        }
        let slot = *by_url.entry(tab.url.as_str()).or_insert_with(|| {
            groups.push(Vec::new());
            groups.len() - 1
        });
        let group = &mut groups[slot];
        if tab.active && is_own_tab(tab) {
            group.insert(0, tab);
        } else {
            group.push(tab);
        }
    }

    groups
        .into_iter()
        .flat_map(|group| group.into_iter().skip(1))
        .filter(|tab| tab.id.is_some_and(|id| id != 0))
        .collect()
}
