//! The single-writer store: dispatch, undo, transactions and subscription.

use std::sync::Arc;

use tokio::sync::watch;

use crate::action::Action;
use crate::config::StoreConfig;
use crate::error::ConfigError;
use crate::history::ActionLog;
use crate::host::{BrowserHost, Notice, NoopHost};
use crate::model::{AppState, FolderId, HistoryItem, Tab, convert_tab_to_item};
use crate::reducer::{Effect, Outcome, Reversible};
use crate::view;

/// Message shown after a successful undo.
pub const UNDONE_MESSAGE: &str = "Undone";

/// Owner of the application state and its undo log.
///
/// Every mutation goes through [`dispatch`](Store::dispatch). Each call
/// computes the new state, records the inverse, then publishes the snapshot
/// to subscribers, in that order. `&mut self` makes dispatches strictly
/// sequential.
pub struct Store {
    state: Arc<AppState>,
    log: ActionLog<Action>,
    host: Box<dyn BrowserHost + Send>,
    config: StoreConfig,
    snapshots: watch::Sender<Arc<AppState>>,
    pending_notice: Option<Notice>,
    replaying: bool,
}

// Manual `Debug` because the host is a trait object.
impl std::fmt::Debug for Store {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Store")
            .field("folders", &self.state.folders.len())
            .field("undo_depth", &self.log.len())
            .field("recording", &self.log.is_recording())
            .finish_non_exhaustive()
    }
}

impl Store {
    /// Start building a store.
    pub fn builder() -> StoreBuilder {
        StoreBuilder::new()
    }

    /// The current snapshot.
    pub fn state(&self) -> &AppState {
        &self.state
    }

    /// Shared handle to the current snapshot.
    pub fn snapshot(&self) -> Arc<AppState> {
        Arc::clone(&self.state)
    }

    /// Receive the latest snapshot after every state-changing dispatch.
    ///
    /// The receiver starts out holding the current snapshot.
    pub fn subscribe(&self) -> watch::Receiver<Arc<AppState>> {
        self.snapshots.subscribe()
    }

    pub fn config(&self) -> &StoreConfig {
        &self.config
    }

    /// `true` if [`undo`](Store::undo) would do anything.
    pub fn can_undo(&self) -> bool {
        !self.log.is_empty()
    }

    /// Number of committed undo steps.
    pub fn undo_depth(&self) -> usize {
        self.log.len()
    }

    /// Apply `action` and return the resulting snapshot.
    ///
    /// Never fails. Actions naming unknown ids leave the state untouched,
    /// and host failures are logged and swallowed. [`Action::Undo`] is the
    /// same as calling [`undo`](Store::undo).
    pub fn dispatch(&mut self, action: Action) -> &AppState {
        if matches!(action, Action::Undo) {
            self.undo();
            return &self.state;
        }

        let action = self.resolve(action);
        let outcome = self.apply(&action);
        if outcome.changed {
            self.publish();
        }
        if outcome.folders_changed {
            self.persist();
        }
        &self.state
    }

    /// Reverse the most recent undo step.
    ///
    /// Inverses are replayed newest first. The actions they produce are not
    /// recorded, and their notices are suppressed in favour of a single
    /// "Undone" message.
    ///
    /// # Returns
    ///
    /// `false` if the log was empty and nothing happened.
    pub fn undo(&mut self) -> bool {
        let Some(txn) = self.log.pop() else {
            tracing::debug!("undo requested with empty log");
            return false;
        };
        tracing::debug!(steps = txn.len(), "undoing transaction");

        self.replaying = true;
        let mut changed = false;
        let mut folders_changed = false;
        for inverse in txn.into_replay_order() {
            let outcome = self.apply(&inverse);
            changed |= outcome.changed;
            folders_changed |= outcome.folders_changed;
        }
        self.replaying = false;

        if changed {
            self.publish();
        }
        if folders_changed {
            self.persist();
        }
        self.deliver(Notice::plain(UNDONE_MESSAGE));
        true
    }

    /// Run `body` as a single undo step.
    ///
    /// Every inverse recorded while `body` runs is coalesced into one
    /// transaction, so one [`undo`](Store::undo) reverses all of it. A
    /// transaction opened inside another joins the outer one. Only the last
    /// notice raised inside the transaction is delivered, once, when the
    /// outermost transaction commits.
    pub fn run_transaction<R>(&mut self, body: impl FnOnce(&mut Self) -> R) -> R {
        self.log.begin();
        let result = body(self);
        if let Some(inverses) = self.log.commit() {
            tracing::info!(inverses, undo_depth = self.log.len(), "transaction committed");
        }
        if !self.log.is_recording()
            && let Some(notice) = self.pending_notice.take()
        {
            self.host.notify(notice);
        }
        result
    }

    // -----------------------------------------------------------------------
    // Composite intents
    // -----------------------------------------------------------------------

    /// Save `tabs` into a new folder with a random colour, then close them.
    ///
    /// Both steps form one undo step; undo removes the folder (the closed
    /// tabs stay closed). The new-tab page is skipped.
    ///
    /// # Returns
    ///
    /// The new folder's id, or `None` if no tab was eligible.
    pub fn stash_tabs(&mut self, title: &str, tabs: &[Tab]) -> Option<FolderId> {
        let eligible: Vec<&Tab> = tabs
            .iter()
            .filter(|tab| view::can_display_tab_in_sidebar(tab))
            .collect();
        if eligible.is_empty() {
            return None;
        }
        let folder_id = FolderId::generate();
        let items: Vec<_> = eligible.iter().map(|tab| convert_tab_to_item(tab)).collect();
        let tab_ids: Vec<_> = eligible.iter().filter_map(|tab| tab.id).collect();
        let color = self.config.random_folder_color();

        self.run_transaction(|store| {
            store.dispatch(Action::CreateFolder {
                id: Some(folder_id),
                title: title.to_owned(),
                color: Some(color),
                items,
            });
            store.dispatch(Action::CloseTabs { tab_ids });
        });
        Some(folder_id)
    }

    /// Close tabs in the current window that repeat another tab's url.
    ///
    /// `is_own_tab` identifies the dashboard's own tabs; an active one is
    /// never closed. Returns the number of tabs asked to close.
    pub fn close_duplicated_tabs(&mut self, is_own_tab: impl Fn(&Tab) -> bool) -> usize {
        let tab_ids: Vec<_> =
            view::duplicated_tabs(&self.state.tabs, self.state.current_window_id, is_own_tab)
                .iter()
                .filter_map(|tab| tab.id)
                .collect();
        let count = tab_ids.len();
        if count > 0 {
            self.dispatch(Action::CloseTabs { tab_ids });
        }
        count
    }

    // -----------------------------------------------------------------------
    // Configured views
    // -----------------------------------------------------------------------

    /// Sidebar history: no translation pages, nothing already open in a tab,
    /// narrowed by the current search.
    pub fn recent_history(&self) -> Vec<HistoryItem> {
        let relevant = self
            .config
            .host_filters
            .filter_irrelevant_history(&self.state.history_items);
        let closed: Vec<HistoryItem> =
            view::filter_opened_tabs_from_history(&self.state.tabs, &relevant)
                .into_iter()
                .cloned()
                .collect();
        view::filter_by_search(&closed, &self.state.search).into_owned()
    }

    /// Most visited history entries, with translation pages and noise hosts
    /// left out.
    pub fn top_visited(&self) -> Vec<HistoryItem> {
        let filters = &self.config.host_filters;
        let history = filters.filter_irrelevant_history(&self.state.history_items);
        let relevant: Vec<HistoryItem> = filters
            .exclude_noise(&history)
            .into_iter()
            .cloned()
            .collect();
        view::top_visited(&relevant, self.config.top_visited_limit)
            .into_iter()
            .cloned()
            .collect()
    }

    // -----------------------------------------------------------------------
    // Internals
    // -----------------------------------------------------------------------

    /// Fill in configured defaults the reducer cannot know about.
    fn resolve(&self, action: Action) -> Action {
        match action {
            Action::CreateFolder {
                id,
                title,
                color: None,
                items,
            } => Action::CreateFolder {
                id,
                title,
                color: Some(self.config.default_folder_color.clone()),
                items,
            },
            other => other,
        }
    }

    /// Apply one action, record its inverse and run its effects.
    fn apply(&mut self, action: &Action) -> Outcome<Action> {
        let mut outcome = Arc::make_mut(&mut self.state).apply(action);
        tracing::debug!(
            action = action.name(),
            tracked = action.is_undo_tracked(),
            changed = outcome.changed,
            replay = self.replaying,
            "dispatched"
        );

        if let Some(inverse) = outcome.inverse.take()
            && !self.replaying
        {
            self.log.record_inverse(inverse);
        }
        if let Action::LoadFolders { folders } = action {
            self.log.reset();
            tracing::info!(folders = folders.len(), "folder tree loaded");
        }

        for effect in std::mem::take(&mut outcome.effects) {
            match effect {
                Effect::CloseTabs(tab_ids) => self.host.close_tabs(&tab_ids),
                Effect::Notify(_) if self.replaying => {}
                Effect::Notify(notice) => self.deliver(notice),
            }
        }
        outcome
    }

    fn deliver(&mut self, notice: Notice) {
        if self.log.is_recording() {
            self.pending_notice = Some(notice);
        } else {
            self.host.notify(notice);
        }
    }

    fn publish(&self) {
        self.snapshots.send_replace(Arc::clone(&self.state));
    }

    fn persist(&self) {
        if let Err(e) = self.host.persist_folders(&self.state.folders) {
            tracing::warn!(
                folders = self.state.folders.len(),
                error = %e,
                "failed to persist folder tree"
            );
        }
    }
}

// ---------------------------------------------------------------------------
// Builder
// ---------------------------------------------------------------------------

/// Builder for configuring and constructing a [`Store`].
///
/// # Examples
///
/// ```
/// use tabfold::{Action, RecordingHost, Store};
///
/// let mut store = Store::builder()
///     .host(RecordingHost::new())
///     .undo_limit(32)
///     .build()
///     .expect("default config is valid");
/// store.dispatch(Action::CreateFolder {
///     id: None,
///     title: "Reading".into(),
///     color: None,
///     items: vec![],
/// });
/// assert_eq!(store.state().folders.len(), 1);
/// ```
pub struct StoreBuilder {
    config: StoreConfig,
    host: Option<Box<dyn BrowserHost + Send>>,
    initial: AppState,
}

impl std::fmt::Debug for StoreBuilder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StoreBuilder")
            .field("config", &self.config)
            .field("has_host", &self.host.is_some())
            .finish_non_exhaustive()
    }
}

impl Default for StoreBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl StoreBuilder {
    /// A builder with default configuration and a [`NoopHost`].
    pub fn new() -> Self {
        Self {
            config: StoreConfig::default(),
            host: None,
            initial: AppState::default(),
        }
    }

    /// Replace the whole configuration.
    ///
    /// # Returns
    ///
    /// `self` for method chaining.
    pub fn config(mut self, config: StoreConfig) -> Self {
        self.config = config;
        self
    }

    /// Set the browser-host collaborator.
    ///
    /// # Arguments
    ///
    /// * `host` - Receives tab-close requests, folder writes and notices.
    ///   Pass an `Arc` to keep a handle on it.
    ///
    /// # Returns
    ///
    /// `self` for method chaining.
    pub fn host(mut self, host: impl BrowserHost + Send + 'static) -> Self {
        self.host = Some(Box::new(host));
        self
    }

    /// Override the configured undo limit.
    ///
    /// # Returns
    ///
    /// `self` for method chaining.
    pub fn undo_limit(mut self, limit: usize) -> Self {
        self.config.undo_limit = limit;
        self
    }

    /// Start from `state` instead of an empty snapshot.
    ///
    /// # Returns
    ///
    /// `self` for method chaining.
    pub fn initial_state(mut self, state: AppState) -> Self {
        self.initial = state;
        self
    }

    /// Validate the configuration and build the store.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] if the configuration is unusable.
    pub fn build(self) -> Result<Store, ConfigError> {
        self.config.validate()?;
        let state = Arc::new(self.initial);
        let (snapshots, _) = watch::channel(Arc::clone(&state));
        Ok(Store {
            state,
            log: ActionLog::new(self.config.undo_limit),
            host: self.host.unwrap_or_else(|| Box::new(NoopHost)),
            config: self.config,
            snapshots,
            pending_notice: None,
            replaying: false,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::action::AppStatePatch;
    use crate::host::RecordingHost;
    use crate::model::{Folder, FolderItem, ItemId, create_folder_item};

    fn bookmark(id: u64, url: &str, title: &str) -> FolderItem {
        FolderItem {
            id: ItemId(id),
            ..create_folder_item(Some(url), Some(title), None)
        }
    }

    fn seeded() -> AppState {
        AppState {
            folders: vec![Folder {
                id: FolderId(1),
                title: "Work".into(),
                color: "#fff".into(),
                items: vec![
                    bookmark(10, "https://a.com", "A"),
                    bookmark(11, "https://b.com", "B"),
                ],
            }],
            ..AppState::default()
        }
    }

    fn store_with(host: &Arc<RecordingHost>) -> Store {
        Store::builder()
            .host(Arc::clone(host))
            .initial_state(seeded())
            .build()
            .unwrap()
    }

    fn tab(id: i64, url: &str) -> Tab {
        Tab {
            id: Some(id),
            url: url.into(),
            title: url.into(),
            window_id: 1,
            ..Tab::default()
        }
    }

    #[test]
    fn dispatch_records_persists_and_notifies() {
        let host = Arc::new(RecordingHost::new());
        let mut store = store_with(&host);

        store.dispatch(Action::DeleteFolderItem {
            item_id: ItemId(10),
        });

        assert_eq!(store.state().folders[0].items.len(), 1);
        assert_eq!(store.undo_depth(), 1);
        let log = host.log();
        assert_eq!(log.persisted.len(), 1);
        assert_eq!(log.notices, vec![Notice::undoable("Link has been deleted")]);
    }

    #[test]
    fn undo_restores_and_reports_once() {
        let host = Arc::new(RecordingHost::new());
        let mut store = store_with(&host);
        store.dispatch(Action::DeleteFolderItem {
            item_id: ItemId(11),
        });

        assert!(store.dispatch(Action::Undo).folders == seeded().folders);
        assert!(!store.can_undo());
        let log = host.log();
        assert_eq!(log.persisted.len(), 2);
        assert_eq!(
            log.notices.last(),
            Some(&Notice::plain(UNDONE_MESSAGE)),
            "replayed inverses must not raise their own notices"
        );
        assert_eq!(log.notices.len(), 2);
    }

    #[test]
    fn undo_on_empty_log_is_noop() {
        let host = Arc::new(RecordingHost::new());
        let mut store = store_with(&host);
        assert!(!store.undo());
        assert_eq!(*store.state(), seeded());
        assert!(host.log().notices.is_empty());
    }

    #[test]
    fn transaction_is_one_undo_step_with_last_notice() {
        let host = Arc::new(RecordingHost::new());
        let mut store = store_with(&host);

        store.run_transaction(|s| {
            s.dispatch(Action::UpdateFolderItem {
                item_id: ItemId(10),
                title: None,
                url: None,
                archived: Some(true),
            });
            s.dispatch(Action::UpdateFolderItem {
                item_id: ItemId(10),
                title: Some("Renamed".into()),
                url: None,
                archived: None,
            });
            assert!(host.log().notices.is_empty(), "notices wait for commit");
        });

        assert_eq!(store.undo_depth(), 1);
        assert_eq!(host.log().notices, vec![Notice::undoable("Item has been renamed")]);

        store.undo();
        assert_eq!(*store.state(), seeded());
    }

    #[test]
    fn nested_transactions_flatten() {
        let mut store = Store::builder().initial_state(seeded()).build().unwrap();
        store.run_transaction(|s| {
            s.dispatch(Action::DeleteFolderItem {
                item_id: ItemId(10),
            });
            s.run_transaction(|inner| {
                inner.dispatch(Action::DeleteFolderItem {
                    item_id: ItemId(11),
                });
            });
            assert_eq!(s.undo_depth(), 0, "inner commit must not push");
        });
        assert_eq!(store.undo_depth(), 1);
        store.undo();
        assert_eq!(*store.state(), seeded());
    }

    #[test]
    fn ui_flags_are_published_but_not_tracked() {
        let host = Arc::new(RecordingHost::new());
        let mut store = store_with(&host);
        let rx = store.subscribe();

        store.dispatch(Action::UpdateAppState {
            patch: AppStatePatch::search("doc"),
        });

        assert_eq!(rx.borrow().search, "doc");
        assert!(!store.can_undo());
        assert!(host.log().persisted.is_empty());
    }

    #[test]
    fn subscribers_see_every_change() {
        let mut store = Store::builder().initial_state(seeded()).build().unwrap();
        let mut rx = store.subscribe();
        assert!(!rx.has_changed().unwrap());

        store.dispatch(Action::DeleteFolder {
            folder_id: FolderId(1),
        });
        assert!(rx.has_changed().unwrap());
        assert!(rx.borrow_and_update().folders.is_empty());

        store.dispatch(Action::DeleteFolder {
            folder_id: FolderId(1),
        });
        assert!(!rx.has_changed().unwrap(), "no-op dispatch publishes nothing");
    }

    #[test]
    fn load_folders_clears_log_and_skips_persist() {
        let host = Arc::new(RecordingHost::new());
        let mut store = store_with(&host);
        store.dispatch(Action::DeleteFolderItem {
            item_id: ItemId(10),
        });
        store.dispatch(Action::LoadFolders {
            folders: seeded().folders,
        });

        assert!(store.state().app_loaded);
        assert!(!store.can_undo());
        assert_eq!(host.log().persisted.len(), 1);
    }

    #[test]
    fn load_folders_inside_transaction_leaves_nothing_to_undo() {
        let mut store = Store::builder().initial_state(seeded()).build().unwrap();
        let reloaded = vec![Folder {
            id: FolderId(5),
            title: "Fresh".into(),
            color: "#fff".into(),
            items: vec![bookmark(50, "https://z.com", "Z")],
        }];

        store.run_transaction(|s| {
            s.dispatch(Action::DeleteFolderItem {
                item_id: ItemId(10),
            });
            s.dispatch(Action::LoadFolders {
                folders: reloaded.clone(),
            });
        });

        assert_eq!(store.undo_depth(), 0);
        assert!(!store.undo());
        assert_eq!(store.state().folders, reloaded);
    }

    #[test]
    fn persistence_failure_does_not_block_dispatch() {
        let host = Arc::new(RecordingHost::failing_persist());
        let mut store = store_with(&host);
        store.dispatch(Action::DeleteFolderItem {
            item_id: ItemId(10),
        });
        assert_eq!(store.state().folders[0].items.len(), 1);
        assert!(store.can_undo());
    }

    #[test]
    fn create_folder_takes_configured_default_color() {
        let config = StoreConfig {
            default_folder_color: "#123456".into(),
            ..StoreConfig::default()
        };
        let mut store = Store::builder().config(config).build().unwrap();
        store.dispatch(Action::CreateFolder {
            id: None,
            title: "New".into(),
            color: None,
            items: vec![],
        });
        assert_eq!(store.state().folders[0].color, "#123456");
    }

    #[test]
    fn undo_limit_drops_oldest() {
        let mut store = Store::builder()
            .initial_state(seeded())
            .undo_limit(1)
            .build()
            .unwrap();
        store.dispatch(Action::DeleteFolderItem {
            item_id: ItemId(10),
        });
        store.dispatch(Action::DeleteFolderItem {
            item_id: ItemId(11),
        });
        assert_eq!(store.undo_depth(), 1);
        store.undo();
        assert!(!store.undo());
        assert_eq!(store.state().folders[0].items.len(), 1);
        assert_eq!(store.state().folders[0].items[0].id, ItemId(11));
    }

    #[test]
    fn zero_limit_in_config_is_rejected() {
        let err = Store::builder().undo_limit(0).build().unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { .. }));
    }

    #[test]
    fn stash_tabs_creates_folder_and_closes_tabs() {
        let host = Arc::new(RecordingHost::new());
        let mut store = store_with(&host);
        let tabs = vec![
            tab(1, "https://x.com"),
            tab(2, view::NEW_TAB_URL),
            tab(3, "https://y.com"),
        ];

        let id = store.stash_tabs("Stashed", &tabs).unwrap();

        let folder = store.state().folder(id).unwrap();
        assert_eq!(folder.items.len(), 2);
        assert!(store.config().folder_palette.contains(&folder.color));
        assert_eq!(host.log().closed_tabs, vec![vec![1, 3]]);
        assert_eq!(store.undo_depth(), 1);

        store.undo();
        assert!(store.state().folder(id).is_none());
    }

    #[test]
    fn stash_with_no_eligible_tabs_does_nothing() {
        let mut store = Store::builder().build().unwrap();
        assert!(store.stash_tabs("x", &[tab(1, view::NEW_TAB_URL)]).is_none());
        assert!(store.state().folders.is_empty());
    }

    #[test]
    fn close_duplicated_tabs_uses_current_window() {
        let host = Arc::new(RecordingHost::new());
        let mut store = store_with(&host);
        store.dispatch(Action::SetHostContext {
            current_window_id: Some(1),
            last_active_tab_ids: vec![],
        });
        store.dispatch(Action::SetTabs {
            tabs: vec![tab(1, "https://a.com"), tab(2, "https://a.com")],
        });

        assert_eq!(store.close_duplicated_tabs(|_| false), 1);
        assert_eq!(host.log().closed_tabs, vec![vec![1]]);
    }

    #[test]
    fn configured_history_views() {
        let mut store = Store::builder().build().unwrap();
        let visit = |url: &str, visit_count| HistoryItem {
            url: url.into(),
            visit_count,
            ..HistoryItem::default()
        };
        store.dispatch(Action::SetHistory {
            items: vec![
                visit("https://translate.google.com/x", 9),
                visit("https://www.youtube.com/", 8),
                visit("https://open.com/", 3),
                visit("https://docs.rs/", 5),
            ],
        });
        store.dispatch(Action::SetTabs {
            tabs: vec![tab(1, "https://open.com/")],
        });

        let recent: Vec<_> = store.recent_history().into_iter().map(|h| h.url).collect();
        assert_eq!(recent, vec!["https://www.youtube.com/", "https://docs.rs/"]);

        let top: Vec<_> = store.top_visited().into_iter().map(|h| h.url).collect();
        assert_eq!(
            top,
            vec!["https://docs.rs/", "https://open.com/"],
            "translation and noise hosts never rank"
        );
    }

    #[test]
    fn top_visited_drops_translation_pages() {
        let mut store = Store::builder().build().unwrap();
        store.dispatch(Action::SetHistory {
            items: vec![
                HistoryItem {
                    url: "https://www.deepl.com/translator".into(),
                    visit_count: 50,
                    ..HistoryItem::default()
                },
                HistoryItem {
                    url: "https://crates.io/".into(),
                    visit_count: 2,
                    ..HistoryItem::default()
                },
            ],
        });
        let top: Vec<_> = store.top_visited().into_iter().map(|h| h.url).collect();
        assert_eq!(top, vec!["https://crates.io/"]);
    }
}
