//! Action-dispatched folder state with transactional undo, for a new-tab
//! bookmark dashboard.

mod action;
pub use action::{Action, AppStatePatch, PlacedItem};
mod config;
pub use config::{DEFAULT_TOP_VISITED_LIMIT, StoreConfig, random_folder_color};
mod error;
pub use error::{ConfigError, PersistError};
mod history;
pub use history::{ActionLog, DEFAULT_UNDO_LIMIT, LogState, Transaction};
mod host;
pub use host::{BrowserHost, HostLog, NoopHost, Notice, RecordingHost};
mod hosts;
pub use hosts::{HostFilterConfig, extract_hostname};
mod model;
pub use model::{
    AppState, DEFAULT_FOLDER_COLOR, DEFAULT_SECTION_TITLE, Folder, FolderId, FolderItem,
    HistoryItem, ItemId, SECTION_ICON, Tab, TabId, WindowId, convert_tab_to_item,
    create_folder_item, create_section, gen_uniq_id,
};
mod persist;
pub use persist::FolderFile;
mod reducer;
pub use reducer::{Effect, Outcome, Reversible};
mod store;
pub use store::{Store, StoreBuilder, UNDONE_MESSAGE};
pub mod timing;
pub mod view;
