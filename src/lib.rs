pub mod app_db;
pub mod config;
pub mod desktop;
pub mod error;
pub mod icons;
pub mod indexer;
pub mod models;
pub mod ranking;
pub mod results;
pub mod search_name;

pub use app_db::{AppDb, AppDescriptor, DbLocation};
pub use error::StorageError;
pub use icons::{DesktopIconLoader, IconCache, IconLoader, PlaceholderIconLoader};
pub use models::{ApplicationRecord, IconHandle, ResultItem};
pub use ranking::{rank, RankedMatch, DEFAULT_LIMIT, DEFAULT_MIN_SCORE};
