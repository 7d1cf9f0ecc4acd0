use thiserror::Error;

#[derive(Error, Debug)]
pub enum StorageError {
    #[error("failed to open app database at {location}: {source}")]
    Open {
        location: String,
        #[source]
        source: rusqlite::Error,
    },
    #[error("failed to prepare app database schema: {0}")]
    Schema(#[source] rusqlite::Error),
    #[error("app database query failed: {0}")]
    Query(#[from] rusqlite::Error),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
