use thiserror::Error;

/// Errors the harness distinguishes. All of them are local to a single
/// scenario; teardown still runs when one is raised.
#[derive(Debug, Error)]
pub enum HarnessError {
    /// A cookie, preference or permission store could not be opened:
    /// missing file, lock held by a live browser, or schema mismatch.
    #[error("store unavailable: {0}")]
    StoreUnavailable(String),

    /// A cookie value could not be decoded. Never masked as "cookie
    /// absent" since it indicates a format mismatch.
    #[error("decode error: {0}")]
    DecodeError(String),

    /// Caller supplied an empty value to encode or a malformed domain.
    /// Rejected before any I/O.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// The preference backup could not be created. Mutation must not
    /// proceed without it.
    #[error("preference backup failed: {0}")]
    BackupFailed(String),

    #[error("sqlite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, HarnessError>;
