use thiserror::Error;

/// All the ways a scoring request can go wrong
///
/// thiserror generates the Display and Error impls so each variant only
/// needs its message template.
#[derive(Error, Debug)]
pub enum Error {
    #[error("Failed to fetch repositories from upstream: {0}")]
    FetchError(String),

    #[error("User preferences not found for user {0}")]
    PreferenceNotFound(i64),

    #[error("Store operation failed: {0}")]
    StoreError(#[from] repopulse_store::StoreError),

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}
