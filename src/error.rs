use std::io;
use std::path::PathBuf;

#[derive(thiserror::Error, Debug)]
pub enum StoreError {
    #[error("leaderboard io error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("leaderboard encode error: {0}")]
    Json(#[from] serde_json::Error),
}

#[derive(thiserror::Error, Debug, PartialEq)]
pub enum ConfigError {
    #[error("spawn probability must be within [0, 1], got {0}")]
    InvalidProbability(f64),
    #[error("swipe threshold must be at least 1 cell")]
    InvalidSwipeThreshold,
}
