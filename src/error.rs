use std::path::PathBuf;

/// Fatal failures. Everything a user can cause from the command line is
/// reported as ordinary output instead.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("could not read {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("could not write {path}: {source}")]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("no task IDs left: next_id is at its maximum")]
    IdsExhausted,
    #[error("could not serialize task store: {0}")]
    Serialize(#[from] serde_json::Error),
    #[error("could not write output: {0}")]
    Output(#[from] std::io::Error),
}
