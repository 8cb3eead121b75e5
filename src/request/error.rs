use std::path::PathBuf;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum RequestError {
    #[error("failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to read request from stdin: {0}")]
    Stdin(#[source] std::io::Error),

    #[error("malformed selection request: {0}")]
    Json(#[from] serde_json::Error),
}

pub type RequestResult<T> = Result<T, RequestError>;
