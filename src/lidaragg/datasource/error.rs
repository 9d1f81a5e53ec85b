//! Errors for the container I/O layer.

use thiserror::Error;

/// Failures while reading the input container.
#[derive(Debug, Error)]
pub enum SourceError {
    #[error("failed to read input container: {0}")]
    Io(#[from] std::io::Error),

    #[error("malformed record at line {line}: {source}")]
    Parse {
        line: usize,
        #[source]
        source: serde_json::Error,
    },
}

/// Failures while writing the output container.
#[derive(Debug, Error)]
pub enum SinkError {
    #[error("failed to write output container: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to serialize record: {0}")]
    Serialize(#[from] serde_json::Error),
}
