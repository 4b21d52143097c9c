use std::path::PathBuf;
use thiserror::Error;

/// Errors raised while loading a snapshot.
#[derive(Debug, Error)]
pub enum SnapshotError {
    /// The snapshot file could not be read.
    #[error("failed to read snapshot {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The snapshot document is not valid JSON for the expected layout.
    #[error("failed to parse snapshot: {0}")]
    Parse(#[from] serde_json::Error),
}
