use std::path::PathBuf;

/// Fatal pipeline failures. Anything row-level is recovered where it occurs.
#[derive(Debug, thiserror::Error)]
pub enum PipelineError {
    /// An input table could not be opened or read.
    #[error("ingestion failed for {}: {source}", .path.display())]
    Ingest {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    /// The output location could not be prepared or written.
    #[error("write failed for {}: {source}", .path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to serialize output: {0}")]
    Serialize(String),
}

impl From<serde_json::Error> for PipelineError {
    fn from(e: serde_json::Error) -> Self {
        Self::Serialize(e.to_string())
    }
}
