use thiserror::Error;

/// Error taxonomy shared across the workspace.
///
/// `NoDocuments` is fatal to ingestion and must reach the caller that
/// triggered it. `Retrieval` is propagated without partial results.
/// `Generation` is recovered inside the query pipeline and never crosses
/// the query boundary.
#[derive(Debug, Error)]
pub enum Error {
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("No documents found in: {0}")]
    NoDocuments(String),

    #[error("Retrieval failed: {0}")]
    Retrieval(String),

    #[error("Generation failed: {0}")]
    Generation(String),

    #[error("Store error: {0}")]
    Store(String),
}

pub type Result<T> = std::result::Result<T, Error>;
