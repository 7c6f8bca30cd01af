use thiserror::Error;

/// Result type for fact loading
pub type Result<T> = std::result::Result<T, FactsError>;

/// Errors that make a fact collection unreadable
#[derive(Error, Debug)]
pub enum FactsError {
    /// IO error occurred
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// The input is not a valid JSON array of facts
    #[error("Invalid fact document: {0}")]
    InvalidDocument(#[source] serde_json::Error),

    /// A JSON Lines record could not be parsed
    #[error("Invalid fact on line {line}: {source}")]
    InvalidLine {
        line: usize,
        #[source]
        source: serde_json::Error,
    },
}
