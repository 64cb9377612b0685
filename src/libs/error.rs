use std::path::PathBuf;

/// Failures of a single pair's resolution. None of them is retried.
#[derive(thiserror::Error, Debug)]
pub enum BbhError {
    /// A caller-supplied parameter is out of range. Raised before any file I/O.
    #[error("invalid parameter: {0}")]
    InvalidParameter(String),

    /// A sequence file or one of its search index files is absent.
    #[error("missing input: {}: {reason}", .path.display())]
    MissingInput { path: PathBuf, reason: String },

    /// The external aligner is missing or exited unsuccessfully.
    #[error("alignment tool failed: `{command}`: {diagnostic}")]
    AlignmentTool { command: String, diagnostic: String },

    /// A hit's query has no entry in the gene length index of its set.
    #[error("no length for query `{query}` in {set}")]
    MissingLength { query: String, set: String },

    /// A hit table references an identifier unknown to the matching index.
    #[error("input mismatch: {table} references `{id}` as {role}, absent from {set}")]
    InputMismatch {
        table: String,
        id: String,
        role: &'static str,
        set: String,
    },

    #[error("malformed sequence in {source_name}: {message}")]
    MalformedSequence { source_name: String, message: String },

    #[error("malformed hit at {source_name}:{line}: {message}")]
    MalformedHit {
        source_name: String,
        line: usize,
        message: String,
    },

    #[error("malformed result file {}: {message}", .path.display())]
    MalformedResult { path: PathBuf, message: String },

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Csv(#[from] csv::Error),
}
