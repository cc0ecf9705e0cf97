//! Error types for behavior graph persistence

use thiserror::Error;

use crate::liveness::NodeKey;

/// Result type for persistence operations
pub type PersistResult<T> = std::result::Result<T, PersistError>;

/// Errors that can occur while paging graph nodes to or from disk
///
/// In-memory node operations never fail; only the I/O surface does.
#[derive(Debug, Error)]
pub enum PersistError {
    /// Underlying read/write failure, passed through unchanged
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Stored transition payload is not a whole number of records
    #[error("corrupt node record: {ints} transition ints is not a multiple of 3")]
    MisalignedTransitions { ints: usize },

    /// Too many transitions to express in the record's length prefix
    #[error("node has {ints} transition ints, more than a record can hold")]
    TooManyTransitions { ints: usize },

    /// An earlier failed write could not be rolled back, so new offsets
    /// would no longer line up with the file contents
    #[error("node file {} is unusable after a failed write", path.display())]
    Poisoned { path: std::path::PathBuf },

    /// A node was required from a store that never saw it
    #[error("no record stored for node {0:?}")]
    UnknownNode(NodeKey),
}

impl PersistError {
    /// Whether this error came from the underlying reader or writer
    pub fn is_io(&self) -> bool {
        matches!(self, PersistError::Io(_))
    }
}
