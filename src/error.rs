//! Error types for the store navigator.

use std::path::PathBuf;

/// Errors raised by [`crate::navigator::StoreNavigator`].
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// The configured store root is not an existing directory.
    #[error("invalid pass directory: {0}")]
    InvalidStore(PathBuf),

    /// An index that is not part of the current listing was used.
    #[error("no entry with index {0} in the current listing")]
    EntryNotFound(usize),

    /// Reading a directory listing failed.
    #[error(transparent)]
    Walk(#[from] walkdir::Error),
}

pub type StoreResult<T> = Result<T, StoreError>;
