use std::path::PathBuf;
use thiserror::Error;

/// Errors produced by [`RecordStore`](crate::store::RecordStore) operations.
///
/// `OutOfRange` and `InvalidPage` are user mistakes and are reported back to the
/// person at the menu. `Io` and `Malformed` concern the backing file itself.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("record {number} does not exist (the phonebook has {len} records)")]
    OutOfRange { number: usize, len: usize },

    #[error("page {page} does not exist (the phonebook has {pages} pages)")]
    InvalidPage { page: usize, pages: usize },

    #[error("I/O error on {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed phonebook file {}: {source}", .path.display())]
    Malformed {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

impl StoreError {
    /// True for errors caused by input at the menu rather than by the backing file.
    pub fn is_user_error(&self) -> bool {
        matches!(
            self,
            StoreError::OutOfRange { .. } | StoreError::InvalidPage { .. }
        )
    }
}

pub type Result<T> = std::result::Result<T, StoreError>;
