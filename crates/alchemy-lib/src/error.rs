use std::path::PathBuf;

use thiserror::Error;

/// Convenient result alias for the alchemy library.
pub type Result<T> = std::result::Result<T, Error>;

/// Top-level library error type.
///
/// Unknown start elements and terminal elements are not errors: traversals
/// encode them as ordinary data in [`crate::Recipe`].
#[derive(Debug, Error)]
pub enum Error {
    /// Recipe catalog could not be located at the resolved path.
    #[error("recipe catalog not found at {path}")]
    CatalogNotFound { path: PathBuf },

    /// Raised when the catalog document is not a valid list of element records.
    #[error("failed to parse recipe catalog {path}: {source}")]
    CatalogParse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// Raised when a traversal was cancelled before it completed.
    #[error("traversal of {element} was cancelled")]
    TraversalCancelled { element: String },

    /// Raised when a traversal branch task panicked or was aborted.
    #[error("traversal branch for {element} failed: {message}")]
    TraversalTask { element: String, message: String },

    /// Raised when a traversal order or mode string is not recognised.
    #[error("unsupported traversal {kind}: {value}")]
    UnsupportedTraversal { kind: &'static str, value: String },

    /// Wrapper for IO errors.
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// Wrapper for JSON errors outside of catalog parsing.
    #[error(transparent)]
    Json(#[from] serde_json::Error),
}
