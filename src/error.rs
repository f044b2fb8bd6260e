use std::path::PathBuf;

use thiserror::Error;

use crate::model::ItemId;

/// Errors raised by a catalog when listing or counting items
#[derive(Error, Debug)]
pub enum CatalogError {
    #[error("Item {0} not found in catalog")]
    ItemNotFound(ItemId),

    #[error("Failed to read catalog snapshot {path}: {source}")]
    SnapshotReadFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse catalog snapshot {path}: {source}")]
    SnapshotParseFailed {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Catalog backend error: {0}")]
    Backend(String),
}

/// Errors raised by a metadata provider while refreshing one item
#[derive(Error, Debug)]
pub enum ProviderError {
    #[error("Provider {provider} failed for '{item}': {reason}")]
    LookupFailed {
        provider: String,
        item: String,
        reason: String,
    },
}

/// Errors that can occur when loading settings
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read settings file {path}: {source}")]
    ReadFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse settings file {path}: {source}")]
    ParseFailed {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// Top-level errors for a series refresh
#[derive(Error, Debug)]
pub enum RefreshError {
    /// The caller cancelled the refresh. Not a failure.
    #[error("Refresh was cancelled")]
    Cancelled,

    #[error(transparent)]
    Provider(#[from] ProviderError),

    #[error("Catalog error: {0}")]
    Catalog(#[from] CatalogError),
}

impl RefreshError {
    pub fn is_cancelled(&self) -> bool {
        matches!(self, RefreshError::Cancelled)
    }
}
