//! Unified error handling.
//!
//! Each fallible layer has its own error enum; [`AppError`] wraps them for
//! callers that span layers (app start-up, the CLI).

use thiserror::Error;

use crate::catalog::CatalogError;
use crate::config::ConfigError;
use crate::persistence::PersistenceError;

/// Application-level error type for the storefront.
#[derive(Debug, Error)]
pub enum AppError {
    /// Configuration is missing or invalid.
    #[error("Config error: {0}")]
    Config(#[from] ConfigError),

    /// Document store or decoding failed.
    #[error("Catalog error: {0}")]
    Catalog(#[from] CatalogError),

    /// Local preferences could not be read or written.
    #[error("Persistence error: {0}")]
    Persistence(#[from] PersistenceError),
}

impl AppError {
    /// Message safe to show a shopper.
    ///
    /// Transport and storage details are logged, not shown.
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            Self::Catalog(CatalogError::Validation(msg)) => msg.clone(),
            Self::Catalog(CatalogError::NotFound(_)) => {
                "We couldn't find what you were looking for".to_string()
            }
            Self::Catalog(err) => {
                tracing::error!(error = %err, "Catalog request failed");
                "Something went wrong loading the catalog. Please try again.".to_string()
            }
            Self::Persistence(err) => {
                tracing::error!(error = %err, "Preferences unavailable");
                "Couldn't save your preferences".to_string()
            }
            Self::Config(err) => {
                tracing::error!(error = %err, "Misconfigured storefront");
                "The app is not configured correctly".to_string()
            }
        }
    }
}

/// Result type alias for `AppError`.
pub type Result<T> = std::result::Result<T, AppError>;
