//! Error types for picklist_core

use thiserror::Error;

/// Errors that can occur while driving a selection control
#[derive(Error, Debug)]
pub enum SelectError {
    /// The host did not configure an option factory
    #[error("option creation is not configured")]
    CreateUnavailable,

    /// Creation was requested with an empty search term
    #[error("cannot create an option from an empty search term")]
    EmptyTerm,

    /// A creation request is already pending for this control
    #[error("an option creation request is already in flight")]
    CreateInFlight,

    /// The host factory failed; pool and selection are untouched
    #[error("option factory failed: {0}")]
    Factory(#[from] anyhow::Error),
}

/// Result type for picklist_core operations
pub type Result<T> = std::result::Result<T, SelectError>;
