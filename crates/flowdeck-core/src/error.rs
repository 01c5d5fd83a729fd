//! Error types for the Flowdeck core.

use thiserror::Error;

/// Errors produced by catalog, editor and execution operations.
///
/// Simulated step failures are deliberately *not* here: a failed step is
/// ordinary run data, reported through [`crate::RunReport`].
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CoreError {
    /// No flow with the given name exists in the catalog
    #[error("Flow not found: {0}")]
    FlowNotFound(String),

    /// Input failed validation (empty flow or component names and the like)
    #[error("Validation error: {0}")]
    Validation(String),

    /// A step index did not resolve inside the working sequence
    #[error("Step index out of bounds: {0}")]
    StepIndexOutOfBounds(usize),

    /// An editor operation was invoked without an open session
    #[error("No editor session is active")]
    NoEditorSession,

    /// A run was requested while another run is still in progress
    #[error("An execution run is already in progress")]
    RunInProgress,

    /// The catalog store rejected an operation
    #[error("Catalog store error: {0}")]
    CatalogStore(String),

    /// Anything that does not fit the categories above
    #[error("Internal error: {0}")]
    Internal(String),
}
