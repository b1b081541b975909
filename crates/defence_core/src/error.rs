//! Error types for the defence simulation.

use thiserror::Error;

use crate::tower::TowerId;

/// Result type alias using [`DefenceError`].
pub type Result<T> = std::result::Result<T, DefenceError>;

/// Top-level error type for all defence simulation errors.
///
/// Power denial, empty target sets and stale timer firings are normal
/// gated outcomes handled inside the tick loop; they never surface
/// through this type.
#[derive(Debug, Error)]
pub enum DefenceError {
    /// Failed to parse the block catalog data.
    #[error("Failed to parse block catalog: {0}")]
    CatalogParseError(String),

    /// A catalog entry failed validation at load time.
    #[error("Invalid catalog entry '{kind}': {message}")]
    CatalogValidationError {
        /// Block kind that failed validation.
        kind: String,
        /// What was wrong with it.
        message: String,
    },

    /// Invalid block-entity reference.
    #[error("Block entity not found: {0}")]
    BlockNotFound(u64),

    /// Invalid tower reference.
    #[error("Tower not found: {0}")]
    TowerNotFound(TowerId),

    /// A block was assigned to a tower while already belonging to another.
    #[error("Block entity {block} already belongs to tower {tower}")]
    BlockAlreadyOwned {
        /// The contested block entity.
        block: u64,
        /// The tower that already owns it.
        tower: TowerId,
    },

    /// Invalid simulation state.
    #[error("Invalid simulation state: {0}")]
    InvalidState(String),
}
