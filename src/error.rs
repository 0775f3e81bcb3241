use thiserror::Error;

use crate::core::reconcile::ReconcileError;
use crate::external::generator::GenerationError;
use crate::schema::batch::BatchError;

/// Failures surfaced to callers of the story operations.
///
/// Unreachable illustrations are not here: they always resolve to a
/// placeholder.
#[derive(Debug, Error)]
pub enum StoryError {
    #[error("invalid input: {0}")]
    InvalidInput(#[from] BatchError),
    #[error("external generation failed: {0}")]
    ExternalGeneration(#[from] GenerationError),
    #[error("reconciliation failed: {0}")]
    Reconciliation(#[from] ReconcileError),
}
