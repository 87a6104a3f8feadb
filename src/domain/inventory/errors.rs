use uuid::Uuid;

use crate::domain::order::errors::TransitionError;
use crate::domain::order::value_objects::Stage;
use crate::store::StoreError;

// ============================================================================
// Consumption Coordinator Errors
// ============================================================================
//
// Precondition failures surfaced to the caller as typed values. A shortfall
// is NOT among them: a partial acceptance is a successful AcceptOutcome
// carrying stage = PARTIAL. None of these auto-retry.
//
// ============================================================================

#[derive(Debug, thiserror::Error)]
pub enum AcceptError {
    #[error("order not found: {0}")]
    OrderNotFound(Uuid),

    #[error("order is in stage {stage}, which is not eligible for acceptance")]
    InvalidStageForAcceptance { stage: Stage },

    #[error("consumption request contains no lines")]
    EmptyRequest,

    #[error("requested quantity for '{part_name}' must be greater than zero")]
    ZeroQuantityLine { part_name: String },

    #[error(transparent)]
    Rejected(#[from] TransitionError),

    #[error("store error: {0}")]
    Store(#[from] StoreError),
}
