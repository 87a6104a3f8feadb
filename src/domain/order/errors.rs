use super::value_objects::{ActorRole, OrderType, Stage};

// ============================================================================
// Order Business Rule Errors
// ============================================================================
//
// Rejections carry the current stage, requested stage and role so the UI can
// render an actionable message instead of a generic failure. None of these
// are retried automatically.
//
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TransitionError {
    #[error("order is dispatched and immutable (requested {requested})")]
    TerminalState { requested: Stage },

    #[error("cannot move backwards from {current} to {requested}")]
    RegressionRejected { current: Stage, requested: Stage },

    #[error("cannot skip from {current} to {requested}")]
    SkipRejected { current: Stage, requested: Stage },

    #[error("role {role:?} may not set stage {requested}")]
    ForbiddenTransition { role: ActorRole, requested: Stage },

    #[error("stage {requested} does not belong to the {order_type:?} workflow")]
    StageNotInWorkflow {
        order_type: OrderType,
        requested: Stage,
    },
}

impl TransitionError {
    /// Stable machine-readable reason code, used in client payloads and
    /// metric labels.
    pub fn reason_code(&self) -> &'static str {
        match self {
            TransitionError::TerminalState { .. } => "terminal_state",
            TransitionError::RegressionRejected { .. } => "regression_rejected",
            TransitionError::SkipRejected { .. } => "skip_rejected",
            TransitionError::ForbiddenTransition { .. } => "forbidden_transition",
            TransitionError::StageNotInWorkflow { .. } => "stage_not_in_workflow",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LineItemError {
    #[error("order must contain at least one line item")]
    EmptyOrder,

    #[error("invalid line item '{product_name}': quantity {quantity}")]
    InvalidQuantity { product_name: String, quantity: u32 },
}
