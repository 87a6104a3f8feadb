use super::catalog;
use super::errors::TransitionError;
use super::value_objects::{ActorRole, OrderType, Stage};

// ============================================================================
// Transition Validator - Workflow Legality Policy
// ============================================================================
//
// Pure policy evaluation: given the order's type, its true current stage and
// a requested stage, accept or reject. The workflow is monotonic forward;
// the only permitted excursion is into PARTIAL and back out through
// READY_FOR_DISPATCH / DISPATCHED. Called by both the direct stage-set path
// and the inventory consumption coordinator.
//
// ============================================================================

/// What an accepted transition means for the caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransitionOutcome {
    /// The order moves to the requested stage.
    Advance,
    /// Re-confirming the current stage; nothing to persist. Supports
    /// idempotent client retries.
    NoOp,
}

/// Evaluate a requested stage change. No side effects.
pub fn validate(
    order_type: OrderType,
    current: Stage,
    requested: Stage,
    role: ActorRole,
) -> Result<TransitionOutcome, TransitionError> {
    // A dispatched order is immutable; even DISPATCHED -> DISPATCHED rejects.
    if current.is_terminal() {
        return Err(TransitionError::TerminalState { requested });
    }

    if requested == Stage::Partial {
        authorize(role, requested)?;
        // Re-confirming PARTIAL is the same idempotent retry as
        // re-confirming an in-sequence stage.
        if current == Stage::Partial {
            return Ok(TransitionOutcome::NoOp);
        }
        return Ok(TransitionOutcome::Advance);
    }

    // Recovery out of PARTIAL goes straight to the dispatch tail; resuming
    // the regular sequence happens through the coordinator's accept.
    if current == Stage::Partial {
        if !matches!(requested, Stage::ReadyForDispatch | Stage::Dispatched) {
            return Err(TransitionError::SkipRejected { current, requested });
        }
        authorize(role, requested)?;
        return Ok(TransitionOutcome::Advance);
    }

    let requested_idx = catalog::index_of(order_type, requested).ok_or(
        TransitionError::StageNotInWorkflow {
            order_type,
            requested,
        },
    )?;
    // current stage always belongs to the sequence once Partial and terminal
    // stages are handled above
    let current_idx = catalog::index_of(order_type, current).ok_or(
        TransitionError::StageNotInWorkflow {
            order_type,
            requested: current,
        },
    )?;

    if requested_idx < current_idx {
        return Err(TransitionError::RegressionRejected { current, requested });
    }

    if requested_idx == current_idx {
        authorize(role, requested)?;
        return Ok(TransitionOutcome::NoOp);
    }

    // Jumps of more than one stage would hide pipeline steps from the audit
    // trail.
    if requested_idx > current_idx + 1 {
        return Err(TransitionError::SkipRejected { current, requested });
    }

    authorize(role, requested)?;
    Ok(TransitionOutcome::Advance)
}

fn authorize(role: ActorRole, requested: Stage) -> Result<(), TransitionError> {
    if catalog::role_may_set(role, requested) {
        Ok(())
    } else {
        Err(TransitionError::ForbiddenTransition { role, requested })
    }
}

// ============================================================================
// Unit Tests
// ============================================================================
