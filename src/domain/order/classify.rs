use chrono::NaiveDate;

use super::aggregate::Order;
use super::value_objects::{DeliveryStatus, Stage};

// ============================================================================
// Delay Classifier
// ============================================================================
//
// One pure derivation of the display status used by every screen. The source
// of truth is stage + delivery date; the result is recomputed on each read
// so it can never go stale against a persisted order.
//
// Priority order, first match wins:
//   1. past delivery date (day granularity) and not dispatched/on hold -> Delayed
//   2. PARTIAL -> OnHold
//   3. READY_FOR_DISPATCH -> Ready
//   4. DISPATCHED -> Dispatched
//   5. anything else -> Processing
//
// ============================================================================

pub fn classify(order: &Order, today: NaiveDate) -> DeliveryStatus {
    if let Some(delivery_date) = order.delivery_date {
        if delivery_date < today && !matches!(order.stage, Stage::Dispatched | Stage::Partial) {
            return DeliveryStatus::Delayed;
        }
    }

    match order.stage {
        Stage::Partial => DeliveryStatus::OnHold,
        Stage::ReadyForDispatch => DeliveryStatus::Ready,
        Stage::Dispatched => DeliveryStatus::Dispatched,
        _ => DeliveryStatus::Processing,
    }
}

// ============================================================================
// Unit Tests
// ============================================================================
