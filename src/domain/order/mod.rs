// ============================================================================
// Order Domain - Workflow Rules for the Order Lifecycle
// ============================================================================
//
// This module contains ALL order-specific code:
// - Value objects (OrderType, Stage, ActorRole, LineItem, DeliveryStatus)
// - Stage catalog (the two workflow sequences + permitted actors)
// - Transition validator (monotonic forward policy)
// - Delay classifier (derived display status)
// - Line item aggregator (per-line validation + order totals)
// - Errors (TransitionError, LineItemError)
// - Aggregate (the Order entity)
//
// Stock consumption lives in `domain::inventory`; these rules stay pure.
//
// ============================================================================

pub mod aggregate;
pub mod catalog;
pub mod classify;
pub mod errors;
pub mod line_items;
pub mod transitions;
pub mod value_objects;

// Re-export for convenience
pub use aggregate::*;
pub use errors::*;
pub use transitions::{validate, TransitionOutcome};
pub use value_objects::*;
