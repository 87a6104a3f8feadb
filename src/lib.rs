// ============================================================================
// furnitrack - Order Workflow Engine & Inventory Consumption Coordinator
// ============================================================================
//
// The lifecycle core of a multi-role furniture operations system: a typed
// order-workflow state machine (FULL assembly and SPARE fulfillment
// sequences, a PARTIAL side-state) coupled with an inventory consumption
// coordinator that decrements a shared part pool atomically. Persistence,
// auth, HTTP and rendering are external collaborators behind the store
// traits and the `WorkflowService` surface.
//
// ============================================================================

pub mod analytics;
pub mod domain;
pub mod metrics;
pub mod service;
pub mod store;
pub mod utils;

pub use analytics::{aggregate, pct, AnalyticsSnapshot};
pub use domain::inventory::{
    AcceptError, AcceptOutcome, ConsumptionLine, ConsumptionRequest, PoolEntry, Shortfall,
};
pub use domain::order::{
    classify::classify, ActorRole, DeliveryStatus, LineItem, LineItemError, Order, OrderType,
    Stage, TransitionError,
};
pub use service::{WorkflowError, WorkflowService};
pub use store::{InMemoryStore, InventoryStore, OrderStore, StoreError};
