// ============================================================================
// Inventory Domain - Shared Part Pool & Consumption
// ============================================================================
//
// Pool entries are shared across concurrently-processed orders and are the
// only resource any two orders contend for. All mutation goes through the
// consumption coordinator's atomic decrement; nothing else writes the pool.
//
// ============================================================================

pub mod coordinator;
pub mod errors;
pub mod pool;

// Re-export for convenience
pub use coordinator::InventoryConsumptionCoordinator;
pub use errors::AcceptError;
pub use pool::*;
