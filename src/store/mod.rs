use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::inventory::pool::PoolEntry;
use crate::domain::order::aggregate::Order;

pub mod memory;

pub use memory::InMemoryStore;

// ============================================================================
// Store Traits - Persistence Collaborator Interface
// ============================================================================
//
// The persistence technology is an external collaborator; the engine only
// needs atomic per-entity read-modify-write. Both traits use optimistic
// concurrency: order writes carry an expected version, and pool consumption
// carries the availability observed at snapshot time. A stale write aborts
// and the caller re-reads and re-evaluates instead of decrementing blind.
//
// The in-memory implementation in `memory` is the reference store and the
// test substrate.
//
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StoreError {
    #[error("order not found: {0}")]
    OrderNotFound(Uuid),

    #[error("version conflict on order {id}: expected {expected}, current {actual}")]
    VersionConflict {
        id: Uuid,
        expected: i64,
        actual: i64,
    },

    #[error("availability changed for part '{part_name}': expected {expected}, current {actual}")]
    AvailabilityChanged {
        part_name: String,
        expected: u32,
        actual: u32,
    },
}

/// One planned pool decrement, pinned to the availability the planner saw.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConsumeLine {
    pub part_name: String,
    pub quantity: u32,
    /// Total on-hand quantity observed when the line was planned. The
    /// consume aborts if the pool moved underneath the plan.
    pub expected_available: u32,
}

#[async_trait]
pub trait OrderStore: Send + Sync {
    async fn insert(&self, order: Order) -> Result<(), StoreError>;

    async fn get(&self, id: Uuid) -> Result<Option<Order>, StoreError>;

    /// Snapshot of all orders, oldest first.
    async fn list(&self) -> Result<Vec<Order>, StoreError>;

    /// Compare-and-set write: persists `order` only while the stored version
    /// still equals `expected_version`.
    async fn update(&self, expected_version: i64, order: Order) -> Result<(), StoreError>;
}

#[async_trait]
pub trait InventoryStore: Send + Sync {
    async fn insert_entry(&self, entry: PoolEntry) -> Result<(), StoreError>;

    /// Entries matching a part name, optionally scoped to a location,
    /// ascending by entry id so decrement order is reproducible.
    async fn entries_for_part(
        &self,
        part_name: &str,
        location: Option<&str>,
    ) -> Result<Vec<PoolEntry>, StoreError>;

    /// Decrement every line in one atomic transaction. If any line's current
    /// availability no longer matches `expected_available`, nothing is
    /// decremented and the first mismatch is returned as
    /// [`StoreError::AvailabilityChanged`].
    async fn consume_exact(
        &self,
        lines: &[ConsumeLine],
        location: Option<&str>,
    ) -> Result<(), StoreError>;

    /// Hand consumed quantities back to the pool after an abandoned
    /// acceptance. Each line is credited onto its lowest-id matching entry;
    /// a part with no remaining entry gets a fresh one.
    async fn credit_exact(
        &self,
        lines: &[ConsumeLine],
        location: Option<&str>,
    ) -> Result<(), StoreError>;
}
