use std::sync::Arc;

use chrono::NaiveDate;
use uuid::Uuid;

use crate::analytics::{self, AnalyticsSnapshot};
use crate::domain::inventory::coordinator::{order_type_label, InventoryConsumptionCoordinator};
use crate::domain::inventory::errors::AcceptError;
use crate::domain::inventory::pool::{AcceptOutcome, ConsumptionRequest, PoolEntry};
use crate::domain::order::aggregate::Order;
use crate::domain::order::classify;
use crate::domain::order::errors::{LineItemError, TransitionError};
use crate::domain::order::transitions::{self, TransitionOutcome};
use crate::domain::order::value_objects::{ActorRole, DeliveryStatus, LineItem, OrderType, Stage};
use crate::metrics::Metrics;
use crate::store::{InventoryStore, OrderStore, StoreError};
use crate::utils::clock::Clock;

// ============================================================================
// Workflow Service - The Engine's External Surface
// ============================================================================
//
// Thin orchestration over the domain rules: every surrounding screen (API
// handlers, exports, dashboards) talks to this service and nothing else.
// Stage changes are linearized per order by a compare-and-set on the order
// version, so the validator always judges the true current stage; a lost
// write is re-read and re-validated once before giving up.
//
// ============================================================================

#[derive(Debug, thiserror::Error)]
pub enum WorkflowError {
    #[error("order not found: {0}")]
    OrderNotFound(Uuid),

    #[error(transparent)]
    Rejected(#[from] TransitionError),

    #[error(transparent)]
    InvalidLineItems(#[from] LineItemError),

    #[error("store error: {0}")]
    Store(#[from] StoreError),
}

pub struct WorkflowService {
    orders: Arc<dyn OrderStore>,
    pool: Arc<dyn InventoryStore>,
    coordinator: InventoryConsumptionCoordinator,
    metrics: Arc<Metrics>,
    clock: Arc<dyn Clock>,
}

impl WorkflowService {
    pub fn new(
        orders: Arc<dyn OrderStore>,
        pool: Arc<dyn InventoryStore>,
        metrics: Arc<Metrics>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        let coordinator =
            InventoryConsumptionCoordinator::new(orders.clone(), pool.clone(), metrics.clone());
        Self {
            orders,
            pool,
            coordinator,
            metrics,
            clock,
        }
    }

    /// Create an order at the first stage of its type's sequence.
    pub async fn create_order(
        &self,
        order_type: OrderType,
        line_items: Vec<LineItem>,
        vendor: Option<String>,
        order_date: NaiveDate,
        delivery_date: Option<NaiveDate>,
    ) -> Result<Order, WorkflowError> {
        let order = Order::create(order_type, line_items, vendor, order_date, delivery_date)?;
        self.orders.insert(order.clone()).await?;

        tracing::info!(
            order_id = %order.id,
            order_type = order_type_label(order.order_type),
            stage = %order.stage,
            lines = order.line_items.len(),
            "Order created"
        );

        Ok(order)
    }

    /// Request a stage change on behalf of an actor. Rejections carry the
    /// current stage, requested stage and reason code for the client.
    pub async fn set_stage(
        &self,
        order_id: Uuid,
        requested: Stage,
        role: ActorRole,
    ) -> Result<Order, WorkflowError> {
        // One internal retry: a concurrent transition bumps the version, so
        // the loser re-reads and re-validates against the fresh stage.
        for attempt in 0..2 {
            let order = self
                .orders
                .get(order_id)
                .await?
                .ok_or(WorkflowError::OrderNotFound(order_id))?;

            let outcome = transitions::validate(order.order_type, order.stage, requested, role)
                .map_err(|err| {
                    self.metrics.record_rejection(err.reason_code());
                    tracing::warn!(
                        order_id = %order_id,
                        current = %order.stage,
                        requested = %requested,
                        role = ?role,
                        reason = err.reason_code(),
                        "Stage change rejected"
                    );
                    err
                })?;

            if outcome == TransitionOutcome::NoOp {
                return Ok(order);
            }

            let expected_version = order.version;
            let mut updated = order;
            updated.apply_stage(requested);

            match self.orders.update(expected_version, updated.clone()).await {
                Ok(()) => {
                    self.metrics
                        .record_transition(order_type_label(updated.order_type), requested.as_str());
                    tracing::info!(
                        order_id = %order_id,
                        stage = %requested,
                        role = ?role,
                        "Stage applied"
                    );
                    return Ok(updated);
                }
                Err(StoreError::VersionConflict { .. }) if attempt == 0 => {
                    self.metrics.version_conflicts.inc();
                    continue;
                }
                Err(err) => return Err(err.into()),
            }
        }
        unreachable!("second set_stage attempt returns")
    }

    /// Stock-consuming acceptance; see the coordinator for the algorithm.
    pub async fn accept(
        &self,
        order_id: Uuid,
        request: &ConsumptionRequest,
        role: ActorRole,
    ) -> Result<AcceptOutcome, AcceptError> {
        self.coordinator.accept(order_id, request, role).await
    }

    /// Derived display status against the injected clock.
    pub fn classify_status(&self, order: &Order) -> DeliveryStatus {
        classify::classify(order, self.clock.today())
    }

    /// Derived display status against an explicit date.
    pub fn classify_at(&self, order: &Order, today: NaiveDate) -> DeliveryStatus {
        classify::classify(order, today)
    }

    /// Dashboard rollups over the current order snapshot.
    pub async fn aggregate(&self) -> Result<AnalyticsSnapshot, WorkflowError> {
        let orders = self.orders.list().await?;
        let snapshot = analytics::aggregate(&orders);
        self.metrics.orders_on_hold.set(snapshot.on_hold as i64);
        Ok(snapshot)
    }

    /// Hand the in-progress work to a named worker; drives the per-staff
    /// rollups.
    pub async fn assign_worker(
        &self,
        order_id: Uuid,
        worker: impl Into<String>,
    ) -> Result<Order, WorkflowError> {
        let worker = worker.into();
        for attempt in 0..2 {
            let order = self
                .orders
                .get(order_id)
                .await?
                .ok_or(WorkflowError::OrderNotFound(order_id))?;

            let expected_version = order.version;
            let mut updated = order;
            updated.assigned_worker = Some(worker.clone());
            updated.version += 1;

            match self.orders.update(expected_version, updated.clone()).await {
                Ok(()) => return Ok(updated),
                Err(StoreError::VersionConflict { .. }) if attempt == 0 => {
                    self.metrics.version_conflicts.inc();
                    continue;
                }
                Err(err) => return Err(err.into()),
            }
        }
        unreachable!("second assign_worker attempt returns")
    }

    pub async fn order(&self, order_id: Uuid) -> Result<Order, WorkflowError> {
        self.orders
            .get(order_id)
            .await?
            .ok_or(WorkflowError::OrderNotFound(order_id))
    }

    /// Seed a pool entry; in production restocking belongs to the
    /// warehouse-receiving workflow, which owns pool creation.
    pub async fn add_pool_entry(&self, entry: PoolEntry) -> Result<(), WorkflowError> {
        self.pool.insert_entry(entry).await?;
        Ok(())
    }
}

// ============================================================================
// Unit Tests
// ============================================================================
