use std::sync::Arc;

use uuid::Uuid;

use crate::domain::order::aggregate::Order;
use crate::domain::order::errors::TransitionError;
use crate::domain::order::value_objects::{ActorRole, Stage};
use crate::domain::order::{catalog, transitions};
use crate::metrics::Metrics;
use crate::store::{ConsumeLine, InventoryStore, OrderStore, StoreError};
use crate::utils::retry::{retry_with_backoff, RetryConfig, RetryResult};

use super::errors::AcceptError;
use super::pool::{AcceptOutcome, ConsumptionRequest, Shortfall};

// ============================================================================
// Inventory Consumption Coordinator
// ============================================================================
//
// The production-accept / warehouse-collect operation. Matches requested
// per-part quantities against the shared pool, decrements atomically, and
// routes the order to the acceptance target (all lines satisfied) or to
// PARTIAL (any shortfall). Satisfiable lines are all-or-nothing per line but
// independent across lines: an unsatisfiable line never blocks the others
// and never triggers a partial decrement of its own.
//
// Concurrency: consumption is planned against a snapshot of availability
// and committed with an expected-availability check. A losing call re-reads
// updated availability and re-evaluates satisfiability once; a line still
// short after the retry is reported as a shortfall, not an error. The order
// write is the linearization point: a call that consumed but then lost the
// order version race to a duplicate accept credits its units back to the
// pool and settles as the no-op success.
//
// ============================================================================

pub struct InventoryConsumptionCoordinator {
    orders: Arc<dyn OrderStore>,
    pool: Arc<dyn InventoryStore>,
    metrics: Arc<Metrics>,
    retry: RetryConfig,
}

/// Outcome of one plan-and-consume attempt.
struct ConsumptionPlan {
    shortfalls: Vec<Shortfall>,
    /// The decrements actually applied; credited back if the order write
    /// loses its race.
    consumed: Vec<ConsumeLine>,
    consumed_quantity: u32,
}

/// How the stage write settled against concurrent writers on the order.
enum PersistOutcome {
    Applied(Order),
    /// A concurrent accept marked the order accepted first; this call's
    /// consumption must be handed back to the pool.
    AlreadyAccepted(Order),
    /// The order moved to a stage no accept can act on.
    StageMovedAway(Order),
}

impl InventoryConsumptionCoordinator {
    pub fn new(
        orders: Arc<dyn OrderStore>,
        pool: Arc<dyn InventoryStore>,
        metrics: Arc<Metrics>,
    ) -> Self {
        Self {
            orders,
            pool,
            metrics,
            retry: RetryConfig::optimistic(),
        }
    }

    /// Accept an order against the shared pool.
    pub async fn accept(
        &self,
        order_id: Uuid,
        request: &ConsumptionRequest,
        role: ActorRole,
    ) -> Result<AcceptOutcome, AcceptError> {
        if request.lines.is_empty() {
            return Err(AcceptError::EmptyRequest);
        }
        for line in &request.lines {
            if line.requested_quantity == 0 {
                return Err(AcceptError::ZeroQuantityLine {
                    part_name: line.part_name.clone(),
                });
            }
        }

        let order = self
            .orders
            .get(order_id)
            .await?
            .ok_or(AcceptError::OrderNotFound(order_id))?;

        let target = catalog::acceptance_target(order.order_type);

        // Repeating an accept on an already-accepted order is a no-op
        // success; the pool must not be decremented twice.
        if order.accepted {
            tracing::info!(
                order_id = %order_id,
                stage = %order.stage,
                "Accept repeated on accepted order, nothing to do"
            );
            self.metrics.record_accept("noop", 0, 0);
            return Ok(AcceptOutcome {
                order_id,
                stage: order.stage,
                shortfalls: vec![],
                consumed_quantity: 0,
                already_accepted: true,
            });
        }

        self.check_eligibility(&order, target, role)?;

        let plan = match retry_with_backoff(self.retry.clone(), |_attempt| {
            self.plan_and_consume(request)
        })
        .await
        {
            RetryResult::Success(plan) => plan,
            // Still racing after the internal retry: decrement nothing and
            // report live availability as shortfall for manual resolution.
            RetryResult::Failed(StoreError::AvailabilityChanged { .. }) => {
                self.shortfall_everything(request).await?
            }
            RetryResult::Failed(err) => return Err(err.into()),
        };

        let stage = if plan.shortfalls.is_empty() {
            target
        } else {
            Stage::Partial
        };

        let persisted = match self.persist_stage(order, stage).await? {
            PersistOutcome::Applied(order) => order,
            // A duplicate concurrent accept won the order record between our
            // eligibility check and the write. One logical acceptance must
            // decrement the pool exactly once, so our consumption is handed
            // back and the duplicate settles as the no-op success path.
            PersistOutcome::AlreadyAccepted(current) => {
                self.credit_back(&plan, request).await?;
                tracing::info!(
                    order_id = %order_id,
                    stage = %current.stage,
                    credited = plan.consumed_quantity,
                    "Duplicate concurrent accept lost the order write, pool credited back"
                );
                self.metrics.record_accept("noop", 0, 0);
                return Ok(AcceptOutcome {
                    order_id,
                    stage: current.stage,
                    shortfalls: vec![],
                    consumed_quantity: 0,
                    already_accepted: true,
                });
            }
            PersistOutcome::StageMovedAway(current) => {
                self.credit_back(&plan, request).await?;
                return Err(AcceptError::InvalidStageForAcceptance {
                    stage: current.stage,
                });
            }
        };

        if plan.shortfalls.is_empty() {
            tracing::info!(
                order_id = %order_id,
                stage = %stage,
                consumed = plan.consumed_quantity,
                "✅ Accepted order, all lines satisfied"
            );
            self.metrics
                .record_accept("accepted", plan.consumed_quantity as u64, 0);
        } else {
            tracing::warn!(
                order_id = %order_id,
                shortfall_lines = plan.shortfalls.len(),
                consumed = plan.consumed_quantity,
                "Order accepted partially, routing to PARTIAL"
            );
            self.metrics.record_accept(
                "partial",
                plan.consumed_quantity as u64,
                plan.shortfalls.len() as u64,
            );
        }
        self.metrics
            .record_transition(order_type_label(persisted.order_type), stage.as_str());

        Ok(AcceptOutcome {
            order_id,
            stage: persisted.stage,
            shortfalls: plan.shortfalls,
            consumed_quantity: plan.consumed_quantity,
            already_accepted: false,
        })
    }

    /// The order must sit in its type's awaiting-acceptance stage, or in
    /// PARTIAL for a retried accept, and the actor must be authorized for
    /// the target stage.
    fn check_eligibility(
        &self,
        order: &Order,
        target: Stage,
        role: ActorRole,
    ) -> Result<(), AcceptError> {
        let eligible = catalog::acceptance_eligible(order.order_type);

        match order.stage {
            s if s == eligible => {
                // Regular acceptance is the next-stage transition; the
                // validator covers both ordering and authorization.
                transitions::validate(order.order_type, s, target, role)?;
                Ok(())
            }
            Stage::Partial => {
                // Resolving PARTIAL back into the sequence is coordinator
                // territory; only the role check applies.
                if !catalog::role_may_set(role, target) {
                    return Err(TransitionError::ForbiddenTransition {
                        role,
                        requested: target,
                    }
                    .into());
                }
                Ok(())
            }
            stage => Err(AcceptError::InvalidStageForAcceptance { stage }),
        }
    }

    /// Snapshot availability per line, then atomically decrement all
    /// satisfiable lines. A concurrent decrement between snapshot and commit
    /// surfaces as `AvailabilityChanged`.
    async fn plan_and_consume(
        &self,
        request: &ConsumptionRequest,
    ) -> Result<ConsumptionPlan, StoreError> {
        let location = request.location.as_deref();
        let mut satisfiable = Vec::new();
        let mut shortfalls = Vec::new();
        let mut consumed_quantity = 0u32;

        for line in &request.lines {
            let entries = self.pool.entries_for_part(&line.part_name, location).await?;
            let available: u32 = entries.iter().map(|e| e.quantity_on_hand).sum();

            if available >= line.requested_quantity {
                satisfiable.push(ConsumeLine {
                    part_name: line.part_name.clone(),
                    quantity: line.requested_quantity,
                    expected_available: available,
                });
                consumed_quantity += line.requested_quantity;
            } else {
                shortfalls.push(Shortfall {
                    part_name: line.part_name.clone(),
                    requested: line.requested_quantity,
                    available,
                });
            }
        }

        if !satisfiable.is_empty() {
            self.pool
                .consume_exact(&satisfiable, location)
                .await
                .map_err(|err| {
                    if matches!(err, StoreError::AvailabilityChanged { .. }) {
                        self.metrics.availability_conflicts.inc();
                    }
                    err
                })?;
        }

        Ok(ConsumptionPlan {
            shortfalls,
            consumed: satisfiable,
            consumed_quantity,
        })
    }

    /// Hand an abandoned plan's decrements back to the pool.
    async fn credit_back(
        &self,
        plan: &ConsumptionPlan,
        request: &ConsumptionRequest,
    ) -> Result<(), StoreError> {
        if plan.consumed.is_empty() {
            return Ok(());
        }
        self.pool
            .credit_exact(&plan.consumed, request.location.as_deref())
            .await
    }

    /// Fallback when the pool kept moving through the retry: report live
    /// availability for every line, decrement nothing.
    async fn shortfall_everything(
        &self,
        request: &ConsumptionRequest,
    ) -> Result<ConsumptionPlan, StoreError> {
        let location = request.location.as_deref();
        let mut shortfalls = Vec::with_capacity(request.lines.len());

        for line in &request.lines {
            let entries = self.pool.entries_for_part(&line.part_name, location).await?;
            let available: u32 = entries.iter().map(|e| e.quantity_on_hand).sum();
            shortfalls.push(Shortfall {
                part_name: line.part_name.clone(),
                requested: line.requested_quantity,
                available,
            });
        }

        Ok(ConsumptionPlan {
            shortfalls,
            consumed: vec![],
            consumed_quantity: 0,
        })
    }

    /// Persist the routed stage with a compare-and-set on the order version.
    /// A concurrent transition on the same order invalidates the eligibility
    /// we checked, so a lost write is re-read once and re-verified; a
    /// superseding writer is reported back so the caller can undo its
    /// consumption.
    async fn persist_stage(&self, mut order: Order, stage: Stage) -> Result<PersistOutcome, AcceptError> {
        for attempt in 0..2 {
            let expected_version = order.version;
            let mut updated = order.clone();
            updated.apply_stage(stage);
            if stage != Stage::Partial {
                updated.accepted = true;
            }

            match self.orders.update(expected_version, updated.clone()).await {
                Ok(()) => return Ok(PersistOutcome::Applied(updated)),
                Err(StoreError::VersionConflict { .. }) if attempt == 0 => {
                    self.metrics.version_conflicts.inc();
                    order = self
                        .orders
                        .get(order.id)
                        .await?
                        .ok_or(AcceptError::OrderNotFound(order.id))?;
                    if order.accepted {
                        return Ok(PersistOutcome::AlreadyAccepted(order));
                    }
                    if !matches!(order.stage, s if s == catalog::acceptance_eligible(order.order_type) || s == Stage::Partial)
                    {
                        return Ok(PersistOutcome::StageMovedAway(order));
                    }
                }
                Err(err) => return Err(err.into()),
            }
        }
        unreachable!("second persist attempt returns")
    }
}

pub(crate) fn order_type_label(order_type: crate::domain::order::value_objects::OrderType) -> &'static str {
    match order_type {
        crate::domain::order::value_objects::OrderType::Full => "FULL",
        crate::domain::order::value_objects::OrderType::Spare => "SPARE",
    }
}

// ============================================================================
// Unit Tests
// ============================================================================
