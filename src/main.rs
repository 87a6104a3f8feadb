use std::sync::Arc;

use chrono::{Duration, Utc};
use futures_util::future::join_all;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use furnitrack::domain::inventory::pool::{ConsumptionLine, ConsumptionRequest, PoolEntry};
use furnitrack::domain::order::value_objects::{ActorRole, LineItem, OrderType, Stage};
use furnitrack::metrics::Metrics;
use furnitrack::service::WorkflowService;
use furnitrack::store::{InMemoryStore, InventoryStore, OrderStore};
use furnitrack::utils::clock::SystemClock;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize structured logging with environment-based filtering
    // Default to INFO level, can be overridden with RUST_LOG env var
    // Example: RUST_LOG=debug cargo run
    tracing_subscriber::registry()
        .with(fmt::layer().with_target(true))
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("info,furnitrack=debug")),
        )
        .init();

    tracing::info!("🚀 Starting furnitrack workflow engine demo");

    let store = Arc::new(InMemoryStore::new());
    let metrics = Arc::new(Metrics::new()?);
    let service = WorkflowService::new(
        store.clone() as Arc<dyn OrderStore>,
        store.clone() as Arc<dyn InventoryStore>,
        metrics.clone(),
        Arc::new(SystemClock),
    );

    // === 1. Seed the shared part pool (warehouse receiving) ===
    tracing::info!("Seeding part pool");
    for entry in [
        PoolEntry::new("oak frame", "production floor", 8),
        PoolEntry::new("gas lift", "production floor", 8),
        PoolEntry::new("bolt", "warehouse east", 5),
        PoolEntry::new("caster wheel", "warehouse east", 12),
    ] {
        service.add_pool_entry(entry).await?;
    }

    let today = Utc::now().date_naive();

    // === 2. FULL order: production -> fitting -> dispatch ===
    let chair_order = service
        .create_order(
            OrderType::Full,
            vec![LineItem::new("oak dining chair", 4)],
            Some("atelier nord".to_string()),
            today,
            Some(today + Duration::days(14)),
        )
        .await?;
    tracing::info!(order_id = %chair_order.id, "✅ FULL order placed");

    service
        .set_stage(chair_order.id, Stage::ProductionInProgress, ActorRole::Production)
        .await?;

    // Production accepts the job, consuming frames and lifts.
    let outcome = service
        .accept(
            chair_order.id,
            &ConsumptionRequest::new(vec![
                ConsumptionLine::new("oak frame", 4),
                ConsumptionLine::new("gas lift", 4),
            ])
            .at_location("production floor"),
            ActorRole::Production,
        )
        .await?;
    tracing::info!(stage = %outcome.stage, consumed = outcome.consumed_quantity, "Production accept settled");

    for (stage, role) in [
        (Stage::FittingInProgress, ActorRole::Fitting),
        (Stage::FittingCompleted, ActorRole::Fitting),
        (Stage::ReadyForDispatch, ActorRole::Fitting),
        (Stage::Dispatched, ActorRole::Sales),
    ] {
        service.set_stage(chair_order.id, stage, role).await?;
    }
    tracing::info!(order_id = %chair_order.id, "✅ FULL order dispatched");

    // === 3. SPARE orders racing over one pool entry ===
    let mut spare_ids = Vec::new();
    for _ in 0..2 {
        let order = service
            .create_order(
                OrderType::Spare,
                vec![LineItem::new("bolt", 3)],
                Some("northside depot".to_string()),
                today,
                Some(today + Duration::days(3)),
            )
            .await?;
        spare_ids.push(order.id);
    }

    let request = ConsumptionRequest::new(vec![ConsumptionLine::new("bolt", 3)]);
    let results = join_all(
        spare_ids
            .iter()
            .map(|id| service.accept(*id, &request, ActorRole::Warehouse)),
    )
    .await;

    for (id, result) in spare_ids.iter().zip(results) {
        let outcome = result?;
        if outcome.is_full_acceptance() {
            tracing::info!(order_id = %id, "✅ Spare order collected");
        } else {
            tracing::warn!(
                order_id = %id,
                shortfalls = ?outcome.shortfalls,
                "Spare order on hold awaiting restock"
            );
        }
    }

    // === 4. Restock and recover the on-hold order ===
    service
        .add_pool_entry(PoolEntry::new("bolt", "warehouse east", 10))
        .await?;
    for id in &spare_ids {
        let order = service.order(*id).await?;
        if order.stage == Stage::Partial {
            let outcome = service.accept(*id, &request, ActorRole::Warehouse).await?;
            tracing::info!(order_id = %id, stage = %outcome.stage, "✅ On-hold order recovered after restock");
        }
    }

    // === 5. Read-side: classification and rollups ===
    for id in spare_ids.iter().chain([chair_order.id].iter()) {
        let order = service.order(*id).await?;
        tracing::info!(
            order_id = %id,
            stage = %order.stage,
            status = ?service.classify_status(&order),
            "Order status"
        );
    }

    let snapshot = service.aggregate().await?;
    tracing::info!(
        total = snapshot.total_orders,
        dispatched = snapshot.dispatched,
        open = snapshot.open,
        dispatch_rate = snapshot.dispatch_rate,
        "📊 Analytics snapshot"
    );
    tracing::info!(
        "📊 Metrics registry carries {} series",
        metrics.registry().gather().len()
    );

    tracing::info!("🎉 Demo complete!");
    Ok(())
}
