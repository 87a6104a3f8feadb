use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::domain::order::aggregate::Order;
use crate::domain::order::value_objects::Stage;

// ============================================================================
// Analytics Aggregator - Read-Side Rollups
// ============================================================================
//
// Deterministic function of an order snapshot; never an independent source
// of truth and never cached. The dashboards (sales charts, superadmin
// overview) consume this output as-is. BTreeMaps keep iteration order stable
// for rendering and tests.
//
// ============================================================================

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StaffStats {
    /// Orders currently assigned to this worker.
    pub orders: u64,
    /// Dispatched orders this worker carried.
    pub completed: u64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProductStats {
    /// Orders containing this product.
    pub orders: u64,
    /// Units of this product across all orders.
    pub total_quantity: u64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AnalyticsSnapshot {
    pub total_orders: u64,
    pub dispatched: u64,
    pub open: u64,
    pub on_hold: u64,
    /// Share of orders dispatched, 0.0 when the snapshot is empty.
    pub dispatch_rate: f64,
    pub per_staff: BTreeMap<String, StaffStats>,
    pub per_product: BTreeMap<String, ProductStats>,
}

/// Percentage helper: `a` of `b`, 0.0 when `b` is zero. Never divides by
/// zero, never panics.
pub fn pct(a: u64, b: u64) -> f64 {
    if b > 0 {
        (a as f64 / b as f64) * 100.0
    } else {
        0.0
    }
}

/// Fold an order snapshot into dashboard rollups.
pub fn aggregate(orders: &[Order]) -> AnalyticsSnapshot {
    let mut snapshot = AnalyticsSnapshot::default();

    for order in orders {
        snapshot.total_orders += 1;

        match order.stage {
            Stage::Dispatched => snapshot.dispatched += 1,
            Stage::Partial => {
                snapshot.open += 1;
                snapshot.on_hold += 1;
            }
            _ => snapshot.open += 1,
        }

        if let Some(worker) = &order.assigned_worker {
            let stats = snapshot.per_staff.entry(worker.clone()).or_default();
            stats.orders += 1;
            if order.stage == Stage::Dispatched {
                stats.completed += 1;
            }
        }

        for line in &order.line_items {
            let stats = snapshot
                .per_product
                .entry(line.product_name.clone())
                .or_default();
            stats.orders += 1;
            stats.total_quantity += line.quantity as u64;
        }
    }

    snapshot.dispatch_rate = pct(snapshot.dispatched, snapshot.total_orders);
    snapshot
}

// ============================================================================
// Unit Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::order::value_objects::{LineItem, OrderType};
    use chrono::NaiveDate;

    fn order(stage: Stage, worker: Option<&str>, lines: Vec<LineItem>) -> Order {
        let mut order = Order::create(
            OrderType::Full,
            lines,
            None,
            NaiveDate::from_ymd_opt(2026, 3, 1).unwrap(),
            None,
        )
        .unwrap();
        order.stage = stage;
        order.assigned_worker = worker.map(str::to_string);
        order
    }

    #[test]
    fn test_pct_never_divides_by_zero() {
        assert_eq!(pct(0, 0), 0.0);
        assert_eq!(pct(17, 0), 0.0);
        assert_eq!(pct(1, 4), 25.0);
        assert_eq!(pct(4, 4), 100.0);
    }

    #[test]
    fn test_empty_snapshot() {
        let snapshot = aggregate(&[]);
        assert_eq!(snapshot.total_orders, 0);
        assert_eq!(snapshot.dispatch_rate, 0.0);
        assert!(snapshot.per_staff.is_empty());
    }

    #[test]
    fn test_dispatched_vs_open_counts() {
        let orders = vec![
            order(Stage::Dispatched, None, vec![LineItem::new("chair", 1)]),
            order(Stage::Partial, None, vec![LineItem::new("chair", 1)]),
            order(Stage::FittingInProgress, None, vec![LineItem::new("chair", 1)]),
            order(Stage::Dispatched, None, vec![LineItem::new("chair", 1)]),
        ];

        let snapshot = aggregate(&orders);
        assert_eq!(snapshot.total_orders, 4);
        assert_eq!(snapshot.dispatched, 2);
        assert_eq!(snapshot.open, 2);
        assert_eq!(snapshot.on_hold, 1);
        assert_eq!(snapshot.dispatch_rate, 50.0);
    }

    #[test]
    fn test_per_staff_completion_counts() {
        let orders = vec![
            order(Stage::Dispatched, Some("mei"), vec![LineItem::new("chair", 1)]),
            order(Stage::FittingCompleted, Some("mei"), vec![LineItem::new("chair", 1)]),
            order(Stage::Dispatched, Some("jonas"), vec![LineItem::new("chair", 1)]),
            // Dispatched but unassigned counts for nobody.
            order(Stage::Dispatched, None, vec![LineItem::new("chair", 1)]),
        ];

        let snapshot = aggregate(&orders);
        assert_eq!(snapshot.per_staff["mei"], StaffStats { orders: 2, completed: 1 });
        assert_eq!(snapshot.per_staff["jonas"], StaffStats { orders: 1, completed: 1 });
        assert_eq!(snapshot.per_staff.len(), 2);
    }

    #[test]
    fn test_per_product_totals_span_multi_line_orders() {
        let orders = vec![
            order(
                Stage::ProductionPending,
                None,
                vec![LineItem::new("oak chair", 2), LineItem::new("headrest", 4)],
            ),
            order(Stage::Dispatched, None, vec![LineItem::new("oak chair", 3)]),
        ];

        let snapshot = aggregate(&orders);
        assert_eq!(
            snapshot.per_product["oak chair"],
            ProductStats { orders: 2, total_quantity: 5 }
        );
        assert_eq!(
            snapshot.per_product["headrest"],
            ProductStats { orders: 1, total_quantity: 4 }
        );
    }

    #[test]
    fn test_aggregate_is_deterministic() {
        let orders = vec![
            order(Stage::Dispatched, Some("mei"), vec![LineItem::new("b", 1)]),
            order(Stage::Partial, Some("ada"), vec![LineItem::new("a", 2)]),
        ];
        assert_eq!(aggregate(&orders), aggregate(&orders));
    }
}
