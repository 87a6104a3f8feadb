use prometheus::{IntCounter, IntCounterVec, IntGauge, Opts, Registry};

// ============================================================================
// Metrics Module - Prometheus metrics for observability
// ============================================================================
//
// Provides metrics for:
// - Stage transitions (applied and rejected, by reason)
// - Accept outcomes (accepted / partial / noop)
// - Inventory units consumed
// - Lost optimistic races on pool availability and order versions
//
// All metrics are registered with a Registry the embedding API layer can
// scrape; the engine itself serves no HTTP.
//
// ============================================================================

/// Central metrics registry for the workflow engine
pub struct Metrics {
    registry: Registry,

    // Transition metrics
    pub transitions_applied: IntCounterVec,
    pub transitions_rejected: IntCounterVec,

    // Accept metrics
    pub accept_outcomes: IntCounterVec,
    pub inventory_units_consumed: IntCounter,
    pub shortfall_lines: IntCounter,

    // Concurrency metrics
    pub availability_conflicts: IntCounter,
    pub version_conflicts: IntCounter,

    // Snapshot gauges
    pub orders_on_hold: IntGauge,
}

impl Metrics {
    pub fn new() -> anyhow::Result<Self> {
        let registry = Registry::new();

        let transitions_applied = IntCounterVec::new(
            Opts::new("transitions_applied_total", "Stage transitions applied"),
            &["order_type", "stage"],
        )?;
        registry.register(Box::new(transitions_applied.clone()))?;

        let transitions_rejected = IntCounterVec::new(
            Opts::new("transitions_rejected_total", "Stage transitions rejected"),
            &["reason"],
        )?;
        registry.register(Box::new(transitions_rejected.clone()))?;

        let accept_outcomes = IntCounterVec::new(
            Opts::new("accept_outcomes_total", "Consumption accept outcomes"),
            &["outcome"],
        )?;
        registry.register(Box::new(accept_outcomes.clone()))?;

        let inventory_units_consumed = IntCounter::new(
            "inventory_units_consumed_total",
            "Units decremented from the shared part pool",
        )?;
        registry.register(Box::new(inventory_units_consumed.clone()))?;

        let shortfall_lines = IntCounter::new(
            "shortfall_lines_total",
            "Request lines the pool could not satisfy",
        )?;
        registry.register(Box::new(shortfall_lines.clone()))?;

        let availability_conflicts = IntCounter::new(
            "availability_conflicts_total",
            "Pool consume attempts that lost an optimistic race",
        )?;
        registry.register(Box::new(availability_conflicts.clone()))?;

        let version_conflicts = IntCounter::new(
            "order_version_conflicts_total",
            "Order writes that lost an optimistic race",
        )?;
        registry.register(Box::new(version_conflicts.clone()))?;

        let orders_on_hold = IntGauge::new(
            "orders_on_hold",
            "Orders currently parked in the PARTIAL side-state",
        )?;
        registry.register(Box::new(orders_on_hold.clone()))?;

        Ok(Self {
            registry,
            transitions_applied,
            transitions_rejected,
            accept_outcomes,
            inventory_units_consumed,
            shortfall_lines,
            availability_conflicts,
            version_conflicts,
            orders_on_hold,
        })
    }

    /// Get the Prometheus registry for exposing metrics upstream
    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    /// Helper to record an applied transition
    pub fn record_transition(&self, order_type: &str, stage: &str) {
        self.transitions_applied
            .with_label_values(&[order_type, stage])
            .inc();
    }

    /// Helper to record a rejected transition
    pub fn record_rejection(&self, reason: &str) {
        self.transitions_rejected.with_label_values(&[reason]).inc();
    }

    /// Helper to record an accept outcome with the units it consumed
    pub fn record_accept(&self, outcome: &str, units_consumed: u64, shortfall_lines: u64) {
        self.accept_outcomes.with_label_values(&[outcome]).inc();
        self.inventory_units_consumed.inc_by(units_consumed);
        self.shortfall_lines.inc_by(shortfall_lines);
    }
}

impl Default for Metrics {
    fn default() -> Self {
        Self::new().expect("Failed to create metrics")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_metrics_creation() {
        let metrics = Metrics::new().unwrap();
        assert!(metrics.registry.gather().len() > 0);
    }

    #[test]
    fn test_record_transition() {
        let metrics = Metrics::new().unwrap();
        metrics.record_transition("FULL", "PRODUCTION_IN_PROGRESS");

        let gathered = metrics.registry.gather();
        let applied = gathered
            .iter()
            .find(|m| m.name() == "transitions_applied_total")
            .unwrap();
        assert_eq!(applied.metric[0].counter.value, Some(1.0));
    }

    #[test]
    fn test_record_accept_counts_units_and_shortfalls() {
        let metrics = Metrics::new().unwrap();
        metrics.record_accept("accepted", 5, 0);
        metrics.record_accept("partial", 2, 1);

        let gathered = metrics.registry.gather();
        let units = gathered
            .iter()
            .find(|m| m.name() == "inventory_units_consumed_total")
            .unwrap();
        assert_eq!(units.metric[0].counter.value, Some(7.0));

        let shortfalls = gathered
            .iter()
            .find(|m| m.name() == "shortfall_lines_total")
            .unwrap();
        assert_eq!(shortfalls.metric[0].counter.value, Some(1.0));
    }

    #[test]
    fn test_record_rejection_by_reason() {
        let metrics = Metrics::new().unwrap();
        metrics.record_rejection("terminal_state");
        metrics.record_rejection("terminal_state");
        metrics.record_rejection("skip_rejected");

        let gathered = metrics.registry.gather();
        let rejected = gathered
            .iter()
            .find(|m| m.name() == "transitions_rejected_total")
            .unwrap();
        assert_eq!(rejected.metric.len(), 2); // two distinct reasons
    }
}
