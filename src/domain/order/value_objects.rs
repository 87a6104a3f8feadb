use serde::{Deserialize, Serialize};

// ============================================================================
// Order Value Objects
// ============================================================================

/// Workflow family an order belongs to. Immutable after creation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OrderType {
    /// Full-chair assembly: production and fitting before dispatch.
    Full,
    /// Spare-part fulfillment: collected straight from the warehouse.
    Spare,
}

/// Workflow stage keys. The wire form is the fixed SCREAMING_SNAKE string
/// set consumed by every role-specific client.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Stage {
    // FULL sequence
    ProductionPending,
    ProductionInProgress,
    ProductionCompleted,
    FittingInProgress,
    FittingCompleted,
    // SPARE sequence
    OrderPlaced,
    WarehouseCollected,
    // Shared tail
    ReadyForDispatch,
    Dispatched,
    // Side-state: some requested parts were short; resolved manually or by
    // a retried accept.
    Partial,
}

impl Stage {
    pub fn is_terminal(&self) -> bool {
        matches!(self, Stage::Dispatched)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Stage::ProductionPending => "PRODUCTION_PENDING",
            Stage::ProductionInProgress => "PRODUCTION_IN_PROGRESS",
            Stage::ProductionCompleted => "PRODUCTION_COMPLETED",
            Stage::FittingInProgress => "FITTING_IN_PROGRESS",
            Stage::FittingCompleted => "FITTING_COMPLETED",
            Stage::OrderPlaced => "ORDER_PLACED",
            Stage::WarehouseCollected => "WAREHOUSE_COLLECTED",
            Stage::ReadyForDispatch => "READY_FOR_DISPATCH",
            Stage::Dispatched => "DISPATCHED",
            Stage::Partial => "PARTIAL",
        }
    }
}

impl std::fmt::Display for Stage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The five actor roles. Roles arrive already authenticated from the
/// identity layer; the engine only checks authorization per target stage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActorRole {
    Sales,
    Warehouse,
    Fitting,
    Production,
    Superadmin,
}

/// One (product, quantity) line of an order. Legacy single-item orders are
/// a one-element line list, not a separate shape.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LineItem {
    pub product_name: String,
    pub quantity: u32,
}

impl LineItem {
    pub fn new(product_name: impl Into<String>, quantity: u32) -> Self {
        Self {
            product_name: product_name.into(),
            quantity,
        }
    }
}

/// Display status derived from stage + delivery date. Computed fresh on
/// every read, never stored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DeliveryStatus {
    Delayed,
    OnHold,
    Ready,
    Dispatched,
    Processing,
}

// ============================================================================
// Unit Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stage_wire_format_is_screaming_snake() {
        let json = serde_json::to_string(&Stage::ReadyForDispatch).unwrap();
        assert_eq!(json, "\"READY_FOR_DISPATCH\"");

        let parsed: Stage = serde_json::from_str("\"PRODUCTION_IN_PROGRESS\"").unwrap();
        assert_eq!(parsed, Stage::ProductionInProgress);
    }

    #[test]
    fn test_stage_display_matches_wire_format() {
        for stage in [
            Stage::ProductionPending,
            Stage::ProductionInProgress,
            Stage::ProductionCompleted,
            Stage::FittingInProgress,
            Stage::FittingCompleted,
            Stage::OrderPlaced,
            Stage::WarehouseCollected,
            Stage::ReadyForDispatch,
            Stage::Dispatched,
            Stage::Partial,
        ] {
            let json = serde_json::to_string(&stage).unwrap();
            assert_eq!(json, format!("\"{}\"", stage));
        }
    }

    #[test]
    fn test_only_dispatched_is_terminal() {
        assert!(Stage::Dispatched.is_terminal());
        assert!(!Stage::Partial.is_terminal());
        assert!(!Stage::ReadyForDispatch.is_terminal());
    }

    #[test]
    fn test_order_type_serialization() {
        assert_eq!(serde_json::to_string(&OrderType::Full).unwrap(), "\"FULL\"");
        assert_eq!(serde_json::to_string(&OrderType::Spare).unwrap(), "\"SPARE\"");
    }

    #[test]
    fn test_line_item_construction() {
        let line = LineItem::new("oak armrest", 4);
        assert_eq!(line.product_name, "oak armrest");
        assert_eq!(line.quantity, 4);
    }
}
