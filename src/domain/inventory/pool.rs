use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::order::value_objects::Stage;

// ============================================================================
// Inventory Pool Value Objects
// ============================================================================
//
// Pool entries are the only resource shared across concurrently-processed
// orders. They are created and restocked by warehouse-receiving workflows
// outside this core and decremented only by the consumption coordinator.
//
// ============================================================================

/// One pooled stock record for a part at a location.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PoolEntry {
    pub id: Uuid,
    pub part_name: String,
    pub location: String,
    pub quantity_on_hand: u32,
}

impl PoolEntry {
    pub fn new(part_name: impl Into<String>, location: impl Into<String>, quantity: u32) -> Self {
        Self {
            id: Uuid::new_v4(),
            part_name: part_name.into(),
            location: location.into(),
            quantity_on_hand: quantity,
        }
    }
}

/// One requested part line of a consumption request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConsumptionLine {
    pub part_name: String,
    pub requested_quantity: u32,
}

impl ConsumptionLine {
    pub fn new(part_name: impl Into<String>, requested_quantity: u32) -> Self {
        Self {
            part_name: part_name.into(),
            requested_quantity,
        }
    }
}

/// Ephemeral input to the coordinator; never persisted as an entity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConsumptionRequest {
    pub lines: Vec<ConsumptionLine>,
    /// Restrict pool matching to the acting warehouse/production site.
    pub location: Option<String>,
}

impl ConsumptionRequest {
    pub fn new(lines: Vec<ConsumptionLine>) -> Self {
        Self {
            lines,
            location: None,
        }
    }

    pub fn at_location(mut self, location: impl Into<String>) -> Self {
        self.location = Some(location.into());
        self
    }
}

/// Requested-vs-available detail for a line the pool could not satisfy.
/// Returned to the operator for manual resolution; this is data, not an
/// error.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Shortfall {
    pub part_name: String,
    pub requested: u32,
    pub available: u32,
}

/// Result of a coordinator accept call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AcceptOutcome {
    pub order_id: Uuid,
    /// Stage the order sits in after the call.
    pub stage: Stage,
    /// Empty on full acceptance; one record per unsatisfiable line
    /// otherwise.
    pub shortfalls: Vec<Shortfall>,
    /// Total units decremented from the pool by this call.
    pub consumed_quantity: u32,
    /// True when the order had already been accepted and this call changed
    /// nothing.
    pub already_accepted: bool,
}

impl AcceptOutcome {
    /// Every line was satisfied and the order advanced in its sequence.
    pub fn is_full_acceptance(&self) -> bool {
        self.shortfalls.is_empty()
    }
}

// ============================================================================
// Unit Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_builder_scopes_location() {
        let request =
            ConsumptionRequest::new(vec![ConsumptionLine::new("bolt", 3)]).at_location("east bay");
        assert_eq!(request.location.as_deref(), Some("east bay"));
        assert_eq!(request.lines.len(), 1);
    }

    #[test]
    fn test_outcome_with_shortfalls_is_not_full() {
        let outcome = AcceptOutcome {
            order_id: Uuid::new_v4(),
            stage: Stage::Partial,
            shortfalls: vec![Shortfall {
                part_name: "bolt".to_string(),
                requested: 6,
                available: 5,
            }],
            consumed_quantity: 0,
            already_accepted: false,
        };
        assert!(!outcome.is_full_acceptance());
    }

    #[test]
    fn test_pool_entry_serialization_round_trip() {
        let entry = PoolEntry::new("gas lift", "main floor", 12);
        let json = serde_json::to_string(&entry).unwrap();
        let back: PoolEntry = serde_json::from_str(&json).unwrap();
        assert_eq!(entry, back);
    }
}
