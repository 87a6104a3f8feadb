use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::catalog;
use super::errors::LineItemError;
use super::line_items;
use super::value_objects::{LineItem, OrderType, Stage};

// ============================================================================
// Order - The Unit of Work
// ============================================================================
//
// An order is created at the first stage of its type's sequence and is only
// ever mutated through validator-approved stage changes or through the
// inventory consumption coordinator. The `version` field backs optimistic
// concurrency in the store: concurrent transitions on one order are
// serialized by compare-and-set on it, so the validator always evaluates
// against the true current stage.
//
// ============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Order {
    // Identity
    pub id: Uuid,
    pub order_type: OrderType,

    // Current state
    pub stage: Stage,
    pub line_items: Vec<LineItem>,
    pub version: i64,
    /// Set once a stock-consuming accept fully succeeded; repeated accepts
    /// become no-op successes.
    pub accepted: bool,

    // Scheduling
    pub order_date: NaiveDate,
    pub delivery_date: Option<NaiveDate>,

    // Assignment and routing
    pub assigned_worker: Option<String>,
    /// Opaque reference to the recipient entity; its shape is owned by the
    /// vendor screens, not by the lifecycle core.
    pub vendor: Option<String>,

    // Audit trail
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Order {
    /// Create a new order at the first stage of its type's sequence.
    /// Line items are validated before anything is constructed.
    pub fn create(
        order_type: OrderType,
        line_items: Vec<LineItem>,
        vendor: Option<String>,
        order_date: NaiveDate,
        delivery_date: Option<NaiveDate>,
    ) -> Result<Self, LineItemError> {
        line_items::validate(&line_items)?;

        let now = Utc::now();
        Ok(Self {
            id: Uuid::new_v4(),
            order_type,
            stage: catalog::initial_stage(order_type),
            line_items,
            version: 0,
            accepted: false,
            order_date,
            delivery_date,
            assigned_worker: None,
            vendor,
            created_at: now,
            updated_at: now,
        })
    }

    /// Order-level total quantity across all lines.
    pub fn total_quantity(&self) -> u32 {
        line_items::total_quantity(&self.line_items)
    }

    /// Apply an already-validated stage change, bumping version and audit
    /// timestamp. Stage legality lives in the transition validator, not here.
    pub fn apply_stage(&mut self, stage: Stage) {
        self.stage = stage;
        self.version += 1;
        self.updated_at = Utc::now();
    }
}

// ============================================================================
// Unit Tests
// ============================================================================
