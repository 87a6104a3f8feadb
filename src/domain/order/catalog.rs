use super::value_objects::{ActorRole, OrderType, Stage};

// ============================================================================
// Stage Catalog - Static Workflow Definitions
// ============================================================================
//
// The two ordered stage sequences (FULL and SPARE) plus the permitted actor
// per target stage. Pure lookup tables; every other component derives its
// legality decisions from here instead of hand-rolled string comparisons.
//
// ============================================================================

/// FULL workflow: chair assembly runs through production and fitting.
pub const FULL_SEQUENCE: [Stage; 7] = [
    Stage::ProductionPending,
    Stage::ProductionInProgress,
    Stage::ProductionCompleted,
    Stage::FittingInProgress,
    Stage::FittingCompleted,
    Stage::ReadyForDispatch,
    Stage::Dispatched,
];

/// SPARE workflow: parts are picked from the warehouse pool.
pub const SPARE_SEQUENCE: [Stage; 4] = [
    Stage::OrderPlaced,
    Stage::WarehouseCollected,
    Stage::ReadyForDispatch,
    Stage::Dispatched,
];

/// Sequence of stages for an order type, in workflow order.
pub fn sequence_for(order_type: OrderType) -> &'static [Stage] {
    match order_type {
        OrderType::Full => &FULL_SEQUENCE,
        OrderType::Spare => &SPARE_SEQUENCE,
    }
}

/// First stage of the sequence; every new order starts here.
pub fn initial_stage(order_type: OrderType) -> Stage {
    sequence_for(order_type)[0]
}

/// Position of a stage within the type's sequence. `None` for Partial and
/// for stages belonging to the other workflow.
pub fn index_of(order_type: OrderType, stage: Stage) -> Option<usize> {
    sequence_for(order_type).iter().position(|s| *s == stage)
}

/// Stage immediately after `stage` in the sequence, if any.
pub fn next_stage(order_type: OrderType, stage: Stage) -> Option<Stage> {
    let idx = index_of(order_type, stage)?;
    sequence_for(order_type).get(idx + 1).copied()
}

/// The stage an order must sit in before a stock-consuming accept.
pub fn acceptance_eligible(order_type: OrderType) -> Stage {
    match order_type {
        OrderType::Full => Stage::ProductionInProgress,
        OrderType::Spare => Stage::OrderPlaced,
    }
}

/// The stage a fully-satisfied accept routes the order to.
pub fn acceptance_target(order_type: OrderType) -> Stage {
    match order_type {
        OrderType::Full => Stage::ProductionCompleted,
        OrderType::Spare => Stage::WarehouseCollected,
    }
}

/// Roles authorized to move an order into `stage`. Superadmin is implicitly
/// authorized everywhere; see [`role_may_set`].
pub fn permitted_roles(stage: Stage) -> &'static [ActorRole] {
    match stage {
        Stage::OrderPlaced => &[ActorRole::Sales],
        Stage::ProductionPending | Stage::ProductionInProgress | Stage::ProductionCompleted => {
            &[ActorRole::Production]
        }
        Stage::FittingInProgress | Stage::FittingCompleted => &[ActorRole::Fitting],
        Stage::WarehouseCollected => &[ActorRole::Warehouse],
        Stage::ReadyForDispatch => &[
            ActorRole::Warehouse,
            ActorRole::Fitting,
            ActorRole::Production,
        ],
        Stage::Dispatched => &[ActorRole::Sales],
        Stage::Partial => &[ActorRole::Production, ActorRole::Warehouse],
    }
}

/// Authorization check for a target stage.
pub fn role_may_set(role: ActorRole, stage: Stage) -> bool {
    role == ActorRole::Superadmin || permitted_roles(stage).contains(&role)
}

// ============================================================================
// Unit Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_both_sequences_start_and_end_correctly() {
        assert_eq!(initial_stage(OrderType::Full), Stage::ProductionPending);
        assert_eq!(initial_stage(OrderType::Spare), Stage::OrderPlaced);
        assert_eq!(*sequence_for(OrderType::Full).last().unwrap(), Stage::Dispatched);
        assert_eq!(*sequence_for(OrderType::Spare).last().unwrap(), Stage::Dispatched);
    }

    #[test]
    fn test_partial_is_outside_both_sequences() {
        assert_eq!(index_of(OrderType::Full, Stage::Partial), None);
        assert_eq!(index_of(OrderType::Spare, Stage::Partial), None);
    }

    #[test]
    fn test_foreign_stage_has_no_index() {
        assert_eq!(index_of(OrderType::Spare, Stage::FittingInProgress), None);
        assert_eq!(index_of(OrderType::Full, Stage::OrderPlaced), None);
    }

    #[test]
    fn test_next_stage_walks_the_sequence() {
        assert_eq!(
            next_stage(OrderType::Full, Stage::FittingCompleted),
            Some(Stage::ReadyForDispatch)
        );
        assert_eq!(
            next_stage(OrderType::Spare, Stage::WarehouseCollected),
            Some(Stage::ReadyForDispatch)
        );
        assert_eq!(next_stage(OrderType::Full, Stage::Dispatched), None);
    }

    #[test]
    fn test_acceptance_stages_are_adjacent() {
        for order_type in [OrderType::Full, OrderType::Spare] {
            assert_eq!(
                next_stage(order_type, acceptance_eligible(order_type)),
                Some(acceptance_target(order_type))
            );
        }
    }

    #[test]
    fn test_role_authorization_table() {
        assert!(role_may_set(ActorRole::Warehouse, Stage::WarehouseCollected));
        assert!(!role_may_set(ActorRole::Sales, Stage::WarehouseCollected));
        assert!(role_may_set(ActorRole::Production, Stage::ProductionCompleted));
        assert!(!role_may_set(ActorRole::Fitting, Stage::ProductionCompleted));
        assert!(role_may_set(ActorRole::Sales, Stage::Dispatched));
        assert!(!role_may_set(ActorRole::Warehouse, Stage::Dispatched));
    }

    #[test]
    fn test_superadmin_may_set_every_stage() {
        for stage in FULL_SEQUENCE.iter().chain(SPARE_SEQUENCE.iter()) {
            assert!(role_may_set(ActorRole::Superadmin, *stage));
        }
        assert!(role_may_set(ActorRole::Superadmin, Stage::Partial));
    }
}
