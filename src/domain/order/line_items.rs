use super::errors::LineItemError;
use super::value_objects::LineItem;

// ============================================================================
// Line Item Aggregator
// ============================================================================
//
// Multi-line orders share a single order-level stage; partial progress is
// only ever expressed through the order-level PARTIAL state. This is a
// deliberate simplification carried over from the source system.
//
// ============================================================================

/// Order-level total quantity across all lines.
pub fn total_quantity(lines: &[LineItem]) -> u32 {
    lines.iter().map(|l| l.quantity).sum()
}

/// Validate per-line data before any mutation happens.
///
/// A blank product name and a zero quantity are both reported as
/// [`LineItemError::InvalidQuantity`] carrying the offending line.
pub fn validate(lines: &[LineItem]) -> Result<(), LineItemError> {
    if lines.is_empty() {
        return Err(LineItemError::EmptyOrder);
    }

    for line in lines {
        if line.quantity == 0 || line.product_name.trim().is_empty() {
            return Err(LineItemError::InvalidQuantity {
                product_name: line.product_name.clone(),
                quantity: line.quantity,
            });
        }
    }

    Ok(())
}

// ============================================================================
// Unit Tests
// ============================================================================
