// ============================================================================
// Domain Layer - Business Logic
// ============================================================================
//
// This module contains the lifecycle engine's domain rules:
// - `order`: stage catalog, transition validator, delay classifier, line
//   item aggregation and the Order entity itself
// - `inventory`: the shared part pool and the consumption coordinator that
//   routes accepts to full or partial acceptance
//
// This layer is completely separate from the store and service plumbing.
//
// ============================================================================

pub mod inventory;
pub mod order;
