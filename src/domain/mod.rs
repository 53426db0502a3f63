// ============================================================================
// Domain Layer - Business Logic
// ============================================================================
//
// This module contains domain-specific logic for reordering records.
// Each aggregate has its own subdirectory with:
// - Value objects
// - Commands
// - Errors
// - Planner (pure computation)
// - Engine (command handler)
//
// Persistence is reached only through the port in crate::store.
//
// ============================================================================

pub mod ordering;
