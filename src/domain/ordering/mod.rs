// ============================================================================
// Ordering Domain - Reordering of persisted, ordered records
// ============================================================================
//
// This module contains ALL ordering-specific code:
// - Value objects (RecordId, Direction, OrderingScope, SortableResource)
// - Commands (ReorderCommand)
// - Errors (OrderingError enum)
// - Registry (resource name -> SortableResource)
// - Planner (window + anchor computation for drag-and-drop moves)
// - Engine (OrderingEngine, executes commands against the store)
//
// ============================================================================

pub mod value_objects;
pub mod commands;
pub mod errors;
pub mod registry;
pub mod planner;
pub mod engine;

// Re-export for convenience
pub use value_objects::*;
pub use commands::*;
pub use errors::*;
pub use registry::*;
pub use engine::*;
