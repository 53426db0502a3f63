use super::value_objects::{Direction, RecordId};

// ============================================================================
// Reorder Commands - Represent user intent
// ============================================================================
//
// Decided once by the HTTP adapter. `record` is the already-authorized record
// the request was made against.
//
// ============================================================================

#[derive(Debug, Clone, PartialEq)]
pub enum ReorderCommand {
    /// Nudge the record one slot up or down.
    Direction {
        record: RecordId,
        direction: Direction,
    },
    /// Exchange order values with another record.
    Swap {
        record: RecordId,
        other: RecordId,
    },
    /// Drag-and-drop: `visible_ids` is the client's list after the drop, or any
    /// part of it that covers both indices.
    RangeMove {
        record: RecordId,
        visible_ids: Vec<RecordId>,
        old_index: usize,
        new_index: usize,
    },
}

impl ReorderCommand {
    pub fn record(&self) -> RecordId {
        match self {
            ReorderCommand::Direction { record, .. }
            | ReorderCommand::Swap { record, .. }
            | ReorderCommand::RangeMove { record, .. } => *record,
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            ReorderCommand::Direction { .. } => "direction",
            ReorderCommand::Swap { .. } => "swap",
            ReorderCommand::RangeMove { .. } => "range_move",
        }
    }
}
