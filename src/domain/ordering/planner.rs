use std::collections::HashSet;

use super::errors::OrderingError;
use super::value_objects::RecordId;

// ============================================================================
// Range Move Planner
// ============================================================================
//
// Turns a drag-and-drop delta into the window of ids whose orders get
// rewritten and the record whose current order seeds the new values.
// No I/O happens here; the engine resolves the anchor inside its transaction.
//
// ============================================================================

/// Record whose persisted order becomes the base of the rewritten window.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Anchor {
    /// The record the request was made against (downward moves).
    MovedRecord,
    /// A window member resolved by id (upward moves).
    Record(RecordId),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WindowPlan {
    /// Ids in the order they must receive `base, base + 1, ...`.
    pub ids: Vec<RecordId>,
    pub anchor: Anchor,
}

/// Plan a drag-and-drop move. Returns `None` when nothing moved.
///
/// The client slice reflects the arrangement after the drop, so the record
/// that sat at the top of the window beforehand is the moved record when
/// moving down and `visible_ids[lo + 1]` when moving up.
pub fn plan_range_move(
    visible_ids: &[RecordId],
    old_index: usize,
    new_index: usize,
) -> Result<Option<WindowPlan>, OrderingError> {
    let len = visible_ids.len();
    for index in [old_index, new_index] {
        if index >= len {
            return Err(OrderingError::IndexOutOfRange {
                index: index as i64,
                len,
            });
        }
    }

    if old_index == new_index {
        return Ok(None);
    }

    let lo = old_index.min(new_index);
    let hi = old_index.max(new_index);
    let ids = visible_ids[lo..=hi].to_vec();

    let mut seen = HashSet::with_capacity(ids.len());
    if let Some(duplicate) = ids.iter().find(|id| !seen.insert(**id)) {
        return Err(OrderingError::MalformedCommand(format!(
            "record {} appears more than once in the reordered window",
            duplicate
        )));
    }

    let anchor = if new_index > old_index {
        Anchor::MovedRecord
    } else {
        Anchor::Record(visible_ids[lo + 1])
    };

    Ok(Some(WindowPlan { ids, anchor }))
}

// ============================================================================
// Unit Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn ids(raw: &[i64]) -> Vec<RecordId> {
        raw.iter().copied().map(RecordId).collect()
    }

    #[test]
    fn test_downward_move_anchors_on_moved_record() {
        // A (id 1) dragged from index 0 to index 2: client now shows B, C, A, D, E
        let visible = ids(&[2, 3, 1, 4, 5]);
        let plan = plan_range_move(&visible, 0, 2).unwrap().unwrap();

        assert_eq!(plan.ids, ids(&[2, 3, 1]));
        assert_eq!(plan.anchor, Anchor::MovedRecord);
    }

    #[test]
    fn test_upward_move_anchors_on_second_window_member() {
        // D (id 4) dragged from index 3 to index 1: client now shows A, D, B, C, E
        let visible = ids(&[1, 4, 2, 3, 5]);
        let plan = plan_range_move(&visible, 3, 1).unwrap().unwrap();

        assert_eq!(plan.ids, ids(&[4, 2, 3]));
        assert_eq!(plan.anchor, Anchor::Record(RecordId(2)));
    }

    #[test]
    fn test_adjacent_upward_move() {
        let visible = ids(&[7, 6]);
        let plan = plan_range_move(&visible, 1, 0).unwrap().unwrap();

        assert_eq!(plan.ids, ids(&[7, 6]));
        assert_eq!(plan.anchor, Anchor::Record(RecordId(6)));
    }

    #[test]
    fn test_same_position_is_noop() {
        let visible = ids(&[1, 2, 3]);
        assert_eq!(plan_range_move(&visible, 1, 1).unwrap(), None);
    }

    #[test]
    fn test_out_of_range_positions_rejected() {
        let visible = ids(&[1, 2, 3]);

        let err = plan_range_move(&visible, 0, 3).unwrap_err();
        assert!(matches!(err, OrderingError::IndexOutOfRange { index: 3, len: 3 }));

        let err = plan_range_move(&visible, 5, 1).unwrap_err();
        assert!(matches!(err, OrderingError::IndexOutOfRange { index: 5, len: 3 }));
    }

    #[test]
    fn test_empty_window_rejected() {
        let err = plan_range_move(&[], 0, 0).unwrap_err();
        assert!(matches!(err, OrderingError::IndexOutOfRange { index: 0, len: 0 }));
    }

    #[test]
    fn test_duplicate_ids_in_window_rejected() {
        let visible = ids(&[1, 2, 1, 4]);
        let err = plan_range_move(&visible, 0, 2).unwrap_err();
        assert!(matches!(err, OrderingError::MalformedCommand(_)));
    }

    #[test]
    fn test_duplicates_outside_window_are_ignored() {
        let visible = ids(&[1, 2, 3, 1]);
        let plan = plan_range_move(&visible, 0, 1).unwrap().unwrap();
        assert_eq!(plan.ids, ids(&[1, 2]));
    }
}
