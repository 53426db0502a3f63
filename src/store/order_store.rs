use async_trait::async_trait;

use crate::domain::ordering::{Direction, OrderedRecord, OrderingScope, RecordId};

// ============================================================================
// Persistence Port
// ============================================================================
//
// One `OrderTransaction` per command. `OrderStore::begin` returns only after
// the scope's exclusive lock is held, so every read the engine makes inside
// the transaction stays valid until commit. Dropping a transaction without
// committing discards its writes.
//
// ============================================================================

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Order values overflow: cannot assign {count} orders from base {base}")]
    OrderOverflow { base: i64, count: usize },
}

#[async_trait]
pub trait OrderStore: Send + Sync {
    /// Open a transaction on `scope`, waiting for its exclusive lock.
    async fn begin(&self, scope: &OrderingScope) -> Result<Box<dyn OrderTransaction>, StoreError>;
}

#[async_trait]
pub trait OrderTransaction: Send {
    /// Resolve a record anywhere in the table.
    async fn resolve_by_id(&mut self, id: RecordId) -> Result<Option<OrderedRecord>, StoreError>;

    /// Closest record of the same group with a lower (`Up`) or higher (`Down`) order.
    async fn neighbour(
        &mut self,
        record: &OrderedRecord,
        direction: Direction,
    ) -> Result<Option<OrderedRecord>, StoreError>;

    async fn set_order(&mut self, id: RecordId, order: i64) -> Result<(), StoreError>;

    /// Assign `base, base + 1, ...` to `ids` in that order.
    /// Returns the ids that were actually updated.
    async fn assign_contiguous_orders(
        &mut self,
        ids: &[RecordId],
        base: i64,
    ) -> Result<Vec<RecordId>, StoreError>;

    async fn commit(self: Box<Self>) -> Result<(), StoreError>;
}

/// The order values `ids` receive when assigned contiguously from `base`.
pub fn contiguous_orders(ids: &[RecordId], base: i64) -> Result<Vec<i64>, StoreError> {
    let overflow = || StoreError::OrderOverflow { base, count: ids.len() };
    (0..ids.len())
        .map(|offset| {
            i64::try_from(offset)
                .ok()
                .and_then(|offset| base.checked_add(offset))
                .ok_or_else(overflow)
        })
        .collect()
}
