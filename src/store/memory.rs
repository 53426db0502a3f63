use async_trait::async_trait;
use std::collections::{BTreeMap, HashMap};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use tokio::sync::{Mutex as AsyncMutex, OwnedMutexGuard};

use super::order_store::{contiguous_orders, OrderStore, OrderTransaction, StoreError};
use crate::domain::ordering::{Direction, OrderedRecord, OrderingScope, RecordId};

// ============================================================================
// In-Memory Order Store (tests)
// ============================================================================
//
// One async mutex per table plays the part of the scope lock: a transaction
// owns the guard until it is committed or dropped. Writes go to a staged copy
// and replace the table only on commit.
//
// ============================================================================

type Table = BTreeMap<RecordId, OrderedRecord>;

#[derive(Default)]
pub struct MemoryOrderStore {
    tables: Mutex<HashMap<String, Arc<AsyncMutex<Table>>>>,
    commits: Arc<AtomicUsize>,
}

impl MemoryOrderStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed `table` with `(id, order, group)` rows.
    pub fn with_rows(self, table: &str, rows: &[(i64, i64, Option<&str>)]) -> Self {
        let seeded: Table = rows
            .iter()
            .map(|(id, order, group)| {
                let record = OrderedRecord {
                    id: RecordId(*id),
                    order: *order,
                    group: group.map(str::to_string),
                };
                (record.id, record)
            })
            .collect();

        self.table(table).try_lock().expect("fresh table is unlocked").extend(seeded);
        self
    }

    /// Current `id -> order` mapping of a table.
    pub async fn orders(&self, table: &str) -> BTreeMap<i64, i64> {
        let handle = self.table(table);
        let rows = handle.lock().await;
        rows.values().map(|r| (r.id.0, r.order)).collect()
    }

    pub fn commit_count(&self) -> usize {
        self.commits.load(Ordering::SeqCst)
    }

    fn table(&self, name: &str) -> Arc<AsyncMutex<Table>> {
        let mut tables = self.tables.lock().expect("table map poisoned");
        tables.entry(name.to_string()).or_default().clone()
    }
}

#[async_trait]
impl OrderStore for MemoryOrderStore {
    async fn begin(&self, scope: &OrderingScope) -> Result<Box<dyn OrderTransaction>, StoreError> {
        let guard = self.table(scope.table()).lock_owned().await;
        let staged = guard.clone();

        Ok(Box::new(MemoryTransaction {
            guard,
            staged,
            commits: self.commits.clone(),
        }))
    }
}

pub struct MemoryTransaction {
    guard: OwnedMutexGuard<Table>,
    staged: Table,
    commits: Arc<AtomicUsize>,
}

#[async_trait]
impl OrderTransaction for MemoryTransaction {
    async fn resolve_by_id(&mut self, id: RecordId) -> Result<Option<OrderedRecord>, StoreError> {
        Ok(self.staged.get(&id).cloned())
    }

    async fn neighbour(
        &mut self,
        record: &OrderedRecord,
        direction: Direction,
    ) -> Result<Option<OrderedRecord>, StoreError> {
        let same_group = self.staged.values().filter(|r| r.group == record.group);

        let found = match direction {
            Direction::Up => same_group.filter(|r| r.order < record.order).max_by_key(|r| r.order),
            Direction::Down => same_group.filter(|r| r.order > record.order).min_by_key(|r| r.order),
        };
        Ok(found.cloned())
    }

    async fn set_order(&mut self, id: RecordId, order: i64) -> Result<(), StoreError> {
        if let Some(row) = self.staged.get_mut(&id) {
            row.order = order;
        }
        Ok(())
    }

    async fn assign_contiguous_orders(
        &mut self,
        ids: &[RecordId],
        base: i64,
    ) -> Result<Vec<RecordId>, StoreError> {
        let orders = contiguous_orders(ids, base)?;
        let mut updated = Vec::with_capacity(ids.len());

        for (id, order) in ids.iter().zip(orders) {
            if let Some(row) = self.staged.get_mut(id) {
                row.order = order;
                updated.push(*id);
            }
        }
        Ok(updated)
    }

    async fn commit(self: Box<Self>) -> Result<(), StoreError> {
        let MemoryTransaction { mut guard, staged, commits } = *self;
        *guard = staged;
        commits.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}
