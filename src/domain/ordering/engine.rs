use std::sync::Arc;
use std::time::Instant;

use crate::metrics::Metrics;
use crate::store::{OrderStore, OrderTransaction};

use super::commands::ReorderCommand;
use super::errors::OrderingError;
use super::planner::{plan_range_move, Anchor};
use super::value_objects::{Direction, OrderedRecord, RecordId, SortableResource};

// ============================================================================
// Ordering Engine
// ============================================================================
//
// Orchestrates: Command → Store transaction (scope lock) → Order writes
//
// Each command resolves and writes inside a single transaction and commits
// only when every step succeeded. Returning early drops the transaction,
// which discards anything written so far.
//
// ============================================================================

pub struct OrderingEngine {
    store: Arc<dyn OrderStore>,
    metrics: Arc<Metrics>,
}

impl OrderingEngine {
    pub fn new(store: Arc<dyn OrderStore>, metrics: Arc<Metrics>) -> Self {
        Self { store, metrics }
    }

    /// Execute a reorder command against `resource`.
    pub async fn execute(
        &self,
        resource: &SortableResource,
        command: ReorderCommand,
    ) -> Result<(), OrderingError> {
        let kind = command.kind();
        let record = command.record();
        let started = Instant::now();

        let result = match command {
            ReorderCommand::Direction { record, direction } => {
                self.reorder_by_direction(resource, record, direction).await
            }
            ReorderCommand::Swap { record, other } => {
                self.reorder_by_swap(resource, record, other).await
            }
            ReorderCommand::RangeMove {
                record,
                visible_ids,
                old_index,
                new_index,
            } => {
                self.reorder_by_range(resource, record, &visible_ids, old_index, new_index)
                    .await
            }
        };

        let elapsed = started.elapsed().as_secs_f64();
        match result {
            Ok(reassigned) => {
                self.metrics.record_command(kind, elapsed, reassigned);
                tracing::info!(
                    resource = %resource.name,
                    record_id = %record,
                    kind = kind,
                    reassigned = reassigned,
                    "✅ Reorder applied"
                );
                Ok(())
            }
            Err(error) => {
                self.metrics.record_failure(kind, error.reason(), elapsed);
                tracing::warn!(
                    resource = %resource.name,
                    record_id = %record,
                    kind = kind,
                    error = %error,
                    "Reorder rejected"
                );
                Err(error)
            }
        }
    }

    /// Swap the record's order with its closest neighbour in `direction`.
    async fn reorder_by_direction(
        &self,
        resource: &SortableResource,
        record: RecordId,
        direction: Direction,
    ) -> Result<usize, OrderingError> {
        if !resource.step_moves {
            return Err(OrderingError::UnsupportedModel {
                model: resource.model.clone(),
            });
        }

        let mut tx = self.store.begin(&resource.scope).await?;
        let current = resolve(tx.as_mut(), record).await?;

        let Some(neighbour) = tx.neighbour(&current, direction).await? else {
            tracing::debug!(
                record_id = %record,
                direction = direction.as_str(),
                "Record already at the edge of its scope"
            );
            return Ok(0);
        };

        tx.set_order(current.id, neighbour.order).await?;
        tx.set_order(neighbour.id, current.order).await?;
        tx.commit().await?;

        Ok(2)
    }

    /// Exchange order values with another record of the same table.
    async fn reorder_by_swap(
        &self,
        resource: &SortableResource,
        record: RecordId,
        other: RecordId,
    ) -> Result<usize, OrderingError> {
        let mut tx = self.store.begin(&resource.scope).await?;
        let current = resolve(tx.as_mut(), record).await?;
        let other = resolve(tx.as_mut(), other).await?;

        if current.id == other.id {
            return Ok(0);
        }

        tx.set_order(current.id, other.order).await?;
        tx.set_order(other.id, current.order).await?;
        tx.commit().await?;

        Ok(2)
    }

    /// Rewrite the dragged window with contiguous orders from its anchor.
    async fn reorder_by_range(
        &self,
        resource: &SortableResource,
        record: RecordId,
        visible_ids: &[RecordId],
        old_index: usize,
        new_index: usize,
    ) -> Result<usize, OrderingError> {
        let Some(plan) = plan_range_move(visible_ids, old_index, new_index)? else {
            tracing::debug!(record_id = %record, index = old_index, "Dropped at original position");
            return Ok(0);
        };

        let mut tx = self.store.begin(&resource.scope).await?;
        let moved = resolve(tx.as_mut(), record).await?;

        let base = match plan.anchor {
            Anchor::MovedRecord => moved.order,
            Anchor::Record(id) => resolve(tx.as_mut(), id).await?.order,
        };

        tracing::debug!(
            table = %resource.scope.table(),
            order_column = %resource.scope.order_column_name(),
            base = base,
            window = plan.ids.len(),
            "Reassigning window orders"
        );

        let updated = tx.assign_contiguous_orders(&plan.ids, base).await?;
        if let Some(missing) = plan.ids.iter().find(|id| !updated.contains(id)) {
            return Err(OrderingError::NotFound(*missing));
        }

        tx.commit().await?;
        Ok(plan.ids.len())
    }
}

async fn resolve(
    tx: &mut dyn OrderTransaction,
    id: RecordId,
) -> Result<OrderedRecord, OrderingError> {
    tx.resolve_by_id(id).await?.ok_or(OrderingError::NotFound(id))
}

// ============================================================================
// Unit Tests
// ============================================================================
