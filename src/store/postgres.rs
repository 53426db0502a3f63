use async_trait::async_trait;
use sqlx::postgres::{PgPool, Postgres};
use sqlx::{FromRow, Transaction};

use super::order_store::{contiguous_orders, OrderStore, OrderTransaction, StoreError};
use crate::domain::ordering::{Direction, OrderedRecord, OrderingScope, RecordId};

// ============================================================================
// PostgreSQL Order Store
// ============================================================================
//
// Every transaction starts with pg_advisory_xact_lock on the scope's lock key.
// The lock is released by Postgres at commit or rollback, so two commands on
// the same table never interleave their reads and writes.
//
// Table and column names come from validated OrderingScope identifiers; all
// values are bound parameters.
//
// ============================================================================

const LOCK_SCOPE: &str = "SELECT pg_advisory_xact_lock(hashtext($1))";

pub struct PgOrderStore {
    pool: PgPool,
}

impl PgOrderStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl OrderStore for PgOrderStore {
    async fn begin(&self, scope: &OrderingScope) -> Result<Box<dyn OrderTransaction>, StoreError> {
        let mut tx = self.pool.begin().await?;

        sqlx::query(LOCK_SCOPE)
            .bind(scope.lock_key())
            .execute(&mut *tx)
            .await?;

        tracing::debug!(
            table = %scope.table(),
            lock_key = %scope.lock_key(),
            "Acquired ordering scope lock"
        );

        Ok(Box::new(PgOrderTransaction {
            tx,
            scope: scope.clone(),
        }))
    }
}

#[derive(Debug, FromRow)]
struct OrderRow {
    id: i64,
    sort_order: i64,
    scope_group: Option<String>,
}

impl From<OrderRow> for OrderedRecord {
    fn from(row: OrderRow) -> Self {
        Self {
            id: RecordId(row.id),
            order: row.sort_order,
            group: row.scope_group,
        }
    }
}

pub struct PgOrderTransaction {
    tx: Transaction<'static, Postgres>,
    scope: OrderingScope,
}

#[async_trait]
impl OrderTransaction for PgOrderTransaction {
    async fn resolve_by_id(&mut self, id: RecordId) -> Result<Option<OrderedRecord>, StoreError> {
        let sql = select_by_id_sql(&self.scope);
        let row = sqlx::query_as::<_, OrderRow>(&sql)
            .bind(id.0)
            .fetch_optional(&mut *self.tx)
            .await?;

        Ok(row.map(OrderedRecord::from))
    }

    async fn neighbour(
        &mut self,
        record: &OrderedRecord,
        direction: Direction,
    ) -> Result<Option<OrderedRecord>, StoreError> {
        let sql = neighbour_sql(&self.scope, direction);
        let mut query = sqlx::query_as::<_, OrderRow>(&sql).bind(record.order);
        if self.scope.group_column().is_some() {
            query = query.bind(record.group.clone());
        }

        let row = query.fetch_optional(&mut *self.tx).await?;
        Ok(row.map(OrderedRecord::from))
    }

    async fn set_order(&mut self, id: RecordId, order: i64) -> Result<(), StoreError> {
        let sql = set_order_sql(&self.scope);
        sqlx::query(&sql)
            .bind(order)
            .bind(id.0)
            .execute(&mut *self.tx)
            .await?;
        Ok(())
    }

    async fn assign_contiguous_orders(
        &mut self,
        ids: &[RecordId],
        base: i64,
    ) -> Result<Vec<RecordId>, StoreError> {
        let orders = contiguous_orders(ids, base)?;
        let raw_ids: Vec<i64> = ids.iter().map(|id| id.0).collect();

        let sql = assign_orders_sql(&self.scope);
        let updated = sqlx::query_scalar::<_, i64>(&sql)
            .bind(raw_ids)
            .bind(orders)
            .fetch_all(&mut *self.tx)
            .await?;

        Ok(updated.into_iter().map(RecordId).collect())
    }

    async fn commit(self: Box<Self>) -> Result<(), StoreError> {
        let this = *self;
        this.tx.commit().await?;
        Ok(())
    }
}

// ============================================================================
// SQL Builders
// ============================================================================

fn quote(ident: &str) -> String {
    format!("\"{}\"", ident)
}

fn record_columns(scope: &OrderingScope) -> String {
    let group = match scope.group_column() {
        Some(column) => format!("{}::text", quote(column)),
        None => "NULL::text".to_string(),
    };

    format!(
        "{}::bigint AS id, {}::bigint AS sort_order, {} AS scope_group",
        quote(scope.id_column()),
        quote(scope.order_column_name()),
        group
    )
}

fn select_by_id_sql(scope: &OrderingScope) -> String {
    format!(
        "SELECT {} FROM {} WHERE {} = $1 FOR UPDATE",
        record_columns(scope),
        quote(scope.table()),
        quote(scope.id_column())
    )
}

fn neighbour_sql(scope: &OrderingScope, direction: Direction) -> String {
    let order = quote(scope.order_column_name());
    let (comparison, sort) = match direction {
        Direction::Up => ("<", "DESC"),
        Direction::Down => (">", "ASC"),
    };

    let group_filter = match scope.group_column() {
        Some(column) => format!(" AND {}::text IS NOT DISTINCT FROM $2", quote(column)),
        None => String::new(),
    };

    format!(
        "SELECT {} FROM {} WHERE {} {} $1{} ORDER BY {} {} LIMIT 1 FOR UPDATE",
        record_columns(scope),
        quote(scope.table()),
        order,
        comparison,
        group_filter,
        order,
        sort
    )
}

fn set_order_sql(scope: &OrderingScope) -> String {
    format!(
        "UPDATE {} SET {} = $1 WHERE {} = $2",
        quote(scope.table()),
        quote(scope.order_column_name()),
        quote(scope.id_column())
    )
}

fn assign_orders_sql(scope: &OrderingScope) -> String {
    format!(
        "UPDATE {table} AS target SET {order} = v.new_order \
         FROM UNNEST($1::bigint[], $2::bigint[]) AS v(record_id, new_order) \
         WHERE target.{id} = v.record_id \
         RETURNING target.{id}::bigint",
        table = quote(scope.table()),
        order = quote(scope.order_column_name()),
        id = quote(scope.id_column())
    )
}
