// ============================================================================
// Store - Persistence port for order mutations
// ============================================================================
//
// The engine only talks to the traits in `order_store`. Adapters:
// - postgres: sqlx/PgPool, advisory transaction lock per table
// - memory:   in-process tables for tests
//
// ============================================================================

// Private module declarations
mod order_store;
mod postgres;
#[cfg(test)]
pub(crate) mod memory;

// Re-export for public API
pub use order_store::{OrderStore, OrderTransaction, StoreError};
pub use postgres::PgOrderStore;
