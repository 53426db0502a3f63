// ============================================================================
// HTTP Module - Inbound adapter for reorder requests
// ============================================================================
//
// Decodes the admin UI payload into a ReorderCommand, hands it to the
// OrderingEngine and maps the outcome to a status code.
//
// ============================================================================

// Private module declarations
mod payload;
mod server;

// Re-export for public API
pub use server::{start_server, AppState};
