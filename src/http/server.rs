use actix_web::error::JsonPayloadError;
use actix_web::http::StatusCode;
use actix_web::{web, App, HttpRequest, HttpResponse, HttpServer, Responder, ResponseError};
use chrono::Utc;
use prometheus::{Encoder, TextEncoder};
use std::sync::Arc;
use tracing::Instrument;
use uuid::Uuid;

use super::payload::ReorderPayload;
use crate::domain::ordering::{OrderingEngine, OrderingError, RecordId, ResourceRegistry};
use crate::metrics::Metrics;

// ============================================================================
// HTTP Adapter
// ============================================================================
//
// POST /sortable/{resource}/{resource_id}  - apply one reorder command
// GET  /metrics                            - Prometheus text format
// GET  /health                             - liveness
//
// ============================================================================

/// Shared state handed to every worker.
pub struct AppState {
    pub engine: OrderingEngine,
    pub registry: ResourceRegistry,
    pub metrics: Arc<Metrics>,
}

/// Register all routes on an app or test service.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.app_data(web::JsonConfig::default().error_handler(reject_unreadable_payload))
        .route("/sortable/{resource}/{resource_id}", web::post().to(reorder_handler))
        .route("/metrics", web::get().to(metrics_handler))
        .route("/health", web::get().to(health_handler));
}

/// Start the HTTP server and run until shutdown
pub async fn start_server(state: web::Data<AppState>, host: &str, port: u16) -> std::io::Result<()> {
    tracing::info!("🚀 Starting sorting server on http://{}:{}", host, port);

    HttpServer::new(move || App::new().app_data(state.clone()).configure(configure))
        .bind((host, port))?
        .run()
        .await
}

async fn reorder_handler(
    path: web::Path<(String, i64)>,
    payload: web::Json<ReorderPayload>,
    state: web::Data<AppState>,
) -> Result<HttpResponse, OrderingError> {
    let (resource_name, resource_id) = path.into_inner();
    let request_id = Uuid::new_v4();
    let span = tracing::info_span!(
        "reorder",
        request_id = %request_id,
        resource = %resource_name,
        record_id = resource_id
    );

    async move {
        let Some(resource) = state.registry.get(&resource_name) else {
            tracing::warn!("Unknown sortable resource");
            return Ok(HttpResponse::NotFound().finish());
        };

        let command = match payload.into_inner().into_command(RecordId(resource_id)) {
            Ok(command) => command,
            Err(error) => {
                state.metrics.record_failure("payload", error.reason(), 0.0);
                tracing::warn!(error = %error, "Rejected reorder payload");
                return Err(error);
            }
        };

        tracing::debug!(kind = command.kind(), "Dispatching reorder command");
        state.engine.execute(resource, command).await?;

        Ok(HttpResponse::Ok().finish())
    }
    .instrument(span)
    .await
}

/// Bodies that are not a JSON object are malformed commands, not actix's default 400.
fn reject_unreadable_payload(err: JsonPayloadError, req: &HttpRequest) -> actix_web::Error {
    let error = OrderingError::MalformedCommand(err.to_string());
    if let Some(state) = req.app_data::<web::Data<AppState>>() {
        state.metrics.record_failure("payload", error.reason(), 0.0);
    }
    tracing::warn!(path = %req.path(), error = %error, "Unreadable reorder payload");
    error.into()
}

async fn metrics_handler(state: web::Data<AppState>) -> impl Responder {
    let encoder = TextEncoder::new();
    let metric_families = state.metrics.registry().gather();

    let mut buffer = Vec::new();
    if let Err(e) = encoder.encode(&metric_families, &mut buffer) {
        tracing::error!("Failed to encode metrics: {}", e);
        return HttpResponse::InternalServerError().finish();
    }

    HttpResponse::Ok()
        .content_type("text/plain; version=0.0.4")
        .body(buffer)
}

async fn health_handler(state: web::Data<AppState>) -> impl Responder {
    HttpResponse::Ok().json(serde_json::json!({
        "status": "healthy",
        "service": "resource-sorting",
        "resources": state.registry.len(),
        "checked_at": Utc::now(),
    }))
}

// ============================================================================
// Error Mapping
// ============================================================================

impl ResponseError for OrderingError {
    fn status_code(&self) -> StatusCode {
        match self {
            OrderingError::MalformedCommand(_) | OrderingError::IndexOutOfRange { .. } => {
                StatusCode::UNPROCESSABLE_ENTITY
            }
            OrderingError::NotFound(_) => StatusCode::NOT_FOUND,
            OrderingError::UnsupportedModel { .. } | OrderingError::Storage(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    fn error_response(&self) -> HttpResponse {
        let mut response = HttpResponse::build(self.status_code());
        match self {
            // Only failure with a body: it names the offending model
            OrderingError::UnsupportedModel { .. } => response
                .content_type("text/plain; charset=utf-8")
                .body(self.to_string()),
            _ => response.finish(),
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
