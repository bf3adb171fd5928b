use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use tower_http::{
    cors::CorsLayer,
    trace::{DefaultMakeSpan, DefaultOnFailure, DefaultOnRequest, DefaultOnResponse, TraceLayer},
};
use tracing::Level;

use common::types::Health;
use service::file::invoice_store::{Invoice, InvoiceStore};

use crate::errors::ApiError;

pub async fn health() -> Json<Health> {
    Json(Health { status: "ok" })
}

/// List all invoices in insertion order.
async fn list_invoices(State(store): State<Arc<InvoiceStore>>) -> Json<Vec<Invoice>> {
    Json(store.list().await)
}

/// Fetch the first invoice whose `id` field equals the path identifier.
async fn get_invoice(
    State(store): State<Arc<InvoiceStore>>,
    Path(id): Path<String>,
) -> Result<Json<Invoice>, ApiError> {
    match store.get(&id).await {
        Some(invoice) => Ok(Json(invoice)),
        None => Err(ApiError::NotFound),
    }
}

/// Create an invoice from the request body, stored verbatim.
async fn create_invoice(
    State(store): State<Arc<InvoiceStore>>,
    Json(payload): Json<Invoice>,
) -> (StatusCode, Json<Invoice>) {
    let created = store.create(payload).await;
    (StatusCode::CREATED, Json(created))
}

/// Merge the request body over the invoice with the given `id`.
async fn update_invoice(
    State(store): State<Arc<InvoiceStore>>,
    Path(id): Path<String>,
    Json(patch): Json<Invoice>,
) -> Result<Json<Invoice>, ApiError> {
    store.update(&id, patch).await.map(Json).map_err(ApiError::from)
}

/// Remove the invoice with the given `id` and return the removed record.
async fn delete_invoice(
    State(store): State<Arc<InvoiceStore>>,
    Path(id): Path<String>,
) -> Result<Json<Invoice>, ApiError> {
    store.delete(&id).await.map(Json).map_err(ApiError::from)
}

/// Build the full application router with CORS and request tracing.
pub fn build_router(store: Arc<InvoiceStore>, cors: CorsLayer) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/api/invoices", get(list_invoices).post(create_invoice))
        .route(
            "/api/invoices/:id",
            get(get_invoice).put(update_invoice).delete(delete_invoice),
        )
        .with_state(store)
        .layer(cors)
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(
                    DefaultMakeSpan::new()
                        .level(Level::INFO)
                        .include_headers(false),
                )
                .on_request(DefaultOnRequest::new().level(Level::INFO))
                .on_response(
                    DefaultOnResponse::new()
                        .level(Level::INFO)
                        .include_headers(false),
                )
                .on_failure(DefaultOnFailure::new().level(Level::ERROR)),
        )
}
