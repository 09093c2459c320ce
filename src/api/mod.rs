pub mod clients;
pub mod dashboard;
pub mod health;
pub mod reports;
pub mod setup;
pub mod transactions;

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use sea_orm::DatabaseConnection;
use serde::de::DeserializeOwned;
use serde_json::{json, Value};

use crate::services::ServiceError;

pub fn api_router(db: DatabaseConnection) -> Router {
    Router::new()
        // Health check
        .route("/health", get(health::health_check))
        // Clients
        .route(
            "/clients",
            get(clients::list_clients).post(clients::create_client),
        )
        .route("/clients/default", get(clients::get_default_client))
        .route(
            "/clients/:id",
            get(clients::get_client)
                .put(clients::update_client)
                .delete(clients::delete_client),
        )
        // Transactions
        .route(
            "/transactions",
            get(transactions::list_transactions).post(transactions::create_transaction),
        )
        .route(
            "/transactions/:id",
            get(transactions::get_transaction)
                .put(transactions::update_transaction)
                .delete(transactions::delete_transaction),
        )
        // Dashboard
        .route("/dashboard/stats", get(dashboard::get_stats))
        // Reports
        .route("/reports/transactions", get(reports::transactions_report))
        .route("/reports/vat-breakdown", get(reports::vat_breakdown_report))
        .route(
            "/reports/payment-methods",
            get(reports::payment_methods_report),
        )
        // Setup
        .route("/init", post(setup::init))
        .with_state(db)
}

/// Map a service failure onto the wire taxonomy. `action_message` is the
/// user-facing message for store failures; validation, not-found and
/// conflict carry their own.
pub(crate) fn error_response(err: ServiceError, action_message: &str) -> Response {
    match err {
        ServiceError::Validation(msg) => (
            StatusCode::BAD_REQUEST,
            Json(json!({"message": "Datos inválidos", "errors": [msg]})),
        )
            .into_response(),
        ServiceError::NotFound(msg) => {
            (StatusCode::NOT_FOUND, Json(json!({"message": msg}))).into_response()
        }
        ServiceError::Conflict(msg) => {
            (StatusCode::CONFLICT, Json(json!({"message": msg}))).into_response()
        }
        ServiceError::Database(detail) => {
            tracing::error!("{}: {}", action_message, detail);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({"message": action_message})),
            )
                .into_response()
        }
    }
}

/// Decode a request body that already parsed as JSON. Shape mismatches
/// become 400 responses instead of axum's 422.
pub(crate) fn parse_body<T: DeserializeOwned>(value: Value) -> Result<T, Response> {
    serde_json::from_value(value).map_err(|e| {
        (
            StatusCode::BAD_REQUEST,
            Json(json!({"message": "Datos inválidos", "errors": [e.to_string()]})),
        )
            .into_response()
    })
}
