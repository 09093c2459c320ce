use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use sea_orm::DatabaseConnection;
use serde_json::json;

use crate::seed;

/// POST /api/init - Make sure the walk-in client exists. Safe to call
/// repeatedly; an existing default is left untouched.
pub async fn init(State(db): State<DatabaseConnection>) -> impl IntoResponse {
    match seed::ensure_default_client(&db).await {
        Ok(_) => Json(json!({"message": "Inicialización completada"})).into_response(),
        Err(e) => {
            tracing::error!("Error en la inicialización: {}", e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({"message": "Error en la inicialización"})),
            )
                .into_response()
        }
    }
}
