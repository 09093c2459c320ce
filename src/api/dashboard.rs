use axum::{extract::State, response::IntoResponse, Json};
use sea_orm::DatabaseConnection;

use crate::api::error_response;
use crate::services::report_service;

/// GET /api/dashboard/stats - Today's totals plus the active-client
/// count
pub async fn get_stats(State(db): State<DatabaseConnection>) -> impl IntoResponse {
    match report_service::dashboard_stats(&db).await {
        Ok(stats) => Json(stats).into_response(),
        Err(e) => error_response(e, "Error al obtener estadísticas"),
    }
}
