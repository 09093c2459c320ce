use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use chrono::NaiveDate;
use sea_orm::DatabaseConnection;
use serde::Deserialize;
use serde_json::json;

use crate::api::error_response;
use crate::services::report_service::{self, DateRange};

/// Query parameters shared by the range reports
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportRangeQuery {
    pub start_date: Option<String>,
    pub end_date: Option<String>,
}

/// GET /api/reports/transactions - Sales inside the range, newest first
pub async fn transactions_report(
    State(db): State<DatabaseConnection>,
    Query(params): Query<ReportRangeQuery>,
) -> impl IntoResponse {
    let range = match parse_range(&params) {
        Ok(range) => range,
        Err(rejection) => return rejection,
    };

    match report_service::transactions_in_range(&db, range).await {
        Ok(list) => Json(list).into_response(),
        Err(e) => error_response(e, "Error al obtener reporte de transacciones"),
    }
}

/// GET /api/reports/vat-breakdown - Per-band VAT buckets for the range
pub async fn vat_breakdown_report(
    State(db): State<DatabaseConnection>,
    Query(params): Query<ReportRangeQuery>,
) -> impl IntoResponse {
    let range = match parse_range(&params) {
        Ok(range) => range,
        Err(rejection) => return rejection,
    };

    match report_service::vat_breakdown(&db, range).await {
        Ok(breakdown) => Json(breakdown).into_response(),
        Err(e) => error_response(e, "Error al obtener desglose de IVA"),
    }
}

/// GET /api/reports/payment-methods - Gross revenue per payment method
pub async fn payment_methods_report(
    State(db): State<DatabaseConnection>,
    Query(params): Query<ReportRangeQuery>,
) -> impl IntoResponse {
    let range = match parse_range(&params) {
        Ok(range) => range,
        Err(rejection) => return rejection,
    };

    match report_service::payment_method_breakdown(&db, range).await {
        Ok(breakdown) => Json(breakdown).into_response(),
        Err(e) => error_response(e, "Error al obtener desglose de métodos de pago"),
    }
}

/// Both dates must be present and well-formed `YYYY-MM-DD`. Browsers
/// sometimes send the literal string "undefined", which counts as
/// missing rather than malformed.
fn parse_range(params: &ReportRangeQuery) -> Result<DateRange, Response> {
    let start = present(params.start_date.as_deref());
    let end = present(params.end_date.as_deref());

    let (Some(start), Some(end)) = (start, end) else {
        return Err((
            StatusCode::BAD_REQUEST,
            Json(json!({"message": "Se requieren fechas de inicio y fin válidas"})),
        )
            .into_response());
    };

    let parsed_start = NaiveDate::parse_from_str(start, "%Y-%m-%d");
    let parsed_end = NaiveDate::parse_from_str(end, "%Y-%m-%d");
    match (parsed_start, parsed_end) {
        (Ok(start), Ok(end)) => Ok(DateRange::from_dates(start, end)),
        _ => Err((
            StatusCode::BAD_REQUEST,
            Json(json!({"message": "Fechas inválidas"})),
        )
            .into_response()),
    }
}

fn present(value: Option<&str>) -> Option<&str> {
    match value {
        None | Some("") | Some("undefined") => None,
        Some(s) => Some(s),
    }
}
