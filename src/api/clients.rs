use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use sea_orm::DatabaseConnection;
use serde_json::Value;

use crate::api::{error_response, parse_body};
use crate::models::client::{ClientPatch, NewClient};
use crate::services::client_service;

/// GET /api/clients - All clients ordered by name
pub async fn list_clients(State(db): State<DatabaseConnection>) -> impl IntoResponse {
    match client_service::list_clients(&db).await {
        Ok(clients) => Json(clients).into_response(),
        Err(e) => error_response(e, "Error al obtener clientes"),
    }
}

/// GET /api/clients/default - The walk-in client, or null when none is
/// marked
pub async fn get_default_client(State(db): State<DatabaseConnection>) -> impl IntoResponse {
    match client_service::get_default_client(&db).await {
        Ok(Some(client)) => Json(client).into_response(),
        Ok(None) => Json(Value::Null).into_response(),
        Err(e) => error_response(e, "Error al obtener cliente por defecto"),
    }
}

/// GET /api/clients/:id
pub async fn get_client(
    State(db): State<DatabaseConnection>,
    Path(id): Path<String>,
) -> impl IntoResponse {
    match client_service::get_client(&db, &id).await {
        Ok(client) => Json(client).into_response(),
        Err(e) => error_response(e, "Error al obtener cliente"),
    }
}

/// POST /api/clients
pub async fn create_client(
    State(db): State<DatabaseConnection>,
    Json(body): Json<Value>,
) -> impl IntoResponse {
    let payload: NewClient = match parse_body(body) {
        Ok(payload) => payload,
        Err(rejection) => return rejection,
    };

    match client_service::create_client(&db, payload).await {
        Ok(client) => (StatusCode::CREATED, Json(client)).into_response(),
        Err(e) => error_response(e, "Error al crear cliente"),
    }
}

/// PUT /api/clients/:id - Partial update; absent fields keep their value
pub async fn update_client(
    State(db): State<DatabaseConnection>,
    Path(id): Path<String>,
    Json(body): Json<Value>,
) -> impl IntoResponse {
    let patch: ClientPatch = match parse_body(body) {
        Ok(patch) => patch,
        Err(rejection) => return rejection,
    };

    match client_service::update_client(&db, &id, patch).await {
        Ok(client) => Json(client).into_response(),
        Err(e) => error_response(e, "Error al actualizar cliente"),
    }
}

/// DELETE /api/clients/:id - Refused for the default client and for
/// clients with recorded sales
pub async fn delete_client(
    State(db): State<DatabaseConnection>,
    Path(id): Path<String>,
) -> impl IntoResponse {
    match client_service::delete_client(&db, &id).await {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(e) => error_response(e, "Error al eliminar cliente"),
    }
}
