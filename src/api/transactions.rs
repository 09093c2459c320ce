use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use sea_orm::DatabaseConnection;
use serde::Deserialize;
use serde_json::Value;

use crate::api::{error_response, parse_body};
use crate::models::transaction::{NewTransaction, TransactionPatch};
use crate::models::transaction_item::NewTransactionItem;
use crate::services::transaction_service;

/// Request body for committing a sale. Item amounts and header totals
/// are recomputed server-side, so the payload carries only the raw line
/// facts.
#[derive(Debug, Deserialize)]
pub struct CreateTransactionPayload {
    pub transaction: NewTransaction,
    pub items: Vec<NewTransactionItem>,
}

/// Request body for updating a sale. Omitting `items` keeps the stored
/// line items; supplying it replaces them wholesale.
#[derive(Debug, Deserialize)]
pub struct UpdateTransactionPayload {
    pub transaction: TransactionPatch,
    #[serde(default)]
    pub items: Option<Vec<NewTransactionItem>>,
}

/// GET /api/transactions - Every sale, newest first, with client and
/// items
pub async fn list_transactions(State(db): State<DatabaseConnection>) -> impl IntoResponse {
    match transaction_service::list_transactions(&db).await {
        Ok(list) => Json(list).into_response(),
        Err(e) => error_response(e, "Error al obtener transacciones"),
    }
}

/// GET /api/transactions/:id
pub async fn get_transaction(
    State(db): State<DatabaseConnection>,
    Path(id): Path<String>,
) -> impl IntoResponse {
    match transaction_service::get_transaction(&db, &id).await {
        Ok(details) => Json(details).into_response(),
        Err(e) => error_response(e, "Error al obtener transacción"),
    }
}

/// POST /api/transactions
pub async fn create_transaction(
    State(db): State<DatabaseConnection>,
    Json(body): Json<Value>,
) -> impl IntoResponse {
    let payload: CreateTransactionPayload = match parse_body(body) {
        Ok(payload) => payload,
        Err(rejection) => return rejection,
    };

    match transaction_service::create_transaction(&db, payload.transaction, payload.items).await {
        Ok(details) => (StatusCode::CREATED, Json(details)).into_response(),
        Err(e) => error_response(e, "Error al crear transacción"),
    }
}

/// PUT /api/transactions/:id
pub async fn update_transaction(
    State(db): State<DatabaseConnection>,
    Path(id): Path<String>,
    Json(body): Json<Value>,
) -> impl IntoResponse {
    let payload: UpdateTransactionPayload = match parse_body(body) {
        Ok(payload) => payload,
        Err(rejection) => return rejection,
    };

    match transaction_service::update_transaction(&db, &id, payload.transaction, payload.items)
        .await
    {
        Ok(details) => Json(details).into_response(),
        Err(e) => error_response(e, "Error al actualizar transacción"),
    }
}

/// DELETE /api/transactions/:id - Removes the sale and its items;
/// unknown ids are treated as already gone
pub async fn delete_transaction(
    State(db): State<DatabaseConnection>,
    Path(id): Path<String>,
) -> impl IntoResponse {
    match transaction_service::delete_transaction(&db, &id).await {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(e) => error_response(e, "Error al eliminar transacción"),
    }
}
