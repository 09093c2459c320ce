//! Services Layer
//!
//! Pure business logic without the HTTP layer. Handlers translate
//! `ServiceError` values into status codes and JSON bodies.

pub mod client_service;
pub mod report_service;
pub mod sale_draft;
pub mod transaction_service;
pub mod vat;

/// Error type for service operations
#[derive(Debug, PartialEq, Eq)]
pub enum ServiceError {
    /// Malformed or missing input (HTTP 400)
    Validation(String),
    /// Referenced entity absent (HTTP 404); carries the user-facing message
    NotFound(&'static str),
    /// Operation rejected by an invariant (HTTP 409)
    Conflict(&'static str),
    /// Underlying persistence failure (HTTP 500)
    Database(String),
}

impl std::fmt::Display for ServiceError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ServiceError::Validation(msg) => write!(f, "{}", msg),
            ServiceError::NotFound(msg) => write!(f, "{}", msg),
            ServiceError::Conflict(msg) => write!(f, "{}", msg),
            ServiceError::Database(msg) => write!(f, "database error: {}", msg),
        }
    }
}

impl From<sea_orm::DbErr> for ServiceError {
    fn from(e: sea_orm::DbErr) -> Self {
        ServiceError::Database(e.to_string())
    }
}

impl From<sale_draft::DraftError> for ServiceError {
    fn from(e: sale_draft::DraftError) -> Self {
        ServiceError::Validation(e.to_string())
    }
}
