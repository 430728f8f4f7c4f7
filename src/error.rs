use actix_web::{HttpResponse, http::StatusCode};
use sea_orm::DbErr;
use thiserror::Error;

use crate::storage::StoreError;

/// Error taxonomy shared by every operation in the lifecycle core.
///
/// Each variant carries a human-readable message; the stable `kind` string and
/// the HTTP status code are derived from the variant, so handlers never build
/// error responses by hand.
#[derive(Debug, Error)]
pub enum ApiError {
    /// Missing or invalid credential.
    #[error("{0}")]
    Unauthenticated(String),
    /// Authenticated, but wrong role or not the owner.
    #[error("{0}")]
    Forbidden(String),
    #[error("{0}")]
    NotFound(String),
    /// Schema or validation failure, detected before any write.
    #[error("{0}")]
    InvalidInput(String),
    /// State-machine rule violation: duplicate proposal, terminal-state
    /// re-transition, review on a non-completed order.
    #[error("{0}")]
    Conflict(String),
    /// Collaborator failure (database, deliverable store). Retryable.
    #[error("dependency failure: {0}")]
    Dependency(String),
}

impl ApiError {
    pub fn kind(&self) -> &'static str {
        match self {
            ApiError::Unauthenticated(_) => "unauthenticated",
            ApiError::Forbidden(_) => "forbidden",
            ApiError::NotFound(_) => "not_found",
            ApiError::InvalidInput(_) => "invalid_input",
            ApiError::Conflict(_) => "conflict",
            ApiError::Dependency(_) => "dependency",
        }
    }
}

impl From<DbErr> for ApiError {
    fn from(e: DbErr) -> Self {
        ApiError::Dependency(format!("database error: {e}"))
    }
}

impl From<StoreError> for ApiError {
    fn from(e: StoreError) -> Self {
        ApiError::Dependency(format!("deliverable store: {e}"))
    }
}

impl actix_web::ResponseError for ApiError {
    fn status_code(&self) -> StatusCode {
        match self {
            ApiError::Unauthenticated(_) => StatusCode::UNAUTHORIZED,
            ApiError::Forbidden(_) => StatusCode::FORBIDDEN,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::InvalidInput(_) => StatusCode::BAD_REQUEST,
            ApiError::Conflict(_) => StatusCode::CONFLICT,
            ApiError::Dependency(_) => StatusCode::BAD_GATEWAY,
        }
    }

    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(self.status_code()).json(serde_json::json!({
            "kind": self.kind(),
            "error": self.to_string(),
        }))
    }
}
