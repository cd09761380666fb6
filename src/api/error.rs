//! HTTP mapping for domain errors

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;

use crate::domain::DomainError;

impl IntoResponse for DomainError {
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            DomainError::Validation(msg) => (StatusCode::BAD_REQUEST, msg.clone()),
            DomainError::NotFound(_) => (StatusCode::NOT_FOUND, self.to_string()),
            DomainError::Conflict(msg) => (StatusCode::CONFLICT, msg.clone()),
            DomainError::External(msg) => {
                tracing::warn!("Upstream failure: {}", msg);
                (StatusCode::BAD_GATEWAY, msg.clone())
            }
            DomainError::Database(_) | DomainError::Internal(_) => {
                tracing::error!(error.message = %self, "Unexpected error happened");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal server error".to_string(),
                )
            }
        };

        (status, Json(json!({ "error": message }))).into_response()
    }
}

/// Path identifiers must be positive
pub(crate) fn ensure_positive_id(kind: &str, id: i32) -> Result<(), DomainError> {
    if id <= 0 {
        return Err(DomainError::validation(format!("invalid {} id: {}", kind, id)));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn maps_variants_to_status_codes() {
        let cases = [
            (DomainError::validation("bad"), StatusCode::BAD_REQUEST),
            (DomainError::not_found("book 1"), StatusCode::NOT_FOUND),
            (DomainError::conflict("taken"), StatusCode::CONFLICT),
            (DomainError::External("down".into()), StatusCode::BAD_GATEWAY),
            (
                DomainError::Database("locked".into()),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
        ];

        for (err, status) in cases {
            assert_eq!(err.into_response().status(), status);
        }
    }

    #[test]
    fn rejects_non_positive_ids() {
        assert!(ensure_positive_id("book", 0).is_err());
        assert!(ensure_positive_id("book", -3).is_err());
        assert!(ensure_positive_id("book", 1).is_ok());
    }
}
