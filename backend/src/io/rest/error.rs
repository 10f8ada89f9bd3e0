//! Translation of domain failures into HTTP responses.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use shared::{ErrorResponse, Route};

use crate::domain::DomainError;

/// Error returned by every handler; renders as an `ErrorResponse` body
#[derive(Debug)]
pub struct ApiError(pub DomainError);

impl From<DomainError> for ApiError {
    fn from(error: DomainError) -> Self {
        ApiError(error)
    }
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match &self.0 {
            DomainError::Validation(_) => StatusCode::BAD_REQUEST,
            DomainError::Unauthenticated(_) => StatusCode::UNAUTHORIZED,
            DomainError::Forbidden(_) => StatusCode::FORBIDDEN,
            DomainError::NotFound(_) => StatusCode::NOT_FOUND,
            DomainError::Conflict(_) => StatusCode::CONFLICT,
            DomainError::Remote { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        // Remote causes are logged where they are raised
        let status = self.status();

        // Unauthenticated callers are sent to the login screen
        let redirect_to = match &self.0 {
            DomainError::Unauthenticated(_) => Some(Route::Login.path()),
            _ => None,
        };

        let body = ErrorResponse {
            error: self.0.to_string(),
            redirect_to,
        };
        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_codes() {
        let cases = vec![
            (DomainError::validation("bad"), StatusCode::BAD_REQUEST),
            (DomainError::Unauthenticated("login".to_string()), StatusCode::UNAUTHORIZED),
            (DomainError::Forbidden("no".to_string()), StatusCode::FORBIDDEN),
            (DomainError::NotFound("gone".to_string()), StatusCode::NOT_FOUND),
            (DomainError::Conflict("again".to_string()), StatusCode::CONFLICT),
            (
                DomainError::remote("Error", anyhow::anyhow!("boom")),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
        ];

        for (error, expected) in cases {
            assert_eq!(ApiError(error).into_response().status(), expected);
        }
    }
}
