//! JSON request bodies whose rejections render like every other API error.

use axum::extract::{rejection::JsonRejection, FromRequest};
use tracing::warn;

use super::error::ApiError;
use crate::domain::DomainError;

/// `axum::Json` for request bodies; a malformed body becomes a 400 `ErrorResponse`
#[derive(Debug, FromRequest)]
#[from_request(via(axum::Json), rejection(ApiError))]
pub struct JsonBody<T>(pub T);

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        warn!("Rejected request body: {}", rejection.body_text());

        let message = match rejection {
            // Missing fields and wrong field types
            JsonRejection::JsonDataError(_) => "Please fill in all required fields",
            JsonRejection::JsonSyntaxError(_) => "Request body is not valid JSON",
            JsonRejection::MissingJsonContentType(_) => "Expected a JSON request body",
            _ => "Could not read the request body",
        };
        ApiError(DomainError::validation(message))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{body::Body, http::Request, http::StatusCode, response::IntoResponse};
    use serde::Deserialize;

    #[derive(Debug, Deserialize)]
    struct Form {
        #[allow(dead_code)]
        experience: Option<u32>,
    }

    async fn extract(content_type: Option<&str>, body: &str) -> Result<JsonBody<Form>, ApiError> {
        let mut builder = Request::builder().method("POST").uri("/");
        if let Some(content_type) = content_type {
            builder = builder.header("content-type", content_type);
        }
        let request = builder.body(Body::from(body.to_string())).unwrap();
        JsonBody::<Form>::from_request(request, &()).await
    }

    #[tokio::test]
    async fn test_body_rejections_are_validation_errors() {
        let cases = [
            (Some("application/json"), r#"{"experience":"5"}"#, "Please fill in all required fields"),
            (Some("application/json"), "{not json", "Request body is not valid JSON"),
            (None, r#"{"experience":5}"#, "Expected a JSON request body"),
        ];

        for (content_type, body, expected) in cases {
            let err = extract(content_type, body).await.unwrap_err();
            assert!(matches!(err.0, DomainError::Validation(ref m) if m == expected), "{}", body);
            assert_eq!(err.into_response().status(), StatusCode::BAD_REQUEST);
        }

        assert!(extract(Some("application/json"), r#"{"experience":5}"#).await.is_ok());
    }
}
