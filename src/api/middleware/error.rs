use axum::{
    extract::Request,
    http::StatusCode,
    middleware::Next,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use std::collections::BTreeMap;
use std::fmt;

use crate::models::now_rfc3339;
use crate::services::state_machine::TransitionError;

/// Typed error value returned by every service operation. HTTP knowledge
/// lives only in this module; services raise the kind and message.
#[derive(Debug)]
pub enum ApiError {
    NotFound(String),
    Duplicate(String),
    DomainRule(String),
    Validation(BTreeMap<String, String>),
    Internal(String),
}

pub type ApiResult<T> = Result<T, ApiError>;

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ApiError::NotFound(msg) => write!(f, "Not found: {}", msg),
            ApiError::Duplicate(msg) => write!(f, "Duplicate entity: {}", msg),
            ApiError::DomainRule(msg) => write!(f, "Business rule violation: {}", msg),
            ApiError::Validation(errors) => write!(f, "Validation failed: {} field(s)", errors.len()),
            ApiError::Internal(msg) => write!(f, "Internal error: {}", msg),
        }
    }
}

impl std::error::Error for ApiError {}

impl ApiError {
    fn status(&self) -> StatusCode {
        match self {
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Duplicate(_) => StatusCode::CONFLICT,
            ApiError::DomainRule(_) | ApiError::Validation(_) => StatusCode::BAD_REQUEST,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn kind(&self) -> &'static str {
        match self {
            ApiError::NotFound(_) => "Not Found",
            ApiError::Duplicate(_) => "Conflict",
            ApiError::DomainRule(_) => "Business Rule Violation",
            ApiError::Validation(_) => "Validation Failed",
            ApiError::Internal(_) => "Internal Server Error",
        }
    }
}

/// Payload attached to error responses so the boundary middleware can
/// rebuild the body with the request path.
#[derive(Debug, Clone)]
pub struct ErrorContext {
    pub status: StatusCode,
    pub kind: &'static str,
    pub message: Option<String>,
    pub field_errors: Option<BTreeMap<String, String>>,
}

fn error_body(context: &ErrorContext, path: Option<&str>) -> serde_json::Value {
    let mut body = json!({
        "timestamp": now_rfc3339(),
        "status": context.status.as_u16(),
        "error": context.kind,
    });
    if let Some(message) = &context.message {
        body["message"] = json!(message);
    }
    if let Some(errors) = &context.field_errors {
        body["errors"] = json!(errors);
    }
    if let Some(path) = path {
        body["path"] = json!(path);
    }
    body
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let kind = self.kind();

        let (message, field_errors) = match self {
            ApiError::Validation(errors) => (None, Some(errors)),
            ApiError::Internal(detail) => {
                // Internal detail is logged, never leaked to the caller
                tracing::error!("Internal server error: {}", detail);
                (Some("An unexpected server error occurred".to_string()), None)
            }
            ApiError::NotFound(msg) | ApiError::Duplicate(msg) | ApiError::DomainRule(msg) => {
                (Some(msg), None)
            }
        };

        let context = ErrorContext {
            status,
            kind,
            message,
            field_errors,
        };

        let mut response = (status, Json(error_body(&context, None))).into_response();
        response.extensions_mut().insert(context);
        response
    }
}

/// Boundary middleware that rewrites error bodies to include the request path.
pub async fn attach_request_path(request: Request, next: Next) -> Response {
    let path = request.uri().path().to_string();
    let response = next.run(request).await;

    if let Some(context) = response.extensions().get::<ErrorContext>().cloned() {
        return (context.status, Json(error_body(&context, Some(&path)))).into_response();
    }

    response
}

// Convert from sqlx errors
impl From<sqlx::Error> for ApiError {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::RowNotFound => ApiError::NotFound("Resource not found".to_string()),
            sqlx::Error::Database(db_err) => {
                let message = db_err.message();
                if message.contains("UNIQUE") || message.contains("unique") {
                    ApiError::Duplicate("CPF or email already registered".to_string())
                } else {
                    ApiError::Internal(format!("Database error: {}", message))
                }
            }
            _ => ApiError::Internal("Internal server error".to_string()),
        }
    }
}

impl From<TransitionError> for ApiError {
    fn from(err: TransitionError) -> Self {
        ApiError::DomainRule(err.to_string())
    }
}

impl From<bcrypt::BcryptError> for ApiError {
    fn from(err: bcrypt::BcryptError) -> Self {
        ApiError::Internal(format!("Password hashing error: {}", err))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_found_maps_to_404() {
        let response = ApiError::NotFound("Ticket not found".to_string()).into_response();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn test_duplicate_maps_to_409() {
        let response = ApiError::Duplicate("CPF already registered".to_string()).into_response();
        assert_eq!(response.status(), StatusCode::CONFLICT);
    }

    #[test]
    fn test_domain_rule_maps_to_400() {
        let response = ApiError::DomainRule("cannot alter a closed ticket".to_string()).into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn test_validation_maps_to_400_with_field_errors() {
        let mut errors = BTreeMap::new();
        errors.insert("cpf".to_string(), "CPF must be exactly 11 digits".to_string());
        let response = ApiError::Validation(errors).into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let context = response.extensions().get::<ErrorContext>().unwrap();
        assert!(context.field_errors.as_ref().unwrap().contains_key("cpf"));
    }

    #[test]
    fn test_internal_maps_to_500_with_generic_message() {
        let response = ApiError::Internal("pool exhausted".to_string()).into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

        let context = response.extensions().get::<ErrorContext>().unwrap();
        assert_eq!(
            context.message.as_deref(),
            Some("An unexpected server error occurred")
        );
    }

    #[test]
    fn test_error_body_includes_path_when_given() {
        let context = ErrorContext {
            status: StatusCode::NOT_FOUND,
            kind: "Not Found",
            message: Some("Ticket not found".to_string()),
            field_errors: None,
        };
        let body = error_body(&context, Some("/tickets/abc"));
        assert_eq!(body["path"], "/tickets/abc");
        assert_eq!(body["status"], 404);
        assert_eq!(body["error"], "Not Found");
    }
}
