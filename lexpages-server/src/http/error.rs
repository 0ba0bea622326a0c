//! Error responses
//!
//! - `ApiError`: admin API, `{"Data": null, "Message": "Kind: text"}`
//! - `SiteError`: public site, rendered HTML pages

use axum::http::{header, HeaderValue, StatusCode};
use axum::response::{Html, IntoResponse, Response};
use axum::Json;
use serde::Serialize;

use lexpages_core::{CoreError, ValidationError};

use crate::db::DbError;
use crate::render;

/// Body of every admin API response
#[derive(Debug, Serialize)]
pub struct Envelope<T> {
    #[serde(rename = "Data")]
    pub data: Option<T>,
    #[serde(rename = "Message")]
    pub message: String,
}

impl<T: Serialize> Envelope<T> {
    pub fn ok(data: T) -> Json<Self> {
        Json(Self {
            data: Some(data),
            message: String::new(),
        })
    }
}

impl Envelope<()> {
    /// Success without a payload (create, update, delete).
    pub fn done() -> Json<Self> {
        Json(Self {
            data: None,
            message: String::new(),
        })
    }
}

/// API error type with automatic HTTP status mapping
#[derive(Debug)]
pub enum ApiError {
    /// Payload failed validation (400)
    Validation(ValidationError),

    /// Change breaks a domain rule, e.g. an incompatible parent (400)
    Rejected(CoreError),

    /// Resource not found (404)
    NotFound { resource: &'static str, id: String },

    /// Unique, foreign-key or check constraint violated (409)
    Integrity(DbError),

    /// Database error (500, logged)
    Database(DbError),

    /// Internal error (500, logged)
    Internal { message: String },
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            Self::Validation(_) | Self::Rejected(_) => StatusCode::BAD_REQUEST,
            Self::NotFound { .. } => StatusCode::NOT_FOUND,
            Self::Integrity(_) => StatusCode::CONFLICT,
            Self::Database(_) | Self::Internal { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// `Kind: description` text for the envelope.
    pub fn message(&self) -> String {
        match self {
            Self::Validation(e) => format!("ValidationError: {e}"),
            Self::Rejected(e) => format!("RuleViolation: {e}"),
            Self::NotFound { resource, id } => format!("NotFound: {resource} '{id}' not found"),
            Self::Integrity(e) => format!("IntegrityError: {e}"),
            Self::Database(_) | Self::Internal { .. } => {
                "InternalError: an internal error occurred".to_owned()
            }
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match &self {
            Self::Integrity(e) => tracing::debug!(error = %e, "integrity violation"),
            Self::Database(e) => tracing::error!(error = %e, "database error in admin API"),
            Self::Internal { message } => tracing::error!(%message, "internal error in admin API"),
            _ => {}
        }
        let body = Envelope::<()> {
            data: None,
            message: self.message(),
        };
        (self.status(), Json(body)).into_response()
    }
}

impl From<ValidationError> for ApiError {
    fn from(e: ValidationError) -> Self {
        Self::Validation(e)
    }
}

impl From<DbError> for ApiError {
    fn from(e: DbError) -> Self {
        match e {
            DbError::NotFound { resource, id } => Self::NotFound { resource, id },
            DbError::Rule(CoreError::Validation(v)) => Self::Validation(v),
            DbError::Rule(rule) => Self::Rejected(rule),
            e if e.is_integrity_violation() => Self::Integrity(e),
            e => Self::Database(e),
        }
    }
}

/// Public site error, rendered as an HTML page
#[derive(Debug)]
pub enum SiteError {
    /// Unknown path or hidden page (404 page)
    NotFound,

    /// Database error (500, logged)
    Database(DbError),

    /// Internal error (500, logged)
    Internal { message: String },
}

impl IntoResponse for SiteError {
    fn into_response(self) -> Response {
        match self {
            Self::NotFound => not_found_page(),
            Self::Database(e) => {
                tracing::error!(error = %e, "database error while rendering");
                server_error_page()
            }
            Self::Internal { message } => {
                tracing::error!(%message, "internal error while rendering");
                server_error_page()
            }
        }
    }
}

impl From<DbError> for SiteError {
    fn from(e: DbError) -> Self {
        match e {
            DbError::NotFound { .. } => Self::NotFound,
            e => Self::Database(e),
        }
    }
}

/// The "page not found" page, never cached.
pub fn not_found_page() -> Response {
    let mut response = (StatusCode::NOT_FOUND, Html(render::not_found())).into_response();
    let headers = response.headers_mut();
    headers.insert(
        header::CACHE_CONTROL,
        HeaderValue::from_static("no-cache, must-revalidate, max-age=0"),
    );
    headers.insert(header::PRAGMA, HeaderValue::from_static("no-cache"));
    response
}

fn server_error_page() -> Response {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Html(render::server_error()),
    )
        .into_response()
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::to_bytes;
    use lexpages_core::PageKind;

    async fn body_json(response: Response) -> serde_json::Value {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn validation_error_is_400_envelope() {
        let err = ApiError::Validation(ValidationError::Empty { field: "heading" });
        let response = err.into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body = body_json(response).await;
        assert_eq!(body["Data"], serde_json::Value::Null);
        assert_eq!(body["Message"], "ValidationError: heading cannot be empty");
    }

    #[tokio::test]
    async fn not_found_is_404() {
        let err: ApiError = DbError::not_found("page", 7).into();
        let response = err.into_response();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        let body = body_json(response).await;
        assert_eq!(body["Message"], "NotFound: page '7' not found");
    }

    #[test]
    fn rule_errors_map_to_400() {
        let err: ApiError = DbError::Rule(CoreError::IncompatibleParent {
            child: PageKind::Subcategory,
            parent: Some(PageKind::Main),
        })
        .into();
        assert_eq!(err.status(), StatusCode::BAD_REQUEST);

        let err: ApiError = DbError::from(ValidationError::Missing { field: "id" }).into();
        assert!(matches!(err, ApiError::Validation(_)));
    }

    #[tokio::test]
    async fn internal_errors_hide_details() {
        let err = ApiError::Internal {
            message: "secret".into(),
        };
        let response = err.into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let body = body_json(response).await;
        assert!(!body["Message"].as_str().unwrap().contains("secret"));
    }

    #[test]
    fn success_envelope_shape() {
        let Json(body) = Envelope::ok(vec![1, 2]);
        let value = serde_json::to_value(&body).unwrap();
        assert_eq!(value, serde_json::json!({"Data": [1, 2], "Message": ""}));

        let Json(body) = Envelope::done();
        let value = serde_json::to_value(&body).unwrap();
        assert_eq!(value, serde_json::json!({"Data": null, "Message": ""}));
    }

    #[test]
    fn site_404_is_not_cached() {
        let response = SiteError::NotFound.into_response();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert_eq!(
            response.headers()[header::CACHE_CONTROL],
            "no-cache, must-revalidate, max-age=0"
        );
        assert_eq!(response.headers()[header::PRAGMA], "no-cache");
    }
}
