//! Custom Axum extractors for the admin API

use std::collections::HashMap;

use axum::extract::{FromRequest, FromRequestParts, Query, Request};
use axum::http::request::Parts;
use axum::Json;
use serde_json::Value;

use lexpages_core::ValidationError;

use super::error::ApiError;

/// Query string as a plain map; a malformed one reads as empty.
pub struct QueryMap(pub HashMap<String, String>);

impl QueryMap {
    pub fn get(&self, key: &str) -> Option<&str> {
        self.0.get(key).map(String::as_str)
    }

    /// Optional integer parameter. Absent or blank means `None`.
    pub fn id(&self, key: &'static str) -> Result<Option<i32>, ApiError> {
        match self.get(key).map(str::trim).filter(|v| !v.is_empty()) {
            None => Ok(None),
            Some(raw) => raw.parse().map(Some).map_err(|_| {
                ApiError::Validation(ValidationError::InvalidFormat {
                    field: key,
                    reason: "must be an integer",
                })
            }),
        }
    }

    /// `true` only for a case-insensitive `true`.
    pub fn flag(&self, key: &str) -> bool {
        self.get(key).is_some_and(|v| v.trim().eq_ignore_ascii_case("true"))
    }
}

impl<S> FromRequestParts<S> for QueryMap
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let params = Query::<HashMap<String, String>>::from_request_parts(parts, state)
            .await
            .map(|Query(params)| params)
            .unwrap_or_default();
        Ok(Self(params))
    }
}

/// Required `?id=` of the entity to read or delete
pub struct RequiredId(pub i32);

impl<S> FromRequestParts<S> for RequiredId
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let query = QueryMap::from_request_parts(parts, state).await?;
        query
            .id("id")?
            .map(Self)
            .ok_or(ApiError::Validation(ValidationError::Missing { field: "id" }))
    }
}

/// JSON request body, left untyped for field normalisation
pub struct JsonPayload(pub Value);

impl<S> FromRequest<S> for JsonPayload
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<Value>::from_request(req, state).await.map_err(|rejection| {
            tracing::debug!(error = %rejection, "rejected admin payload");
            ApiError::Validation(ValidationError::InvalidFormat {
                field: "body",
                reason: "expected a JSON request body",
            })
        })?;
        Ok(Self(value))
    }
}
