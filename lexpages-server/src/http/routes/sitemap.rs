//! GET /sitemap.xml

use std::sync::Arc;

use axum::extract::State;
use axum::http::{header, HeaderName, HeaderValue};
use axum::response::{IntoResponse, Response};
use axum::{routing::get, Router};

use crate::db::{PageRepo, QuestionRepo};
use crate::http::cache::CACHE_SECONDS;
use crate::http::error::SiteError;
use crate::http::server::AppState;
use crate::render::sitemap;

const X_ROBOTS_TAG: HeaderName = HeaderName::from_static("x-robots-tag");

async fn sitemap_xml(State(state): State<Arc<AppState>>) -> Result<Response, SiteError> {
    let tree = PageRepo::new(&state.pool).tree().await?;
    let questions = QuestionRepo::new(&state.pool).all().await?;
    let entries = sitemap::entries(state.config.base_url(), &tree, &questions);
    tracing::debug!(urls = entries.len(), "sitemap built");

    let mut response = sitemap::render(&entries).into_response();
    let headers = response.headers_mut();
    headers.insert(header::CONTENT_TYPE, HeaderValue::from_static("text/xml; charset=utf-8"));
    headers.insert(X_ROBOTS_TAG, HeaderValue::from_static("noindex"));
    if let Ok(value) = HeaderValue::from_str(&format!("max-age={CACHE_SECONDS}")) {
        headers.insert(header::CACHE_CONTROL, value);
    }
    Ok(response)
}

pub fn router() -> Router<Arc<AppState>> {
    Router::new().route("/sitemap.xml", get(sitemap_xml))
}
