//! Permanent redirects for retired URLs

use std::sync::Arc;

use axum::extract::rejection::PathRejection;
use axum::extract::{Path, State};
use axum::http::{header, StatusCode, Uri};
use axum::response::{IntoResponse, Response};
use axum::{routing::get, Router};

use lexpages_core::legacy_redirect;

use crate::http::error::SiteError;
use crate::http::server::AppState;

/// 301 to `target`.
pub(crate) fn moved_permanently(target: &str) -> Response {
    (StatusCode::MOVED_PERMANENTLY, [(header::LOCATION, target.to_owned())]).into_response()
}

/// Longest path the site routes serve, in segments.
const MAX_SEGMENTS: usize = 3;

/// 301 from `/family` to `/family/` for paths that only miss the trailing
/// slash. The query string is kept.
pub(crate) fn append_slash(uri: &Uri) -> Option<Response> {
    let path = uri.path();
    let trimmed = path.strip_prefix('/')?;
    if trimmed.is_empty() || trimmed.ends_with('/') {
        return None;
    }
    let segments: Vec<&str> = trimmed.split('/').collect();
    let slug_like = |s: &&str| {
        !s.is_empty() && s.chars().all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
    };
    if segments.len() > MAX_SEGMENTS || !segments.iter().all(slug_like) {
        return None;
    }
    let target = match uri.query() {
        Some(query) => format!("{path}/?{query}"),
        None => format!("{path}/"),
    };
    Some(moved_permanently(&target))
}

/// GET /msk/{topic}/
async fn msk_topic(path: Result<Path<String>, PathRejection>) -> Result<Response, SiteError> {
    let Path(topic) = path.map_err(|_| SiteError::NotFound)?;
    legacy_redirect(&topic, None)
        .map(|target| moved_permanently(&target))
        .ok_or(SiteError::NotFound)
}

/// GET /msk/{topic}/{phrase}
async fn msk_phrase(
    path: Result<Path<(String, String)>, PathRejection>,
) -> Result<Response, SiteError> {
    let Path((topic, phrase)) = path.map_err(|_| SiteError::NotFound)?;
    legacy_redirect(&topic, Some(&phrase))
        .map(|target| moved_permanently(&target))
        .ok_or(SiteError::NotFound)
}

/// GET /zvonok/
async fn zvonok(State(state): State<Arc<AppState>>) -> Response {
    moved_permanently(&state.config.site.callcenter_url)
}

pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/msk/{topic}/", get(msk_topic))
        .route("/msk/{topic}/{phrase}", get(msk_phrase))
        .route("/zvonok/", get(zvonok))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn known_topic_redirects() {
        let response = msk_topic(Ok(Path("alimenty".into()))).await.unwrap();
        assert_eq!(response.status(), StatusCode::MOVED_PERMANENTLY);
        assert_eq!(response.headers()[header::LOCATION], "/family/alimony/");
    }

    #[tokio::test]
    async fn unknown_phrase_is_404() {
        let result = msk_phrase(Ok(Path(("urist".into(), "nothing".into())))).await;
        assert!(matches!(result, Err(SiteError::NotFound)));
    }

    #[test]
    fn missing_trailing_slash_is_appended() {
        let response = append_slash(&Uri::from_static("/family")).unwrap();
        assert_eq!(response.status(), StatusCode::MOVED_PERMANENTLY);
        assert_eq!(response.headers()[header::LOCATION], "/family/");

        let response = append_slash(&Uri::from_static("/question-answer?page=2")).unwrap();
        assert_eq!(response.headers()[header::LOCATION], "/question-answer/?page=2");

        let response = append_slash(&Uri::from_static("/msk/uk")).unwrap();
        assert_eq!(response.headers()[header::LOCATION], "/msk/uk/");
    }

    #[test]
    fn other_paths_are_left_alone() {
        for uri in ["/", "/family/", "/sitemap.xml", "/a/b/c/d", "/a//b"] {
            assert!(append_slash(&Uri::from_static(uri)).is_none(), "{uri}");
        }
    }
}
