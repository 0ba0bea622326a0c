//! Public pages resolved from the page tree

use std::sync::Arc;

use axum::extract::rejection::PathRejection;
use axum::extract::{Path, State};
use axum::http::HeaderMap;
use axum::response::Response;
use axum::{routing::get, Router};

use lexpages_core::label;
use lexpages_core::question::QUESTION_ANSWER_LABEL;
use lexpages_core::{relocated, resolve, Page, SitePath};

use super::qa;
use super::redirects::moved_permanently;
use crate::db::PageRepo;
use crate::http::cache;
use crate::http::error::SiteError;
use crate::http::extractors::QueryMap;
use crate::http::server::AppState;
use crate::render::{self, Site};

/// Path segments that failed to decode address no page.
type Segments<T> = Result<Path<T>, PathRejection>;

fn segments<T>(path: Segments<T>) -> Result<T, SiteError> {
    path.map(|Path(segments)| segments).map_err(|_| SiteError::NotFound)
}

/// GET /
async fn index(State(state): State<Arc<AppState>>, headers: HeaderMap) -> Result<Response, SiteError> {
    let page = PageRepo::new(&state.pool)
        .main_page()
        .await?
        .ok_or(SiteError::NotFound)?;
    render_page(&state, &headers, page).await
}

/// GET /{a}/
async fn one(
    State(state): State<Arc<AppState>>,
    path: Segments<String>,
    query: QueryMap,
    headers: HeaderMap,
) -> Result<Response, SiteError> {
    let a = segments(path)?;
    if a == QUESTION_ANSWER_LABEL {
        return qa::listing(&state, &headers, query.get("page")).await;
    }
    show(&state, &headers, vec![a]).await
}

/// GET /{a}/{b}/
async fn two(
    State(state): State<Arc<AppState>>,
    path: Segments<(String, String)>,
    headers: HeaderMap,
) -> Result<Response, SiteError> {
    let (a, b) = segments(path)?;
    if a == QUESTION_ANSWER_LABEL {
        return qa::single(&state, &headers, &b).await;
    }
    show(&state, &headers, vec![a, b]).await
}

/// GET /{a}/{b}/{c}/
async fn three(
    State(state): State<Arc<AppState>>,
    path: Segments<(String, String, String)>,
    headers: HeaderMap,
) -> Result<Response, SiteError> {
    let (a, b, c) = segments(path)?;
    show(&state, &headers, vec![a, b, c]).await
}

async fn show(state: &AppState, headers: &HeaderMap, segments: Vec<String>) -> Result<Response, SiteError> {
    if !segments.iter().all(|s| label::is_valid(s)) {
        return Err(SiteError::NotFound);
    }
    let path = SitePath::new(segments).ok_or(SiteError::NotFound)?;
    if let Some(target) = relocated(&path) {
        return Ok(moved_permanently(&target));
    }

    let repo = PageRepo::new(&state.pool);
    let page = resolve(&repo, &path).await?.ok_or(SiteError::NotFound)?;
    if page.is_main() {
        return Err(SiteError::NotFound);
    }
    render_page(state, headers, page).await
}

async fn render_page(state: &AppState, headers: &HeaderMap, page: Page) -> Result<Response, SiteError> {
    if page.should_be_404() {
        return Err(SiteError::NotFound);
    }
    if let Some(response) = cache::not_modified(headers, page.date_modified) {
        return Ok(response);
    }

    let tree = PageRepo::new(&state.pool).render_tree(&page).await?;
    let view = tree.view(page.id).ok_or_else(|| SiteError::Internal {
        message: format!("page {} missing from its render tree", page.id),
    })?;
    let menu = tree.menu(&page);
    let codes = state.shortcodes().await;
    let html = render::page(&Site::new(state.config.base_url(), &codes), &view, &menu);
    Ok(cache::page_response(Some(page.date_modified), html))
}

pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/", get(index))
        .route("/{a}/", get(one))
        .route("/{a}/{b}/", get(two))
        .route("/{a}/{b}/{c}/", get(three))
}
