//! Q&A listing and single questions
//!
//! Both live under the `question-answer` static page and are dispatched
//! from the site routes.

use axum::http::HeaderMap;
use axum::response::Response;

use lexpages_core::question::QUESTION_ANSWER_LABEL;
use lexpages_core::PageTree;

use crate::db::{JuristRepo, PageRepo, QuestionRepo};
use crate::http::cache;
use crate::http::error::SiteError;
use crate::http::server::AppState;
use crate::models::Pagination;
use crate::render::{self, Site};

/// GET /question-answer/?page=N
pub(super) async fn listing(
    state: &AppState,
    headers: &HeaderMap,
    raw_page: Option<&str>,
) -> Result<Response, SiteError> {
    let pagination = Pagination::questions(raw_page).ok_or(SiteError::NotFound)?;
    let pages = PageRepo::new(&state.pool);
    let qa_page = pages
        .by_label(QUESTION_ANSWER_LABEL)
        .await?
        .ok_or(SiteError::NotFound)?;

    let questions = QuestionRepo::new(&state.pool);
    let listing = questions.list(pagination).await?;
    if listing.items.is_empty() && pagination.page != 1 {
        return Err(SiteError::NotFound);
    }

    let modified = match questions.latest_modified().await? {
        Some(latest) => latest.max(qa_page.date_modified),
        None => qa_page.date_modified,
    };
    if let Some(response) = cache::not_modified(headers, modified) {
        return Ok(response);
    }

    let tree = pages.render_tree(&qa_page).await?;
    let mut view = tree.view(qa_page.id).ok_or_else(|| SiteError::Internal {
        message: "question-answer page missing from its render tree".to_owned(),
    })?;
    view.date_modified = Some(modified);

    let codes = state.shortcodes().await;
    let html = render::question_list(&Site::new(state.config.base_url(), &codes), &view, &listing);
    Ok(cache::page_response(Some(modified), html))
}

/// GET /question-answer/{id}/
pub(super) async fn single(state: &AppState, headers: &HeaderMap, raw_id: &str) -> Result<Response, SiteError> {
    if raw_id.is_empty() || !raw_id.chars().all(|c| c.is_ascii_digit()) {
        return Err(SiteError::NotFound);
    }
    let id: i32 = raw_id.parse().map_err(|_| SiteError::NotFound)?;
    let question = QuestionRepo::new(&state.pool).get(id).await?;
    if let Some(response) = cache::not_modified(headers, question.date_modified) {
        return Ok(response);
    }

    let pages = PageRepo::new(&state.pool);
    let tree = match pages.by_label(QUESTION_ANSWER_LABEL).await? {
        Some(qa_page) => PageTree::new(pages.chain(qa_page.id).await?),
        None => PageTree::new(pages.main_page().await?),
    };
    let view = question.page_view(&tree);
    let jurist = match question.jurist_id {
        Some(jurist_id) => JuristRepo::new(&state.pool).find(jurist_id).await?,
        None => None,
    };

    let codes = state.shortcodes().await;
    let html = render::question(
        &Site::new(state.config.base_url(), &codes),
        &view,
        &question,
        jurist.as_ref(),
    );
    Ok(cache::page_response(Some(question.date_modified), html))
}
