//! Admin listings, pickers and label helpers

use std::sync::Arc;

use axum::extract::State;
use axum::{routing::get, Json, Router};

use lexpages_core::{check_label, pick_label, slugify, PageKind, Shortcode, TagText, ValidationError};

use crate::db::{JuristRepo, PageRepo, QuestionRepo, ShortcodeRepo, TagRepo};
use crate::http::error::{ApiError, Envelope};
use crate::http::extractors::QueryMap;
use crate::http::server::AppState;
use crate::models::{CategoryJson, JuristJson, PageSummary, QuestionSummary};

type Listing<T> = Result<Json<Envelope<Vec<T>>>, ApiError>;

/// GET /pages?kind=
///
/// Papers and services follow category, subcategory and own priority;
/// `static` also lists main, by label; `category` lists categories with
/// their subcategories.
async fn pages(State(state): State<Arc<AppState>>, query: QueryMap) -> Listing<PageSummary> {
    let kind: PageKind = query
        .get("kind")
        .ok_or(ValidationError::Missing { field: "kind" })?
        .trim()
        .parse()?;
    let tree = PageRepo::new(&state.pool).tree().await?;

    let pages = match kind {
        PageKind::Paper | PageKind::Service => tree.sorted_articles(kind),
        PageKind::Main | PageKind::Static => {
            let mut pages: Vec<_> = tree
                .sitemap_order()
                .into_iter()
                .filter(|p| matches!(p.kind, PageKind::Main | PageKind::Static))
                .collect();
            pages.sort_by(|a, b| a.label.cmp(&b.label));
            pages
        }
        PageKind::Category | PageKind::Subcategory => {
            tree.categories(false).into_iter().map(|entry| entry.page).collect()
        }
    };
    Ok(Envelope::ok(
        pages.into_iter().map(|p| PageSummary::new(p, &tree)).collect(),
    ))
}

/// GET /questions
async fn questions(State(state): State<Arc<AppState>>) -> Listing<QuestionSummary> {
    let tree = PageRepo::new(&state.pool).tree().await?;
    let questions = QuestionRepo::new(&state.pool).all().await?;
    Ok(Envelope::ok(
        questions.iter().map(|q| QuestionSummary::new(q, &tree)).collect(),
    ))
}

/// GET /shortcodes
async fn shortcodes(State(state): State<Arc<AppState>>) -> Listing<Shortcode> {
    Ok(Envelope::ok(ShortcodeRepo::new(&state.pool).all().await?))
}

/// GET /categories?only_root=
async fn categories(State(state): State<Arc<AppState>>, query: QueryMap) -> Listing<CategoryJson> {
    let repo = PageRepo::new(&state.pool);
    let tree = repo.tree().await?;
    let counts = repo.category_counts().await?;
    let categories = tree
        .categories(query.flag("only_root"))
        .into_iter()
        .map(|entry| {
            let count = counts.get(&entry.page.id).copied().unwrap_or_default();
            CategoryJson::new(entry, count)
        })
        .collect();
    Ok(Envelope::ok(categories))
}

/// GET /jurists
async fn jurists(State(state): State<Arc<AppState>>) -> Listing<JuristJson> {
    let jurists = JuristRepo::new(&state.pool).all().await?;
    Ok(Envelope::ok(jurists.into_iter().map(JuristJson::from).collect()))
}

/// GET /tags?query=
///
/// Plain array for the tag input widget, never an error.
async fn tags(State(state): State<Arc<AppState>>, query: QueryMap) -> Json<Vec<TagText>> {
    let Some(text) = query.get("query") else {
        return Json(Vec::new());
    };
    match TagRepo::new(&state.pool).autocomplete(text.trim()).await {
        Ok(tags) => Json(tags),
        Err(e) => {
            tracing::error!(error = %e, "tag autocomplete failed");
            Json(Vec::new())
        }
    }
}

/// GET /label/pick?name=&page_id=
///
/// A blank name gives an empty label; a name without a single usable
/// character is rejected.
async fn label_pick(
    State(state): State<Arc<AppState>>,
    query: QueryMap,
) -> Result<Json<Envelope<String>>, ApiError> {
    let name = query.get("name").unwrap_or_default();
    if !name.trim().is_empty() && slugify(name).is_empty() {
        return Err(ValidationError::InvalidFormat {
            field: "name",
            reason: "has no letters or digits to build a label from",
        }
        .into());
    }
    let page_id = query.id("page_id")?;
    let label = pick_label(&PageRepo::new(&state.pool), name, page_id).await?;
    Ok(Envelope::ok(label))
}

/// GET /label/check?label=&page_id=
async fn label_check(
    State(state): State<Arc<AppState>>,
    query: QueryMap,
) -> Result<Json<Envelope<bool>>, ApiError> {
    let label = query
        .get("label")
        .ok_or(ValidationError::Missing { field: "label" })?;
    let page_id = query.id("page_id")?;
    let vacant = check_label(&PageRepo::new(&state.pool), label, page_id).await?;
    Ok(Envelope::ok(vacant))
}

/// Lookup routes, nested under `/admin/api`
pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/pages", get(pages))
        .route("/questions", get(questions))
        .route("/shortcodes", get(shortcodes))
        .route("/categories", get(categories))
        .route("/jurists", get(jurists))
        .route("/tags", get(tags))
        .route("/label/pick", get(label_pick))
        .route("/label/check", get(label_check))
}
