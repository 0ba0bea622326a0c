//! Admin CRUD for pages, questions and shortcodes
//!
//! Reads take `?id=`, creates and updates a JSON body (updates carry the
//! id in it), deletes `?id=`. Writes answer `{"Data": null}` on success.

use std::sync::Arc;

use axum::extract::State;
use axum::{routing::get, Json, Router};

use lexpages_core::{PageInput, PageTree, QuestionInput, Shortcode, ShortcodeInput};

use crate::db::{PageRepo, QuestionRepo, ShortcodeRepo, TagRepo, Tagged};
use crate::http::error::{ApiError, Envelope};
use crate::http::extractors::{JsonPayload, RequiredId};
use crate::http::server::AppState;
use crate::models::{PageJson, QuestionJson};

type Done = Result<Json<Envelope<()>>, ApiError>;

/// GET /page?id=
async fn get_page(
    State(state): State<Arc<AppState>>,
    RequiredId(id): RequiredId,
) -> Result<Json<Envelope<PageJson>>, ApiError> {
    let chain = PageRepo::new(&state.pool).chain(id).await?;
    let tree = PageTree::new(chain);
    let page = tree.get(id).ok_or_else(|| ApiError::NotFound {
        resource: "page",
        id: id.to_string(),
    })?;
    let tags = TagRepo::new(&state.pool).for_entity(Tagged::Page(id)).await?;
    Ok(Envelope::ok(PageJson::new(page, &tree, tags)))
}

/// POST /page
async fn create_page(State(state): State<Arc<AppState>>, JsonPayload(body): JsonPayload) -> Done {
    let input = PageInput::from_json(&body, &state.sanitizer)?;
    PageRepo::new(&state.pool).create(&input).await?;
    Ok(Envelope::done())
}

/// PUT /page
async fn update_page(State(state): State<Arc<AppState>>, JsonPayload(body): JsonPayload) -> Done {
    let input = PageInput::from_json(&body, &state.sanitizer)?;
    PageRepo::new(&state.pool).update(&input).await?;
    Ok(Envelope::done())
}

/// DELETE /page?id=
async fn delete_page(State(state): State<Arc<AppState>>, RequiredId(id): RequiredId) -> Done {
    PageRepo::new(&state.pool).delete(id).await?;
    Ok(Envelope::done())
}

/// GET /question?id=
async fn get_question(
    State(state): State<Arc<AppState>>,
    RequiredId(id): RequiredId,
) -> Result<Json<Envelope<QuestionJson>>, ApiError> {
    let question = QuestionRepo::new(&state.pool).get(id).await?;
    let tags = TagRepo::new(&state.pool).for_entity(Tagged::Question(id)).await?;
    Ok(Envelope::ok(QuestionJson::new(question, tags)))
}

/// POST /question
async fn create_question(State(state): State<Arc<AppState>>, JsonPayload(body): JsonPayload) -> Done {
    let input = QuestionInput::from_json(&body, &state.sanitizer)?;
    QuestionRepo::new(&state.pool).create(&input).await?;
    Ok(Envelope::done())
}

/// PUT /question
async fn update_question(State(state): State<Arc<AppState>>, JsonPayload(body): JsonPayload) -> Done {
    let input = QuestionInput::from_json(&body, &state.sanitizer)?;
    QuestionRepo::new(&state.pool).update(&input).await?;
    Ok(Envelope::done())
}

/// DELETE /question?id=
async fn delete_question(State(state): State<Arc<AppState>>, RequiredId(id): RequiredId) -> Done {
    QuestionRepo::new(&state.pool).delete(id).await?;
    Ok(Envelope::done())
}

/// GET /shortcode?id=
async fn get_shortcode(
    State(state): State<Arc<AppState>>,
    RequiredId(id): RequiredId,
) -> Result<Json<Envelope<Shortcode>>, ApiError> {
    Ok(Envelope::ok(ShortcodeRepo::new(&state.pool).get(id).await?))
}

/// POST /shortcode
async fn create_shortcode(State(state): State<Arc<AppState>>, JsonPayload(body): JsonPayload) -> Done {
    let input = ShortcodeInput::from_json(&body)?;
    ShortcodeRepo::new(&state.pool).create(&input).await?;
    Ok(Envelope::done())
}

/// PUT /shortcode
async fn update_shortcode(State(state): State<Arc<AppState>>, JsonPayload(body): JsonPayload) -> Done {
    let input = ShortcodeInput::from_json(&body)?;
    ShortcodeRepo::new(&state.pool).update(&input).await?;
    Ok(Envelope::done())
}

/// DELETE /shortcode?id=
async fn delete_shortcode(State(state): State<Arc<AppState>>, RequiredId(id): RequiredId) -> Done {
    ShortcodeRepo::new(&state.pool).delete(id).await?;
    Ok(Envelope::done())
}

/// Entity routes, nested under `/admin/api`
pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route(
            "/page",
            get(get_page).post(create_page).put(update_page).delete(delete_page),
        )
        .route(
            "/question",
            get(get_question)
                .post(create_question)
                .put(update_question)
                .delete(delete_question),
        )
        .route(
            "/shortcode",
            get(get_shortcode)
                .post(create_shortcode)
                .put(update_shortcode)
                .delete(delete_shortcode),
        )
}

