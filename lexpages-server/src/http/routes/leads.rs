//! Lead intake and the thank-you page

use std::collections::HashMap;
use std::sync::Arc;

use axum::extract::rejection::FormRejection;
use axum::extract::State;
use axum::http::{header, HeaderMap, Uri};
use axum::response::{Redirect, Response};
use axum::{routing::get, routing::post, Form, Router};

use lexpages_core::Lead;

use crate::http::cache;
use crate::http::server::AppState;
use crate::render::{self, Site};

/// Cookie holding the analytics visit id
pub const VISIT_COOKIE: &str = "roistat_visit";

/// Value of cookie `name` from the request headers.
pub fn cookie(headers: &HeaderMap, name: &str) -> Option<String> {
    headers
        .get_all(header::COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(|value| value.split(';'))
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(key, _)| *key == name)
        .map(|(_, value)| value.trim_matches('"').to_owned())
        .filter(|value| !value.is_empty())
}

/// POST /sender
async fn sender(
    State(state): State<Arc<AppState>>,
    uri: Uri,
    headers: HeaderMap,
    form: Result<Form<HashMap<String, String>>, FormRejection>,
) -> Redirect {
    let fields = match form {
        Ok(Form(fields)) => fields,
        Err(e) => {
            tracing::warn!(error = %e, "unreadable lead form");
            HashMap::new()
        }
    };
    let fallback_source = format!("{}{}", state.config.base_url(), uri);
    let lead = Lead::from_form(&fields, &fallback_source);
    let visit = cookie(&headers, VISIT_COOKIE);
    state.leads.distribute(&lead, visit.as_deref()).await;
    Redirect::to("/thanks/")
}

/// GET /thanks/
async fn thanks(State(state): State<Arc<AppState>>) -> Response {
    let codes = state.shortcodes().await;
    let html = render::thanks(&Site::new(state.config.base_url(), &codes));
    cache::page_response(None, html)
}

pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/sender", post(sender))
        .route("/thanks/", get(thanks))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    #[test]
    fn visit_cookie_is_found_among_others() {
        let mut headers = HeaderMap::new();
        headers.insert(
            header::COOKIE,
            HeaderValue::from_static("session=abc; roistat_visit=12345; theme=dark"),
        );
        assert_eq!(cookie(&headers, VISIT_COOKIE).as_deref(), Some("12345"));
        assert_eq!(cookie(&headers, "missing"), None);
        assert_eq!(cookie(&HeaderMap::new(), VISIT_COOKIE), None);
    }
}
