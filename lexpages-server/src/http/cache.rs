//! Conditional GET for rendered pages
//!
//! Pages carry `Last-Modified` and a month-long `Cache-Control`; an
//! `If-Modified-Since` at or after the modification second gets a 304.

use axum::http::{header, HeaderMap, HeaderValue, StatusCode};
use axum::response::{Html, IntoResponse, Response};
use chrono::{DateTime, SubsecRound, Utc};

/// Public page lifetime in caches (30 days)
pub const CACHE_SECONDS: u32 = 2_592_000;

pub fn http_date(at: DateTime<Utc>) -> String {
    at.format("%a, %d %b %Y %H:%M:%S GMT").to_string()
}

pub fn parse_http_date(raw: &str) -> Option<DateTime<Utc>> {
    DateTime::parse_from_rfc2822(raw.trim())
        .ok()
        .map(|at| at.with_timezone(&Utc))
}

/// Whether the client copy is current. Unparseable headers are ignored.
pub fn is_fresh(headers: &HeaderMap, modified: DateTime<Utc>) -> bool {
    let Some(raw) = headers.get(header::IF_MODIFIED_SINCE) else {
        return false;
    };
    match raw.to_str().ok().and_then(parse_http_date) {
        Some(since) => modified.trunc_subsecs(0) <= since,
        None => {
            tracing::debug!(value = ?raw, "ignoring malformed If-Modified-Since");
            false
        }
    }
}

fn cache_headers(response: &mut Response, modified: Option<DateTime<Utc>>) {
    let headers = response.headers_mut();
    if let Some(at) = modified {
        if let Ok(value) = HeaderValue::from_str(&http_date(at)) {
            headers.insert(header::LAST_MODIFIED, value);
        }
    }
    if let Ok(value) = HeaderValue::from_str(&format!("max-age={CACHE_SECONDS}")) {
        headers.insert(header::CACHE_CONTROL, value);
    }
}

/// 304 response when the client copy of a page modified at `modified`
/// is current.
pub fn not_modified(headers: &HeaderMap, modified: DateTime<Utc>) -> Option<Response> {
    if !is_fresh(headers, modified) {
        return None;
    }
    let mut response = StatusCode::NOT_MODIFIED.into_response();
    cache_headers(&mut response, Some(modified));
    Some(response)
}

/// Full HTML response with cache headers.
pub fn page_response(modified: Option<DateTime<Utc>>, html: String) -> Response {
    let mut response = Html(html).into_response();
    cache_headers(&mut response, modified);
    response
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn at(h: u32, m: u32, s: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 3, 1, h, m, s).unwrap()
    }

    fn since(value: &str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(header::IF_MODIFIED_SINCE, HeaderValue::from_str(value).unwrap());
        headers
    }

    #[test]
    fn http_date_round_trip() {
        let stamp = at(12, 30, 5);
        assert_eq!(http_date(stamp), "Fri, 01 Mar 2024 12:30:05 GMT");
        assert_eq!(parse_http_date(&http_date(stamp)), Some(stamp));
        assert_eq!(parse_http_date("yesterday"), None);
    }

    #[test]
    fn freshness_uses_whole_seconds() {
        let modified = at(12, 30, 5) + chrono::Duration::milliseconds(400);
        assert!(is_fresh(&since("Fri, 01 Mar 2024 12:30:05 GMT"), modified));
        assert!(is_fresh(&since("Fri, 01 Mar 2024 13:00:00 GMT"), modified));
        assert!(!is_fresh(&since("Fri, 01 Mar 2024 12:30:04 GMT"), modified));
        assert!(!is_fresh(&since("garbage"), modified));
        assert!(!is_fresh(&HeaderMap::new(), modified));
    }

    #[test]
    fn cache_responses() {
        let headers = since("Fri, 01 Mar 2024 13:00:00 GMT");
        let response = not_modified(&headers, at(12, 0, 0)).unwrap();
        assert_eq!(response.status(), StatusCode::NOT_MODIFIED);
        assert!(not_modified(&headers, at(14, 0, 0)).is_none());

        let response = page_response(Some(at(12, 0, 0)), "<p>x</p>".into());
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(response.headers()[header::CACHE_CONTROL], "max-age=2592000");
        assert_eq!(
            response.headers()[header::LAST_MODIFIED],
            "Fri, 01 Mar 2024 12:00:00 GMT"
        );

        let response = page_response(None, String::new());
        assert!(response.headers().get(header::LAST_MODIFIED).is_none());
    }
}
