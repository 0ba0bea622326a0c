//! HTML helpers: escaping, tag stripping, truncation and clean-up of
//! rich-text fields submitted through the admin API.

use once_cell::sync::Lazy;
use regex::Regex;

static TAG_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?s)<[^>]*>").expect("invalid tag regex"));

static SCRIPT_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?is)<(script|iframe|object|embed)\b[^>]*>.*?</\s*(script|iframe|object|embed)\s*>")
        .expect("invalid script regex")
});

static HANDLER_ATTR_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"(?i)\s+on[a-z]+\s*=\s*("[^"]*"|'[^']*'|[^\s>]+)"#).expect("invalid handler regex")
});

static JS_URL_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"(?i)(href|src)\s*=\s*(["'])\s*javascript:[^"']*(["'])"#)
        .expect("invalid javascript url regex")
});

/// Escape text for use inside HTML element content or quoted attributes.
pub fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(ch),
        }
    }
    out
}

/// Remove markup, keeping the text between tags. Common entities are
/// decoded so the result reads as plain text.
pub fn strip_tags(html: &str) -> String {
    TAG_RE
        .replace_all(html, " ")
        .replace("&nbsp;", " ")
        .replace("&quot;", "\"")
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&amp;", "&")
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

/// Truncate `text` to `length` characters on a word boundary, appending
/// `...`. Texts at most five characters over the limit are kept whole.
pub fn truncate_words(text: &str, length: usize) -> String {
    const END: &str = "...";
    const LEEWAY: usize = 5;

    if text.chars().count() <= length + LEEWAY {
        return text.to_owned();
    }
    let cut: String = text.chars().take(length.saturating_sub(END.len())).collect();
    let kept = match cut.rsplit_once(' ') {
        Some((head, _)) => head,
        None => cut.as_str(),
    };
    format!("{kept}{END}")
}

/// Clean-up applied to rich-text fields before they are stored.
#[derive(Debug, Clone)]
pub struct Sanitizer {
    own_links: Option<Regex>,
}

impl Sanitizer {
    /// `domain` is the site's own host name (e.g. `jurist.example`);
    /// absolute links to it are rewritten to site-relative ones.
    pub fn new(domain: &str) -> Self {
        let domain = domain.trim().trim_end_matches('/');
        let own_links = (!domain.is_empty()).then(|| {
            let pattern = format!(r#"(["'])https?://(?:www\.)?{}/"#, regex::escape(domain));
            Regex::new(&pattern).expect("escaped domain forms a valid regex")
        });
        Self { own_links }
    }

    /// Strip executable markup and relativise links to the own domain.
    pub fn clean(&self, html: &str) -> String {
        let without_scripts = SCRIPT_RE.replace_all(html, "");
        let without_handlers = HANDLER_ATTR_RE.replace_all(&without_scripts, "");
        let without_js_urls = JS_URL_RE.replace_all(&without_handlers, "$1=$2#$3");
        match &self.own_links {
            Some(re) => re.replace_all(&without_js_urls, "$1/").into_owned(),
            None => without_js_urls.into_owned(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn escapes_special_characters() {
        assert_eq!(escape(r#"<a href="x">&'"#), "&lt;a href=&quot;x&quot;&gt;&amp;&#39;");
        assert_eq!(escape("Юрист"), "Юрист");
    }

    #[test]
    fn strips_tags_and_collapses_whitespace() {
        assert_eq!(strip_tags("<p>Hello <b>world</b></p>\n<p>again</p>"), "Hello world again");
        assert_eq!(strip_tags("a&nbsp;&amp;&nbsp;b"), "a & b");
    }

    #[test]
    fn truncate_keeps_short_texts() {
        assert_eq!(truncate_words("short text", 170), "short text");
        let exactly = "a".repeat(175);
        assert_eq!(truncate_words(&exactly, 170), exactly);
    }

    #[test]
    fn truncate_cuts_on_word_boundary() {
        let text = "word ".repeat(50);
        let out = truncate_words(text.trim(), 20);
        assert_eq!(out, "word word word...");
        assert!(out.chars().count() <= 20);
    }

    #[test]
    fn truncate_counts_characters_not_bytes() {
        let text = "слово ".repeat(40);
        let out = truncate_words(&text, 30);
        assert!(out.ends_with("..."));
        assert!(out.chars().count() <= 30);
    }

    #[test]
    fn sanitizer_relativises_own_links() {
        let s = Sanitizer::new("jurist.example");
        let html = r#"<a href="http://jurist.example/family/">x</a> <a href="https://www.jurist.example/">y</a> <a href="http://other.example/">z</a>"#;
        assert_eq!(
            s.clean(html),
            r#"<a href="/family/">x</a> <a href="/">y</a> <a href="http://other.example/">z</a>"#
        );
    }

    #[test]
    fn sanitizer_strips_scripts_and_handlers() {
        let s = Sanitizer::new("");
        let html = r#"<p onclick="steal()">Hi</p><script>alert(1)</script><a href="javascript:evil()">x</a>"#;
        assert_eq!(s.clean(html), r##"<p>Hi</p><a href="#">x</a>"##);
    }
}
