//! Page shell: head, header, menu, breadcrumbs, footer

use lexpages_core::html::escape;
use lexpages_core::{Breadcrumb, MenuItem, PageView, ShortcodeSet};

const DEFAULT_COMPANY: &str = "Юридическая консультация";
const DEFAULT_PHONE: &str = "+7 (495) 000-00-00";

/// Per-request rendering context
#[derive(Clone, Copy)]
pub struct Site<'a> {
    /// Absolute site root without a trailing slash
    pub base_url: &'a str,
    pub shortcodes: &'a ShortcodeSet,
}

impl<'a> Site<'a> {
    pub fn new(base_url: &'a str, shortcodes: &'a ShortcodeSet) -> Self {
        Self {
            base_url,
            shortcodes,
        }
    }

    /// Rich text with shortcodes substituted.
    pub fn rich(&self, html: &str) -> String {
        self.shortcodes.apply(html)
    }

    pub fn absolute(&self, url: &str) -> String {
        format!("{}{}", self.base_url, url)
    }

    /// Escaped shortcode value for layout fragments.
    pub fn fragment(&self, key: &str, default: &str) -> String {
        escape(self.shortcodes.get(key, default))
    }
}

pub(crate) fn document(site: &Site<'_>, view: &PageView, menu: &[MenuItem], body: &str) -> String {
    let canonical = view
        .url
        .as_deref()
        .map(|url| format!(r#"<link rel="canonical" href="{}">"#, escape(&site.absolute(url))))
        .unwrap_or_default();
    let company = site.fragment("company-name", DEFAULT_COMPANY);
    let [header_note, sidebar, footer_note] = &view.aux;

    format!(
        r#"<!DOCTYPE html>
<html lang="ru">
<head>
<meta charset="utf-8">
<meta name="viewport" content="width=device-width, initial-scale=1">
<title>{title}</title>
<meta name="description" content="{description}">
{canonical}
<link rel="stylesheet" href="/static/company/css/main.css">
</head>
<body>
<header class="site-header">
<a class="logo" href="/">{company}</a>
<a class="phone" href="tel:{phone}">{phone}</a>
<div class="header-note">{header_note}</div>
</header>
{menu}
<main class="content">
{breadcrumbs}
<h1>{heading}</h1>
{body}
</main>
<aside class="sidebar">{sidebar}</aside>
<footer class="site-footer">
{footer_note}
<p>&copy; {company}</p>
</footer>
<script src="/static/company/js/custom.js"></script>
</body>
</html>
"#,
        title = escape(view.document_title()),
        description = escape(&view.description),
        phone = site.fragment("phone", DEFAULT_PHONE),
        header_note = site.rich(header_note),
        menu = menu_html(menu),
        breadcrumbs = breadcrumbs_html(&view.breadcrumbs),
        heading = escape(&view.heading),
        sidebar = site.rich(sidebar),
        footer_note = site.rich(footer_note),
    )
}

fn menu_html(menu: &[MenuItem]) -> String {
    if menu.is_empty() {
        return String::new();
    }
    let items: String = menu
        .iter()
        .map(|item| {
            let class = if item.important { r#" class="important""# } else { "" };
            let name = escape(&item.name);
            match &item.url {
                Some(url) => format!(r#"<li{class}><a href="{}">{name}</a></li>"#, escape(url)),
                None => format!("<li{class}><span>{name}</span></li>"),
            }
        })
        .collect();
    format!(r#"<nav class="menu"><ul>{items}</ul></nav>"#)
}

fn breadcrumbs_html(crumbs: &[Breadcrumb]) -> String {
    if crumbs.is_empty() {
        return String::new();
    }
    let items: String = crumbs
        .iter()
        .map(|c| {
            let name = escape(&c.name);
            match &c.url {
                Some(url) => format!(r#"<li><a href="{}">{name}</a></li>"#, escape(url)),
                None => format!("<li>{name}</li>"),
            }
        })
        .collect();
    format!(r#"<ol class="breadcrumbs">{items}</ol>"#)
}
