//! Page records and the render-ready page view

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::html;
use crate::kind::PageKind;

/// Number of inherited auxiliary fields per page.
pub const AUX_FIELDS: usize = 3;

/// A page row as stored
#[derive(Debug, Clone, PartialEq)]
pub struct Page {
    pub id: i32,
    pub label: String,
    pub heading: String,
    pub title: String,
    pub description: String,
    pub content: String,
    pub kind: PageKind,
    pub priority: i32,
    pub visible_in_menu: bool,
    pub parent_id: Option<i32>,
    pub parent_kind: Option<PageKind>,
    pub aux: [String; AUX_FIELDS],
    pub date_created: DateTime<Utc>,
    pub date_modified: DateTime<Utc>,
}

impl Page {
    pub fn is_main(&self) -> bool {
        self.kind == PageKind::Main
    }

    pub fn is_parent_of(&self, other: &Page) -> bool {
        other.parent_id == Some(self.id)
    }

    /// Whether the page has no content. With `strip_tags`, markup-only
    /// content (e.g. `<p></p>`) also counts as empty.
    pub fn is_content_empty(&self, strip_tags: bool) -> bool {
        if strip_tags {
            html::strip_tags(&self.content).trim().is_empty()
        } else {
            self.content.trim().is_empty()
        }
    }

    /// Services without content are hidden from the public site.
    pub fn should_be_404(&self) -> bool {
        self.kind == PageKind::Service && self.is_content_empty(false)
    }
}

/// One step of the breadcrumb trail. The current page has no URL.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Breadcrumb {
    pub name: String,
    pub url: Option<String>,
}

impl Breadcrumb {
    pub fn new(name: impl Into<String>, url: Option<String>) -> Self {
        Self {
            name: name.into(),
            url,
        }
    }
}

/// Navigation menu entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MenuItem {
    pub name: String,
    pub url: Option<String>,
    pub important: bool,
}

/// Tag as exchanged with the admin front-end
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TagText {
    pub text: String,
}

/// Everything the renderer needs to draw a page, whether it is a stored
/// page, a question or an ad-hoc page like the 404.
#[derive(Debug, Clone, Default)]
pub struct PageView {
    pub label: Option<String>,
    pub kind: Option<PageKind>,
    pub heading: String,
    pub title: String,
    pub description: String,
    pub content: String,
    pub aux: [String; AUX_FIELDS],
    pub breadcrumbs: Vec<Breadcrumb>,
    pub url: Option<String>,
    pub date_modified: Option<DateTime<Utc>>,
}

impl PageView {
    /// A page that only has a heading (404, thank-you page).
    pub fn bare(heading: impl Into<String>) -> Self {
        let heading = heading.into();
        Self {
            kind: Some(PageKind::Static),
            title: heading.clone(),
            heading,
            ..Self::default()
        }
    }

    /// Text for the `<title>` element: the title, or the heading when the
    /// title is blank.
    pub fn document_title(&self) -> &str {
        if self.title.trim().is_empty() {
            &self.heading
        } else {
            &self.title
        }
    }
}

#[cfg(test)]
pub(crate) mod fixtures {
    use super::*;

    pub fn page(id: i32, label: &str, kind: PageKind, parent: Option<(i32, PageKind)>) -> Page {
        let now = Utc::now();
        Page {
            id,
            label: label.to_owned(),
            heading: label.to_uppercase(),
            title: String::new(),
            description: String::new(),
            content: format!("<p>{label}</p>"),
            kind,
            priority: 0,
            visible_in_menu: true,
            parent_id: parent.map(|(id, _)| id),
            parent_kind: parent.map(|(_, kind)| kind),
            aux: Default::default(),
            date_created: now,
            date_modified: now,
        }
    }
}
