//! Q&A entries and their synthetic page view

use chrono::{DateTime, Utc};

use crate::html;
use crate::kind::PageKind;
use crate::page::{Breadcrumb, PageView};
use crate::tree::PageTree;

/// Label of the static page hosting the Q&A listing.
pub const QUESTION_ANSWER_LABEL: &str = "question-answer";

/// Maximum length of a question's generated meta description.
const DESCRIPTION_LENGTH: usize = 170;

#[derive(Debug, Clone, PartialEq)]
pub struct Question {
    pub id: i32,
    pub parent_id: i32,
    pub jurist_id: Option<i32>,
    pub heading: String,
    pub content_question: String,
    pub content_answer: String,
    pub author: String,
    pub date_created: DateTime<Utc>,
    pub date_modified: DateTime<Utc>,
}

impl Question {
    pub fn url(&self) -> String {
        question_url(self.id)
    }

    pub fn is_answer_provided(&self) -> bool {
        !self.content_answer.trim().is_empty()
    }

    /// Plain-text question body cut to a meta description.
    pub fn description(&self) -> String {
        html::truncate_words(&html::strip_tags(&self.content_question), DESCRIPTION_LENGTH)
    }

    /// Page-like view used to render the question. `pages` must contain
    /// the main page and the Q&A page for the breadcrumb trail.
    pub fn page_view(&self, pages: &PageTree) -> PageView {
        let mut breadcrumbs = Vec::with_capacity(3);
        if let Some(main) = pages.main() {
            breadcrumbs.push(Breadcrumb::new(main.heading.clone(), pages.url(main.id)));
        }
        if let Some(qa) = pages.by_label(QUESTION_ANSWER_LABEL) {
            breadcrumbs.push(Breadcrumb::new(qa.heading.clone(), pages.url(qa.id)));
        }
        breadcrumbs.push(Breadcrumb::new(self.heading.clone(), None));

        let aux = pages
            .by_label(QUESTION_ANSWER_LABEL)
            .map(|qa| pages.aux_fields(qa.id))
            .unwrap_or_default();

        PageView {
            label: None,
            kind: Some(PageKind::Static),
            heading: self.heading.clone(),
            title: self.heading.clone(),
            description: self.description(),
            content: String::new(),
            aux,
            breadcrumbs,
            url: Some(self.url()),
            date_modified: Some(self.date_modified),
        }
    }
}

pub fn question_url(id: i32) -> String {
    format!("/{QUESTION_ANSWER_LABEL}/{id}/")
}
