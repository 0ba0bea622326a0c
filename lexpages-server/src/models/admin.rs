//! JSON shapes exchanged with the admin front-end

use serde::Serialize;

use lexpages_core::{CategoryEntry, Page, PageKind, PageTree, Question, TagText};

use crate::db::{CategoryCounts, Jurist};

/// Full page for the edit form
#[derive(Debug, Serialize)]
pub struct PageJson {
    pub id: i32,
    pub label: String,
    pub heading: String,
    pub title: String,
    pub description: String,
    pub content: String,
    pub visible_in_menu: bool,
    /// Categories always hang under main, so the form gets `null`.
    pub parent_id: Option<i32>,
    pub kind: PageKind,
    pub tags: Vec<TagText>,
    pub priority: i32,
    pub aux_field_1: String,
    pub aux_field_2: String,
    pub aux_field_3: String,
    pub url: Option<String>,
}

impl PageJson {
    /// `tree` must contain the page's ancestors.
    pub fn new(page: &Page, tree: &PageTree, tags: Vec<TagText>) -> Self {
        let [aux_field_1, aux_field_2, aux_field_3] = page.aux.clone();
        Self {
            id: page.id,
            label: page.label.clone(),
            heading: page.heading.clone(),
            title: page.title.clone(),
            description: page.description.clone(),
            content: page.content.clone(),
            visible_in_menu: page.visible_in_menu,
            parent_id: if page.kind == PageKind::Category {
                None
            } else {
                page.parent_id
            },
            kind: page.kind,
            tags,
            priority: page.priority,
            aux_field_1,
            aux_field_2,
            aux_field_3,
            url: tree.url(page.id),
        }
    }
}

/// Row of an admin page list
#[derive(Debug, Serialize)]
pub struct PageSummary {
    pub id: i32,
    pub label: String,
    pub heading: String,
    pub kind: PageKind,
    pub priority: i32,
    pub visible_in_menu: bool,
    pub url: Option<String>,
    /// Headings of the ancestors below main, outermost first.
    pub parents: Vec<String>,
}

impl PageSummary {
    pub fn new(page: &Page, tree: &PageTree) -> Self {
        let parents = tree
            .parents(page.id)
            .into_iter()
            .rev()
            .filter(|p| !p.is_main())
            .map(|p| p.heading.clone())
            .collect();
        Self {
            id: page.id,
            label: page.label.clone(),
            heading: page.heading.clone(),
            kind: page.kind,
            priority: page.priority,
            visible_in_menu: page.visible_in_menu,
            url: tree.url(page.id),
            parents,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct QuestionJson {
    pub id: i32,
    pub parent_id: i32,
    pub heading: String,
    pub author: String,
    pub content_question: String,
    pub content_answer: String,
    pub tags: Vec<TagText>,
    pub jurist_id: Option<i32>,
    pub url: String,
}

impl QuestionJson {
    pub fn new(q: Question, tags: Vec<TagText>) -> Self {
        Self {
            url: q.url(),
            id: q.id,
            parent_id: q.parent_id,
            heading: q.heading,
            author: q.author,
            content_question: q.content_question,
            content_answer: q.content_answer,
            tags,
            jurist_id: q.jurist_id,
        }
    }
}

/// Row of the admin question list
#[derive(Debug, Serialize)]
pub struct QuestionSummary {
    pub id: i32,
    pub heading: String,
    pub author: String,
    pub parent_id: i32,
    /// Heading of the parent category, when it still exists.
    pub category: Option<String>,
    pub answered: bool,
    pub date_created: String,
    pub url: String,
}

impl QuestionSummary {
    pub fn new(q: &Question, tree: &PageTree) -> Self {
        Self {
            id: q.id,
            heading: q.heading.clone(),
            author: q.author.clone(),
            parent_id: q.parent_id,
            category: tree.get(q.parent_id).map(|p| p.heading.clone()),
            answered: q.is_answer_provided(),
            date_created: q.date_created.to_rfc3339(),
            url: q.url(),
        }
    }
}

/// Entry of the category picker, with what hangs under it
#[derive(Debug, Serialize)]
pub struct CategoryJson {
    pub id: i32,
    pub name: String,
    pub questions: i64,
    pub services: i64,
    pub papers: i64,
}

impl CategoryJson {
    pub fn new(entry: CategoryEntry<'_>, counts: CategoryCounts) -> Self {
        Self {
            id: entry.page.id,
            name: entry.name,
            questions: counts.questions,
            services: counts.services,
            papers: counts.papers,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct JuristJson {
    pub id: i32,
    pub name: String,
}

impl From<Jurist> for JuristJson {
    fn from(j: Jurist) -> Self {
        Self { id: j.id, name: j.name }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use serde_json::json;

    fn page(id: i32, label: &str, kind: PageKind, parent: Option<(i32, PageKind)>) -> Page {
        let now = Utc::now();
        Page {
            id,
            label: label.into(),
            heading: label.to_uppercase(),
            title: String::new(),
            description: String::new(),
            content: String::new(),
            kind,
            priority: 0,
            visible_in_menu: true,
            parent_id: parent.map(|p| p.0),
            parent_kind: parent.map(|p| p.1),
            aux: Default::default(),
            date_created: now,
            date_modified: now,
        }
    }

    #[test]
    fn category_json_hides_parent() {
        let tree = PageTree::new([
            page(1, "main", PageKind::Main, None),
            page(2, "family", PageKind::Category, Some((1, PageKind::Main))),
        ]);
        let family = tree.get(2).unwrap();
        let value = serde_json::to_value(PageJson::new(family, &tree, vec![])).unwrap();
        assert_eq!(value["parent_id"], json!(null));
        assert_eq!(value["kind"], json!("category"));
        assert_eq!(value["url"], json!("/family/"));
    }

    #[test]
    fn summary_lists_parents_outermost_first() {
        let tree = PageTree::new([
            page(1, "main", PageKind::Main, None),
            page(2, "family", PageKind::Category, Some((1, PageKind::Main))),
            page(4, "alimony", PageKind::Subcategory, Some((2, PageKind::Category))),
            page(6, "calc", PageKind::Paper, Some((4, PageKind::Subcategory))),
        ]);
        let summary = PageSummary::new(tree.get(6).unwrap(), &tree);
        assert_eq!(summary.parents, ["FAMILY", "ALIMONY"]);
        assert_eq!(summary.url.as_deref(), Some("/family/alimony/calc/"));
    }
}
