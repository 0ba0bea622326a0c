//! Page repository
//!
//! - Reads return core `Page` values; positional data (URLs, menus,
//!   breadcrumbs) is derived from a `PageTree` built from them
//! - Writes run in one transaction: parent assignment, row, tags
//! - Parent kinds are checked against the relation table before the
//!   database sees them; the composite foreign keys back that up

use std::collections::HashMap;

use async_trait::async_trait;
use sqlx::postgres::PgRow;
use sqlx::{PgConnection, PgPool, Row};

use lexpages_core::label::LabelRegistry;
use lexpages_core::page::AUX_FIELDS;
use lexpages_core::resolve::PageSource;
use lexpages_core::{CoreError, Page, PageInput, PageKind, PageTree, ValidationError};

use super::error::decode_kind;
use super::tags::{replace_tags, Tagged};
use super::DbError;

const COLUMNS: &str = "id, label, heading, title, description, content, kind, priority, \
    visible_in_menu, parent_id, parent_kind, aux_field_1, aux_field_2, aux_field_3, \
    date_created, date_modified";

/// Ancestor walk limit, matching the tree's own guard.
const MAX_DEPTH: i32 = 8;

/// Number of questions, services and papers under a category
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CategoryCounts {
    pub questions: i64,
    pub services: i64,
    pub papers: i64,
}

pub(crate) fn page_from_row(row: &PgRow) -> Result<Page, DbError> {
    let kind: String = row.try_get("kind")?;
    let parent_kind: Option<String> = row.try_get("parent_kind")?;
    let aux: [String; AUX_FIELDS] = [
        row.try_get("aux_field_1")?,
        row.try_get("aux_field_2")?,
        row.try_get("aux_field_3")?,
    ];
    Ok(Page {
        id: row.try_get("id")?,
        label: row.try_get("label")?,
        heading: row.try_get("heading")?,
        title: row.try_get("title")?,
        description: row.try_get("description")?,
        content: row.try_get("content")?,
        kind: decode_kind("pages", &kind)?,
        priority: row.try_get("priority")?,
        visible_in_menu: row.try_get("visible_in_menu")?,
        parent_id: row.try_get("parent_id")?,
        parent_kind: parent_kind.as_deref().map(|k| decode_kind("pages", k)).transpose()?,
        aux,
        date_created: row.try_get("date_created")?,
        date_modified: row.try_get("date_modified")?,
    })
}

fn pages_from_rows(rows: &[PgRow]) -> Result<Vec<Page>, DbError> {
    rows.iter().map(page_from_row).collect()
}

/// Page repository
pub struct PageRepo<'a> {
    pool: &'a PgPool,
}

impl<'a> PageRepo<'a> {
    pub fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    pub async fn find(&self, id: i32) -> Result<Option<Page>, DbError> {
        let row = sqlx::query(&format!("SELECT {COLUMNS} FROM pages WHERE id = $1"))
            .bind(id)
            .fetch_optional(self.pool)
            .await?;
        row.as_ref().map(page_from_row).transpose()
    }

    pub async fn get(&self, id: i32) -> Result<Page, DbError> {
        self.find(id).await?.ok_or_else(|| DbError::not_found("page", id))
    }

    pub async fn by_label(&self, label: &str) -> Result<Option<Page>, DbError> {
        let row = sqlx::query(&format!("SELECT {COLUMNS} FROM pages WHERE label = $1"))
            .bind(label)
            .fetch_optional(self.pool)
            .await?;
        row.as_ref().map(page_from_row).transpose()
    }

    pub async fn main_page(&self) -> Result<Option<Page>, DbError> {
        let row = sqlx::query(&format!("SELECT {COLUMNS} FROM pages WHERE kind = 'main'"))
            .fetch_optional(self.pool)
            .await?;
        row.as_ref().map(page_from_row).transpose()
    }

    /// The page and its ancestors, nearest first, in one recursive query.
    pub async fn chain(&self, id: i32) -> Result<Vec<Page>, DbError> {
        let rows = sqlx::query(&format!(
            r#"
            WITH RECURSIVE chain AS (
                SELECT {COLUMNS}, 0 AS depth FROM pages WHERE id = $1
                UNION ALL
                SELECT p.*, c.depth + 1
                FROM (SELECT {COLUMNS} FROM pages) p
                JOIN chain c ON p.id = c.parent_id
                WHERE c.depth < $2
            )
            SELECT {COLUMNS} FROM chain ORDER BY depth
            "#
        ))
        .bind(id)
        .bind(MAX_DEPTH)
        .fetch_all(self.pool)
        .await?;
        pages_from_rows(&rows)
    }

    pub async fn children(&self, parent_id: i32) -> Result<Vec<Page>, DbError> {
        let rows = sqlx::query(&format!(
            "SELECT {COLUMNS} FROM pages WHERE parent_id = $1 ORDER BY priority, id"
        ))
        .bind(parent_id)
        .fetch_all(self.pool)
        .await?;
        pages_from_rows(&rows)
    }

    pub async fn all(&self) -> Result<Vec<Page>, DbError> {
        let rows = sqlx::query(&format!("SELECT {COLUMNS} FROM pages ORDER BY id"))
            .fetch_all(self.pool)
            .await?;
        pages_from_rows(&rows)
    }

    /// The whole site as a tree.
    pub async fn tree(&self) -> Result<PageTree, DbError> {
        Ok(PageTree::new(self.all().await?))
    }

    /// Tree holding `page`'s ancestor chain and its menu candidates:
    /// everything needed to render it.
    pub async fn render_tree(&self, page: &Page) -> Result<PageTree, DbError> {
        let mut tree = PageTree::new(self.chain(page.id).await?);
        if let Some(parent_id) = PageTree::menu_parent(page) {
            tree.extend(self.children(parent_id).await?);
        }
        Ok(tree)
    }

    /// Question, service and paper counts per category-like page.
    pub async fn category_counts(&self) -> Result<HashMap<i32, CategoryCounts>, DbError> {
        let rows = sqlx::query(
            r#"
            SELECT
                c.id,
                (SELECT COUNT(*) FROM questions q WHERE q.parent_id = c.id) AS questions,
                (SELECT COUNT(*) FROM pages s WHERE s.parent_id = c.id AND s.kind = 'service') AS services,
                (SELECT COUNT(*) FROM pages p WHERE p.parent_id = c.id AND p.kind = 'paper') AS papers
            FROM pages c
            WHERE c.kind IN ('category', 'subcategory')
            "#,
        )
        .fetch_all(self.pool)
        .await?;

        rows.iter()
            .map(|r| -> Result<(i32, CategoryCounts), DbError> {
                Ok((
                    r.try_get("id")?,
                    CategoryCounts {
                        questions: r.try_get("questions")?,
                        services: r.try_get("services")?,
                        papers: r.try_get("papers")?,
                    },
                ))
            })
            .collect()
    }

    /// Create a page, returning its id.
    pub async fn create(&self, input: &PageInput) -> Result<i32, DbError> {
        let mut tx = self.pool.begin().await?;
        let parent = assign_parent(&mut *tx, input, None).await?;

        let id: i32 = sqlx::query_scalar(
            r#"
            INSERT INTO pages (
                label, heading, title, description, content, kind, priority,
                visible_in_menu, parent_id, parent_kind,
                aux_field_1, aux_field_2, aux_field_3
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13)
            RETURNING id
            "#,
        )
        .bind(&input.label)
        .bind(&input.heading)
        .bind(&input.title)
        .bind(&input.description)
        .bind(&input.content)
        .bind(input.kind.as_str())
        .bind(input.priority)
        .bind(input.visible_in_menu)
        .bind(parent.map(|(id, _)| id))
        .bind(parent.map(|(_, kind)| kind.as_str()))
        .bind(&input.aux[0])
        .bind(&input.aux[1])
        .bind(&input.aux[2])
        .fetch_one(&mut *tx)
        .await?;

        replace_tags(&mut *tx, Tagged::Page(id), &input.tags).await?;
        tx.commit().await?;

        tracing::info!(page_id = id, label = %input.label, kind = %input.kind, "page created");
        Ok(id)
    }

    /// Rewrite every mutable field of the page `input.id`.
    pub async fn update(&self, input: &PageInput) -> Result<(), DbError> {
        let id = input.id.ok_or(ValidationError::Missing { field: "id" })?;
        let mut tx = self.pool.begin().await?;
        let parent = assign_parent(&mut *tx, input, Some(id)).await?;

        let updated = sqlx::query(
            r#"
            UPDATE pages SET
                label = $2, heading = $3, title = $4, description = $5,
                content = $6, kind = $7, priority = $8, visible_in_menu = $9,
                parent_id = $10, parent_kind = $11,
                aux_field_1 = $12, aux_field_2 = $13, aux_field_3 = $14,
                date_modified = NOW()
            WHERE id = $1
            "#,
        )
        .bind(id)
        .bind(&input.label)
        .bind(&input.heading)
        .bind(&input.title)
        .bind(&input.description)
        .bind(&input.content)
        .bind(input.kind.as_str())
        .bind(input.priority)
        .bind(input.visible_in_menu)
        .bind(parent.map(|(id, _)| id))
        .bind(parent.map(|(_, kind)| kind.as_str()))
        .bind(&input.aux[0])
        .bind(&input.aux[1])
        .bind(&input.aux[2])
        .execute(&mut *tx)
        .await?
        .rows_affected();
        if updated == 0 {
            return Err(DbError::not_found("page", id));
        }

        replace_tags(&mut *tx, Tagged::Page(id), &input.tags).await?;
        tx.commit().await?;

        tracing::info!(page_id = id, label = %input.label, "page updated");
        Ok(())
    }

    /// Delete a page and, through the foreign keys, its whole subtree.
    pub async fn delete(&self, id: i32) -> Result<(), DbError> {
        let deleted = sqlx::query("DELETE FROM pages WHERE id = $1")
            .bind(id)
            .execute(self.pool)
            .await?
            .rows_affected();
        if deleted == 0 {
            return Err(DbError::not_found("page", id));
        }
        tracing::info!(page_id = id, "page deleted");
        Ok(())
    }
}

/// Parent of a page being written: none for main, the main page for
/// top-level kinds, otherwise the requested `parent_id`.
async fn assign_parent(
    conn: &mut PgConnection,
    input: &PageInput,
    own_id: Option<i32>,
) -> Result<Option<(i32, PageKind)>, DbError> {
    let parent_row = match input.kind {
        PageKind::Main => return Ok(None),
        kind if kind.is_top_level() => {
            sqlx::query("SELECT id, kind FROM pages WHERE kind = 'main'")
                .fetch_optional(&mut *conn)
                .await?
                .ok_or_else(|| DbError::not_found("page", "main"))?
        }
        _ => {
            let parent_id = input
                .parent_id
                .ok_or(ValidationError::Missing { field: "parent_id" })?;
            if Some(parent_id) == own_id {
                return Err(ValidationError::InvalidFormat {
                    field: "parent_id",
                    reason: "a page cannot be its own parent",
                }
                .into());
            }
            sqlx::query("SELECT id, kind FROM pages WHERE id = $1")
                .bind(parent_id)
                .fetch_optional(&mut *conn)
                .await?
                .ok_or_else(|| DbError::not_found("page", parent_id))?
        }
    };

    let parent_id: i32 = parent_row.try_get("id")?;
    let parent_kind = decode_kind("pages", parent_row.try_get::<&str, _>("kind")?)?;
    if !input.kind.accepts_parent(Some(parent_kind)) {
        return Err(CoreError::IncompatibleParent {
            child: input.kind,
            parent: Some(parent_kind),
        }
        .into());
    }
    Ok(Some((parent_id, parent_kind)))
}

#[async_trait]
impl LabelRegistry for PageRepo<'_> {
    type Error = DbError;

    async fn is_vacant(&self, label: &str, exclude: Option<i32>) -> Result<bool, DbError> {
        let taken: bool = sqlx::query_scalar(
            "SELECT EXISTS(SELECT 1 FROM pages WHERE label = $1 AND id IS DISTINCT FROM $2)",
        )
        .bind(label)
        .bind(exclude)
        .fetch_one(self.pool)
        .await?;
        Ok(!taken)
    }
}

#[async_trait]
impl PageSource for PageRepo<'_> {
    type Error = DbError;

    async fn page_by_label(&self, label: &str) -> Result<Option<Page>, DbError> {
        self.by_label(label).await
    }
}
