//! Question repository

use chrono::{DateTime, Utc};
use sqlx::postgres::PgRow;
use sqlx::{PgConnection, PgPool, Row};

use lexpages_core::{Question, QuestionInput, ValidationError};

use super::error::decode_kind;
use super::tags::{replace_tags, Tagged};
use super::DbError;
use crate::models::{Paginated, Pagination};

const COLUMNS: &str = "id, parent_id, jurist_id, heading, content_question, content_answer, \
    author, date_created, date_modified";

pub(crate) fn question_from_row(row: &PgRow) -> Result<Question, DbError> {
    Ok(Question {
        id: row.try_get("id")?,
        parent_id: row.try_get("parent_id")?,
        jurist_id: row.try_get("jurist_id")?,
        heading: row.try_get("heading")?,
        content_question: row.try_get("content_question")?,
        content_answer: row.try_get("content_answer")?,
        author: row.try_get("author")?,
        date_created: row.try_get("date_created")?,
        date_modified: row.try_get("date_modified")?,
    })
}

/// Question repository
pub struct QuestionRepo<'a> {
    pool: &'a PgPool,
}

impl<'a> QuestionRepo<'a> {
    pub fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    pub async fn get(&self, id: i32) -> Result<Question, DbError> {
        let row = sqlx::query(&format!("SELECT {COLUMNS} FROM questions WHERE id = $1"))
            .bind(id)
            .fetch_optional(self.pool)
            .await?
            .ok_or_else(|| DbError::not_found("question", id))?;
        question_from_row(&row)
    }

    /// All questions by id, for the admin list and the sitemap.
    pub async fn all(&self) -> Result<Vec<Question>, DbError> {
        let rows = sqlx::query(&format!("SELECT {COLUMNS} FROM questions ORDER BY id"))
            .fetch_all(self.pool)
            .await?;
        rows.iter().map(question_from_row).collect()
    }

    /// One page of the public listing, newest first.
    ///
    /// Uses a window function for the total in the same query.
    pub async fn list(&self, page: Pagination) -> Result<Paginated<Question>, DbError> {
        let rows = sqlx::query(&format!(
            r#"
            SELECT {COLUMNS}, COUNT(*) OVER() AS total
            FROM questions
            ORDER BY id DESC
            LIMIT $1 OFFSET $2
            "#
        ))
        .bind(page.limit() as i64)
        .bind(page.offset() as i64)
        .fetch_all(self.pool)
        .await?;

        let total = match rows.first() {
            Some(row) => row.try_get::<i64, _>("total")?,
            None => self.count().await?,
        };
        let items = rows.iter().map(question_from_row).collect::<Result<_, _>>()?;

        Ok(Paginated {
            items,
            total,
            page: page.page,
            per_page: page.per_page,
        })
    }

    pub async fn count(&self) -> Result<i64, DbError> {
        Ok(sqlx::query_scalar("SELECT COUNT(*) FROM questions")
            .fetch_one(self.pool)
            .await?)
    }

    /// Most recent modification time over all questions.
    pub async fn latest_modified(&self) -> Result<Option<DateTime<Utc>>, DbError> {
        Ok(sqlx::query_scalar("SELECT MAX(date_modified) FROM questions")
            .fetch_one(self.pool)
            .await?)
    }

    /// Create a question, returning its id.
    pub async fn create(&self, input: &QuestionInput) -> Result<i32, DbError> {
        let mut tx = self.pool.begin().await?;
        check_parent(&mut *tx, input.parent_id).await?;

        let id: i32 = sqlx::query_scalar(
            r#"
            INSERT INTO questions (
                parent_id, jurist_id, heading, content_question, content_answer, author
            )
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING id
            "#,
        )
        .bind(input.parent_id)
        .bind(input.jurist_id)
        .bind(&input.heading)
        .bind(&input.content_question)
        .bind(&input.content_answer)
        .bind(&input.author)
        .fetch_one(&mut *tx)
        .await?;

        replace_tags(&mut *tx, Tagged::Question(id), &input.tags).await?;
        tx.commit().await?;

        tracing::info!(question_id = id, "question created");
        Ok(id)
    }

    pub async fn update(&self, input: &QuestionInput) -> Result<(), DbError> {
        let id = input.id.ok_or(ValidationError::Missing { field: "id" })?;
        let mut tx = self.pool.begin().await?;
        check_parent(&mut *tx, input.parent_id).await?;

        let updated = sqlx::query(
            r#"
            UPDATE questions SET
                parent_id = $2, jurist_id = $3, heading = $4,
                content_question = $5, content_answer = $6, author = $7,
                date_modified = NOW()
            WHERE id = $1
            "#,
        )
        .bind(id)
        .bind(input.parent_id)
        .bind(input.jurist_id)
        .bind(&input.heading)
        .bind(&input.content_question)
        .bind(&input.content_answer)
        .bind(&input.author)
        .execute(&mut *tx)
        .await?
        .rows_affected();
        if updated == 0 {
            return Err(DbError::not_found("question", id));
        }

        replace_tags(&mut *tx, Tagged::Question(id), &input.tags).await?;
        tx.commit().await?;

        tracing::info!(question_id = id, "question updated");
        Ok(())
    }

    pub async fn delete(&self, id: i32) -> Result<(), DbError> {
        let deleted = sqlx::query("DELETE FROM questions WHERE id = $1")
            .bind(id)
            .execute(self.pool)
            .await?
            .rows_affected();
        if deleted == 0 {
            return Err(DbError::not_found("question", id));
        }
        tracing::info!(question_id = id, "question deleted");
        Ok(())
    }
}

/// Questions hang under categories and subcategories only.
async fn check_parent(conn: &mut PgConnection, parent_id: i32) -> Result<(), DbError> {
    let kind: String = sqlx::query_scalar("SELECT kind FROM pages WHERE id = $1")
        .bind(parent_id)
        .fetch_optional(conn)
        .await?
        .ok_or_else(|| DbError::not_found("page", parent_id))?;
    if !decode_kind("pages", &kind)?.is_category_like() {
        return Err(ValidationError::InvalidFormat {
            field: "parent_id",
            reason: "questions must belong to a category",
        }
        .into());
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::PageRepo;
    use lexpages_core::html::Sanitizer;
    use lexpages_core::PageInput;
    use serde_json::json;

    // Each test resets the schema.
    // Run with: DATABASE_URL=... cargo test -p lexpages-server -- --ignored --test-threads=1

    #[tokio::test]
    #[ignore = "requires database"]
    async fn listing_is_newest_first() {
        let url = std::env::var("DATABASE_URL").expect("DATABASE_URL required");
        let pool = crate::db::create_pool_with_options(&url, 2).await.unwrap();
        crate::db::migrations::reset(&pool).await.unwrap();
        crate::db::migrations::run(&pool).await.unwrap();

        let sanitizer = Sanitizer::new("jurist.example");
        let pages = PageRepo::new(&pool);
        for page in [
            json!({"label": "main", "heading": "Юрист", "kind": "main"}),
            json!({"label": "family", "heading": "Семья", "kind": "category"}),
        ] {
            pages.create(&PageInput::from_json(&page, &sanitizer).unwrap()).await.unwrap();
        }
        let family = pages.by_label("family").await.unwrap().unwrap();

        let repo = QuestionRepo::new(&pool);
        for n in 0..12 {
            let q = json!({"parent_id": family.id, "heading": format!("Вопрос номер {n}")});
            repo.create(&QuestionInput::from_json(&q, &sanitizer).unwrap()).await.unwrap();
        }

        let first = repo.list(Pagination::new(1, 10)).await.unwrap();
        assert_eq!(first.total, 12);
        assert_eq!(first.items.len(), 10);
        assert_eq!(first.items[0].heading, "Вопрос номер 11");

        let past_end = repo.list(Pagination::new(3, 10)).await.unwrap();
        assert!(past_end.items.is_empty());
        assert_eq!(past_end.total, 12);
    }
}
