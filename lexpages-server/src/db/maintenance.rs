//! One-off content maintenance

use sqlx::{PgPool, Row};

use lexpages_core::html::Sanitizer;

use super::DbError;

/// Rows rewritten by [`fix_links`]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FixedLinks {
    pub pages: u64,
    pub questions: u64,
}

/// Re-run the rich-text clean-up over every stored page and question, so
/// absolute links to the own domain become relative. One transaction.
pub async fn fix_links(pool: &PgPool, sanitizer: &Sanitizer) -> Result<FixedLinks, DbError> {
    let mut tx = pool.begin().await?;
    let mut fixed = FixedLinks::default();

    let pages = sqlx::query("SELECT id, content FROM pages")
        .fetch_all(&mut *tx)
        .await?;
    for row in &pages {
        let id: i32 = row.try_get("id")?;
        let content: String = row.try_get("content")?;
        let cleaned = sanitizer.clean(&content);
        if cleaned != content {
            sqlx::query("UPDATE pages SET content = $2 WHERE id = $1")
                .bind(id)
                .bind(&cleaned)
                .execute(&mut *tx)
                .await?;
            fixed.pages += 1;
        }
    }

    let questions = sqlx::query("SELECT id, content_question, content_answer FROM questions")
        .fetch_all(&mut *tx)
        .await?;
    for row in &questions {
        let id: i32 = row.try_get("id")?;
        let question: String = row.try_get("content_question")?;
        let answer: String = row.try_get("content_answer")?;
        let (new_question, new_answer) = (sanitizer.clean(&question), sanitizer.clean(&answer));
        if new_question != question || new_answer != answer {
            sqlx::query("UPDATE questions SET content_question = $2, content_answer = $3 WHERE id = $1")
                .bind(id)
                .bind(&new_question)
                .bind(&new_answer)
                .execute(&mut *tx)
                .await?;
            fixed.questions += 1;
        }
    }

    tx.commit().await?;
    tracing::info!(pages = fixed.pages, questions = fixed.questions, "links fixed");
    Ok(fixed)
}
