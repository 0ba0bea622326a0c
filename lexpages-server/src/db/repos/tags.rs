//! Tag repository
//!
//! Tag names are unique case-insensitively; lookups and inserts always
//! compare `lower(name)`.

use sqlx::{PgConnection, PgPool};

use lexpages_core::TagText;

use super::DbError;

/// Entity a tag set is attached to
#[derive(Debug, Clone, Copy)]
pub enum Tagged {
    Page(i32),
    Question(i32),
}

impl Tagged {
    fn table(self) -> (&'static str, &'static str, i32) {
        match self {
            Self::Page(id) => ("pages_and_tags", "page_id", id),
            Self::Question(id) => ("questions_and_tags", "question_id", id),
        }
    }
}

pub struct TagRepo<'a> {
    pool: &'a PgPool,
}

impl<'a> TagRepo<'a> {
    pub fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Tags whose name contains `query`, case-insensitively, by name.
    pub async fn autocomplete(&self, query: &str) -> Result<Vec<TagText>, DbError> {
        let pattern = format!("%{}%", escape_like(query.trim()));
        let names: Vec<String> =
            sqlx::query_scalar("SELECT name FROM tags WHERE name ILIKE $1 ORDER BY name")
                .bind(pattern)
                .fetch_all(self.pool)
                .await?;
        Ok(names.into_iter().map(|text| TagText { text }).collect())
    }

    /// Tags attached to `target`, by name.
    pub async fn for_entity(&self, target: Tagged) -> Result<Vec<TagText>, DbError> {
        let (table, column, id) = target.table();
        let names: Vec<String> = sqlx::query_scalar(&format!(
            r#"
            SELECT t.name
            FROM tags t
            JOIN {table} j ON j.tag_id = t.id
            WHERE j.{column} = $1
            ORDER BY t.name
            "#
        ))
        .bind(id)
        .fetch_all(self.pool)
        .await?;
        Ok(names.into_iter().map(|text| TagText { text }).collect())
    }
}

/// Replace the tags of `target` with `names`, creating missing tags.
/// `names` must already be deduplicated case-insensitively.
pub async fn replace_tags(conn: &mut PgConnection, target: Tagged, names: &[String]) -> Result<(), DbError> {
    for name in names {
        sqlx::query(
            r#"
            INSERT INTO tags (name)
            SELECT $1
            WHERE NOT EXISTS (SELECT 1 FROM tags WHERE lower(name) = lower($1))
            "#,
        )
        .bind(name)
        .execute(&mut *conn)
        .await?;
    }

    // Folded by Postgres on both sides.
    let ids: Vec<i32> = sqlx::query_scalar(
        "SELECT id FROM tags WHERE lower(name) = ANY(SELECT lower(x) FROM unnest($1::text[]) AS x)",
    )
    .bind(names)
    .fetch_all(&mut *conn)
    .await?;
    if ids.is_empty() && !names.is_empty() {
        return Err(DbError::Corrupt {
            table: "tags",
            reason: format!("none of {} tags found after insert", names.len()),
        });
    }

    let (table, column, id) = target.table();
    sqlx::query(&format!("DELETE FROM {table} WHERE {column} = $1"))
        .bind(id)
        .execute(&mut *conn)
        .await?;
    sqlx::query(&format!(
        "INSERT INTO {table} ({column}, tag_id) SELECT $1, unnest($2::int[])"
    ))
    .bind(id)
    .bind(&ids)
    .execute(&mut *conn)
    .await?;
    Ok(())
}

fn escape_like(s: &str) -> String {
    s.replace('\\', "\\\\").replace('%', "\\%").replace('_', "\\_")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn like_wildcards_are_escaped() {
        assert_eq!(escape_like("50%_off"), "50\\%\\_off");
        assert_eq!(escape_like("семья"), "семья");
    }

    #[tokio::test]
    #[ignore = "requires database"]
    async fn tags_are_case_insensitive() {
        let url = std::env::var("DATABASE_URL").expect("DATABASE_URL required");
        let pool = crate::db::create_pool_with_options(&url, 2).await.unwrap();
        crate::db::migrations::run(&pool).await.unwrap();

        let mut tx = pool.begin().await.unwrap();
        let main_id: i32 = sqlx::query_scalar(
            "INSERT INTO pages (label, heading, kind) VALUES ('main', 'Main', 'main')
             ON CONFLICT (label) DO UPDATE SET heading = pages.heading RETURNING id",
        )
        .fetch_one(&mut *tx)
        .await
        .unwrap();
        replace_tags(&mut *tx, Tagged::Page(main_id), &["Развод".into()]).await.unwrap();
        replace_tags(&mut *tx, Tagged::Page(main_id), &["развод".into()]).await.unwrap();
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM tags WHERE lower(name) = 'развод'")
            .fetch_one(&mut *tx)
            .await
            .unwrap();
        assert_eq!(count, 1);

        // Final sigma folds differently in Rust and in Postgres.
        replace_tags(&mut *tx, Tagged::Page(main_id), &["ΟΔΟΣ".into(), "Развод".into()]).await.unwrap();
        let attached: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM pages_and_tags WHERE page_id = $1")
            .bind(main_id)
            .fetch_one(&mut *tx)
            .await
            .unwrap();
        assert_eq!(attached, 2);
        tx.rollback().await.unwrap();
    }
}
