//! Shortcode repository

use sqlx::{FromRow, PgPool};

use lexpages_core::{Shortcode, ShortcodeInput, ShortcodeSet, ValidationError};

use super::DbError;

#[derive(Debug, Clone, FromRow)]
struct ShortcodeRow {
    id: i32,
    key: String,
    value: String,
    comment: String,
}

impl From<ShortcodeRow> for Shortcode {
    fn from(r: ShortcodeRow) -> Self {
        Shortcode {
            id: r.id,
            key: r.key,
            value: r.value,
            comment: r.comment,
        }
    }
}

pub struct ShortcodeRepo<'a> {
    pool: &'a PgPool,
}

impl<'a> ShortcodeRepo<'a> {
    pub fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    pub async fn get(&self, id: i32) -> Result<Shortcode, DbError> {
        sqlx::query_as::<_, ShortcodeRow>("SELECT id, key, value, comment FROM shortcodes WHERE id = $1")
            .bind(id)
            .fetch_optional(self.pool)
            .await?
            .map(Shortcode::from)
            .ok_or_else(|| DbError::not_found("shortcode", id))
    }

    /// All shortcodes by key.
    pub async fn all(&self) -> Result<Vec<Shortcode>, DbError> {
        let rows = sqlx::query_as::<_, ShortcodeRow>(
            "SELECT id, key, value, comment FROM shortcodes ORDER BY key",
        )
        .fetch_all(self.pool)
        .await?;
        Ok(rows.into_iter().map(Shortcode::from).collect())
    }

    /// Shortcodes for one render. A failed load renders without them.
    pub async fn load_set(&self) -> ShortcodeSet {
        match self.all().await {
            Ok(codes) => ShortcodeSet::new(codes),
            Err(e) => {
                tracing::error!(error = %e, "failed to load shortcodes");
                ShortcodeSet::default()
            }
        }
    }

    pub async fn create(&self, input: &ShortcodeInput) -> Result<i32, DbError> {
        let id: i32 = sqlx::query_scalar(
            "INSERT INTO shortcodes (key, value, comment) VALUES ($1, $2, $3) RETURNING id",
        )
        .bind(&input.key)
        .bind(&input.value)
        .bind(&input.comment)
        .fetch_one(self.pool)
        .await?;
        tracing::info!(shortcode_id = id, key = %input.key, "shortcode created");
        Ok(id)
    }

    pub async fn update(&self, input: &ShortcodeInput) -> Result<(), DbError> {
        let id = input.id.ok_or(ValidationError::Missing { field: "id" })?;
        let updated = sqlx::query("UPDATE shortcodes SET key = $2, value = $3, comment = $4 WHERE id = $1")
            .bind(id)
            .bind(&input.key)
            .bind(&input.value)
            .bind(&input.comment)
            .execute(self.pool)
            .await?
            .rows_affected();
        if updated == 0 {
            return Err(DbError::not_found("shortcode", id));
        }
        Ok(())
    }

    pub async fn delete(&self, id: i32) -> Result<(), DbError> {
        let deleted = sqlx::query("DELETE FROM shortcodes WHERE id = $1")
            .bind(id)
            .execute(self.pool)
            .await?
            .rows_affected();
        if deleted == 0 {
            return Err(DbError::not_found("shortcode", id));
        }
        Ok(())
    }
}
