//! Jurist repository (read-only through the API)

use serde::Serialize;
use sqlx::{FromRow, PgPool};

use super::DbError;

/// Jurist record from database
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Jurist {
    pub id: i32,
    pub name: String,
    pub job_title: String,
    pub face: String,
}

pub struct JuristRepo<'a> {
    pool: &'a PgPool,
}

impl<'a> JuristRepo<'a> {
    pub fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    pub async fn all(&self) -> Result<Vec<Jurist>, DbError> {
        Ok(
            sqlx::query_as::<_, Jurist>("SELECT id, name, job_title, face FROM jurists ORDER BY id")
                .fetch_all(self.pool)
                .await?,
        )
    }

    pub async fn find(&self, id: i32) -> Result<Option<Jurist>, DbError> {
        Ok(
            sqlx::query_as::<_, Jurist>("SELECT id, name, job_title, face FROM jurists WHERE id = $1")
                .bind(id)
                .fetch_optional(self.pool)
                .await?,
        )
    }

    /// Add the default jurist when the table is empty. Returns whether a
    /// row was inserted.
    pub async fn seed_default(&self) -> Result<bool, DbError> {
        let inserted = sqlx::query(
            r#"
            INSERT INTO jurists (name, job_title, face)
            SELECT $1, $2, $3
            WHERE NOT EXISTS (SELECT 1 FROM jurists)
            "#,
        )
        .bind("Борисов Олег Викторович")
        .bind("Юрист-консультант")
        .bind("face_1.png")
        .execute(self.pool)
        .await?
        .rows_affected();
        Ok(inserted > 0)
    }
}
