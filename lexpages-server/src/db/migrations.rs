//! Schema bootstrap and reference data
//!
//! Every statement is idempotent, so `run` is safe on each start.

use sqlx::PgPool;

use lexpages_core::kind::{PageKind, RELATIONS};

/// Tables in dependency order (parents first).
const TABLES: &[&str] = &[
    "kinds",
    "possible_relations",
    "tags",
    "pages",
    "pages_and_tags",
    "jurists",
    "questions",
    "questions_and_tags",
    "shortcodes",
    "users",
];

const SCHEMA: &[&str] = &[
    r#"
    CREATE TABLE IF NOT EXISTS kinds (
        kind TEXT PRIMARY KEY CHECK (kind ~ '^[a-z]{1,}$')
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS possible_relations (
        child_kind TEXT NOT NULL REFERENCES kinds (kind),
        parent_kind TEXT NOT NULL REFERENCES kinds (kind),
        PRIMARY KEY (child_kind, parent_kind)
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS tags (
        id SERIAL PRIMARY KEY,
        name TEXT NOT NULL UNIQUE CHECK (length(name) > 1)
    )
    "#,
    r#"
    CREATE UNIQUE INDEX IF NOT EXISTS index_unique_lowercase_tag_name
        ON tags (lower(name))
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS pages (
        id SERIAL PRIMARY KEY,
        label TEXT NOT NULL UNIQUE CHECK (label ~ '^[a-z0-9-]{1,}$'),
        heading TEXT NOT NULL CHECK (length(heading) > 0),
        title TEXT NOT NULL DEFAULT '',
        description TEXT NOT NULL DEFAULT '',
        content TEXT NOT NULL DEFAULT '',
        kind TEXT NOT NULL REFERENCES kinds (kind),
        priority INTEGER NOT NULL DEFAULT 0,
        visible_in_menu BOOLEAN NOT NULL DEFAULT TRUE,
        parent_id INTEGER,
        parent_kind TEXT,
        aux_field_1 TEXT NOT NULL DEFAULT '',
        aux_field_2 TEXT NOT NULL DEFAULT '',
        aux_field_3 TEXT NOT NULL DEFAULT '',
        date_created TIMESTAMPTZ NOT NULL DEFAULT NOW(),
        date_modified TIMESTAMPTZ NOT NULL DEFAULT NOW(),
        UNIQUE (id, kind),
        FOREIGN KEY (parent_id, parent_kind) REFERENCES pages (id, kind)
            ON UPDATE CASCADE ON DELETE CASCADE,
        FOREIGN KEY (kind, parent_kind)
            REFERENCES possible_relations (child_kind, parent_kind),
        CHECK (id <> parent_id),
        CHECK (
            (label = 'main' AND kind = 'main'
                AND parent_id IS NULL AND parent_kind IS NULL)
            OR
            (label <> 'main' AND kind <> 'main'
                AND parent_id IS NOT NULL AND parent_kind IS NOT NULL)
        )
    )
    "#,
    r#"
    CREATE UNIQUE INDEX IF NOT EXISTS index_single_main_page
        ON pages (kind) WHERE kind = 'main'
    "#,
    r#"
    CREATE INDEX IF NOT EXISTS index_pages_parent ON pages (parent_id)
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS pages_and_tags (
        page_id INTEGER NOT NULL REFERENCES pages (id) ON DELETE CASCADE,
        tag_id INTEGER NOT NULL REFERENCES tags (id) ON DELETE CASCADE,
        PRIMARY KEY (page_id, tag_id)
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS jurists (
        id SERIAL PRIMARY KEY,
        name TEXT NOT NULL CHECK (length(name) > 2),
        job_title TEXT NOT NULL DEFAULT '',
        face TEXT NOT NULL DEFAULT ''
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS questions (
        id SERIAL PRIMARY KEY,
        parent_id INTEGER NOT NULL REFERENCES pages (id) ON DELETE CASCADE,
        jurist_id INTEGER REFERENCES jurists (id),
        heading TEXT NOT NULL UNIQUE CHECK (length(heading) > 2),
        content_question TEXT NOT NULL DEFAULT '',
        content_answer TEXT NOT NULL DEFAULT '',
        author TEXT NOT NULL DEFAULT '',
        date_created TIMESTAMPTZ NOT NULL DEFAULT NOW(),
        date_modified TIMESTAMPTZ NOT NULL DEFAULT NOW()
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS questions_and_tags (
        question_id INTEGER NOT NULL REFERENCES questions (id) ON DELETE CASCADE,
        tag_id INTEGER NOT NULL REFERENCES tags (id) ON DELETE CASCADE,
        PRIMARY KEY (question_id, tag_id)
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS shortcodes (
        id SERIAL PRIMARY KEY,
        key TEXT NOT NULL UNIQUE CHECK (key ~ '^[a-z0-9-]{1,}$'),
        value TEXT NOT NULL DEFAULT '',
        comment TEXT NOT NULL DEFAULT ''
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS users (
        id SERIAL PRIMARY KEY,
        login TEXT NOT NULL UNIQUE CHECK (length(login) > 2),
        password_hash TEXT NOT NULL,
        name TEXT NOT NULL DEFAULT '',
        email TEXT NOT NULL DEFAULT '',
        role TEXT NOT NULL DEFAULT 'admin',
        date_registered TIMESTAMPTZ NOT NULL DEFAULT NOW(),
        date_changed_password TIMESTAMPTZ NOT NULL DEFAULT NOW()
    )
    "#,
];

/// Create missing tables and seed page kinds and their relations.
pub async fn run(pool: &PgPool) -> Result<(), sqlx::Error> {
    tracing::info!("Running schema bootstrap...");

    let mut tx = pool.begin().await?;
    for statement in SCHEMA {
        sqlx::query(statement).execute(&mut *tx).await?;
    }

    for kind in PageKind::ALL {
        sqlx::query("INSERT INTO kinds (kind) VALUES ($1) ON CONFLICT DO NOTHING")
            .bind(kind.as_str())
            .execute(&mut *tx)
            .await?;
    }

    for (child, parent) in RELATIONS {
        sqlx::query(
            r#"
            INSERT INTO possible_relations (child_kind, parent_kind)
            VALUES ($1, $2)
            ON CONFLICT DO NOTHING
            "#,
        )
        .bind(child.as_str())
        .bind(parent.as_str())
        .execute(&mut *tx)
        .await?;
    }
    tx.commit().await?;

    tracing::info!(tables = TABLES.len(), "Schema ready");
    Ok(())
}

/// Drop every table. Used by `db init --reset` before `run`.
pub async fn reset(pool: &PgPool) -> Result<(), sqlx::Error> {
    tracing::warn!("Dropping all tables");
    let mut tx = pool.begin().await?;
    for table in TABLES.iter().rev() {
        sqlx::query(&format!("DROP TABLE IF EXISTS {table} CASCADE"))
            .execute(&mut *tx)
            .await?;
    }
    tx.commit().await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_table_has_a_create_statement() {
        for table in TABLES {
            let needle = format!("CREATE TABLE IF NOT EXISTS {table} (");
            assert!(
                SCHEMA.iter().any(|s| s.contains(&needle)),
                "missing schema for {table}"
            );
        }
    }

    #[tokio::test]
    #[ignore = "requires database"]
    async fn bootstrap_is_idempotent() {
        let url = std::env::var("DATABASE_URL").expect("DATABASE_URL required");
        let pool = crate::db::create_pool_with_options(&url, 2).await.unwrap();

        run(&pool).await.unwrap();
        run(&pool).await.unwrap();

        let (relations,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM possible_relations")
            .fetch_one(&pool)
            .await
            .unwrap();
        assert_eq!(relations as usize, RELATIONS.len());
    }
}
