//! Database connection pool management

use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;

use lexpages_core::config::DatabaseConfig;

/// Create a PostgreSQL connection pool from the `[database]` section.
///
/// # Example
///
/// ```ignore
/// let pool = create_pool(&config.database).await?;
/// ```
pub async fn create_pool(config: &DatabaseConfig) -> Result<PgPool, sqlx::Error> {
    create_pool_with_options(&config.url, config.max_connections).await
}

/// Create a PostgreSQL connection pool with an explicit connection limit.
pub async fn create_pool_with_options(
    database_url: &str,
    max_connections: u32,
) -> Result<PgPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(max_connections.max(1))
        .connect(database_url)
        .await
}

#[cfg(test)]
mod tests {
    use super::*;

    // Run with: DATABASE_URL=postgres://... cargo test -p lexpages-server -- --ignored

    #[tokio::test]
    #[ignore = "requires database"]
    async fn pool_acquires_connection() {
        let url = std::env::var("DATABASE_URL").expect("DATABASE_URL required");
        let pool = create_pool_with_options(&url, 2).await.expect("pool creation failed");

        let result: (i32,) = sqlx::query_as("SELECT 1")
            .fetch_one(&pool)
            .await
            .expect("query failed");

        assert_eq!(result.0, 1);
    }
}
