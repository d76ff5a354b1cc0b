//! Embedded schema migrations (`jobboard_core/migrations/`).

use sqlx::PgPool;

/// Run all pending embedded migrations against the given pool.
pub async fn migrate(pool: &PgPool) -> Result<(), sqlx::migrate::MigrateError> {
    sqlx::migrate!("./migrations").run(pool).await
}
