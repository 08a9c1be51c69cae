use foodgram::Config;
use sqlx::{Sqlite, migrate::MigrateDatabase};

pub async fn migrate(config: &Config) -> anyhow::Result<()> {
    let pool = foodgram::db::create_pool(&config.database.url, 1).await?;
    foodgram::db::migrate(&pool).await?;
    pool.close().await;

    Ok(())
}

/// Drops the database file and recreates it from migrations.
pub async fn reset(config: &Config) -> anyhow::Result<()> {
    if Sqlite::database_exists(&config.database.url).await? {
        Sqlite::drop_database(&config.database.url).await?;
        tracing::info!(url = config.database.url.as_str(), "database dropped");
    }

    migrate(config).await
}
