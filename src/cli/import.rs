use std::fs::File;

use clap::ValueEnum;
use foodgram::Config;
use foodgram_recipe::import;

#[derive(Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Kind {
    /// `name,measurement_unit` rows
    Ingredients,
    /// `name,slug` rows
    Tags,
}

pub async fn run(config: &Config, kind: Kind, path: String) -> anyhow::Result<()> {
    let pool = foodgram::db::create_pool(&config.database.url, 1).await?;
    let file = File::open(&path)?;

    let report = match kind {
        Kind::Ingredients => import::ingredients(&pool, file).await?,
        Kind::Tags => import::tags(&pool, file).await?,
    };

    tracing::info!(
        path = path.as_str(),
        inserted = report.inserted,
        skipped = report.skipped,
        "import finished"
    );

    pool.close().await;

    Ok(())
}
