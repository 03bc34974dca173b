use anyhow::Context;

use crate::config::Config;

pub async fn execute(config: Config) -> anyhow::Result<()> {
    let pool = super::connect(&config).await?;
    tracing::info!("running pending migrations");
    super::MIGRATOR.run(&pool).await.context("migration failed")?;
    tracing::info!("migrations completed");
    Ok(())
}
