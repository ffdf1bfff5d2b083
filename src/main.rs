use anyhow::Context;

use recipes::config::AppConfig;
use sea_orm::{ConnectOptions, Database};

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let dotenv = dotenvy::dotenv();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "recipes=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    if let Ok(path) = dotenv {
        tracing::debug!("Loaded environment from {}", path.display());
    }

    let config = AppConfig::from_env()?;

    let db = Database::connect(
        ConnectOptions::from(config.database_url.as_str())
            .max_connections(config.max_db_connections)
            .to_owned(),
    )
    .await
    .context("could not connect to database_url")?;

    recipes::migrate(&db).await?;

    recipes::api::serve(db, config).await?;

    Ok(())
}
