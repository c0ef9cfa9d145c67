use anyhow::Context;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use movie_booking::{cli, config::Config, database::Database, AppState};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let config = Config::from_env();

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(&config.app.rust_log))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting movie ticket booking");

    let db = Database::new(&config.database.url, config.database.pool_size)
        .await
        .context("failed to open the booking database")?;
    info!("Database connected");

    db.run_migrations()
        .await
        .context("failed to apply the schema")?;
    db.seed_if_empty()
        .await
        .context("failed to seed the catalog")?;

    let state = AppState { db, config };
    cli::run(&state).await
}
