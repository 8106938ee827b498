use lottery_results::{
    config::{database, settings},
    core::{lottery_type::seed_lottery_types, sync::UnconfiguredCrawler},
    errors::Result,
    jobs,
};
use dotenvy::dotenv;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    // 1. Initialize tracing (as early as possible)
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    // 2. Load .env file; env vars can also be set externally
    dotenv().ok();
    info!("Attempted to load .env file.");

    // 3. Load the application configuration
    let app_config = settings::load_default_config()
        .inspect_err(|e| error!("Critical error loading application configuration: {e}"))?;
    info!(
        "Loaded configuration with {} lottery types.",
        app_config.lottery_types.len()
    );

    // 4. Connect and ensure the schema
    let db = database::init_db()
        .await
        .inspect(|_| info!("Database initialized successfully."))
        .inspect_err(|e| error!("Failed to initialize database: {e}"))?;
    database::ping(&db).await?;

    // 5. Seed lottery types from config.toml
    let seeded = seed_lottery_types(&db, &app_config.lottery_types)
        .await
        .inspect_err(|e| error!("Failed to seed lottery types: {e}"))?;
    info!("Seeded {seeded} new lottery types.");

    // 6. Run the background jobs until Ctrl-C
    jobs::run_scheduler(&db, &app_config.scheduler, &UnconfiguredCrawler).await;

    db.close().await?;
    Ok(())
}
