//! DuckLake one-shot initializer.
//!
//! Reads deployment configuration from the environment, opens an engine
//! connection, installs capability extensions, registers storage secrets,
//! and attaches the lakehouse catalog backed by the Postgres metadata
//! store. Missing required configuration aborts before any engine call.

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use ducklake_setup::engine::{self, secrets, MEMORY_DB};
use ducklake_setup::{setup, ConnectionState, Settings};

#[derive(Parser)]
#[command(
    name = "ducklake-init",
    version,
    about = "Initialize the DuckLake lakehouse catalog for a deployment"
)]
struct Cli {
    /// Engine database to initialize (":memory:" verifies configuration end to end)
    #[arg(long, default_value = MEMORY_DB)]
    db_path: String,
}

fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,ducklake_setup=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load environment variables
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    // Configuration problems abort before any engine interaction.
    let settings = Settings::from_env()?;
    let data_path = settings.storage.resolve_data_path()?;

    tracing::info!(
        driver = %settings.storage.driver,
        db_path = %cli.db_path,
        data_path = %data_path,
        "Initializing DuckLake"
    );

    let conn = engine::connect(&cli.db_path)?;
    let report = setup::bootstrap(&conn, &settings, &data_path)?;

    for warning in &report.warnings {
        tracing::warn!("{}", warning);
    }

    let secret_names = secrets::list_secret_names(&conn)?;
    tracing::info!(secrets = ?secret_names, "Registered engine secrets");

    if let Some(count) = report.federated_tables {
        tracing::info!(tables = count, "Federated warehouse tables visible");
    }

    if let Some(broker) = settings.cache.broker_url() {
        tracing::info!(broker = %broker, "Async query execution enabled");
    } else {
        tracing::info!("Redis not configured; query execution stays synchronous");
    }

    if report.state == ConnectionState::Active {
        tracing::info!(state = %report.state, "Initialization complete");
    } else {
        tracing::warn!(
            state = %report.state,
            "Initialization finished degraded; lakehouse catalog not active"
        );
    }

    Ok(())
}
