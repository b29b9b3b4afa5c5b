//! staffrec-server - employee records backend
//!
//! Stores the employee aggregate (employee + topic + post + salary +
//! titles) in SQLite and serves CRUD, statistics and forecast queries
//! over HTTP.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Result;
use clap::Parser;
use tracing::info;

use staffrec_common::config::Settings;
use staffrec_common::db::init_database;
use staffrec_server::rates::{HttpRates, RateProvider, SampleRates};
use staffrec_server::{build_router, AppState};

#[derive(Debug, Parser)]
#[command(name = "staffrec-server", about = "Employee records backend")]
struct Cli {
    /// Config file path (overrides STAFFREC_CONFIG and the default location)
    #[arg(long)]
    config: Option<PathBuf>,

    /// SQLite database file (overrides config)
    #[arg(long)]
    database: Option<PathBuf>,

    /// Listen address, e.g. 127.0.0.1:8710 (overrides config)
    #[arg(long)]
    bind: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .init();

    // Build identification first, before any database delays
    info!(
        "Starting staffrec-server v{} [{}] built {} ({})",
        env!("CARGO_PKG_VERSION"),
        env!("GIT_HASH"),
        env!("BUILD_TIMESTAMP"),
        env!("BUILD_PROFILE")
    );

    let cli = Cli::parse();
    let settings = Settings::resolve(
        cli.config.as_deref(),
        cli.database.as_deref(),
        cli.bind.as_deref(),
    )?;

    info!("Database path: {}", settings.database_path.display());
    let pool = init_database(&settings.database_path).await?;

    let rates: Arc<dyn RateProvider> = if settings.rates.use_sample() {
        info!("Using sample exchange rate table (no API key configured or sample mode set)");
        Arc::new(SampleRates)
    } else {
        info!("Using exchange rate API at {}", settings.rates.api_url);
        Arc::new(HttpRates::new(&settings.rates))
    };

    let state = AppState::new(pool, rates);
    let app = build_router(state);

    let listener = tokio::net::TcpListener::bind(&settings.bind_addr).await?;
    info!("staffrec-server listening on http://{}", settings.bind_addr);

    axum::serve(listener, app).await?;

    Ok(())
}
