//! Job board API server binary.
//!
//! Loads `.env`, reads configuration from the environment, connects to
//! PostgreSQL (or uses the in-memory store), applies migrations and serves
//! the REST API until Ctrl-C.

use std::sync::Arc;

use clap::Parser;
use jobboard_api::config::ApiConfig;
use jobboard_api::{AppState, router};
use jobboard_core::store::{MemoryStore, PgStore, Store};
use tracing::{error, info, warn};

/// CLI arguments for the API server.
#[derive(Parser, Debug)]
#[command(name = "jobboard_server", about = "Job board API server", version)]
struct Args {
    /// Address to listen on.
    #[arg(long, env = "BIND_ADDR")]
    bind: Option<String>,

    /// PostgreSQL connection URL.
    #[arg(long, env = "DATABASE_URL")]
    database_url: Option<String>,

    /// Maximum number of database connections in the pool.
    #[arg(long, env = "DATABASE_MAX_CONNECTIONS", default_value_t = 10)]
    max_connections: u32,

    /// Keep all data in process memory instead of PostgreSQL.
    ///
    /// Everything is lost on exit. Useful for demos and local frontend work.
    #[arg(long, default_value_t = false)]
    in_memory: bool,
}

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| {
                    tracing_subscriber::EnvFilter::new("info,jobboard_api=debug,jobboard_core=debug")
                }),
        )
        .init();

    if let Err(e) = run(Args::parse()).await {
        error!("{e}");
        std::process::exit(1);
    }
}

async fn run(args: Args) -> Result<(), Box<dyn std::error::Error>> {
    let mut config = ApiConfig::from_env()?;
    if let Some(bind) = args.bind {
        config.bind_addr = bind;
    }
    if let Some(url) = args.database_url {
        config.database_url = url;
    }

    let store: Arc<dyn Store> = if args.in_memory {
        warn!("using in-memory store; data will not survive a restart");
        Arc::new(MemoryStore::new())
    } else {
        info!(
            max_connections = args.max_connections,
            "connecting to database"
        );
        let store = PgStore::connect(&config.database_url, args.max_connections).await?;
        info!("running database migrations");
        store.migrate().await?;
        Arc::new(store)
    };

    let bind_addr = config.bind_addr.clone();
    let app = router(AppState::new(store, config));

    let listener = tokio::net::TcpListener::bind(&bind_addr).await?;
    info!(addr = %listener.local_addr()?, "REST API listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!(error = %e, "failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    info!("shutdown signal received");
}
