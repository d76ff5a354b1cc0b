// Import and re-export the `error` module
pub use self::error::{Error, Result};
mod error;

use clap::Parser;
use cli::{Cli, Commands, DatabaseArgs};
use jobboard_core::auth::PasswordHasher;
use jobboard_core::store::PgStore;

mod cli;
mod logging;

fn main() -> Result<()> {
    if let Err(e) = run() {
        log::error!("{}", e);
        std::process::exit(1);
    }
    Ok(())
}

fn run() -> Result<()> {
    dotenvy::dotenv().ok();
    logging::init()?;

    let args = Cli::parse();

    match args.command {
        Commands::Version => {
            println!("{} {}", env!("CARGO_PKG_NAME"), env!("CARGO_PKG_VERSION"));
        }
        Commands::Migrate(db) => {
            let runtime = tokio::runtime::Runtime::new()?;
            runtime.block_on(async {
                let store = connect(&db).await?;
                store.migrate().await?;
                log::info!("migrations applied");
                Ok::<_, Error>(())
            })?;
        }
        Commands::Seed { db, bcrypt_cost } => {
            let runtime = tokio::runtime::Runtime::new()?;
            runtime.block_on(async {
                let store = connect(&db).await?;
                store.migrate().await?;
                let report =
                    jobboard_core::seed::seed(&store, &PasswordHasher::new(bcrypt_cost)).await?;
                log::info!(
                    "seed finished: {} accounts created ({} skipped), {} jobs created ({} skipped)",
                    report.accounts_created,
                    report.accounts_skipped,
                    report.jobs_created,
                    report.jobs_skipped
                );
                Ok::<_, Error>(())
            })?;
        }
    }

    Ok(())
}

async fn connect(db: &DatabaseArgs) -> Result<PgStore> {
    log::info!("connecting to database");
    Ok(PgStore::connect(&db.database_url, db.max_connections).await?)
}
