mod run;

use std::path::PathBuf;

use anyhow::Context;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(name = "catalogdb")]
#[command(about = "Normalize product catalog CSVs into Postgres, CSV deliverables and Google Sheets")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Run the full pipeline: normalize, persist, and publish deliverables
    Run(run::RunArgs),
    /// Normalize a catalog CSV into a single output CSV (no database or sheets)
    Normalize {
        /// Raw catalog CSV to read
        #[arg(long)]
        input: PathBuf,
        /// Destination for the normalized CSV
        #[arg(long)]
        output: PathBuf,
    },
    /// Database utilities
    Db {
        #[command(subcommand)]
        command: DbCommands,
    },
    /// Google Sheets utilities
    Sheets {
        #[command(subcommand)]
        command: SheetsCommands,
    },
}

#[derive(Debug, Subcommand)]
enum DbCommands {
    /// Check that the database is reachable
    Ping,
    /// Drop and recreate the products table
    Init,
}

#[derive(Debug, Subcommand)]
enum SheetsCommands {
    /// Authorize Google Sheets access and cache the token
    Auth,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let config = catalogdb_core::load_app_config().context("failed to load configuration")?;
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(config.log_level.clone()))?;
    tracing_subscriber::fmt().with_env_filter(env_filter).init();

    match cli.command {
        Commands::Run(args) => run::run_pipeline(&config, &args).await?,
        Commands::Normalize { input, output } => run::run_normalize(&input, &output)?,
        Commands::Db { command } => {
            let pool = connect(&config).await?;
            match command {
                DbCommands::Ping => {
                    catalogdb_db::health_check(&pool).await?;
                    println!("database ok");
                }
                DbCommands::Init => {
                    catalogdb_db::create_products_table(&pool)
                        .await
                        .context("failed to create products table")?;
                    println!("products table created");
                }
            }
        }
        Commands::Sheets {
            command: SheetsCommands::Auth,
        } => {
            let sheets = catalogdb_sheets::SheetsConfig::from_app_config(&config)?;
            let token = sheets.authenticator()?.authorize_interactively().await?;
            println!(
                "authorized; token cached at {} (expires {})",
                sheets.token_path.display(),
                token.expires_at
            );
        }
    }

    Ok(())
}

/// Builds the pool from config, attaching the target to connection failures.
async fn connect(config: &catalogdb_core::AppConfig) -> anyhow::Result<sqlx::PgPool> {
    let db_config = catalogdb_db::DbConfig::from_app_config(config)?;
    catalogdb_db::connect_pool(&db_config).await.with_context(|| {
        format!(
            "failed to connect to postgres at {}:{}/{}",
            db_config.host, db_config.port, db_config.database
        )
    })
}

#[cfg(test)]
mod tests;
