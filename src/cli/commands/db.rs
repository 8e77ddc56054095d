use anyhow::Context;
use clap::Subcommand;

use crate::cli::utils::{output_error, output_success};
use crate::cli::OutputFormat;
use crate::config::config;
use crate::database::DatabaseManager;

#[derive(Subcommand)]
pub enum DbCommands {
    #[command(about = "Apply pending migrations")]
    Migrate,

    #[command(about = "Check database connectivity")]
    Check,
}

pub async fn handle(cmd: DbCommands, output_format: OutputFormat) -> anyhow::Result<()> {
    let pool = DatabaseManager::connect(&config().database)
        .await
        .context("failed to connect to database")?;

    match cmd {
        DbCommands::Migrate => {
            DatabaseManager::migrate(&pool).await?;
            output_success(&output_format, "Migrations applied", None)
        }
        DbCommands::Check => match DatabaseManager::health_check(&pool).await {
            Ok(()) => output_success(&output_format, "Database reachable", None),
            Err(e) => {
                output_error(&output_format, &e.to_string(), Some("DATABASE_UNAVAILABLE"))?;
                std::process::exit(1);
            }
        },
    }
}
