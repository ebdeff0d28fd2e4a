//! Questline CLI binary.
//!
//! This binary provides command-line access to Questline's functionality:
//! - Recommend the next quest for a player
//! - Inspect the requirements of a quest
//! - Try requirement extraction on local text
//! - Clear the sync cache

use clap::Parser;
use questline::{LoggingConfig, Questline, init_logging};

mod cli;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    use cli::{
        CacheCommands, Cli, Commands, clear_cache, extract_file, load_catalog, load_config,
        next_quest, show_requirements,
    };

    let cli = Cli::parse();

    init_logging(LoggingConfig::new().with_json_logs(cli.json_logs))
        .map_err(|e| anyhow::anyhow!("Failed to initialise logging: {}", e))?;

    // Extraction is purely local
    if let Commands::Extract { file, format } = &cli.command {
        return extract_file(file, *format);
    }

    let catalog = load_catalog(cli.catalog.as_deref())?;
    let config = load_config(cli.config.as_deref())?;
    let app = Questline::from_config(&config, catalog)?;

    match cli.command {
        Commands::Next {
            username,
            skip_cache,
            watch,
        } => {
            next_quest(&app, &username, skip_cache, watch).await?;
        }

        Commands::Requirements { quest, format } => {
            show_requirements(&app, &quest, format).await?;
        }

        Commands::Cache(CacheCommands::Clear { namespace }) => {
            clear_cache(&app, namespace.as_deref()).await?;
        }

        Commands::Extract { .. } => {}
    }

    Ok(())
}
