//! CLI command definitions.

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// Questline - track a quest checklist against live player progress
#[derive(Parser, Debug)]
#[command(name = "questline")]
#[command(about = "Track a quest checklist against live player progress", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Command to execute
    #[command(subcommand)]
    pub command: Commands,

    /// Quest catalog TOML (defaults to the bundled catalog)
    #[arg(long, global = true)]
    pub catalog: Option<PathBuf>,

    /// Sync configuration TOML (defaults to bundled, user, then local questline.toml)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Emit logs as JSON
    #[arg(long, global = true)]
    pub json_logs: bool,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Recommend the next quest for a player
    Next {
        /// Player display name
        username: String,

        /// Ignore cached progress and go to the network
        #[arg(long)]
        skip_cache: bool,

        /// Wait this many seconds for a background refresh and print again
        #[arg(long, value_name = "SECS")]
        watch: Option<u64>,
    },

    /// Show the resolved requirements of one quest
    Requirements {
        /// Quest name as it appears on the wiki
        quest: String,

        /// Output format
        #[arg(long, default_value = "human")]
        format: OutputFormat,
    },

    /// Run requirement extraction over a plain text file
    Extract {
        /// File holding the text of a requirements section
        file: PathBuf,

        /// Output format
        #[arg(long, default_value = "human")]
        format: OutputFormat,
    },

    /// Cache maintenance commands
    #[command(subcommand)]
    Cache(CacheCommands),
}

/// Cache maintenance subcommands
#[derive(Subcommand, Debug)]
pub enum CacheCommands {
    /// Remove cached entries
    Clear {
        /// Only clear this namespace (e.g. player-cache, requirement-cache)
        #[arg(long)]
        namespace: Option<String>,
    },
}

/// Output format options
#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum OutputFormat {
    /// Human-readable format
    Human,
    /// JSON format
    Json,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_next_with_flags() {
        let cli = Cli::try_parse_from([
            "questline",
            "next",
            "Iron Man",
            "--skip-cache",
            "--watch",
            "30",
            "--json-logs",
        ])
        .unwrap();

        assert!(cli.json_logs);
        match cli.command {
            Commands::Next {
                username,
                skip_cache,
                watch,
            } => {
                assert_eq!(username, "Iron Man");
                assert!(skip_cache);
                assert_eq!(watch, Some(30));
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_global_paths_after_subcommand() {
        let cli = Cli::try_parse_from([
            "questline",
            "requirements",
            "Dragon Slayer I",
            "--catalog",
            "quests.toml",
            "--config",
            "questline.toml",
            "--format",
            "json",
        ])
        .unwrap();

        assert_eq!(cli.catalog, Some(PathBuf::from("quests.toml")));
        assert_eq!(cli.config, Some(PathBuf::from("questline.toml")));
        match cli.command {
            Commands::Requirements { quest, format } => {
                assert_eq!(quest, "Dragon Slayer I");
                assert_eq!(format, OutputFormat::Json);
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_cache_clear_namespace() {
        let cli =
            Cli::try_parse_from(["questline", "cache", "clear", "--namespace", "player-cache"])
                .unwrap();
        match cli.command {
            Commands::Cache(CacheCommands::Clear { namespace }) => {
                assert_eq!(namespace.as_deref(), Some("player-cache"));
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_next_requires_username() {
        assert!(Cli::try_parse_from(["questline", "next"]).is_err());
    }

    #[test]
    fn test_watch_must_be_a_number() {
        assert!(Cli::try_parse_from(["questline", "next", "Zezima", "--watch", "soon"]).is_err());
    }
}
