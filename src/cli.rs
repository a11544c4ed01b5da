use clap::{Parser, Subcommand};
use clap_complete::Shell;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "hashicups")]
#[command(version)]
#[command(about = "Declarative coffee orders against the HashiCups API", long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Verbosity level
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress non-essential output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// State file (default: ./hashicups.state.json)
    #[arg(long, global = true, value_name = "PATH")]
    pub state: Option<String>,

    /// HashiCups API address
    #[arg(long, global = true, env = "HASHICUPS_HOST")]
    pub host: Option<String>,

    /// Username for order operations
    #[arg(long, global = true, env = "HASHICUPS_USERNAME")]
    pub username: Option<String>,

    /// Password for order operations
    #[arg(long, global = true, env = "HASHICUPS_PASSWORD", hide_env_values = true)]
    pub password: Option<String>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Show what apply would change
    Plan {
        /// Desired configuration (.toml or .json)
        desired: PathBuf,
    },

    /// Create and update orders to match the configuration
    Apply {
        /// Desired configuration (.toml or .json)
        desired: PathBuf,

        /// Skip the confirmation prompt
        #[arg(long)]
        auto_approve: bool,

        /// Number of orders to apply concurrently
        #[arg(short = 'j', long, default_value = "4")]
        parallelism: usize,
    },

    /// Re-read every recorded order and drop the ones that are gone
    Refresh,

    /// Forget every recorded order
    Destroy {
        /// Skip the confirmation prompt
        #[arg(long)]
        auto_approve: bool,
    },

    /// List the coffee catalog
    Coffees {
        /// Print the flattened attributes as JSON
        #[arg(long)]
        json: bool,
    },

    /// Look up an existing order
    Order {
        /// Order id
        id: i64,

        /// Print the flattened attributes as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show resource and data source schemas
    Schema {
        /// Only this type (e.g. hashicups_order)
        #[arg(value_name = "TYPE")]
        type_name: Option<String>,
    },

    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_apply() {
        let cli = Cli::try_parse_from([
            "hashicups",
            "-vv",
            "apply",
            "cups.toml",
            "--auto-approve",
            "-j",
            "2",
            "--state",
            "/tmp/s.json",
        ])
        .unwrap();

        assert_eq!(cli.verbose, 2);
        assert_eq!(cli.state.as_deref(), Some("/tmp/s.json"));
        match cli.command {
            Command::Apply {
                desired,
                auto_approve,
                parallelism,
            } => {
                assert_eq!(desired, PathBuf::from("cups.toml"));
                assert!(auto_approve);
                assert_eq!(parallelism, 2);
            }
            _ => panic!("expected apply"),
        }
    }

    #[test]
    fn test_parse_order_lookup() {
        let cli = Cli::try_parse_from(["hashicups", "order", "7", "--json"]).unwrap();
        assert!(matches!(cli.command, Command::Order { id: 7, json: true }));
    }
}
