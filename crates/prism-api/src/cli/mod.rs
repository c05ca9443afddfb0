//! CLI command definitions for the `prism` binary.
//!
//! Uses clap derive macros for argument parsing.

pub mod identity;
pub mod invoke;
pub mod memory;
pub mod thought;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use clap_complete::Shell;

/// Persistent memory, identity and goal backend for a voice agent.
#[derive(Parser)]
#[command(name = "prism", version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Output machine-readable JSON instead of styled text.
    #[arg(long, global = true)]
    pub json: bool,

    /// Suppress all output except errors.
    #[arg(long, global = true)]
    pub quiet: bool,

    /// Detailed output (-v for verbose, -vv for debug/trace).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Emit log events as JSON lines.
    #[arg(long, global = true)]
    pub log_json: bool,

    /// Data directory (defaults to $PRISM_DATA_DIR, then ~/.prism).
    #[arg(long, global = true)]
    pub data_dir: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Start the HTTP tool-call server.
    Serve {
        /// Port to listen on (overrides $PORT and config).
        #[arg(long)]
        port: Option<u16>,

        /// Host to bind to.
        #[arg(long)]
        host: Option<String>,
    },

    /// Run a single tool call and print the response envelope.
    Invoke {
        /// Tool name (memory_manager, identity_tracker, emotion_analyzer,
        /// goal_tracker, thought_logger).
        tool: String,

        /// Tool parameters as a JSON object.
        #[arg(long, short)]
        params: Option<String>,

        /// Caller identity (phone number).
        #[arg(long)]
        caller: Option<String>,
    },

    /// Create the database and schema if needed, and print its location.
    Init,

    /// Show the agent's identity traits.
    Identity,

    /// Retrieve memories for a user.
    Memories {
        /// User id (defaults to the configured fallback user).
        #[arg(long)]
        user: Option<String>,

        /// Memory type to filter by.
        #[arg(long = "type")]
        memory_type: Option<String>,

        /// Case-sensitive substring to search for.
        #[arg(long, short)]
        query: Option<String>,
    },

    /// Show the most recent logged thoughts.
    Thoughts {
        /// Number of thoughts to show.
        #[arg(long, short, default_value_t = 20, value_parser = clap::value_parser!(u32).range(1..))]
        limit: u32,
    },

    /// Generate shell completions.
    Completions {
        /// Shell to generate completions for.
        shell: Shell,
    },
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_invoke() {
        let cli = Cli::try_parse_from([
            "prism",
            "invoke",
            "memory_manager",
            "--params",
            r#"{"action":"retrieve","query":"x"}"#,
            "--caller",
            "+15550100",
            "--json",
        ])
        .unwrap();

        assert!(cli.json);
        match cli.command {
            Commands::Invoke { tool, params, caller } => {
                assert_eq!(tool, "memory_manager");
                assert!(params.unwrap().contains("retrieve"));
                assert_eq!(caller.as_deref(), Some("+15550100"));
            }
            _ => panic!("expected invoke"),
        }
    }

    #[test]
    fn test_thoughts_limit_must_be_positive() {
        assert!(Cli::try_parse_from(["prism", "thoughts", "--limit", "0"]).is_err());
        assert!(Cli::try_parse_from(["prism", "thoughts", "--limit", "-3"]).is_err());

        let cli = Cli::try_parse_from(["prism", "thoughts", "-l", "5"]).unwrap();
        assert!(matches!(cli.command, Commands::Thoughts { limit: 5 }));

        let cli = Cli::try_parse_from(["prism", "thoughts"]).unwrap();
        assert!(matches!(cli.command, Commands::Thoughts { limit: 20 }));
    }

    #[test]
    fn test_parse_memories_type_flag() {
        let cli = Cli::try_parse_from(["prism", "memories", "--type", "learning", "-v"]).unwrap();
        assert_eq!(cli.verbose, 1);
        match cli.command {
            Commands::Memories { memory_type, .. } => {
                assert_eq!(memory_type.as_deref(), Some("learning"))
            }
            _ => panic!("expected memories"),
        }
    }
}
