//! CLI argument parsing module for skilldep

use clap::{ArgAction, Parser, Subcommand};
use std::path::PathBuf;

/// Skill dependency and version resolution tool
#[derive(Parser, Debug, Clone)]
#[command(
    name = "skilldep",
    version,
    about = "Skill dependency and version resolution tool"
)]
pub struct CliArgs {
    #[command(subcommand)]
    pub command: Command,

    /// Output results in JSON format
    #[arg(long, global = true)]
    pub json: bool,

    /// Enable verbose output
    #[arg(long, global = true)]
    pub verbose: bool,

    /// Enable quiet mode - minimal output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Render the resolved dependency tree
    Tree {
        /// Catalog directory (default: current directory)
        #[arg(default_value = ".")]
        path: PathBuf,

        /// Resolve from these roots only (can be specified multiple times)
        #[arg(long, action = ArgAction::Append)]
        root: Vec<String>,
    },

    /// Resolve the catalog and health-check the result
    Validate {
        /// Catalog directory (default: current directory)
        #[arg(default_value = ".")]
        path: PathBuf,

        /// Resolve from these roots only (can be specified multiple times)
        #[arg(long, action = ArgAction::Append)]
        root: Vec<String>,
    },

    /// Print the deterministic load order
    Order {
        /// Catalog directory (default: current directory)
        #[arg(default_value = ".")]
        path: PathBuf,

        /// Resolve from these roots only (can be specified multiple times)
        #[arg(long, action = ArgAction::Append)]
        root: Vec<String>,
    },

    /// Plan a migration path between two versions of a skill
    Migrate {
        /// Skill to migrate
        skill: String,

        /// Current version
        #[arg(long)]
        from: String,

        /// Target version
        #[arg(long)]
        to: String,

        /// Catalog directory (default: current directory)
        #[arg(default_value = ".")]
        path: PathBuf,
    },
}

impl Command {
    /// The catalog directory the command operates on
    pub fn path(&self) -> &PathBuf {
        match self {
            Command::Tree { path, .. }
            | Command::Validate { path, .. }
            | Command::Order { path, .. }
            | Command::Migrate { path, .. } => path,
        }
    }

    /// The requested resolution roots, if the command takes any
    pub fn roots(&self) -> &[String] {
        match self {
            Command::Tree { root, .. }
            | Command::Validate { root, .. }
            | Command::Order { root, .. } => root,
            Command::Migrate { .. } => &[],
        }
    }
}
