//! CLI argument definitions using clap derive

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

use crate::cli::commands::{cache::CacheCommands, completions::CompletionsArgs, users::UsersCommands};

#[derive(Parser)]
#[command(name = "lendsqr")]
#[command(author, version, about = "Lendsqr admin dashboard toolkit")]
#[command(long_about = "Browse, search and moderate Lendsqr users, with a local cache of opened users, notes, tags and favorites.")]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    #[command(flatten)]
    pub global: GlobalOpts,
}

#[derive(clap::Args, Clone, Debug)]
pub struct GlobalOpts {
    /// Output format
    #[arg(long, short = 'f', global = true, default_value = "auto")]
    pub format: OutputFormat,

    /// Suppress non-essential output
    #[arg(long, short = 'q', global = true)]
    pub quiet: bool,

    /// Enable verbose output
    #[arg(long, short = 'v', global = true)]
    pub verbose: bool,

    /// Cache database (default: platform data directory)
    #[arg(long, global = true, env = "LENDSQR_STORE")]
    pub store: Option<PathBuf>,

    /// JSON file of users to query instead of the built-in list
    #[arg(long = "users", global = true, env = "LENDSQR_USERS")]
    pub users_file: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Browse and moderate users
    #[command(subcommand)]
    Users(UsersCommands),

    /// Inspect and annotate the local record cache
    #[command(subcommand)]
    Cache(CacheCommands),

    /// Generate shell completions
    Completions(CompletionsArgs),
}

#[derive(ValueEnum, Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum OutputFormat {
    /// Automatically detect based on context (yaml for show, tsv for list)
    #[default]
    Auto,
    /// YAML format (full fidelity)
    Yaml,
    /// Tab-separated values (for piping)
    Tsv,
    /// JSON format (for programming)
    Json,
    /// CSV format (for spreadsheets)
    Csv,
    /// Markdown tables
    Md,
    /// Just IDs, one per line
    Id,
}
