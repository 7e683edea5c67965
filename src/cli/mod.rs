//! Command-line interface for the search pipeline
//!
//! Argument parsing lives here; rendering of results lives in [`output`].

pub mod output;

use crate::error::{ErrorCategory, SearchError};
use clap::{Parser, ValueEnum};
use std::path::PathBuf;

/// Process exit codes
pub mod exit {
    pub const SUCCESS: i32 = 0;
    pub const FAILURE: i32 = 1;
    pub const VALIDATION: i32 = 2;
    pub const AUTHENTICATION: i32 = 3;
    pub const RATE_LIMITED: i32 = 4;
    pub const TRANSPORT: i32 = 5;
}

#[derive(Parser, Debug)]
#[command(
    name = "readme-search",
    version,
    about = "Search GitHub repositories by topic and retrieve their README content",
    after_help = "Examples:\n  \
                  readme-search \"machine learning\" --limit 5\n  \
                  readme-search react --limit 3 --no-readme\n  \
                  readme-search python --limit 10 --output results.json\n  \
                  readme-search blockchain --limit 3 --format txt --output results.txt\n  \
                  readme-search \"web development\" --limit 5 --max-readme-length 1000"
)]
pub struct Cli {
    /// Domain/topic to search for (e.g. "machine learning", "web development")
    pub domain: String,

    /// Maximum number of repositories to return
    #[arg(long, default_value_t = 5, allow_negative_numbers = true)]
    pub limit: i64,

    /// Skip retrieving README content (faster)
    #[arg(long)]
    pub no_readme: bool,

    /// Save results to file
    #[arg(long)]
    pub output: Option<PathBuf>,

    /// Output format for the saved file
    #[arg(long, value_enum, default_value_t = OutputFormat::Json)]
    pub format: OutputFormat,

    /// Maximum README length to display before showing a preview
    #[arg(long)]
    pub max_readme_length: Option<usize>,

    /// Minimal output: one line per repository
    #[arg(long)]
    pub quiet: bool,

    /// Path to a settings file
    #[arg(long, short = 'c')]
    pub config: Option<PathBuf>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Json,
    Txt,
}

/// Exit code for a pipeline failure
pub fn exit_code(err: &SearchError) -> i32 {
    match err.category() {
        ErrorCategory::Validation => exit::VALIDATION,
        ErrorCategory::Authentication => exit::AUTHENTICATION,
        ErrorCategory::RateLimited => exit::RATE_LIMITED,
        ErrorCategory::Transport | ErrorCategory::Upstream => exit::TRANSPORT,
    }
}
