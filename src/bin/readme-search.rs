//! Command-line front end for the search pipeline
//!
//! Exit codes: 0 success, 1 unexpected error, 2 invalid input,
//! 3 authentication failure, 4 rate limited, 5 network or upstream failure.

use anyhow::Result;
use clap::Parser;
use readme_searcher::cli::{self, exit, output, Cli};
use readme_searcher::{config, Searcher};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let exit_code = match run(cli).await {
        Ok(code) => code,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            exit::FAILURE
        }
    };

    std::process::exit(exit_code);
}

async fn run(cli: Cli) -> Result<i32> {
    let settings = config::load(cli.config.as_deref())?;

    // Logs go to stderr and stay quiet unless asked for
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();

    if !settings.has_token() && !cli.quiet {
        eprintln!("Warning: GITHUB_TOKEN is not set; using unauthenticated requests (stricter rate limits)");
    }

    let max_readme_length = cli
        .max_readme_length
        .unwrap_or(settings.display.max_readme_length);

    // The transport is released when the searcher goes out of scope
    let searcher = Searcher::from_settings(&settings)?;

    if !cli.quiet {
        println!("Searching for '{}' repositories...", cli.domain);
        println!(
            "Sorting by stars (descending) and returning top {} repositories",
            cli.limit
        );
    }

    let result = if cli.no_readme {
        searcher.search_fast(&cli.domain, cli.limit).await
    } else {
        searcher.search_and_get_readmes(&cli.domain, cli.limit).await
    };
    searcher.close();

    let repositories = match result {
        Ok(repositories) => repositories,
        Err(e) => {
            eprintln!("Error: {}", e);
            return Ok(cli::exit_code(&e));
        }
    };

    if cli.quiet {
        print!("{}", output::render_quiet(&repositories));
    } else {
        print!("{}", output::render_text(&repositories, max_readme_length));
    }

    if let Some(ref path) = cli.output {
        output::save(&repositories, path, cli.format)?;
        if !cli.quiet {
            println!("Results saved to {}", path.display());
        }
    }

    Ok(exit::SUCCESS)
}
