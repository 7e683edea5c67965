//! Rendering of search results for the terminal and for files

use super::OutputFormat;
use crate::search::{EnrichmentOutcome, RepositoryRecord, RepositorySummary};
use anyhow::{Context, Result};
use std::fmt::Write as _;
use std::path::Path;

/// Format an integer with thousands separators
pub fn format_stars(stars: u64) -> String {
    let digits = stars.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    out
}

/// Single-line README preview: the first `max_len` characters with newlines
/// flattened, followed by `...`. `None` when the text already fits.
pub fn readme_preview(content: &str, max_len: usize) -> Option<String> {
    if content.chars().count() <= max_len {
        return None;
    }
    let head: String = content.chars().take(max_len).collect();
    Some(format!("{}...", head.replace('\n', " ")))
}

/// One line per repository
pub fn render_quiet(repositories: &[RepositorySummary]) -> String {
    let mut out = String::new();
    for repo in repositories {
        let _ = writeln!(out, "{} ({} stars)", repo.full_name, format_stars(repo.stars));
    }
    out
}

/// Full terminal listing
pub fn render_text(repositories: &[RepositorySummary], max_readme_length: usize) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "\nFound {} repositories:", repositories.len());
    let _ = writeln!(out, "{}", "=".repeat(60));

    for (i, repo) in repositories.iter().enumerate() {
        let _ = writeln!(out, "\n{}. {}", i + 1, repo.full_name);
        write_details(&mut out, repo);

        match repo.readme {
            Some(EnrichmentOutcome::Found { ref content }) => {
                match readme_preview(content, max_readme_length) {
                    Some(preview) => {
                        let _ = writeln!(out, "   README Preview: {}", preview);
                    }
                    None => {
                        let _ = writeln!(out, "   README Content:");
                        let _ = writeln!(out, "   {}", "-".repeat(40));
                        let _ = writeln!(out, "{}", content);
                        let _ = writeln!(out, "   {}", "-".repeat(40));
                    }
                }
            }
            _ => write_missing_readme(&mut out, repo),
        }
    }

    out
}

/// Plain-text report written by `--format txt`; READMEs are included in full
pub fn render_report(repositories: &[RepositorySummary]) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "GitHub README Search Results");
    let _ = writeln!(out, "{}\n", "=".repeat(50));

    for (i, repo) in repositories.iter().enumerate() {
        let _ = writeln!(out, "{}. {}", i + 1, repo.full_name);
        write_details(&mut out, repo);

        match repo.readme_content() {
            Some(content) => {
                let _ = writeln!(out, "   README Content:");
                let _ = writeln!(out, "   {}", "-".repeat(30));
                let _ = writeln!(out, "{}", content);
                let _ = writeln!(out, "   {}", "-".repeat(30));
            }
            None => write_missing_readme(&mut out, repo),
        }
        out.push('\n');
    }

    out
}

/// Pretty JSON array of records
pub fn render_json(repositories: &[RepositorySummary]) -> Result<String> {
    let records: Vec<RepositoryRecord> = repositories.iter().map(RepositoryRecord::from).collect();
    Ok(serde_json::to_string_pretty(&records)?)
}

/// Write results to `path` in the requested format
pub fn save(repositories: &[RepositorySummary], path: &Path, format: OutputFormat) -> Result<()> {
    let content = match format {
        OutputFormat::Json => render_json(repositories)?,
        OutputFormat::Txt => render_report(repositories),
    };
    std::fs::write(path, content)
        .with_context(|| format!("failed to write results to {}", path.display()))?;
    Ok(())
}

fn write_details(out: &mut String, repo: &RepositorySummary) {
    let _ = writeln!(out, "   Stars: {}", format_stars(repo.stars));
    let _ = writeln!(out, "   Language: {}", repo.language.as_deref().unwrap_or("Unknown"));
    let _ = writeln!(out, "   Description: {}", repo.description.as_deref().unwrap_or(""));
    let _ = writeln!(out, "   URL: {}", repo.url);
}

fn write_missing_readme(out: &mut String, repo: &RepositorySummary) {
    let _ = match repo.readme {
        Some(EnrichmentOutcome::Unavailable { reason }) => {
            writeln!(out, "   README: Not available ({})", reason)
        }
        _ => writeln!(out, "   README: Not available"),
    };
}
