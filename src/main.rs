//! Scan a range of working papers for search terms.
//!
//! Usage: paper-scan <start> <end> [--words <w>...] [--filepath <path>]

use anyhow::{Context, Result};
use app_lib::config::{
    has_cli_terms, parse_snapshot_format, Config, DefaultTerms, SnapshotFormat, DEFAULT_BASE_URL,
    DEFAULT_OUTPUT,
};
use app_lib::extract::PdfExtractor;
use app_lib::fetch::HttpFetcher;
use app_lib::scan::run_scan;
use clap::Parser;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(
    name = "paper-scan",
    version,
    about = "Search for words in NBER working papers."
)]
struct Cli {
    /// Start paper number
    start: u64,

    /// End paper number (not fetched)
    end: u64,

    /// Words to search for (default: the words.txt word list)
    #[arg(long, num_args = 1..)]
    words: Option<Vec<String>>,

    /// Word list to use instead of the default locations
    #[arg(long)]
    words_file: Option<PathBuf>,

    /// Where to save the search results
    #[arg(long, default_value = DEFAULT_OUTPUT)]
    filepath: PathBuf,

    /// Snapshot encoding: binary or json
    #[arg(long, default_value = "binary", value_parser = parse_snapshot_format)]
    format: SnapshotFormat,

    /// Archive host, e.g. a local mirror
    #[arg(long, default_value = DEFAULT_BASE_URL)]
    base_url: String,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();

    // The default list is only consulted when no non-blank words were given
    let defaults = if has_cli_terms(cli.words.as_deref()) {
        DefaultTerms::Absent
    } else {
        DefaultTerms::discover(cli.words_file.as_deref())?
    };

    let config = Config::new(cli.start, cli.end, cli.words.as_deref(), &defaults)?
        .with_output(cli.filepath)
        .with_format(cli.format)
        .with_base_url(&cli.base_url);

    log::info!(
        "Searching papers {}..{} for {} terms, saving to {} ({})",
        config.start,
        config.end,
        config.terms.len(),
        config.output.display(),
        config.format.as_str()
    );

    let fetcher = HttpFetcher::new(&config.base_url).context("Failed to create HTTP client")?;
    let (report, store) = run_scan(&config, fetcher, PdfExtractor::new()).await;
    log::debug!("Run report: {}", serde_json::to_string(&report)?);

    // Leaves a snapshot behind even when nothing matched
    store.save();

    Ok(())
}
