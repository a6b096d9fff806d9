//! Print a saved scan snapshot as JSON.
//!
//! Run with: cargo run --bin inspect_results -- pdfsearch_results.bin

use anyhow::Result;
use app_lib::config::{parse_snapshot_format, SnapshotFormat, DEFAULT_OUTPUT};
use app_lib::store::load;
use clap::Parser;
use serde::Serialize;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "inspect_results", about = "Show the contents of a paper-scan snapshot.")]
struct Args {
    /// Snapshot file
    #[arg(default_value = DEFAULT_OUTPUT)]
    path: PathBuf,

    /// Snapshot encoding: binary or json
    #[arg(long, default_value = "binary", value_parser = parse_snapshot_format)]
    format: SnapshotFormat,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct TermSummary<'a> {
    term: &'a str,
    count: usize,
    papers: &'a [u64],
}

fn main() -> Result<()> {
    let args = Args::parse();
    let results = load(&args.path, args.format)?;

    let summary: Vec<TermSummary> = results
        .iter()
        .map(|(term, papers)| TermSummary {
            term,
            count: papers.len(),
            papers,
        })
        .collect();

    println!("{}", serde_json::to_string_pretty(&summary)?);

    let with_hits = summary.iter().filter(|s| s.count > 0).count();
    eprintln!("{} terms, {} with at least one paper", summary.len(), with_hits);

    Ok(())
}
