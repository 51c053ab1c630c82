// src/cli.rs
// =============================================================================
// This file defines our command-line interface using the `clap` crate.
//
// Two subcommands:
// - crawl:   crawl a fixture starting from a seed identifier
// - fixture: print the built-in demo fixture as JSON (a starting point for
//            writing your own fixture files)
//
// Rust concepts:
// - Derive macros: clap generates the parser from these structs
// - value_parser: Custom validation for an argument
// =============================================================================

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::crawl::{DEFAULT_CONCURRENCY, DEFAULT_MAX_DEPTH};

#[derive(Parser, Debug)]
#[command(
    name = "depth-crawler",
    version = "0.1.0",
    about = "Crawl a page graph concurrently, never fetching the same page twice",
    long_about = "depth-crawler starts from a seed identifier and follows links up to a depth budget. \
                  Pages come from a fixture (a JSON page graph), so runs are repeatable and offline."
)]
pub struct Cli {
    /// Show debug logs (task skips, fetches) on stderr
    ///
    /// RUST_LOG, when set, takes precedence over this flag
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Crawl starting from a seed identifier
    ///
    /// Example: depth-crawler crawl http://golang.org/ --max-depth 3 --concurrency 4
    Crawl {
        /// Identifier to start from (matched exactly, no normalization)
        seed: String,

        /// Depth budget of the seed page
        ///
        /// Depth 1 = just the seed
        /// Depth 2 = the seed + every page it links to
        /// Depth 0 = fetch nothing
        #[arg(long, default_value_t = DEFAULT_MAX_DEPTH)]
        max_depth: usize,

        /// Maximum number of fetches running at the same time (at least 1)
        #[arg(long, default_value_t = DEFAULT_CONCURRENCY, value_parser = parse_concurrency)]
        concurrency: usize,

        /// JSON fixture file to crawl (defaults to the built-in demo fixture)
        #[arg(long)]
        fixture: Option<PathBuf>,

        /// Simulated latency per fetch, in milliseconds
        #[arg(long, default_value_t = 0)]
        latency_ms: u64,

        /// Output the final report in JSON format instead of a listing
        #[arg(long)]
        json: bool,
    },

    /// Print the built-in demo fixture as JSON
    Fixture,
}

// Zero slots would mean no fetch could ever start
fn parse_concurrency(raw: &str) -> Result<usize, String> {
    let value: usize = raw
        .parse()
        .map_err(|_| format!("'{}' is not a whole number", raw))?;

    if value == 0 {
        return Err("concurrency must be at least 1".to_string());
    }
    Ok(value)
}
