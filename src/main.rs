// src/main.rs
// =============================================================================
// This is the entry point of our CLI application.
//
// What happens here:
// 1. Parse command-line arguments using clap
// 2. Set up logging (tracing, written to stderr)
// 3. Dispatch to the appropriate subcommand handler
// 4. Print the crawl as it happens, then the final report
// 5. Exit with proper code (0 = clean crawl, 1 = some fetches failed, 2 = error)
//
// Rust concepts used:
// - async/await: Crawl tasks run concurrently on the tokio runtime
// - Result<T, E>: For error handling (T = success type, E = error type)
// - match: Pattern matching to handle different subcommands
// =============================================================================

mod cli;   // src/cli.rs - command-line parsing
mod crawl; // src/crawl/ - the concurrent crawler
mod fetch; // src/fetch/ - where pages come from

use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use cli::{Cli, Commands};
use crawl::{CrawlEvent, CrawlOptions, CrawlReport};
use fetch::FixtureFetcher;

#[tokio::main]
async fn main() {
    let exit_code = match run().await {
        Ok(code) => code,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            2
        }
    };

    std::process::exit(exit_code);
}

// Returns:
//   Ok(0) = every fetch succeeded
//   Ok(1) = at least one fetch failed
//   Err   = something went wrong outside the crawl (bad fixture, etc.)
async fn run() -> Result<i32> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match cli.command {
        Commands::Crawl {
            seed,
            max_depth,
            concurrency,
            fixture,
            latency_ms,
            json,
        } => {
            let fetcher = match fixture {
                Some(path) => FixtureFetcher::from_json_file(&path)?,
                None => FixtureFetcher::demo(),
            };
            let fetcher = fetcher.with_latency(Duration::from_millis(latency_ms));

            let options = CrawlOptions::default()
                .with_max_depth(max_depth)
                .with_concurrency(concurrency);

            handle_crawl(fetcher, &seed, &options, json).await
        }
        Commands::Fixture => {
            println!("{}", FixtureFetcher::demo().to_json_pretty()?);
            Ok(0)
        }
    }
}

// Logs go to stderr so stdout only carries crawl output.
// RUST_LOG wins over --verbose when both are given.
fn init_tracing(verbose: bool) {
    let default_filter = if verbose {
        "depth_crawler=debug"
    } else {
        "warn,depth_crawler=info"
    };

    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| default_filter.into()))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

async fn handle_crawl(
    fetcher: FixtureFetcher,
    seed: &str,
    options: &CrawlOptions,
    json: bool,
) -> Result<i32> {
    if fetcher.is_empty() {
        tracing::warn!("Fixture has no pages, every fetch will fail");
    }

    if !json {
        println!("🔍 Crawling from: {}", seed);
        println!(
            "📊 Max depth: {}, concurrency: {}, fixture pages: {}",
            options.max_depth,
            options.concurrency,
            fetcher.len()
        );
        println!();
    }

    let report = crawl::crawl(Arc::new(fetcher), seed, options, |event| {
        if !json {
            println!("{}", format_event(event));
        }
    })
    .await;

    print_report(&report, json)?;

    if report.is_clean() {
        Ok(0)
    } else {
        Ok(1)
    }
}

// One line per page found / fetch failed, printed as fetches complete
fn format_event(event: &CrawlEvent) -> String {
    match event {
        CrawlEvent::Found(page) => {
            format!("found: [depth:{}] {} {}", page.depth, page.id, page.content)
        }
        CrawlEvent::Failed(failure) => format!("failed: {}: {}", failure.id, failure.cause),
    }
}

fn print_report(report: &CrawlReport, json: bool) -> Result<()> {
    if json {
        let json_output = serde_json::to_string_pretty(report)?;
        println!("{}", json_output);
    } else {
        print_listing(report);
    }
    Ok(())
}

fn print_listing(report: &CrawlReport) {
    println!();
    println!("Done!");
    println!();

    for id in &report.visited {
        println!("{}", id);
    }

    println!();
    println!("📊 Summary:");
    println!("   ✅ Found: {}", report.pages.len());
    println!("   ❌ Failed: {}", report.failures.len());
    println!("   📋 Visited: {}", report.visited.len());
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crawl::PageVisit;
    use crate::fetch::FetchFailure;

    #[test]
    fn test_format_found_line() {
        let event = CrawlEvent::Found(PageVisit {
            depth: 3,
            id: "http://golang.org/pkg/".to_string(),
            content: "Packages".to_string(),
            links: 4,
        });
        assert_eq!(
            format_event(&event),
            "found: [depth:3] http://golang.org/pkg/ Packages"
        );
    }

    #[test]
    fn test_format_failed_line() {
        let event = CrawlEvent::Failed(FetchFailure::new("x", "not found: x"));
        assert_eq!(format_event(&event), "failed: x: not found: x");
    }

    #[tokio::test]
    async fn test_demo_crawl_exit_code() {
        let code = handle_crawl(
            FixtureFetcher::demo(),
            "http://golang.org/",
            &CrawlOptions::default(),
            true,
        )
        .await
        .unwrap();

        // http://golang.org/cmd/ is missing from the demo fixture
        assert_eq!(code, 1);
    }
}
