// src/main.rs
// =============================================================================
// This is the entry point of our CLI application.
//
// What happens here:
// 1. Parse command-line arguments using clap
// 2. Validate the seed URL (the only error that can abort the program)
// 3. Run the crawl engine to completion
// 4. Print a summary and write the CSV report
// 5. Exit with proper code (0 = clean, 1 = broken links, 2 = error)
//
// Everything after startup is non-fatal by design: a page that fails to
// fetch becomes a row in the report, never a crash.
// =============================================================================

// Module declarations - tells Rust about our other source files
mod classify; // src/classify.rs - URL normalizer/classifier
mod cli; // src/cli.rs - command-line parsing
mod engine; // src/engine/ - the concurrent crawl engine
mod extract; // src/extract.rs - href/src extraction from HTML
mod fetcher; // src/fetcher.rs - the HTTP boundary
mod report; // src/report.rs - CSV report writing

use std::path::Path;
use std::sync::Arc;
use std::time::{Duration, Instant};

use anyhow::Result;
use clap::Parser;
use url::Url;

use cli::Cli;
use engine::CrawlEngine;
use fetcher::HttpFetcher;

// The #[tokio::main] attribute transforms our async main into a real main
// function. It creates a tokio runtime and runs our async code inside it.
#[tokio::main]
async fn main() {
    let exit_code = match run().await {
        Ok(code) => code,
        Err(e) => {
            // If an unexpected error occurred, print it and exit with code 2
            eprintln!("Error: {}", e);
            2
        }
    };

    std::process::exit(exit_code);
}

// This is the main application logic
// Returns:
//   Ok(0) = crawl finished, no broken links
//   Ok(1) = crawl finished, broken links found
//   Ok(2) = bad seed URL
//   Err  = unexpected error (report IO, client setup)
async fn run() -> Result<i32> {
    let cli = Cli::parse();

    // The seed is the only input that can abort the program. Everything
    // discovered during the crawl is handled as data.
    let site_url = match validate_seed(&cli.site_url) {
        Ok(url) => url,
        Err(reason) => {
            eprintln!("Error: {}", reason);
            eprintln!("The seed must look like http(s)://host/, e.g. https://example.com/");
            return Ok(2);
        }
    };

    println!("🕸️  Crawling site: {}", site_url);
    println!("👷 Workers: {} | Timeout: {}s", cli.workers, cli.timeout);

    let fetcher = Arc::new(HttpFetcher::new(Duration::from_secs(cli.timeout))?);
    let engine = CrawlEngine::new(&site_url, cli.workers, fetcher);

    let started = Instant::now();
    let results = engine.run().await;
    let elapsed = started.elapsed();

    println!();
    println!("⏱️  Entire crawl took: {:.2?}", elapsed);
    println!("✅ Links passed: {}", results.passed.len());
    println!("❌ Links failed: {}", results.failed.len());

    let report_path = report::write_report(&results.failed, Path::new(&cli.output_dir), &site_url)?;
    println!("📄 Report written to: {}", report_path.display());

    if cli.json {
        // Serialize results to JSON and print
        println!("{}", serde_json::to_string_pretty(&results.failed)?);
    }

    if results.failed.is_empty() {
        Ok(0) // Exit code 0 = all good
    } else {
        Ok(1) // Exit code 1 = broken links found
    }
}

// Checks that the seed looks like a fetchable http(s) URL.
//
// We lean on the url crate rather than a length check: the seed must
// parse, carry an http or https scheme, and have a host.
fn validate_seed(raw: &str) -> Result<String, String> {
    let parsed = Url::parse(raw).map_err(|e| format!("invalid seed URL '{}': {}", raw, e))?;

    if parsed.scheme() != "http" && parsed.scheme() != "https" {
        return Err(format!(
            "unsupported scheme '{}': only http and https can be crawled",
            parsed.scheme()
        ));
    }
    if parsed.host_str().is_none() {
        return Err(format!("seed URL '{}' has no host", raw));
    }

    Ok(raw.to_string())
}
