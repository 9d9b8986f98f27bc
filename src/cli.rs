// src/cli.rs
// =============================================================================
// This file defines our command-line interface using the `clap` crate.
//
// clap is a popular Rust library for parsing command-line arguments.
// We use the "derive" API which lets us define the CLI structure using
// Rust structs and attributes (the #[...] things).
//
// The tool does exactly one thing - crawl a site and report broken links -
// so there are no subcommands, just one positional argument and a few
// flags for the knobs the crawler exposes.
// =============================================================================

use clap::Parser;

use crate::engine::DEFAULT_WORKERS;

// This struct represents our entire CLI application
//
// #[derive(Parser)] tells clap to automatically generate parsing code
// The #[command(...)] attributes configure how the CLI behaves
#[derive(Parser, Debug)]
#[command(
    name = "dead-link-radar",
    version = "0.1.0",
    about = "Crawl a website and report every broken link it finds",
    long_about = "dead-link-radar crawls a website starting from a seed URL, follows every \
                  same-site link and image reference, and writes a CSV report of the links \
                  that came back broken, paired with the page that referenced them."
)]
pub struct Cli {
    /// Seed URL to crawl (e.g., https://example.com/)
    ///
    /// This is a positional argument (required, no flag needed).
    /// It must start with http:// or https:// - anything else is
    /// rejected before the crawl starts.
    pub site_url: String,

    /// Number of concurrent fetch workers
    ///
    /// More workers means more pages in flight at once.
    #[arg(long, default_value_t = DEFAULT_WORKERS)]
    pub workers: usize,

    /// Per-request timeout in seconds
    ///
    /// A slow host stalls one worker for at most this long.
    #[arg(long, default_value_t = 10)]
    pub timeout: u64,

    /// Directory the CSV report is written into
    ///
    /// Created if it does not exist. The file name is derived from the
    /// seed URL (scheme stripped, slashes replaced by underscores).
    #[arg(long, default_value = "reports")]
    pub output_dir: String,

    /// Also print the broken links as JSON on stdout
    ///
    /// This is an optional flag: --json
    #[arg(long)]
    pub json: bool,
}
