// src/report.rs
// =============================================================================
// This module writes the broken-link report as a CSV file.
//
// One row per broken link, three columns:
//
//   Code, Broken Link, Parent
//
// Code is either a numeric HTTP status ("404") or a transport marker
// ("TIMEOUT", "DNS", ...). Parent is the page the link was found on,
// empty for the seed itself. Rows come from an unordered set, so the
// report makes no ordering promise - consumers should not rely on one.
//
// The file name is derived from the seed URL: scheme stripped, path
// separators replaced by underscores. Crawling http://x.test/docs
// produces "x.test_docs.csv" in the output directory.
// =============================================================================

use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::Serialize;

use crate::engine::BrokenLink;

// One CSV row. The serde renames become the header row, spaces and all.
#[derive(Serialize)]
struct ReportRow<'a> {
    #[serde(rename = "Code")]
    code: String,
    #[serde(rename = "Broken Link")]
    broken_link: &'a str,
    #[serde(rename = "Parent")]
    parent: &'a str,
}

// Turns a seed URL into a filesystem-safe report name.
//
// "https://x.test/docs/" -> "x.test_docs_.csv"
pub fn report_file_name(seed_url: &str) -> String {
    let without_scheme = seed_url
        .strip_prefix("https://")
        .or_else(|| seed_url.strip_prefix("http://"))
        .unwrap_or(seed_url);
    format!("{}.csv", without_scheme.replace('/', "_"))
}

// Writes the failed set to <output_dir>/<derived name>.csv and returns
// the path it wrote. The directory is created if needed.
pub fn write_report(
    failed: &HashSet<BrokenLink>,
    output_dir: &Path,
    seed_url: &str,
) -> Result<PathBuf> {
    fs::create_dir_all(output_dir)
        .with_context(|| format!("could not create report directory {}", output_dir.display()))?;

    let path = output_dir.join(report_file_name(seed_url));
    let mut writer = csv::Writer::from_path(&path)
        .with_context(|| format!("could not create report file {}", path.display()))?;

    if failed.is_empty() {
        // serialize() only emits the header alongside the first row; a
        // clean crawl still gets a header-only report
        writer.write_record(["Code", "Broken Link", "Parent"])?;
    }

    for link in failed {
        writer.serialize(ReportRow {
            code: link.code.to_string(),
            broken_link: &link.url,
            parent: link.parent.as_deref().unwrap_or(""),
        })?;
    }

    writer
        .flush()
        .with_context(|| format!("could not write report file {}", path.display()))?;

    Ok(path)
}
