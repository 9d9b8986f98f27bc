// src/engine/state.rs
// =============================================================================
// This module holds everything the crawl workers share besides the queue:
//
// - Seen:   URLs already committed to a crawl task (dedup)
// - Passed: URLs that answered with HTTP success
// - Failed: broken links, each paired with the page that referenced it
//
// All three live behind mutexes inside one CrawlState object, so lock
// discipline is in one place instead of scattered across the workers.
// The critical rule is in mark_seen(): "have we seen this URL?" and
// "remember it" happen under a single lock acquisition. Two workers
// discovering the same link at the same time must not both get a green
// light, or the URL would be fetched twice.
//
// Seen is case-insensitive: URLs are folded to lowercase on insertion.
// =============================================================================

use std::collections::HashSet;
use std::sync::Mutex;

use serde::{Serialize, Serializer};

use crate::fetcher::FetchError;

// Why a link landed in the failed set.
//
// Either the server answered with a non-2xx status, or the request never
// completed at all (timeout, DNS, refused connection, ...). Both are
// recorded the same way; the marker just tells them apart in the report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FailureKind {
    /// Server responded with this non-2xx status code
    Http(u16),
    /// Request failed before any status code arrived
    Transport(FetchError),
}

impl std::fmt::Display for FailureKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FailureKind::Http(code) => write!(f, "{}", code),
            FailureKind::Transport(err) => write!(f, "{}", err),
        }
    }
}

// Serialize as the display string ("404", "TIMEOUT", ...) so JSON output
// and the CSV Code column agree
impl Serialize for FailureKind {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// One broken link: what failed, where it pointed, and who referenced it
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct BrokenLink {
    /// HTTP status or transport failure marker
    pub code: FailureKind,
    /// The URL that failed (lowercased, as fetched)
    pub url: String,
    /// The page the link was found on; None for the seed itself
    pub parent: Option<String>,
}

/// What a finished crawl hands back to the caller
#[derive(Debug)]
pub struct CrawlResults {
    pub passed: HashSet<String>,
    pub failed: HashSet<BrokenLink>,
}

/// Shared mutable state for one crawl; owned by the engine, dropped with it
pub struct CrawlState {
    seen: Mutex<HashSet<String>>,
    passed: Mutex<HashSet<String>>,
    failed: Mutex<HashSet<BrokenLink>>,
}

impl CrawlState {
    pub fn new() -> Self {
        Self {
            seen: Mutex::new(HashSet::new()),
            passed: Mutex::new(HashSet::new()),
            failed: Mutex::new(HashSet::new()),
        }
    }

    // Atomically checks-and-marks a URL as seen.
    //
    // Returns true if the URL was new - meaning the caller now owns the
    // right (and the duty) to enqueue a crawl task for it. Returns false
    // if some worker already committed it. The fold to lowercase makes
    // "/About" and "/about" the same URL as far as dedup is concerned.
    pub fn mark_seen(&self, url: &str) -> bool {
        lock(&self.seen).insert(url.to_lowercase())
    }

    pub fn record_passed(&self, url: String) {
        lock(&self.passed).insert(url);
    }

    pub fn record_failed(&self, link: BrokenLink) {
        lock(&self.failed).insert(link);
    }

    pub fn seen_count(&self) -> usize {
        lock(&self.seen).len()
    }

    /// Copies the result sets out; called once, after the pool has quiesced
    pub fn snapshot(&self) -> CrawlResults {
        CrawlResults {
            passed: lock(&self.passed).clone(),
            failed: lock(&self.failed).clone(),
        }
    }
}

impl Default for CrawlState {
    fn default() -> Self {
        Self::new()
    }
}

// A worker that panics while holding a lock poisons it. The sets
// themselves are still valid (every mutation is a single insert), so the
// rest of the pool keeps going with the recovered data.
fn lock<T>(mutex: &Mutex<T>) -> std::sync::MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|e| e.into_inner())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mark_seen_is_first_come_only() {
        let state = CrawlState::new();
        assert!(state.mark_seen("http://x.test/about"));
        assert!(!state.mark_seen("http://x.test/about"));
    }

    #[test]
    fn test_mark_seen_folds_case() {
        let state = CrawlState::new();
        assert!(state.mark_seen("http://x.test/About"));
        // Same URL in different case is a duplicate, not new work
        assert!(!state.mark_seen("http://x.test/about"));
        assert!(!state.mark_seen("HTTP://X.TEST/ABOUT"));
        assert_eq!(state.seen_count(), 1);
    }

    #[test]
    fn test_results_snapshot() {
        let state = CrawlState::new();
        state.record_passed("http://x.test/".to_string());
        state.record_failed(BrokenLink {
            code: FailureKind::Http(404),
            url: "http://x.test/missing".to_string(),
            parent: Some("http://x.test/".to_string()),
        });

        let results = state.snapshot();
        assert!(results.passed.contains("http://x.test/"));
        assert_eq!(results.failed.len(), 1);
        let broken = results.failed.iter().next().unwrap();
        assert_eq!(broken.code, FailureKind::Http(404));
    }

    #[test]
    fn test_failed_set_dedups_identical_triples() {
        let state = CrawlState::new();
        let link = BrokenLink {
            code: FailureKind::Http(404),
            url: "http://x.test/missing".to_string(),
            parent: None,
        };
        state.record_failed(link.clone());
        state.record_failed(link);
        assert_eq!(state.snapshot().failed.len(), 1);
    }

    #[test]
    fn test_failure_kind_display() {
        assert_eq!(FailureKind::Http(404).to_string(), "404");
        assert_eq!(
            FailureKind::Transport(FetchError::Timeout).to_string(),
            "TIMEOUT"
        );
    }

    #[test]
    fn test_broken_link_serializes_code_as_string() {
        let link = BrokenLink {
            code: FailureKind::Http(500),
            url: "http://x.test/err".to_string(),
            parent: None,
        };
        let json = serde_json::to_value(&link).unwrap();
        assert_eq!(json["code"], "500");
        assert_eq!(json["parent"], serde_json::Value::Null);
    }

    #[test]
    fn test_concurrent_discovery_single_winner() {
        use std::sync::Arc;

        // Many threads race to mark the same URL; exactly one may win
        let state = Arc::new(CrawlState::new());
        let winners: usize = std::thread::scope(|scope| {
            let handles: Vec<_> = (0..8)
                .map(|_| {
                    let state = Arc::clone(&state);
                    scope.spawn(move || state.mark_seen("http://x.test/shared") as usize)
                })
                .collect();
            handles.into_iter().map(|h| h.join().unwrap()).sum()
        });
        assert_eq!(winners, 1);
    }
}
