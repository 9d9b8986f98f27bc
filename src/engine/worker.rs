// src/engine/worker.rs
// =============================================================================
// This module drives a crawl from seed to completion.
//
// The engine wires the pieces together: it seeds the frontier, spawns a
// bounded pool of workers, and hands back the result sets once the pool
// has quiesced. Each worker runs the same loop:
//
//   pop task -> fetch -> record pass/fail -> maybe expand -> mark done
//
// "Expand" means: the page was same-site HTML, so parse it, classify
// every href/src it contains, and push a new task for each reference
// that survives classification AND wins the seen-set race. Dedup happens
// here at enqueue time - a URL that lost the mark_seen race never
// becomes a task at all.
//
// Failure policy: a broken or unreachable link is DATA, not an error.
// Every per-task failure is absorbed into the failed set and the crawl
// moves on; nothing a single page does can abort the run.
// =============================================================================

use std::sync::Arc;

use futures::future::join_all;

use crate::classify::{classify, should_expand};
use crate::extract::extract_refs;
use crate::fetcher::Fetch;

use super::frontier::{CrawlTask, Frontier};
use super::state::{BrokenLink, CrawlResults, CrawlState, FailureKind};

/// Default size of the worker pool
pub const DEFAULT_WORKERS: usize = 10;

/// One crawl, start to finish; build a fresh engine per run
pub struct CrawlEngine<F> {
    fetcher: Arc<F>,
    frontier: Arc<Frontier>,
    state: Arc<CrawlState>,
    site_url: Arc<str>,
    workers: usize,
}

impl<F: Fetch + 'static> CrawlEngine<F> {
    pub fn new(site_url: &str, workers: usize, fetcher: Arc<F>) -> Self {
        Self {
            fetcher,
            frontier: Arc::new(Frontier::new()),
            state: Arc::new(CrawlState::new()),
            site_url: Arc::from(site_url),
            workers: workers.max(1),
        }
    }

    // Runs the crawl to completion and returns the final result sets.
    //
    // The frontier starts with exactly one task (the seed, no parent)
    // and is drained exactly once; when join_all returns, every worker
    // has observed quiescence and no fetch is in flight anywhere.
    pub async fn run(self) -> CrawlResults {
        self.state.mark_seen(&self.site_url);
        self.frontier.push(CrawlTask {
            parent: None,
            url: self.site_url.to_string(),
        });

        let handles: Vec<_> = (0..self.workers)
            .map(|_| {
                let fetcher = Arc::clone(&self.fetcher);
                let frontier = Arc::clone(&self.frontier);
                let state = Arc::clone(&self.state);
                let site_url = Arc::clone(&self.site_url);
                tokio::spawn(worker_loop(fetcher, frontier, state, site_url))
            })
            .collect();

        join_all(handles).await;

        self.state.snapshot()
    }
}

// One worker: keeps pulling tasks until the frontier reports quiescence.
//
// task_done() runs after process_task has pushed every child the page
// produced - that ordering is what keeps the pending count honest.
async fn worker_loop<F: Fetch>(
    fetcher: Arc<F>,
    frontier: Arc<Frontier>,
    state: Arc<CrawlState>,
    site_url: Arc<str>,
) {
    while let Some(task) = frontier.next_task().await {
        process_task(task, &*fetcher, &frontier, &state, &site_url).await;
        frontier.task_done();
    }
}

// Fetch-and-expand for a single task.
//
// The URL is folded to lowercase before fetching, so the passed/failed
// sets and the seen set all speak the same case.
async fn process_task<F: Fetch>(
    task: CrawlTask,
    fetcher: &F,
    frontier: &Frontier,
    state: &CrawlState,
    site_url: &str,
) {
    let url = task.url.to_lowercase();
    println!("🔎 Scraping: {}", url);

    match fetcher.fetch(&url).await {
        Err(err) => {
            // Never got a status code: DNS, timeout, refused, ...
            state.record_failed(BrokenLink {
                code: FailureKind::Transport(err),
                url,
                parent: task.parent,
            });
        }
        Ok(response) if !response.is_success() => {
            state.record_failed(BrokenLink {
                code: FailureKind::Http(response.status),
                url,
                parent: task.parent,
            });
        }
        Ok(response) => {
            state.record_passed(url.clone());

            // Only same-site HTML pages are parsed for more links;
            // external URLs and binary files stop here
            if should_expand(&url, site_url) {
                for raw_ref in extract_refs(&response.body).into_all() {
                    if let Some(next) = classify(&raw_ref, site_url) {
                        // mark_seen is the dedup gate: exactly one
                        // discoverer of a URL gets to enqueue it
                        if state.mark_seen(&next) {
                            frontier.push(CrawlTask {
                                parent: Some(url.clone()),
                                url: next,
                            });
                        }
                    }
                }
            }
        }
    }
}
