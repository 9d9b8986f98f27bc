// src/engine/mod.rs
// =============================================================================
// This module is the concurrent crawl engine - the core of the tool.
//
// Submodules:
// - frontier: the work queue of discovered links, plus the quiescence
//   protocol that decides when the crawl is truly finished
// - state:    the shared seen/passed/failed sets behind one lock facade
// - worker:   the engine itself - seeds the frontier, runs the worker
//   pool, and hands back the results
//
// This file (mod.rs) is the module root - it re-exports the public API
// so callers write `engine::CrawlEngine` instead of reaching into the
// submodules.
// =============================================================================

mod frontier;
mod state;
mod worker;

pub use state::{BrokenLink, CrawlResults, FailureKind};
pub use worker::{CrawlEngine, DEFAULT_WORKERS};
