//! Request hit counter for the static file server.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};

/// Shared count of requests served under `/app`.
///
/// Owned by whoever builds the router; clones share the same counter.
#[derive(Debug, Clone, Default)]
pub struct HitCounter(Arc<AtomicU64>);

impl HitCounter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn increment(&self) {
        self.0.fetch_add(1, Ordering::Relaxed);
    }

    pub fn get(&self) -> u64 {
        self.0.load(Ordering::Relaxed)
    }

    pub fn reset(&self) {
        self.0.store(0, Ordering::Relaxed);
    }
}

/// Middleware that counts every request passing through it.
pub async fn count_hits(State(hits): State<HitCounter>, request: Request, next: Next) -> Response {
    hits.increment();
    next.run(request).await
}
