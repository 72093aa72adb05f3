use std::sync::{
    atomic::{AtomicU64, Ordering},
    Arc,
};

use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};

use crate::AppState;

/// Request counter shared through [`AppState`].
#[derive(Clone, Default)]
pub struct HitCounter(Arc<AtomicU64>);

impl HitCounter {
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

pub async fn count_hits(State(state): State<AppState>, request: Request, next: Next) -> Response {
    state.hits.increment();
    next.run(request).await
}
