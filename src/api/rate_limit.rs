//! Per-client throttling for the `/api` routes.

use axum::{
    extract::{ConnectInfo, Request, State},
    middleware::Next,
    response::{IntoResponse, Response},
};
use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

use super::{ApiError, AppState};
use crate::config::RateLimitConfig;

/// Idle keys are swept once the table grows past this, at most once per window.
const PRUNE_THRESHOLD: usize = 1024;

struct Windows {
    hits: HashMap<String, Vec<Instant>>,
    last_prune: Option<Instant>,
}

impl Windows {
    fn prune_due(&self, now: Instant, window: Duration) -> bool {
        self.hits.len() > PRUNE_THRESHOLD
            && self
                .last_prune
                .is_none_or(|last| now.duration_since(last) >= window)
    }
}

/// Sliding window of request instants per client key.
pub struct RateLimiter {
    windows: Mutex<Windows>,
    max_requests: usize,
    window: Duration,
}

impl RateLimiter {
    #[must_use]
    pub fn new(max_requests: u32, window: Duration) -> Self {
        Self {
            windows: Mutex::new(Windows {
                hits: HashMap::new(),
                last_prune: None,
            }),
            max_requests: max_requests as usize,
            window,
        }
    }

    #[must_use]
    pub fn from_config(config: &RateLimitConfig) -> Self {
        Self::new(config.max_requests, Duration::from_secs(config.window_seconds))
    }

    /// Records a hit for `key`. Returns `Err(retry_after_secs)` when the window is full.
    pub fn check(&self, key: &str) -> Result<(), u64> {
        self.check_at(key, Instant::now())
    }

    fn check_at(&self, key: &str, now: Instant) -> Result<(), u64> {
        // A poisoned lock only means another request panicked mid-update
        let mut windows = self
            .windows
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner);

        let window = self.window;
        if windows.prune_due(now, window) {
            windows
                .hits
                .retain(|_, hits| hits.iter().any(|ts| now.duration_since(*ts) < window));
            windows.last_prune = Some(now);
        }

        let hits = windows.hits.entry(key.to_string()).or_default();
        hits.retain(|ts| now.duration_since(*ts) < self.window);

        if hits.len() >= self.max_requests {
            let oldest = hits.first().copied().unwrap_or(now);
            let remaining = self.window.saturating_sub(now.duration_since(oldest));
            let retry_after = remaining.as_secs() + u64::from(remaining.subsec_nanos() > 0);
            return Err(retry_after.max(1));
        }

        hits.push(now);
        Ok(())
    }
}

fn client_key(req: &Request) -> String {
    req.extensions()
        .get::<ConnectInfo<SocketAddr>>()
        .map_or_else(|| "anonymous".to_string(), |info| info.0.ip().to_string())
}

/// Rejects the request with 429 once its client exhausts the window.
pub async fn limit(State(state): State<Arc<AppState>>, req: Request, next: Next) -> Response {
    if let Some(limiter) = &state.rate_limiter {
        let key = client_key(&req);
        if let Err(retry_after) = limiter.check(&key) {
            tracing::warn!(client = %key, retry_after, "Rate limit exceeded");
            metrics::counter!("http_rate_limited_total").increment(1);
            return ApiError::RateLimited { retry_after }.into_response();
        }
    }

    next.run(req).await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_allows_up_to_limit_then_rejects() {
        let limiter = RateLimiter::new(3, Duration::from_secs(60));
        let now = Instant::now();

        for _ in 0..3 {
            assert!(limiter.check_at("10.0.0.1", now).is_ok());
        }

        let retry_after = limiter.check_at("10.0.0.1", now).unwrap_err();
        assert_eq!(retry_after, 60);
    }

    #[test]
    fn test_keys_are_independent() {
        let limiter = RateLimiter::new(1, Duration::from_secs(60));
        let now = Instant::now();

        assert!(limiter.check_at("10.0.0.1", now).is_ok());
        assert!(limiter.check_at("10.0.0.1", now).is_err());
        assert!(limiter.check_at("10.0.0.2", now).is_ok());
    }

    #[test]
    fn test_window_slides() {
        let limiter = RateLimiter::new(2, Duration::from_secs(10));
        let start = Instant::now();

        assert!(limiter.check_at("k", start).is_ok());
        assert!(limiter.check_at("k", start + Duration::from_secs(4)).is_ok());

        let retry_after = limiter
            .check_at("k", start + Duration::from_secs(6))
            .unwrap_err();
        assert_eq!(retry_after, 4);

        // The first hit has aged out
        assert!(limiter.check_at("k", start + Duration::from_secs(10)).is_ok());
    }

    fn key_count(limiter: &RateLimiter) -> usize {
        limiter.windows.lock().unwrap().hits.len()
    }

    #[test]
    fn test_idle_keys_swept_at_most_once_per_window() {
        let limiter = RateLimiter::new(5, Duration::from_secs(10));
        let start = Instant::now();

        for i in 0..=PRUNE_THRESHOLD {
            assert!(limiter.check_at(&format!("10.0.{}.{}", i / 256, i % 256), start).is_ok());
        }
        assert_eq!(key_count(&limiter), PRUNE_THRESHOLD + 1);

        // Every earlier key is idle now, so the first check sweeps them
        let later = start + Duration::from_secs(11);
        assert!(limiter.check_at("fresh-0", later).is_ok());
        assert_eq!(key_count(&limiter), 1);

        // Refill past the threshold; no sweep until another window has passed
        for i in 0..=PRUNE_THRESHOLD {
            assert!(limiter.check_at(&format!("burst-{i}"), later).is_ok());
        }
        let total = key_count(&limiter);
        assert!(limiter.check_at("fresh-1", later + Duration::from_secs(1)).is_ok());
        assert_eq!(key_count(&limiter), total + 1);
    }
}
