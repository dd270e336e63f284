//! Rate limiting middleware
//!
//! Token-bucket per client IP. Customer-facing endpoints sit behind
//! this; the bucket refills continuously and allows a 2x burst.

use axum::{
    body::Body,
    extract::Request,
    middleware::Next,
    response::{IntoResponse, Response},
};
use std::{
    collections::HashMap,
    sync::Arc,
    time::{Duration, Instant},
};
use tokio::sync::RwLock;

use crate::error::ApiError;

#[derive(Debug, Clone)]
struct Bucket {
    tokens: f64,
    last_update: Instant,
}

impl Bucket {
    fn new(max_tokens: f64) -> Self {
        Self {
            tokens: max_tokens,
            last_update: Instant::now(),
        }
    }

    fn try_consume(&mut self, refill_per_second: f64, max_tokens: f64) -> bool {
        let now = Instant::now();
        let elapsed = now.duration_since(self.last_update).as_secs_f64();

        self.tokens = (self.tokens + elapsed * refill_per_second).min(max_tokens);
        self.last_update = now;

        if self.tokens >= 1.0 {
            self.tokens -= 1.0;
            true
        } else {
            false
        }
    }
}

/// Rate limiter state
#[derive(Clone)]
pub struct RateLimiter {
    buckets: Arc<RwLock<HashMap<String, Bucket>>>,
    refill_per_second: f64,
    max_tokens: f64,
}

impl RateLimiter {
    pub fn new(requests_per_second: u32) -> Self {
        Self {
            buckets: Arc::new(RwLock::new(HashMap::new())),
            refill_per_second: requests_per_second as f64,
            max_tokens: (requests_per_second * 2) as f64,
        }
    }

    /// Check if a request from this client is allowed
    pub async fn check(&self, key: &str) -> bool {
        let mut buckets = self.buckets.write().await;

        let bucket = buckets
            .entry(key.to_string())
            .or_insert_with(|| Bucket::new(self.max_tokens));

        bucket.try_consume(self.refill_per_second, self.max_tokens)
    }

    /// Drop buckets idle for longer than `max_idle` so the per-client
    /// map stays bounded. An idle bucket is full again anyway.
    pub async fn sweep(&self, max_idle: Duration) {
        let now = Instant::now();
        let mut buckets = self.buckets.write().await;
        buckets.retain(|_, bucket| now.duration_since(bucket.last_update) < max_idle);
    }

    /// Number of tracked clients, for the sweeper's logging.
    pub async fn tracked_clients(&self) -> usize {
        self.buckets.read().await.len()
    }
}

/// Create rate limiting middleware layer
pub fn rate_limit_layer(
    rate_limiter: RateLimiter,
) -> impl Fn(
    Request<Body>,
    Next,
) -> std::pin::Pin<Box<dyn std::future::Future<Output = Response> + Send>>
       + Clone
       + Send {
    move |request: Request<Body>, next: Next| {
        let rate_limiter = rate_limiter.clone();
        Box::pin(async move {
            let client_key = extract_client_ip(&request);

            if !rate_limiter.check(&client_key).await {
                tracing::warn!(client = %client_key, "Rate limit exceeded");
                return ApiError::TooManyRequests.into_response();
            }

            next.run(request).await
        })
    }
}

/// Best-effort client identification from proxy headers
fn extract_client_ip(request: &Request<Body>) -> String {
    request
        .headers()
        .get("x-forwarded-for")
        .and_then(|h| h.to_str().ok())
        .map(|s| s.split(',').next().unwrap_or(s).trim().to_string())
        .or_else(|| {
            request
                .headers()
                .get("x-real-ip")
                .and_then(|h| h.to_str().ok())
                .map(|s| s.to_string())
        })
        .unwrap_or_else(|| "unknown".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_burst_then_deny() {
        let limiter = RateLimiter::new(2); // burst capacity 4

        let mut allowed = 0;
        for _ in 0..10 {
            if limiter.check("1.2.3.4").await {
                allowed += 1;
            }
        }

        assert_eq!(allowed, 4);
    }

    #[tokio::test]
    async fn test_sweep_drops_idle_buckets() {
        let limiter = RateLimiter::new(1); // burst capacity 2

        while limiter.check("1.2.3.4").await {}
        assert!(!limiter.check("1.2.3.4").await);
        assert_eq!(limiter.tracked_clients().await, 1);

        limiter.sweep(Duration::ZERO).await;
        assert_eq!(limiter.tracked_clients().await, 0);

        // A swept client starts over with a fresh bucket.
        assert!(limiter.check("1.2.3.4").await);
    }

    #[tokio::test]
    async fn test_sweep_keeps_active_buckets() {
        let limiter = RateLimiter::new(1);

        limiter.check("a").await;
        limiter.sweep(Duration::from_secs(600)).await;

        assert_eq!(limiter.tracked_clients().await, 1);
    }

    #[tokio::test]
    async fn test_clients_are_independent() {
        let limiter = RateLimiter::new(1);

        for _ in 0..5 {
            limiter.check("a").await;
        }

        assert!(limiter.check("b").await);
    }
}
