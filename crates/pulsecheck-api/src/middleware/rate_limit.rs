//! Rate limiting for API endpoints.
//!
//! Implements in-memory rate limiting with a sliding window algorithm,
//! tracking requests per client per endpoint. Single-instance only; a
//! shared store would be needed to coordinate across replicas.

use axum::http::HeaderMap;
use parking_lot::Mutex;
use std::{
    collections::HashMap,
    sync::Arc,
    time::{Duration, Instant},
};

use crate::error::ApiError;

/// Check-in submissions per IP per minute.
pub const CHECKINS_WRITE_LIMIT: RateLimitConfig = RateLimitConfig::per_minute(60);

/// Check-in reads per IP per minute.
pub const CHECKINS_READ_LIMIT: RateLimitConfig = RateLimitConfig::per_minute(120);

/// Risk assessments per IP per minute.
pub const RISK_LIMIT: RateLimitConfig = RateLimitConfig::per_minute(120);

/// Prediction submissions per IP per minute.
pub const PREDICTIONS_LIMIT: RateLimitConfig = RateLimitConfig::per_minute(30);

/// OAuth authorize redirects per IP per minute.
pub const OAUTH_AUTHORIZE_LIMIT: RateLimitConfig = RateLimitConfig::per_minute(10);

/// OAuth callback exchanges per IP per minute.
pub const OAUTH_CALLBACK_LIMIT: RateLimitConfig = RateLimitConfig::per_minute(20);

/// Configuration for one endpoint's rate limit.
#[derive(Debug, Clone, Copy)]
pub struct RateLimitConfig {
    /// Maximum number of requests allowed within the window.
    pub max_attempts: usize,
    /// Duration of the sliding window.
    pub window: Duration,
}

impl RateLimitConfig {
    /// A per-minute limit.
    #[must_use]
    pub const fn per_minute(max_attempts: usize) -> Self {
        Self {
            max_attempts,
            window: Duration::from_secs(60),
        }
    }
}

/// Outcome of a rate limit check.
#[derive(Debug, Clone, Copy)]
pub struct LimitDecision {
    /// Whether the request is allowed.
    pub allowed: bool,
    /// The configured limit.
    pub limit: usize,
    /// Requests remaining in the current window.
    pub remaining: usize,
    /// Time until the window has room again (zero when allowed).
    pub retry_after: Duration,
}

/// Entry tracking requests from a single client to a single endpoint.
#[derive(Debug, Clone)]
struct AttemptEntry {
    /// Timestamps of requests within the window.
    timestamps: Vec<Instant>,
}

impl AttemptEntry {
    fn new() -> Self {
        Self {
            timestamps: Vec::new(),
        }
    }

    /// Drop attempts outside the window.
    fn prune(&mut self, now: Instant, window: Duration) {
        self.timestamps.retain(|&t| now.duration_since(t) < window);
    }

    fn count(&self, now: Instant, window: Duration) -> usize {
        self.timestamps
            .iter()
            .filter(|&&t| now.duration_since(t) < window)
            .count()
    }

    /// How long until the oldest in-window attempt ages out.
    fn retry_after(&self, now: Instant, window: Duration) -> Duration {
        self.timestamps
            .iter()
            .filter(|&&t| now.duration_since(t) < window)
            .min()
            .map_or(Duration::ZERO, |&oldest| {
                window.saturating_sub(now.duration_since(oldest))
            })
    }
}

/// In-memory sliding-window rate limiter keyed by `(endpoint, client)`.
///
/// Thread-safe; cloning shares the underlying entries.
#[derive(Debug, Clone, Default)]
pub struct RateLimiter {
    entries: Arc<Mutex<HashMap<(String, String), AttemptEntry>>>,
}

impl RateLimiter {
    /// Create an empty limiter.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a request and decide whether it is allowed.
    pub fn check(&self, endpoint: &str, client: &str, config: &RateLimitConfig) -> LimitDecision {
        let now = Instant::now();
        let mut entries = self.entries.lock();

        let entry = entries
            .entry((endpoint.to_string(), client.to_string()))
            .or_insert_with(AttemptEntry::new);
        entry.prune(now, config.window);

        let count = entry.count(now, config.window);
        if count >= config.max_attempts {
            return LimitDecision {
                allowed: false,
                limit: config.max_attempts,
                remaining: 0,
                retry_after: entry.retry_after(now, config.window),
            };
        }

        entry.timestamps.push(now);
        LimitDecision {
            allowed: true,
            limit: config.max_attempts,
            remaining: config.max_attempts - count - 1,
            retry_after: Duration::ZERO,
        }
    }

    /// Clean up stale entries.
    ///
    /// Should be called periodically to prevent memory growth;
    /// `max_window` must be at least the largest configured window.
    pub fn cleanup(&self, max_window: Duration) {
        let now = Instant::now();
        let mut entries = self.entries.lock();
        entries.retain(|_, entry| entry.count(now, max_window) > 0);
    }
}

/// Check the limiter and convert a denial into [`ApiError::RateLimited`].
pub fn enforce_rate_limit(
    limiter: &RateLimiter,
    endpoint: &str,
    client: &str,
    config: &RateLimitConfig,
) -> Result<(), ApiError> {
    let decision = limiter.check(endpoint, client, config);
    if decision.allowed {
        return Ok(());
    }

    tracing::warn!(
        endpoint = endpoint,
        client = client,
        limit = decision.limit,
        "Rate limit exceeded"
    );
    Err(ApiError::RateLimited {
        retry_after_secs: decision.retry_after.as_secs().max(1),
    })
}

/// Resolve the client IP for rate limiting.
///
/// Prefers `x-forwarded-for` (first entry), then `x-real-ip`. Behind a
/// proxy/CDN the platform must set one of these reliably; otherwise all
/// clients share the `unknown` bucket.
#[must_use]
pub fn client_ip(headers: &HeaderMap) -> String {
    if let Some(forwarded) = headers.get("x-forwarded-for").and_then(|v| v.to_str().ok()) {
        if let Some(first) = forwarded.split(',').next() {
            let first = first.trim();
            if !first.is_empty() {
                return first.to_string();
            }
        }
    }

    headers
        .get("x-real-ip")
        .and_then(|v| v.to_str().ok())
        .map_or_else(|| "unknown".to_string(), ToString::to_string)
}
