//! TMDB API rate limiter.

use std::time::{Duration, Instant};

/// Default minimum interval between requests (~40 req/s).
const DEFAULT_MIN_INTERVAL: Duration = Duration::from_millis(25);

/// Single-tier rate limiter for the TMDB API.
///
/// TMDB enforces roughly 40 requests per second; the limiter spaces
/// consecutive requests by a minimum interval.
#[derive(Debug)]
#[allow(clippy::module_name_repetitions)]
pub struct TmdbRateLimiter {
    /// Minimum interval between requests.
    min_interval: Duration,
    /// Earliest instant the next request may be sent.
    next_allowed: Option<Instant>,
}

impl TmdbRateLimiter {
    /// Creates a new rate limiter with the given minimum interval.
    pub(crate) const fn new(min_interval: Duration) -> Self {
        Self {
            min_interval,
            next_allowed: None,
        }
    }

    /// Creates a new rate limiter with the default interval (25ms).
    pub(crate) const fn default_interval() -> Self {
        Self::new(DEFAULT_MIN_INTERVAL)
    }

    /// Waits until the next request is allowed and reserves the slot.
    pub async fn throttle(&mut self) {
        if let Some(at) = self.next_allowed {
            let now = Instant::now();
            if at > now {
                tokio::time::sleep(at.saturating_duration_since(now)).await;
            }
        }
        self.next_allowed = Instant::now()
            .checked_add(self.min_interval)
            .or_else(|| Some(Instant::now()));
    }
}
