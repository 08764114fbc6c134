use std::time::Duration;
use tokio::time::{Instant, sleep};
use tracing::info;

/// Minimum-interval limiter: remembers when the last request went out and
/// sleeps the caller until `min_interval` has passed.
///
/// Owned by a single client and driven through `&mut self`, so no locking.
#[derive(Debug, Clone)]
pub struct RateLimiter {
    min_interval: Duration,
    last_request: Option<Instant>,
}

impl RateLimiter {
    pub fn new(min_interval: Duration) -> Self {
        Self {
            min_interval,
            last_request: None,
        }
    }

    pub fn last_request(&self) -> Option<Instant> {
        self.last_request
    }

    /// Time still to wait before the next request is allowed.
    pub fn remaining(&self) -> Duration {
        match self.last_request {
            Some(last) => self.min_interval.saturating_sub(last.elapsed()),
            None => Duration::ZERO,
        }
    }

    /// Wait out the interval (if any) and stamp the new request time.
    pub async fn acquire(&mut self) {
        let wait = self.remaining();
        if !wait.is_zero() {
            info!("Rate limiting: sleeping for {:.2} seconds", wait.as_secs_f64());
            sleep(wait).await;
        }
        self.last_request = Some(Instant::now());
    }
}
