//! RPC Throttle Gate
//!
//! Process-wide gate that spaces outbound ledger RPC calls at least
//! `1000 / requests_per_second` milliseconds apart. Every component that talks
//! to the RPC node shares one `Arc<Throttler>`.

use std::time::Duration;
use tokio::sync::Mutex;
use tokio::time::Instant;

/// Minimum-interval rate limiter shared by all RPC callers
#[derive(Debug)]
pub struct Throttler {
    min_interval: Duration,
    /// Completion time of the previous acquisition.
    /// Held for the whole of `acquire` so read-sleep-write is one critical section.
    last_request: Mutex<Option<Instant>>,
}

impl Throttler {
    /// Create a throttler allowing `requests_per_second` calls per second (minimum 1)
    pub fn per_second(requests_per_second: u32) -> Self {
        let rps = requests_per_second.max(1);
        Self::with_interval(Duration::from_secs_f64(1.0 / rps as f64))
    }

    /// Create a throttler with an explicit minimum interval
    pub fn with_interval(min_interval: Duration) -> Self {
        Self {
            min_interval,
            last_request: Mutex::new(None),
        }
    }

    pub fn min_interval(&self) -> Duration {
        self.min_interval
    }

    /// Wait until the next request slot is free, then claim it
    pub async fn acquire(&self) {
        let mut last = self.last_request.lock().await;

        if let Some(previous) = *last {
            let elapsed = previous.elapsed();
            if elapsed < self.min_interval {
                let wait = self.min_interval - elapsed;
                tracing::trace!("Throttling RPC call for {:?}", wait);
                tokio::time::sleep(wait).await;
            }
        }

        *last = Some(Instant::now());
    }
}
