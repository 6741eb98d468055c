// ── Timed result cache ──
//
// Single-slot TTL cache for the exporter endpoint: scrape targets are
// slow embedded devices, so `/metrics` requests inside the TTL window
// reuse the last result. Refreshes are serialized behind the mutex —
// concurrent requests during a refresh wait for it rather than piling
// more scrapes onto the firmware.

use std::time::Duration;

use tokio::sync::Mutex;
use tokio::time::Instant;
use tracing::debug;

pub struct TimedCache<T> {
    ttl: Duration,
    slot: Mutex<Option<(Instant, T)>>,
}

impl<T: Clone> TimedCache<T> {
    pub fn new(ttl: Duration) -> Self {
        Self {
            ttl,
            slot: Mutex::new(None),
        }
    }

    /// Return the cached value if it is younger than the TTL; otherwise
    /// run `refresh` and cache its result. Errors are not cached.
    pub async fn get_or_refresh<F, Fut, E>(&self, refresh: F) -> Result<T, E>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<T, E>>,
    {
        let mut slot = self.slot.lock().await;
        if let Some((at, value)) = slot.as_ref() {
            if at.elapsed() < self.ttl {
                debug!("serving cached result");
                return Ok(value.clone());
            }
        }
        let value = refresh().await?;
        *slot = Some((Instant::now(), value.clone()));
        Ok(value)
    }
}
