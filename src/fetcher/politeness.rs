//! Per-host request spacing

use std::collections::HashMap;
use std::sync::Mutex;
use std::time::Duration;
use tokio::time::Instant;

/// Spaces out requests to the same host
///
/// Each caller reserves the next free slot for its host before sleeping, so
/// concurrent fetches to one host are serialized at `delay` intervals.
#[derive(Debug, Default)]
pub struct HostThrottle {
    next_slot: Mutex<HashMap<String, Instant>>,
}

impl HostThrottle {
    pub fn new() -> Self {
        Self::default()
    }

    /// Waits until a request to `host` may be sent
    pub async fn wait_turn(&self, host: &str, delay: Duration) {
        if delay.is_zero() {
            return;
        }

        let start = self.reserve(host, delay, Instant::now());
        if start > Instant::now() {
            tracing::debug!("Waiting {:?} before next request to {}", start - Instant::now(), host);
            tokio::time::sleep_until(start).await;
        }
    }

    /// Claims the earliest slot at or after `now` and returns its start
    fn reserve(&self, host: &str, delay: Duration, now: Instant) -> Instant {
        let mut slots = match self.next_slot.lock() {
            Ok(slots) => slots,
            Err(poisoned) => poisoned.into_inner(),
        };
        let start = time_until_next_request(slots.get(host).copied(), now)
            .map_or(now, |wait| now + wait);
        slots.insert(host.to_string(), start + delay);
        start
    }
}

/// Time to wait before the slot that opens at `next_slot`
fn time_until_next_request(next_slot: Option<Instant>, now: Instant) -> Option<Duration> {
    next_slot
        .filter(|slot| *slot > now)
        .map(|slot| slot - now)
}
