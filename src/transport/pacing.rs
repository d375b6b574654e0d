//! Request pacing.
//!
//! Every page request is preceded by a short random pause so that walks over
//! many channels stay under Discord's rate limit and concurrent walks don't
//! fire in lockstep. When the server answers with a rate limit that names a
//! delay, the pacer remembers it and holds back every later request until the
//! delay has elapsed; the random pause still applies on top as a floor.

use rand::Rng;
use std::{sync::Mutex, time::Duration};
use tokio::time::Instant;

/// Randomized pre-request delay shared by all walks of one client.
pub struct Pacer {
    min: Duration,
    max: Duration,
    /// Earliest instant the next request may go out, set by rate limits.
    not_before: Mutex<Option<Instant>>,
}

impl Pacer {
    /// Creates a pacer that waits a uniformly random delay in `[min, max]`.
    ///
    /// Bounds given in the wrong order are swapped.
    pub fn new(min: Duration, max: Duration) -> Self {
        let (min, max) = if min <= max { (min, max) } else { (max, min) };

        Self {
            min,
            max,
            not_before: Mutex::new(None),
        }
    }

    /// Pacer without random delay; rate-limit deferrals still apply.
    pub fn disabled() -> Self {
        Self::new(Duration::ZERO, Duration::ZERO)
    }

    /// Draws the random part of the next delay.
    pub fn jitter(&self) -> Duration {
        let min_ms = self.min.as_millis() as u64;
        let max_ms = self.max.as_millis() as u64;
        if min_ms == max_ms {
            return self.min;
        }

        Duration::from_millis(rand::rng().random_range(min_ms..=max_ms))
    }

    /// Waits before a request.
    pub async fn pause(&self) {
        let deadline = self.next_deadline();
        tokio::time::sleep_until(deadline).await;
    }

    /// Holds back all later requests for at least `delay`.
    ///
    /// A shorter deferral never shortens one already in place.
    pub fn defer(&self, delay: Duration) {
        let until = Instant::now() + delay;
        let mut not_before = self.not_before.lock().unwrap_or_else(|e| e.into_inner());

        match *not_before {
            Some(existing) if existing >= until => {}
            _ => *not_before = Some(until),
        }
    }

    fn next_deadline(&self) -> Instant {
        let jittered = Instant::now() + self.jitter();
        let not_before = *self.not_before.lock().unwrap_or_else(|e| e.into_inner());

        match not_before {
            Some(until) if until > jittered => until,
            _ => jittered,
        }
    }
}

impl Default for Pacer {
    /// 50 to 350 milliseconds between requests.
    fn default() -> Self {
        Self::new(Duration::from_millis(50), Duration::from_millis(350))
    }
}
