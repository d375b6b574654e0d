use chrono::{DateTime, Utc};
use std::sync::Arc;

/// Source of "now" for window cutoffs.
///
/// Injected into the paginator and enumerator so tests can pin the current
/// instant instead of depending on wall-clock time.
pub type Clock = Arc<dyn Fn() -> DateTime<Utc> + Send + Sync>;

/// Clock backed by the system time.
pub fn system_clock() -> Clock {
    Arc::new(Utc::now)
}

/// Clock that always reports `at`.
pub fn fixed_clock(at: DateTime<Utc>) -> Clock {
    Arc::new(move || at)
}
