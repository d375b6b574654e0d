//! History services.
//!
//! - [`paginator`] - backward cursor walk over one channel
//! - [`enumerator`] - channel discovery and per-channel fan-out
//! - [`normalizer`] - raw payload to stable record shape
//! - [`account`] - current user and guild lookups

pub mod account;
pub mod enumerator;
pub mod normalizer;
pub mod paginator;

#[cfg(test)]
mod test;

pub use account::AccountService;
pub use enumerator::ChannelEnumerator;
pub use normalizer::{MessageNormalizer, NormalizeOptions};
pub use paginator::{HistoryPaginator, HistoryWalk, PageOutcome, WalkStop, PAGE_LIMIT};
