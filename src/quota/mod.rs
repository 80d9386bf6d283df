pub mod store;
pub mod tracker;

pub use store::{InMemoryQuotaStore, QuotaStore, RateWindow};
pub use tracker::QuotaTracker;
