//! Reset on-disk cluster state between runs
//!
//! Removes the per-node data directories (WAL and snapshots) so the next
//! cluster start replays nothing.

pub mod cleanup;
pub mod error;

pub use cleanup::{CleanupEntry, CleanupOutcome, CleanupReport, DataCleaner};
pub use error::{CleanerError, CleanerResult};
