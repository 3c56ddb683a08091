//! Service implementations
//!
//! Real implementations of the trait seams, backed by OS processes.

pub mod process_spawner;

pub use process_spawner::{OsChild, RealProcessSpawner};
