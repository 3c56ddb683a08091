//! Shared building blocks for the local cluster tooling
//!
//! Holds the static cluster topology both binaries derive their defaults
//! from, the common configuration error, and tracing setup.

pub mod cluster;
pub mod errors;
pub mod logging;
pub mod types;

pub use cluster::{
    cluster_nodes, data_dirs, NodeConfig, DEFAULT_NODE_COUNT, LEGACY_DATA_DIR, MAX_NODE_COUNT,
};
pub use errors::*;
pub use types::*;
