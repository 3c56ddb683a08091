//! Static cluster topology
//!
//! Node `nK` serves clients on port `8089 + K` and keeps its WAL and
//! snapshots under `./dataK`. The router and the node binaries carry the
//! same table, so it only changes together with them.

use std::path::PathBuf;

use crate::errors::{SharedError, SharedResult};

/// Number of store nodes in the default local cluster
pub const DEFAULT_NODE_COUNT: usize = 6;

/// Largest cluster the node binaries know about (`n1..n6`)
pub const MAX_NODE_COUNT: usize = 6;

/// Data directory used by a standalone single-node run
pub const LEGACY_DATA_DIR: &str = "./data";

const BASE_CLIENT_PORT: u16 = 8089;

/// Static configuration of one store node
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NodeConfig {
    pub id: String,
    pub client_port: u16,
    pub data_dir: PathBuf,
}

impl NodeConfig {
    /// Configuration for the 1-indexed node `index`
    pub fn for_index(index: usize) -> SharedResult<Self> {
        let client_port = u16::try_from(index)
            .ok()
            .and_then(|offset| BASE_CLIENT_PORT.checked_add(offset))
            .ok_or_else(|| SharedError::invalid_config("node index", index))?;

        Ok(Self {
            id: format!("n{index}"),
            client_port,
            data_dir: node_data_dir(index),
        })
    }
}

fn node_data_dir(index: usize) -> PathBuf {
    PathBuf::from(format!("./data{index}"))
}

/// Node table for a cluster of `count` nodes, in launch order
pub fn cluster_nodes(count: usize) -> SharedResult<Vec<NodeConfig>> {
    if count > MAX_NODE_COUNT {
        return Err(SharedError::invalid_config("nodes", count));
    }
    (1..=count).map(NodeConfig::for_index).collect()
}

/// Every directory a cluster of `count` nodes may have written to
pub fn data_dirs(count: usize) -> Vec<PathBuf> {
    std::iter::once(PathBuf::from(LEGACY_DATA_DIR))
        .chain((1..=count).map(node_data_dir))
        .collect()
}
