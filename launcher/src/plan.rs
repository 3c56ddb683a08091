//! Launch plan: which processes to start, in which order
//!
//! Nodes always come first, the router last. Between them sits a warm-up
//! gate so nodes get a chance to bind their client ports before the router
//! starts forwarding to them.

use std::fmt;
use std::time::Duration;

use shared::cluster_nodes;

use crate::config::ClusterConfig;
use crate::error::LauncherResult;

/// What a spawned process is, with the parameters it was launched with
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProcessKind {
    Node { id: String, client_port: u16 },
    Router { listen_addr: String, backend_host: String },
}

impl ProcessKind {
    pub fn is_node(&self) -> bool {
        matches!(self, ProcessKind::Node { .. })
    }

    pub fn is_router(&self) -> bool {
        matches!(self, ProcessKind::Router { .. })
    }
}

impl fmt::Display for ProcessKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProcessKind::Node { .. } => write!(f, "node"),
            ProcessKind::Router { .. } => write!(f, "router"),
        }
    }
}

/// Immutable description of one process to launch
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProcessSpec {
    kind: ProcessKind,
    command: Vec<String>,
    label: String,
}

impl ProcessSpec {
    /// Spec with an exact command line, no arguments appended
    pub fn new(kind: ProcessKind, command: Vec<String>, label: impl Into<String>) -> Self {
        Self {
            kind,
            command,
            label: label.into(),
        }
    }

    /// Node `id` started as `<program...> -id <id>`
    pub fn node(program: &[String], id: &str, client_port: u16) -> Self {
        let mut command = program.to_vec();
        command.extend(["-id".to_string(), id.to_string()]);

        Self {
            kind: ProcessKind::Node {
                id: id.to_string(),
                client_port,
            },
            command,
            label: format!("node {id}"),
        }
    }

    /// Router started as `<program...> -addr <listen> -backend-host <host>`
    pub fn router(program: &[String], listen_addr: &str, backend_host: &str) -> Self {
        let mut command = program.to_vec();
        command.extend([
            "-addr".to_string(),
            listen_addr.to_string(),
            "-backend-host".to_string(),
            backend_host.to_string(),
        ]);

        Self {
            kind: ProcessKind::Router {
                listen_addr: listen_addr.to_string(),
                backend_host: backend_host.to_string(),
            },
            command,
            label: "router".to_string(),
        }
    }

    pub fn kind(&self) -> &ProcessKind {
        &self.kind
    }

    pub fn command(&self) -> &[String] {
        &self.command
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    /// Command line joined for status output
    pub fn display_command(&self) -> String {
        self.command.join(" ")
    }
}

/// Gate executed once between the last node and the router
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Warmup {
    /// Sleep and hope the nodes are listening afterwards. Can race under load.
    FixedDelay(Duration),
    /// Connect to every node's client port on `backend_host` until it answers
    Probe { backend_host: String },
}

/// Ordered set of processes making up the cluster
#[derive(Debug, Clone)]
pub struct LaunchPlan {
    specs: Vec<ProcessSpec>,
    warmup: Warmup,
}

impl LaunchPlan {
    /// Plan with an explicit spec order; used by tests and custom setups
    pub fn new(specs: Vec<ProcessSpec>, warmup: Warmup) -> Self {
        Self { specs, warmup }
    }

    /// Nodes `n1..nN` followed by the router
    pub fn cluster(config: &ClusterConfig) -> LauncherResult<Self> {
        let mut specs: Vec<ProcessSpec> = cluster_nodes(config.node_count)?
            .iter()
            .map(|node| ProcessSpec::node(&config.node_command, &node.id, node.client_port))
            .collect();

        specs.push(ProcessSpec::router(
            &config.router_command,
            &config.router_addr,
            &config.backend_host,
        ));

        let warmup = if config.wait_ready {
            Warmup::Probe {
                backend_host: config.backend_host.clone(),
            }
        } else {
            Warmup::FixedDelay(config.warmup)
        };

        Ok(Self { specs, warmup })
    }

    pub fn specs(&self) -> &[ProcessSpec] {
        &self.specs
    }

    pub fn warmup(&self) -> &Warmup {
        &self.warmup
    }

    pub fn len(&self) -> usize {
        self.specs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.specs.is_empty()
    }

    /// Whether the warm-up gate must run before spawning `specs()[index]`
    pub fn gate_before(&self, index: usize) -> bool {
        let previous = index.checked_sub(1).and_then(|i| self.specs.get(i));

        match (previous, self.specs.get(index)) {
            (Some(previous), Some(current)) => {
                previous.kind().is_node() && current.kind().is_router()
            }
            _ => false,
        }
    }
}
