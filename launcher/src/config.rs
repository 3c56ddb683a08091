//! Launcher configuration
//!
//! Defaults reproduce the stock local cluster: six nodes started through
//! `go run`, a router on `:8080`, one second of warm-up and one second of
//! grace before escalating to SIGKILL.

use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use shared::{SharedError, SharedResult, DEFAULT_NODE_COUNT, MAX_NODE_COUNT};

use crate::readiness::ProbePolicy;

pub const DEFAULT_NODE_COMMAND: &str = "go run ./cmd/kvs";
pub const DEFAULT_ROUTER_COMMAND: &str = "go run ./cmd/router";
pub const DEFAULT_ROUTER_ADDR: &str = ":8080";
pub const DEFAULT_BACKEND_HOST: &str = "127.0.0.1";
pub const DEFAULT_WARMUP: Duration = Duration::from_secs(1);
pub const DEFAULT_GRACE_PERIOD: Duration = Duration::from_secs(1);

/// Signal sent to every live child in the graceful phase
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum GracefulSignal {
    /// SIGINT, what a terminal Ctrl-C would have delivered
    #[default]
    Interrupt,
    /// SIGTERM
    Terminate,
}

impl fmt::Display for GracefulSignal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GracefulSignal::Interrupt => write!(f, "SIGINT"),
            GracefulSignal::Terminate => write!(f, "SIGTERM"),
        }
    }
}

impl FromStr for GracefulSignal {
    type Err = SharedError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "sigint" | "int" | "interrupt" => Ok(GracefulSignal::Interrupt),
            "sigterm" | "term" | "terminate" => Ok(GracefulSignal::Terminate),
            _ => Err(SharedError::UnknownSignal {
                input: s.to_string(),
            }),
        }
    }
}

/// Everything needed to build a launch plan and drive its shutdown
#[derive(Debug, Clone)]
pub struct ClusterConfig {
    pub node_count: usize,
    pub node_command: Vec<String>,
    pub router_command: Vec<String>,
    pub router_addr: String,
    pub backend_host: String,
    pub warmup: Duration,
    /// Probe node ports instead of sleeping for `warmup`
    pub wait_ready: bool,
    pub probe: ProbePolicy,
    pub grace_period: Duration,
    pub graceful_signal: GracefulSignal,
}

impl Default for ClusterConfig {
    fn default() -> Self {
        Self {
            node_count: DEFAULT_NODE_COUNT,
            node_command: split_command(DEFAULT_NODE_COMMAND),
            router_command: split_command(DEFAULT_ROUTER_COMMAND),
            router_addr: DEFAULT_ROUTER_ADDR.to_string(),
            backend_host: DEFAULT_BACKEND_HOST.to_string(),
            warmup: DEFAULT_WARMUP,
            wait_ready: false,
            probe: ProbePolicy::default(),
            grace_period: DEFAULT_GRACE_PERIOD,
            graceful_signal: GracefulSignal::default(),
        }
    }
}

impl ClusterConfig {
    /// Reject configurations that cannot produce a runnable plan
    pub fn validate(&self) -> SharedResult<()> {
        if self.node_count == 0 || self.node_count > MAX_NODE_COUNT {
            return Err(SharedError::invalid_config("nodes", self.node_count));
        }
        if self.node_command.is_empty() {
            return Err(SharedError::invalid_config("node-cmd", "<empty>"));
        }
        if self.router_command.is_empty() {
            return Err(SharedError::invalid_config("router-cmd", "<empty>"));
        }
        if self.router_addr.trim().is_empty() {
            return Err(SharedError::invalid_config("router-addr", "<empty>"));
        }
        if self.backend_host.trim().is_empty() {
            return Err(SharedError::invalid_config("backend-host", "<empty>"));
        }
        if self.wait_ready && self.probe.max_attempts == 0 {
            return Err(SharedError::invalid_config("ready-attempts", 0));
        }
        Ok(())
    }
}

/// Split a shell-free command line on whitespace
pub fn split_command(command: &str) -> Vec<String> {
    command.split_whitespace().map(str::to_string).collect()
}
