//! Main entry point for the cluster launcher binary
//!
//! Starts the local key-value cluster (store nodes first, router last) and
//! keeps it running until Ctrl-C, then stops every child and exits cleanly.

use std::time::Duration;

use clap::Parser;

use launcher::config::{
    split_command, ClusterConfig, GracefulSignal, DEFAULT_BACKEND_HOST, DEFAULT_NODE_COMMAND,
    DEFAULT_ROUTER_ADDR, DEFAULT_ROUTER_COMMAND,
};
use launcher::readiness::ProbePolicy;
use launcher::{shutdown, LaunchPlan, RealProcessSpawner, Supervisor};
use shared::{logging, tool_debug, ToolId, DEFAULT_NODE_COUNT};

/// Launcher for the local key-value store cluster
#[derive(Parser)]
#[command(name = "run-cluster")]
#[command(about = "Starts the store nodes and the router, and stops them all on Ctrl-C")]
pub struct Args {
    /// Number of store nodes to start (n1..nN, at most 6)
    #[arg(long, env = "CLUSTER_NODES", default_value_t = DEFAULT_NODE_COUNT)]
    pub nodes: usize,

    /// Command used to start a node; `-id <nK>` is appended
    #[arg(long, env = "CLUSTER_NODE_CMD", default_value = DEFAULT_NODE_COMMAND)]
    pub node_cmd: String,

    /// Command used to start the router; `-addr` and `-backend-host` are appended
    #[arg(long, env = "CLUSTER_ROUTER_CMD", default_value = DEFAULT_ROUTER_COMMAND)]
    pub router_cmd: String,

    /// Router listen address
    #[arg(long, env = "CLUSTER_ROUTER_ADDR", default_value = DEFAULT_ROUTER_ADDR)]
    pub router_addr: String,

    /// Host the router uses to reach the nodes
    #[arg(long, env = "CLUSTER_BACKEND_HOST", default_value = DEFAULT_BACKEND_HOST)]
    pub backend_host: String,

    /// Pause between the last node and the router, in milliseconds
    #[arg(long, env = "CLUSTER_WARMUP_MS", default_value = "1000")]
    pub warmup_ms: u64,

    /// Probe every node's client port before starting the router instead of sleeping
    #[arg(long, env = "CLUSTER_WAIT_READY")]
    pub wait_ready: bool,

    /// Connection attempts per node when --wait-ready is set
    #[arg(long, env = "CLUSTER_READY_ATTEMPTS", default_value = "10")]
    pub ready_attempts: u32,

    /// Initial backoff between readiness attempts, in milliseconds (doubles, capped at 2s)
    #[arg(long, env = "CLUSTER_READY_BACKOFF_MS", default_value = "100")]
    pub ready_backoff_ms: u64,

    /// Time children get to exit after the graceful signal, in milliseconds
    #[arg(long, env = "CLUSTER_GRACE_MS", default_value = "1000")]
    pub grace_ms: u64,

    /// Signal sent in the graceful phase (sigint, sigterm)
    #[arg(long, env = "CLUSTER_GRACEFUL_SIGNAL", default_value = "sigint")]
    pub graceful_signal: GracefulSignal,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, env = "CLUSTER_LOG_LEVEL", default_value = "info")]
    pub log_level: String,
}

impl Args {
    fn into_config(self) -> ClusterConfig {
        let defaults = ClusterConfig::default();

        ClusterConfig {
            node_count: self.nodes,
            node_command: split_command(&self.node_cmd),
            router_command: split_command(&self.router_cmd),
            router_addr: self.router_addr,
            backend_host: self.backend_host,
            warmup: Duration::from_millis(self.warmup_ms),
            wait_ready: self.wait_ready,
            probe: ProbePolicy {
                max_attempts: self.ready_attempts,
                initial_backoff: Duration::from_millis(self.ready_backoff_ms),
                ..defaults.probe
            },
            grace_period: Duration::from_millis(self.grace_ms),
            graceful_signal: self.graceful_signal,
        }
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    // Optional .env next to the repo root feeds the CLUSTER_* variables
    dotenv::dotenv().ok();

    let args = Args::parse();

    let tool = ToolId::init_launcher();
    logging::init_tracing(*tool, Some(&args.log_level));

    let config = args.into_config();
    config.validate()?;
    tool_debug!("Configuration: {:?}", config);

    logging::log_startup(tool, &format!("local cluster with {} node(s)", config.node_count));

    let plan = LaunchPlan::cluster(&config)?;
    let mut interrupts = shutdown::listen_for_interrupts()?;

    let mut supervisor = Supervisor::from_config(RealProcessSpawner, &config);
    supervisor.run(&plan, &mut interrupts).await;

    // Exit status is success regardless of how the children went down
    logging::log_success(tool, "All processes stopped. Bye 👋");
    Ok(())
}
