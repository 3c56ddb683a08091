//! Test fixtures for launcher tests

use std::time::Duration;

use launcher::{LaunchPlan, ProcessKind, ProcessSpec, Warmup};

pub struct TestFixtures;

impl TestFixtures {
    /// Grace period short enough to keep the suite fast
    pub const GRACE: Duration = Duration::from_millis(20);

    pub fn node_program() -> Vec<String> {
        vec!["kvs".to_string()]
    }

    pub fn router_program() -> Vec<String> {
        vec!["router".to_string()]
    }

    pub fn node(id: &str, client_port: u16) -> ProcessSpec {
        ProcessSpec::node(&Self::node_program(), id, client_port)
    }

    pub fn router() -> ProcessSpec {
        ProcessSpec::router(&Self::router_program(), ":8080", "127.0.0.1")
    }

    /// Nodes with the given ids, optionally followed by the router, no warm-up
    pub fn plan(node_ids: &[&str], with_router: bool) -> LaunchPlan {
        Self::plan_with_warmup(node_ids, with_router, Warmup::FixedDelay(Duration::ZERO))
    }

    pub fn plan_with_warmup(node_ids: &[&str], with_router: bool, warmup: Warmup) -> LaunchPlan {
        let mut specs: Vec<ProcessSpec> = node_ids
            .iter()
            .enumerate()
            .map(|(i, id)| Self::node(id, 8090 + i as u16))
            .collect();
        if with_router {
            specs.push(Self::router());
        }
        LaunchPlan::new(specs, warmup)
    }

    /// Spec running an exact command line, for real-process tests
    pub fn command_spec(label: &str, command: &[&str]) -> ProcessSpec {
        ProcessSpec::new(
            ProcessKind::Node {
                id: label.to_string(),
                client_port: 0,
            },
            command.iter().map(|s| s.to_string()).collect(),
            label,
        )
    }

    pub fn router_command_spec(command: &[&str]) -> ProcessSpec {
        ProcessSpec::new(
            ProcessKind::Router {
                listen_addr: ":8080".to_string(),
                backend_host: "127.0.0.1".to_string(),
            },
            command.iter().map(|s| s.to_string()).collect(),
            "router",
        )
    }
}
