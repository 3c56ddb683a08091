//! TCP readiness probing for store nodes
//!
//! A node counts as ready once its client port accepts a connection. Probing
//! retries with exponential backoff and gives up after a fixed number of
//! attempts.

use std::time::Duration;

use async_trait::async_trait;
use tokio::net::TcpStream;
use tokio::time::{sleep, timeout};

use crate::error::{LauncherError, LauncherResult};
use shared::tool_debug;

/// Retry policy for readiness probes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProbePolicy {
    pub max_attempts: u32,
    pub initial_backoff: Duration,
    pub max_backoff: Duration,
    pub connect_timeout: Duration,
}

impl Default for ProbePolicy {
    fn default() -> Self {
        Self {
            max_attempts: 10,
            initial_backoff: Duration::from_millis(100),
            max_backoff: Duration::from_secs(2),
            connect_timeout: Duration::from_millis(500),
        }
    }
}

impl ProbePolicy {
    /// Delay to wait after the given 1-indexed failed attempt
    pub fn backoff_after(&self, attempt: u32) -> Duration {
        let factor = 2u32.saturating_pow(attempt.saturating_sub(1));
        self.initial_backoff
            .saturating_mul(factor)
            .min(self.max_backoff)
    }
}

/// Decides when a node may be depended upon
#[async_trait]
pub trait ReadinessProbe: Send + Sync {
    /// Resolve once `addr` is reachable, or fail after the policy is exhausted
    async fn wait_until_ready(&self, label: &str, addr: &str) -> LauncherResult<()>;
}

/// Probe that connects to the node's client port
#[derive(Debug, Clone, Default)]
pub struct TcpProbe {
    policy: ProbePolicy,
}

impl TcpProbe {
    pub fn new(policy: ProbePolicy) -> Self {
        Self { policy }
    }
}

#[async_trait]
impl ReadinessProbe for TcpProbe {
    async fn wait_until_ready(&self, label: &str, addr: &str) -> LauncherResult<()> {
        for attempt in 1..=self.policy.max_attempts {
            match timeout(self.policy.connect_timeout, TcpStream::connect(addr)).await {
                Ok(Ok(_stream)) => {
                    tool_debug!("✅ {} accepting connections on {} (attempt {})", label, addr, attempt);
                    return Ok(());
                }
                Ok(Err(e)) => {
                    tool_debug!("⏳ {} not ready on {}: {}", label, addr, e);
                }
                Err(_) => {
                    tool_debug!("⏳ {} connect to {} timed out", label, addr);
                }
            }

            if attempt < self.policy.max_attempts {
                sleep(self.policy.backoff_after(attempt)).await;
            }
        }

        Err(LauncherError::NodeNotReady {
            label: label.to_string(),
            addr: addr.to_string(),
            attempts: self.policy.max_attempts,
        })
    }
}
