//! Local cluster launcher
//!
//! Starts the store nodes and the router described by a [`LaunchPlan`],
//! keeps them running until the operator interrupts, then stops them in two
//! phases: a graceful signal to every live child, one grace period, and a
//! forced kill for anything still running.

pub mod config;
pub mod error;
pub mod plan;
pub mod readiness;
pub mod services;
pub mod shutdown;
pub mod supervisor;
pub mod traits;

// Re-export commonly used types
pub use config::{ClusterConfig, GracefulSignal};
pub use error::{LauncherError, LauncherResult};
pub use plan::{LaunchPlan, ProcessKind, ProcessSpec, Warmup};
pub use readiness::{ProbePolicy, ReadinessProbe, TcpProbe};
pub use services::RealProcessSpawner;
pub use shutdown::{LifecycleState, ShutdownCoordinator, ShutdownSummary};
pub use supervisor::{ProcessHandle, Supervisor};
pub use traits::{ChildProcess, MockChildProcess, MockProcessSpawner, ProcessSpawner};
