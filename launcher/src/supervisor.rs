//! Cluster supervisor
//!
//! Owns every spawned child in launch order. Handles are only ever appended
//! while launching and only iterated while shutting down; nothing is removed
//! when a child exits, its liveness poll simply starts reporting `false`.

use std::fmt;
use std::time::Duration;

use tokio::sync::mpsc;
use tokio::time::sleep;

use crate::config::{ClusterConfig, GracefulSignal, DEFAULT_GRACE_PERIOD};
use crate::error::{LauncherError, LauncherResult};
use crate::plan::{LaunchPlan, ProcessKind, ProcessSpec, Warmup};
use crate::readiness::{ReadinessProbe, TcpProbe};
use crate::shutdown::{LifecycleState, ShutdownCoordinator};
use crate::traits::{ChildProcess, ProcessSpawner};
use shared::{logging, tool_debug, tool_info, tool_warn, ToolId};

/// The supervisor's record of one spawned process
pub struct ProcessHandle {
    spec: ProcessSpec,
    pid: u32,
    child: Box<dyn ChildProcess>,
}

impl ProcessHandle {
    pub fn new(spec: ProcessSpec, child: Box<dyn ChildProcess>) -> Self {
        let pid = child.id();
        Self { spec, pid, child }
    }

    pub fn spec(&self) -> &ProcessSpec {
        &self.spec
    }

    pub fn label(&self) -> &str {
        self.spec.label()
    }

    pub fn pid(&self) -> u32 {
        self.pid
    }

    pub fn is_alive(&mut self) -> bool {
        self.child.is_alive()
    }

    pub(crate) fn terminate(&mut self, signal: GracefulSignal) -> LauncherResult<()> {
        self.child.terminate(signal)
    }

    pub(crate) fn kill(&mut self) -> LauncherResult<()> {
        self.child.kill()
    }
}

impl fmt::Debug for ProcessHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ProcessHandle")
            .field("label", &self.spec.label())
            .field("pid", &self.pid)
            .finish()
    }
}

/// Launches a plan, waits for an interrupt, then tears everything down
pub struct Supervisor<S: ProcessSpawner> {
    spawner: S,
    probe: Box<dyn ReadinessProbe>,
    coordinator: ShutdownCoordinator,
    handles: Vec<ProcessHandle>,
    state: LifecycleState,
}

impl<S: ProcessSpawner> Supervisor<S> {
    /// Create a supervisor with the default grace period and signal
    pub fn new(spawner: S) -> Self {
        Self {
            spawner,
            probe: Box::new(TcpProbe::default()),
            coordinator: ShutdownCoordinator::new(DEFAULT_GRACE_PERIOD, GracefulSignal::default()),
            handles: Vec::new(),
            state: LifecycleState::Launching,
        }
    }

    /// Create a supervisor configured from the launcher settings
    pub fn from_config(spawner: S, config: &ClusterConfig) -> Self {
        Self::new(spawner)
            .with_grace_period(config.grace_period)
            .with_graceful_signal(config.graceful_signal)
            .with_probe(Box::new(TcpProbe::new(config.probe)))
    }

    /// Configure grace period (fluent API)
    pub fn with_grace_period(mut self, grace_period: Duration) -> Self {
        self.coordinator = ShutdownCoordinator::new(grace_period, self.coordinator.signal());
        self
    }

    /// Configure the graceful-phase signal (fluent API)
    pub fn with_graceful_signal(mut self, signal: GracefulSignal) -> Self {
        self.coordinator = ShutdownCoordinator::new(self.coordinator.grace_period(), signal);
        self
    }

    /// Configure the readiness probe used by `Warmup::Probe` (fluent API)
    pub fn with_probe(mut self, probe: Box<dyn ReadinessProbe>) -> Self {
        self.probe = probe;
        self
    }

    pub fn state(&self) -> LifecycleState {
        self.state
    }

    pub fn handles(&self) -> &[ProcessHandle] {
        &self.handles
    }

    /// Spawn every spec in plan order
    ///
    /// Stops at the first failure and returns it. Children spawned before the
    /// failure stay tracked; stopping them is `shutdown_all`'s job.
    pub async fn start_all(&mut self, plan: &LaunchPlan) -> LauncherResult<&[ProcessHandle]> {
        for (index, spec) in plan.specs().iter().enumerate() {
            if plan.gate_before(index) {
                self.warm_up(plan.warmup()).await?;
            }

            tool_info!("🚀 Starting {}: {}", spec.label(), spec.display_command());

            let child = match self.spawner.spawn(spec) {
                Ok(child) => child,
                Err(e) => {
                    logging::log_error(ToolId::current(), &format!("Starting {}", spec.label()), &e);
                    return Err(e);
                }
            };

            let handle = ProcessHandle::new(spec.clone(), child);
            tool_debug!("✅ {} spawned (pid={})", handle.label(), handle.pid());
            self.handles.push(handle);
        }

        self.transition(LifecycleState::Running);
        tool_info!("🌐 Cluster is starting up: {}", self.summary());

        Ok(&self.handles)
    }

    /// Block until an interrupt arrives
    ///
    /// Child exits do not end the wait. A closed channel counts as an
    /// interrupt, since nothing could ever deliver one afterwards.
    pub async fn wait(&mut self, interrupts: &mut mpsc::Receiver<()>) {
        tool_info!("⌨️ Press Ctrl-C to stop everything");

        match interrupts.recv().await {
            Some(()) => logging::log_shutdown(ToolId::current(), "received interrupt"),
            None => {
                tool_warn!("⚠️ Interrupt source closed, shutting down cluster");
            }
        }
    }

    /// Two-phase termination of every tracked handle, in launch order
    ///
    /// Does nothing once the supervisor has already terminated.
    pub async fn shutdown_all(&mut self) {
        if self.state.is_final() {
            tool_debug!("Shutdown already completed");
            return;
        }

        self.transition(LifecycleState::ShuttingDown);
        let summary = self.coordinator.execute(&mut self.handles).await;
        tool_debug!(
            "Shutdown finished: {} signaled, {} killed",
            summary.signaled,
            summary.killed
        );
        self.transition(LifecycleState::Terminated);
    }

    /// Drive the whole lifecycle; always ends in `Terminated`
    ///
    /// An interrupt that arrives while launching (for instance during the
    /// warm-up gate) aborts the launch and goes straight to shutdown.
    pub async fn run(&mut self, plan: &LaunchPlan, interrupts: &mut mpsc::Receiver<()>) -> LifecycleState {
        // Launch progress wins over an interrupt that is already queued
        let launched = tokio::select! {
            biased;
            result = self.start_all(plan) => result.map(|_| ()),
            _ = interrupts.recv() => Err(LauncherError::Interrupted { phase: "launching" }),
        };

        match launched {
            Ok(()) => self.wait(interrupts).await,
            Err(LauncherError::Interrupted { phase }) => {
                logging::log_shutdown(ToolId::current(), &format!("interrupted while {phase}"));
            }
            Err(e) => {
                logging::log_shutdown(ToolId::current(), &format!("cluster launch failed: {e}"));
            }
        }

        // Later interrupts find the channel closed and are ignored
        interrupts.close();

        self.shutdown_all().await;
        self.state
    }

    async fn warm_up(&self, warmup: &Warmup) -> LauncherResult<()> {
        match warmup {
            Warmup::FixedDelay(delay) => {
                tool_debug!("⏳ Giving nodes {:?} to bind their ports", delay);
                sleep(*delay).await;
            }
            Warmup::Probe { backend_host } => {
                for handle in &self.handles {
                    if let ProcessKind::Node { client_port, .. } = handle.spec().kind() {
                        let addr = format!("{backend_host}:{client_port}");
                        tool_info!("🔍 Waiting for {} on {}", handle.label(), addr);
                        self.probe.wait_until_ready(handle.label(), &addr).await?;
                    }
                }
            }
        }
        Ok(())
    }

    fn transition(&mut self, next: LifecycleState) {
        if self.state.can_transition_to(next) {
            tool_debug!("Lifecycle: {} -> {}", self.state, next);
            self.state = next;
        } else {
            tool_warn!("⚠️ Ignoring lifecycle transition {} -> {}", self.state, next);
        }
    }

    fn summary(&self) -> String {
        let nodes: Vec<&str> = self
            .handles
            .iter()
            .filter_map(|handle| match handle.spec().kind() {
                ProcessKind::Node { id, .. } => Some(id.as_str()),
                ProcessKind::Router { .. } => None,
            })
            .collect();
        let routers: Vec<&str> = self
            .handles
            .iter()
            .filter_map(|handle| match handle.spec().kind() {
                ProcessKind::Router { listen_addr, .. } => Some(listen_addr.as_str()),
                ProcessKind::Node { .. } => None,
            })
            .collect();

        format!("nodes [{}], router [{}]", nodes.join(", "), routers.join(", "))
    }
}
