//! Shutdown coordination
//!
//! Three pieces live here: the lifecycle state machine, the OS interrupt
//! listener feeding the supervisor's wait, and the two-phase teardown
//! (graceful signal, one grace period, then SIGKILL for whatever is left).

use std::fmt;
use std::io;
use std::time::Duration;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::sleep;

use crate::config::GracefulSignal;
use crate::error::LauncherResult;
use crate::supervisor::ProcessHandle;
use shared::{tool_debug, tool_info, tool_warn};

/// Lifecycle of a supervised cluster
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LifecycleState {
    Launching,
    Running,
    ShuttingDown,
    Terminated,
}

impl LifecycleState {
    pub fn can_transition_to(self, next: LifecycleState) -> bool {
        use LifecycleState::*;

        matches!(
            (self, next),
            (Launching, Running)
                | (Launching, ShuttingDown)
                | (Running, ShuttingDown)
                | (ShuttingDown, Terminated)
        )
    }

    pub fn is_final(self) -> bool {
        self == LifecycleState::Terminated
    }
}

impl fmt::Display for LifecycleState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LifecycleState::Launching => write!(f, "launching"),
            LifecycleState::Running => write!(f, "running"),
            LifecycleState::ShuttingDown => write!(f, "shutting down"),
            LifecycleState::Terminated => write!(f, "terminated"),
        }
    }
}

/// Result of forwarding one OS interrupt into the supervisor's channel
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InterruptOutcome {
    /// The supervisor will observe this interrupt
    Delivered,
    /// An interrupt is already pending or being acted on; this one is dropped
    AlreadyPending,
}

/// Forward one interrupt without ever blocking the listener
///
/// The channel has room for a single pending interrupt, so repeated Ctrl-C
/// presses during shutdown collapse into a no-op.
pub fn forward_interrupt(sender: &mpsc::Sender<()>) -> InterruptOutcome {
    match sender.try_send(()) {
        Ok(()) => InterruptOutcome::Delivered,
        Err(mpsc::error::TrySendError::Full(())) | Err(mpsc::error::TrySendError::Closed(())) => {
            InterruptOutcome::AlreadyPending
        }
    }
}

/// Channel the supervisor waits on, sized for one pending interrupt
pub fn interrupt_channel() -> (mpsc::Sender<()>, mpsc::Receiver<()>) {
    mpsc::channel(1)
}

/// Install the OS interrupt listener and return the receiving end
///
/// Signal handlers are registered before this returns, so an interrupt that
/// arrives while nodes are still being spawned is already routed to the
/// supervisor. The listener keeps owning SIGINT (and SIGTERM on unix) for the
/// whole life of the launcher, so a second Ctrl-C during shutdown cannot kill
/// it half-way.
pub fn listen_for_interrupts() -> LauncherResult<mpsc::Receiver<()>> {
    let interrupts = OsInterrupts::new()?;
    let (sender, receiver) = interrupt_channel();
    spawn_interrupt_listener(interrupts, sender);
    Ok(receiver)
}

fn spawn_interrupt_listener(mut interrupts: OsInterrupts, sender: mpsc::Sender<()>) -> JoinHandle<()> {
    tokio::spawn(async move {
        while let Some(name) = interrupts.next().await {
            match forward_interrupt(&sender) {
                InterruptOutcome::Delivered => {
                    tool_debug!("📨 {} forwarded to supervisor", name);
                }
                InterruptOutcome::AlreadyPending => {
                    tool_info!("⏳ {} ignored, shutdown already in progress", name);
                }
            }
        }

        // Dropping the sender closes the channel, which the supervisor treats as an interrupt
        tool_warn!("⚠️ Signal stream ended, no further interrupts will be received");
    })
}

/// OS signal streams that count as an operator interrupt
struct OsInterrupts {
    #[cfg(unix)]
    interrupt: tokio::signal::unix::Signal,
    #[cfg(unix)]
    terminate: tokio::signal::unix::Signal,
    #[cfg(windows)]
    ctrl_c: tokio::signal::windows::CtrlC,
}

impl OsInterrupts {
    #[cfg(unix)]
    fn new() -> io::Result<Self> {
        use tokio::signal::unix::{signal, SignalKind};

        Ok(Self {
            interrupt: signal(SignalKind::interrupt())?,
            terminate: signal(SignalKind::terminate())?,
        })
    }

    #[cfg(windows)]
    fn new() -> io::Result<Self> {
        Ok(Self {
            ctrl_c: tokio::signal::windows::ctrl_c()?,
        })
    }

    #[cfg(unix)]
    async fn next(&mut self) -> Option<&'static str> {
        tokio::select! {
            received = self.interrupt.recv() => received.map(|()| "SIGINT"),
            received = self.terminate.recv() => received.map(|()| "SIGTERM"),
        }
    }

    #[cfg(windows)]
    async fn next(&mut self) -> Option<&'static str> {
        self.ctrl_c.recv().await.map(|()| "Ctrl-C")
    }
}

/// What one teardown did
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ShutdownSummary {
    /// Children the graceful signal was delivered to
    pub signaled: usize,
    /// Children still alive after the grace period and sent SIGKILL
    pub killed: usize,
}

/// Two-phase teardown over the handle sequence, in launch order
#[derive(Debug, Clone, Copy)]
pub struct ShutdownCoordinator {
    grace_period: Duration,
    signal: GracefulSignal,
}

impl ShutdownCoordinator {
    pub fn new(grace_period: Duration, signal: GracefulSignal) -> Self {
        Self {
            grace_period,
            signal,
        }
    }

    pub fn grace_period(&self) -> Duration {
        self.grace_period
    }

    pub fn signal(&self) -> GracefulSignal {
        self.signal
    }

    /// Graceful pass, grace period, forced pass. Survivors of the forced pass
    /// are not looked for.
    pub async fn execute(&self, handles: &mut [ProcessHandle]) -> ShutdownSummary {
        let signaled = self.graceful_phase(handles);
        tool_debug!(
            "⏳ Sent {} to {} process(es), waiting {:?}",
            self.signal,
            signaled,
            self.grace_period
        );

        sleep(self.grace_period).await;

        let killed = self.forced_phase(handles);
        if killed > 0 {
            tool_warn!("🔨 Force killed {} process(es)", killed);
        }

        ShutdownSummary { signaled, killed }
    }

    fn graceful_phase(&self, handles: &mut [ProcessHandle]) -> usize {
        let mut signaled = 0;

        for handle in handles.iter_mut() {
            if !handle.is_alive() {
                tool_debug!("⏭️ {} (pid={}) already exited", handle.label(), handle.pid());
                continue;
            }

            tool_info!("🛑 Terminating {} (pid={})", handle.label(), handle.pid());
            match handle.terminate(self.signal) {
                Ok(()) => signaled += 1,
                Err(e) => tool_warn!("⚠️ {}", e),
            }
        }

        signaled
    }

    fn forced_phase(&self, handles: &mut [ProcessHandle]) -> usize {
        let mut killed = 0;

        for handle in handles.iter_mut() {
            if !handle.is_alive() {
                continue;
            }

            tool_info!("🔨 Killing {} (pid={})", handle.label(), handle.pid());
            match handle.kill() {
                Ok(()) => killed += 1,
                Err(e) => tool_warn!("⚠️ {}", e),
            }
        }

        killed
    }
}
