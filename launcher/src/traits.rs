//! Trait seams between the supervisor and the operating system
//!
//! The supervisor only ever talks to processes through these traits, so the
//! lifecycle can be exercised with fakes and mocks instead of real children.

use crate::config::GracefulSignal;
use crate::error::LauncherResult;
use crate::plan::ProcessSpec;

/// A spawned child as seen by the supervisor
#[mockall::automock]
pub trait ChildProcess: Send {
    /// OS process id
    fn id(&self) -> u32;

    /// Non-blocking liveness poll; reaps the child once it has exited
    fn is_alive(&mut self) -> bool;

    /// Ask the child to stop. Signaling an exited child must be harmless.
    fn terminate(&mut self, signal: GracefulSignal) -> LauncherResult<()>;

    /// Forcibly stop the child
    fn kill(&mut self) -> LauncherResult<()>;
}

/// Turns a process spec into a running child
#[mockall::automock]
pub trait ProcessSpawner: Send + Sync {
    fn spawn(&self, spec: &ProcessSpec) -> LauncherResult<Box<dyn ChildProcess>>;
}
