//! OS-backed process spawning
//!
//! Children inherit the launcher's stdio so node and router logs show up in
//! the same terminal, exactly as if they had been started by hand.

use std::io;
use std::process::{Child, Command};

use crate::config::GracefulSignal;
use crate::error::{LauncherError, LauncherResult};
use crate::plan::ProcessSpec;
use crate::traits::{ChildProcess, ProcessSpawner};
use shared::{tool_debug, tool_warn};

/// Spawns plan entries as real child processes
#[derive(Debug, Clone, Copy, Default)]
pub struct RealProcessSpawner;

impl ProcessSpawner for RealProcessSpawner {
    fn spawn(&self, spec: &ProcessSpec) -> LauncherResult<Box<dyn ChildProcess>> {
        let (program, args) = spec.command().split_first().ok_or_else(|| {
            LauncherError::spawn(
                spec.label(),
                io::Error::new(io::ErrorKind::InvalidInput, "empty command"),
            )
        })?;

        let child = Command::new(program)
            .args(args)
            .spawn()
            .map_err(|e| LauncherError::spawn(spec.label(), e))?;

        Ok(Box::new(OsChild::new(spec.label(), child)))
    }
}

/// A child process owned by the launcher
#[derive(Debug)]
pub struct OsChild {
    label: String,
    child: Child,
    /// Set once the exit status has been collected; the pid may be reused after that
    exited: bool,
}

impl OsChild {
    pub fn new(label: impl Into<String>, child: Child) -> Self {
        Self {
            label: label.into(),
            child,
            exited: false,
        }
    }

    fn signal_error(&self, message: impl ToString) -> LauncherError {
        LauncherError::SignalFailed {
            label: self.label.clone(),
            pid: self.child.id(),
            message: message.to_string(),
        }
    }
}

impl ChildProcess for OsChild {
    fn id(&self) -> u32 {
        self.child.id()
    }

    fn is_alive(&mut self) -> bool {
        if self.exited {
            return false;
        }

        match self.child.try_wait() {
            Ok(Some(status)) => {
                tool_debug!("🏁 {} (pid={}) exited with {}", self.label, self.child.id(), status);
                self.exited = true;
                false
            }
            Ok(None) => true,
            Err(e) => {
                // Error checking - assume not running
                tool_warn!("⚠️ Error checking {} status: {}", self.label, e);
                self.exited = true;
                false
            }
        }
    }

    #[cfg(unix)]
    fn terminate(&mut self, signal: GracefulSignal) -> LauncherResult<()> {
        use nix::errno::Errno;
        use nix::sys::signal::{kill, Signal};
        use nix::unistd::Pid;

        if self.exited {
            return Ok(());
        }

        let signal = match signal {
            GracefulSignal::Interrupt => Signal::SIGINT,
            GracefulSignal::Terminate => Signal::SIGTERM,
        };

        match kill(Pid::from_raw(self.child.id() as i32), signal) {
            Ok(()) | Err(Errno::ESRCH) => Ok(()),
            Err(e) => Err(self.signal_error(e)),
        }
    }

    #[cfg(not(unix))]
    fn terminate(&mut self, _signal: GracefulSignal) -> LauncherResult<()> {
        self.kill()
    }

    fn kill(&mut self) -> LauncherResult<()> {
        if self.exited {
            return Ok(());
        }

        match self.child.kill() {
            Ok(()) => Ok(()),
            // Already reaped by the OS side
            Err(e) if e.kind() == io::ErrorKind::InvalidInput => Ok(()),
            Err(e) => Err(self.signal_error(e)),
        }
    }
}
