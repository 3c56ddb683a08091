//! Fake processes and helpers for supervisor tests
//!
//! Every fake writes into one shared event log so tests can assert on the
//! global ordering of spawns, probes, graceful signals and kills.

use std::collections::HashMap;
use std::io;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use launcher::{
    ChildProcess, GracefulSignal, LauncherError, LauncherResult, ProcessSpawner, ProcessSpec,
    ReadinessProbe, Supervisor,
};

use super::fixtures::TestFixtures;

/// Something a fake observed
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    Spawn(String),
    Probe(String),
    Terminate(String, GracefulSignal),
    Kill(String),
}

pub type EventLog = Arc<Mutex<Vec<Event>>>;

/// How a fake child reacts to shutdown
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Behavior {
    /// Exits as soon as it gets the graceful signal
    ExitsOnSignal,
    /// Keeps running until killed
    IgnoresSignal,
    /// Exited on its own before shutdown started
    AlreadyExited,
}

pub struct FakeChild {
    label: String,
    pid: u32,
    alive: bool,
    behavior: Behavior,
    log: EventLog,
}

impl ChildProcess for FakeChild {
    fn id(&self) -> u32 {
        self.pid
    }

    fn is_alive(&mut self) -> bool {
        self.alive
    }

    fn terminate(&mut self, signal: GracefulSignal) -> LauncherResult<()> {
        self.log
            .lock()
            .unwrap()
            .push(Event::Terminate(self.label.clone(), signal));
        if self.behavior == Behavior::ExitsOnSignal {
            self.alive = false;
        }
        Ok(())
    }

    fn kill(&mut self) -> LauncherResult<()> {
        self.log.lock().unwrap().push(Event::Kill(self.label.clone()));
        self.alive = false;
        Ok(())
    }
}

/// Spawner handing out fake children, optionally failing the k-th spawn
pub struct FakeSpawner {
    log: EventLog,
    behaviors: HashMap<String, Behavior>,
    default_behavior: Behavior,
    fail_at: Option<usize>,
    attempts: Arc<Mutex<Vec<String>>>,
}

impl FakeSpawner {
    pub fn new(log: EventLog) -> Self {
        Self {
            log,
            behaviors: HashMap::new(),
            default_behavior: Behavior::ExitsOnSignal,
            fail_at: None,
            attempts: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Fail the 1-indexed `k`-th spawn attempt
    pub fn failing_at(mut self, k: usize) -> Self {
        self.fail_at = Some(k);
        self
    }

    pub fn with_behavior(mut self, label: &str, behavior: Behavior) -> Self {
        self.behaviors.insert(label.to_string(), behavior);
        self
    }

    pub fn with_default_behavior(mut self, behavior: Behavior) -> Self {
        self.default_behavior = behavior;
        self
    }

    /// Labels of every spawn attempt, failed ones included
    pub fn attempts(&self) -> Arc<Mutex<Vec<String>>> {
        Arc::clone(&self.attempts)
    }
}

impl ProcessSpawner for FakeSpawner {
    fn spawn(&self, spec: &ProcessSpec) -> LauncherResult<Box<dyn ChildProcess>> {
        let attempt = {
            let mut attempts = self.attempts.lock().unwrap();
            attempts.push(spec.label().to_string());
            attempts.len()
        };

        if self.fail_at == Some(attempt) {
            return Err(LauncherError::spawn(
                spec.label(),
                io::Error::new(io::ErrorKind::NotFound, "no such executable"),
            ));
        }

        self.log
            .lock()
            .unwrap()
            .push(Event::Spawn(spec.label().to_string()));

        let behavior = self
            .behaviors
            .get(spec.label())
            .copied()
            .unwrap_or(self.default_behavior);

        Ok(Box::new(FakeChild {
            label: spec.label().to_string(),
            pid: 1000 + attempt as u32,
            alive: behavior != Behavior::AlreadyExited,
            behavior,
            log: Arc::clone(&self.log),
        }))
    }
}

/// Readiness probe that records each address and optionally rejects one
pub struct FakeProbe {
    log: EventLog,
    unreachable: Option<String>,
}

impl FakeProbe {
    pub fn new(log: EventLog) -> Self {
        Self {
            log,
            unreachable: None,
        }
    }

    pub fn unreachable(mut self, addr: &str) -> Self {
        self.unreachable = Some(addr.to_string());
        self
    }
}

#[async_trait]
impl ReadinessProbe for FakeProbe {
    async fn wait_until_ready(&self, label: &str, addr: &str) -> LauncherResult<()> {
        self.log.lock().unwrap().push(Event::Probe(addr.to_string()));

        if self.unreachable.as_deref() == Some(addr) {
            return Err(LauncherError::NodeNotReady {
                label: label.to_string(),
                addr: addr.to_string(),
                attempts: 1,
            });
        }
        Ok(())
    }
}

pub struct TestHelpers;

impl TestHelpers {
    pub fn event_log() -> EventLog {
        Arc::new(Mutex::new(Vec::new()))
    }

    pub fn events(log: &EventLog) -> Vec<Event> {
        log.lock().unwrap().clone()
    }

    /// Shutdown events only, in the order they happened
    pub fn shutdown_events(log: &EventLog) -> Vec<Event> {
        Self::events(log)
            .into_iter()
            .filter(|e| matches!(e, Event::Terminate(..) | Event::Kill(_)))
            .collect()
    }

    pub fn supervisor<S: ProcessSpawner>(spawner: S) -> Supervisor<S> {
        Supervisor::new(spawner).with_grace_period(TestFixtures::GRACE)
    }

    pub fn labels<S: ProcessSpawner>(supervisor: &Supervisor<S>) -> Vec<String> {
        supervisor
            .handles()
            .iter()
            .map(|h| h.label().to_string())
            .collect()
    }

    pub fn terminate(label: &str) -> Event {
        Event::Terminate(label.to_string(), GracefulSignal::Interrupt)
    }

    pub fn kill(label: &str) -> Event {
        Event::Kill(label.to_string())
    }
}
