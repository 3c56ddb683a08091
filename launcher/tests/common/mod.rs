//! Common test utilities and infrastructure
//!
//! Shared fixtures and fake process plumbing used across the launcher test
//! suites.

#![allow(dead_code)]

pub mod fixtures;
pub mod helpers;

// Re-export commonly used items for convenience
pub use fixtures::TestFixtures;
pub use helpers::{Behavior, Event, EventLog, FakeProbe, FakeSpawner, TestHelpers};
