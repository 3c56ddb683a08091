//! Core shared types and identifiers

use std::fmt;
use std::sync::OnceLock;

static TOOL_ID: OnceLock<ToolId> = OnceLock::new();

/// Identifier for the binary currently running
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ToolId {
    /// The cluster launcher (`run-cluster`)
    Launcher,
    /// The data directory cleaner (`clean-data`)
    Cleaner,
}

impl ToolId {
    /// Initialize the global tool ID for the launcher
    pub fn init_launcher() -> &'static ToolId {
        TOOL_ID.get_or_init(|| ToolId::Launcher)
    }

    /// Initialize the global tool ID for the cleaner
    pub fn init_cleaner() -> &'static ToolId {
        TOOL_ID.get_or_init(|| ToolId::Cleaner)
    }

    /// Get the global tool ID, falling back to the launcher when uninitialized
    pub fn current() -> &'static ToolId {
        TOOL_ID.get().unwrap_or(&ToolId::Launcher)
    }

    /// Crate name used as the tracing target for this tool
    pub fn target(&self) -> &'static str {
        match self {
            ToolId::Launcher => "launcher",
            ToolId::Cleaner => "cleaner",
        }
    }

    /// Tracing target of events logged from the tool's `main.rs`
    pub fn bin_target(&self) -> &'static str {
        match self {
            ToolId::Launcher => "run_cluster",
            ToolId::Cleaner => "clean_data",
        }
    }
}

impl fmt::Display for ToolId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ToolId::Launcher => write!(f, "run-cluster"),
            ToolId::Cleaner => write!(f, "clean-data"),
        }
    }
}
