//! Shared logging utilities for consistent tracing across both tools

use crate::types::ToolId;
use chrono::{DateTime, Utc};
use tracing::{error, info};

/// Filter directives for the given tool at the given base level
///
/// Covers the tool's library crate, its binary crate and `shared`.
pub fn filter_directives(tool: ToolId, log_level: Option<&str>) -> String {
    let base_level = log_level.unwrap_or("info");
    format!(
        "{}={base_level},{}={base_level},shared={base_level}",
        tool.target(),
        tool.bin_target()
    )
}

/// Initialize the tracing subscriber for `tool`
///
/// Logs go to stderr; stdout is reserved for machine-readable output such as
/// `clean-data --json`. `RUST_LOG`, when set, takes precedence over the
/// computed directives.
pub fn init_tracing(tool: ToolId, log_level: Option<&str>) {
    use tracing_subscriber::{EnvFilter, fmt};

    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(filter_directives(tool, log_level)));

    fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false)
        .init();
}

/// Get formatted timestamp for consistent logging
pub fn format_timestamp() -> String {
    let now: DateTime<Utc> = Utc::now();
    now.format("%H:%M:%S%.3f").to_string()
}

/// Macro for tool-aware info logging
#[macro_export]
macro_rules! tool_info {
    ($($arg:tt)*) => {
        tracing::info!(
            tool = %$crate::ToolId::current(),
            timestamp = $crate::logging::format_timestamp(),
            $($arg)*
        )
    };
}

/// Macro for tool-aware warning logging
#[macro_export]
macro_rules! tool_warn {
    ($($arg:tt)*) => {
        tracing::warn!(
            tool = %$crate::ToolId::current(),
            timestamp = $crate::logging::format_timestamp(),
            $($arg)*
        )
    };
}

/// Macro for tool-aware error logging
#[macro_export]
macro_rules! tool_error {
    ($($arg:tt)*) => {
        tracing::error!(
            tool = %$crate::ToolId::current(),
            timestamp = $crate::logging::format_timestamp(),
            $($arg)*
        )
    };
}

/// Macro for tool-aware debug logging
#[macro_export]
macro_rules! tool_debug {
    ($($arg:tt)*) => {
        tracing::debug!(
            tool = %$crate::ToolId::current(),
            timestamp = $crate::logging::format_timestamp(),
            $($arg)*
        )
    };
}

/// Contextual logging helper for startup messages
pub fn log_startup(tool: &ToolId, details: &str) {
    info!(
        tool = %tool,
        timestamp = format_timestamp(),
        "🚀 Starting {}",
        details
    );
}

/// Contextual logging helper for shutdown messages
pub fn log_shutdown(tool: &ToolId, reason: &str) {
    info!(
        tool = %tool,
        timestamp = format_timestamp(),
        "🛑 Shutting down: {}",
        reason
    );
}

/// Contextual logging helper for error conditions
pub fn log_error(tool: &ToolId, context: &str, error: &dyn std::fmt::Display) {
    error!(
        tool = %tool,
        timestamp = format_timestamp(),
        error = %error,
        "❌ {} failed: {}",
        context,
        error
    );
}

/// Contextual logging helper for success conditions
pub fn log_success(tool: &ToolId, message: &str) {
    info!(
        tool = %tool,
        timestamp = format_timestamp(),
        "✅ {}",
        message
    );
}
