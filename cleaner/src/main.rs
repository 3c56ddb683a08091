//! Main entry point for the data cleaner binary
//!
//! Deletes all per-node data directories (including WAL files) so the
//! cluster starts from a clean slate.

use std::path::PathBuf;

use clap::Parser;

use cleaner::{CleanupOutcome, DataCleaner};
use shared::{logging, ToolId, DEFAULT_NODE_COUNT};

/// Removes the local cluster's data directories
#[derive(Parser)]
#[command(name = "clean-data")]
#[command(about = "Deletes ./data and every ./dataN node directory, WAL files included")]
pub struct Args {
    /// Number of node data directories (data1..dataN) to remove
    #[arg(long, env = "CLUSTER_NODES", default_value_t = DEFAULT_NODE_COUNT)]
    pub nodes: usize,

    /// Directory the data directories live in (defaults to the current directory)
    #[arg(long, env = "CLUSTER_BASE_DIR")]
    pub base_dir: Option<PathBuf>,

    /// Only report what would be removed
    #[arg(long)]
    pub dry_run: bool,

    /// Stop at the first directory that cannot be removed
    #[arg(long)]
    pub fail_fast: bool,

    /// Print the per-path report as JSON on stdout
    #[arg(long)]
    pub json: bool,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, env = "CLUSTER_LOG_LEVEL", default_value = "info")]
    pub log_level: String,

    /// Extra paths to remove after the cluster directories
    pub paths: Vec<PathBuf>,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    dotenv::dotenv().ok();

    let args = Args::parse();

    let tool = ToolId::init_cleaner();
    logging::init_tracing(*tool, Some(&args.log_level));

    let mut cleaner = DataCleaner::for_cluster(args.nodes, args.base_dir.as_deref())
        .with_dry_run(args.dry_run)
        .with_fail_fast(args.fail_fast);
    cleaner.add_paths(&args.paths);

    let report = match cleaner.clean().await {
        Ok(report) => report,
        Err(e) => {
            logging::log_error(tool, "Cleanup", &e);
            return Err(e.into());
        }
    };

    if args.json {
        println!("{}", report.to_json()?);
    }

    for entry in report.failures() {
        if let CleanupOutcome::Failed(reason) = &entry.outcome {
            logging::log_error(tool, &format!("Removing {}", entry.path.display()), reason);
        }
    }

    let report = report.into_result()?;
    logging::log_success(
        tool,
        &format!(
            "Done. {} removed, {} absent. All node data/WAL directories have been cleaned (if they existed).",
            report.removed(),
            report.absent()
        ),
    );
    Ok(())
}
