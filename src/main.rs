//! storctl
//!
//! Loads one snapshot of the storage cluster and its workloads, runs the
//! selected `get` or `describe` command and prints the result on stdout.
//! Logs go to stderr.

use anyhow::Context;
use clap::FromArgMatches;
use tracing::{debug, info, Level};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use storctl::cli::{self, builtin_registry, Cli};
use storctl::{load_snapshot, ClusterView};

// =============================================================================
// Main
// =============================================================================

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let registry = builtin_registry().context("registering commands")?;
    let matches = Cli::command_with(&registry).get_matches();
    let args = Cli::from_arg_matches(&matches).unwrap_or_else(|e| e.exit());

    init_logging(&args)?;
    debug!(version = storctl::VERSION, "Starting {}", storctl::NAME);

    let config = args.source_config()?;
    info!(
        snapshot = %config.snapshot_path.display(),
        kube = config.kube,
        scope = %config.scope,
        "Loading inventory"
    );

    let snapshot = load_snapshot(&config).await.with_context(|| {
        format!(
            "loading inventory from {}",
            config.snapshot_path.display()
        )
    })?;
    let view = ClusterView::new(snapshot);

    let output = cli::dispatch(&registry, &matches, &view, args.output)?;
    println!("{}", output.text.trim_end());

    // Matches are printed before an unmatched identifier is reported
    if let Some(err) = output.error {
        return Err(err.into());
    }
    Ok(())
}

// =============================================================================
// Logging Setup
// =============================================================================

fn init_logging(args: &Cli) -> anyhow::Result<()> {
    let level = match args.log_level.to_lowercase().as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::WARN,
    };

    let filter = EnvFilter::from_default_env()
        .add_directive(level.into())
        .add_directive("kube=warn".parse()?)
        .add_directive("hyper=warn".parse()?)
        .add_directive("tower=warn".parse()?);

    if args.log_json {
        tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer().json().with_writer(std::io::stderr))
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer().with_target(true).with_writer(std::io::stderr))
            .init();
    }
    Ok(())
}
