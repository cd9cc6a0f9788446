//! Command-Line Layer
//!
//! Global options, the command registry and the built-in `get` and
//! `describe` handlers.

pub mod commands;
pub mod registry;

pub use commands::builtin_registry;
pub use registry::{CommandOutput, CommandRegistry, CommandSpec, Handler, Invocation};

use crate::engine::ClusterView;
use crate::error::{Error, Result};
use crate::output::OutputFormat;
use crate::source::{NamespaceScope, SourceConfig};
use clap::{ArgMatches, Command, CommandFactory, Parser};
use std::path::PathBuf;
use std::time::Duration;
use tracing::debug;

// =============================================================================
// Global Options
// =============================================================================

/// storctl - inspect storage volumes, nodes and the workloads using them
#[derive(Parser, Debug, Clone)]
#[command(name = "storctl", author, version, about, long_about = None)]
pub struct Cli {
    /// Snapshot file with the storage inventory (JSON or YAML)
    #[arg(short, long, env = "STORCTL_SNAPSHOT", default_value = "snapshot.yaml", global = true)]
    pub snapshot: PathBuf,

    /// Output format
    #[arg(short, long, value_enum, default_value_t = OutputFormat::Table, global = true)]
    pub output: OutputFormat,

    /// Fetch pods and claims from the Kubernetes API instead of the snapshot
    #[arg(long, env = "STORCTL_KUBE", global = true)]
    pub kube: bool,

    /// Namespace of pods and claims
    #[arg(short, long, env = "STORCTL_NAMESPACE", default_value = "default", global = true)]
    pub namespace: String,

    /// Pods and claims of every namespace
    #[arg(short = 'A', long, global = true)]
    pub all_namespaces: bool,

    /// Bound on fetching each inventory, in seconds
    #[arg(long, env = "STORCTL_TIMEOUT_SECS", default_value = "30", global = true)]
    pub timeout_secs: u64,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, env = "LOG_LEVEL", default_value = "warn", global = true)]
    pub log_level: String,

    /// Output logs as JSON
    #[arg(long, env = "LOG_JSON", global = true)]
    pub log_json: bool,
}

impl Cli {
    /// Full command tree: global options plus every registered command
    pub fn command_with(registry: &CommandRegistry) -> Command {
        registry.build(<Self as CommandFactory>::command())
    }

    pub fn source_config(&self) -> Result<SourceConfig> {
        if self.timeout_secs == 0 {
            return Err(Error::Configuration(
                "timeout must be at least one second".to_string(),
            ));
        }

        let scope = if self.all_namespaces {
            NamespaceScope::All
        } else if self.namespace.is_empty() {
            return Err(Error::Configuration(
                "namespace must not be empty; use --all-namespaces".to_string(),
            ));
        } else {
            NamespaceScope::Namespace(self.namespace.clone())
        };

        Ok(SourceConfig {
            snapshot_path: self.snapshot.clone(),
            kube: self.kube,
            scope,
            timeout: Duration::from_secs(self.timeout_secs),
        })
    }
}

// =============================================================================
// Dispatch
// =============================================================================

/// Run the command selected by `matches` against the view
pub fn dispatch(
    registry: &CommandRegistry,
    matches: &ArgMatches,
    view: &ClusterView,
    format: OutputFormat,
) -> Result<CommandOutput> {
    let (spec, leaf) = registry
        .resolve(matches)
        .ok_or_else(|| Error::Configuration("no command selected".to_string()))?;
    let invocation = Invocation::new(format, leaf);

    debug!(
        command = %format!("{} {}", spec.group, spec.name),
        identifiers = ?invocation.identifiers,
        "Dispatching command"
    );

    (spec.handler)(view, &invocation)
}
