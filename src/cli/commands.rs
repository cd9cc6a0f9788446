//! Built-in Commands
//!
//! `get` lists resources as tables, `describe` prints detail blocks. Every
//! handler works on one [`ClusterView`] and accepts names, IDs or hostnames
//! interchangeably as identifiers.

use super::registry::{CommandOutput, CommandRegistry, CommandSpec, Invocation, IDENTIFIERS, SHOW_LABELS};
use crate::engine::{ClusterView, CorrelatedClaim, Selection};
use crate::error::Result;
use crate::model::{Claim, Volume};
use crate::output::{
    claims_table, nodes_table, render, volumes_table, ClaimDescription, ClaimSummary,
    ClusterDescription, VolumeDescription, VolumeSummary, NO_RESOURCES,
};
use clap::{Arg, ArgAction, Command};
use indexmap::IndexSet;
use tracing::debug;

/// Registry holding every built-in command
pub fn builtin_registry() -> Result<CommandRegistry> {
    let mut registry = CommandRegistry::new();
    registry.group("get", "List resources")?;
    registry.group("describe", "Show details of resources")?;

    registry.register(CommandSpec {
        group: "get",
        name: "nodes",
        about: "List storage nodes",
        aliases: &["node"],
        args: node_args,
        handler: get_nodes,
    })?;
    registry.register(CommandSpec {
        group: "get",
        name: "volumes",
        about: "List storage volumes",
        aliases: &["volume"],
        args: identifier_args,
        handler: get_volumes,
    })?;
    registry.register(CommandSpec {
        group: "get",
        name: "pvc",
        about: "List persistent volume claims backed by the storage cluster",
        aliases: &[],
        args: identifier_args,
        handler: get_claims,
    })?;
    registry.register(CommandSpec {
        group: "describe",
        name: "volume",
        about: "Show volume replication and consumers",
        aliases: &["volumes"],
        args: identifier_args,
        handler: describe_volumes,
    })?;
    registry.register(CommandSpec {
        group: "describe",
        name: "pvc",
        about: "Show claims with their volumes, pods and containers",
        aliases: &[],
        args: identifier_args,
        handler: describe_claims,
    })?;
    registry.register(CommandSpec {
        group: "describe",
        name: "cluster",
        about: "Show cluster capacity",
        aliases: &[],
        args: no_args,
        handler: describe_cluster,
    })?;

    Ok(registry)
}

// =============================================================================
// Arguments
// =============================================================================

fn identifier_args(command: Command) -> Command {
    command.arg(
        Arg::new(IDENTIFIERS)
            .value_name("ID")
            .num_args(1..)
            .help("Names, IDs or hostnames to show; all when omitted"),
    )
}

fn node_args(command: Command) -> Command {
    identifier_args(command).arg(
        Arg::new(SHOW_LABELS)
            .long("show-labels")
            .action(ArgAction::SetTrue)
            .help("Show node labels"),
    )
}

fn no_args(command: Command) -> Command {
    command
}

// =============================================================================
// get
// =============================================================================

fn get_nodes(view: &ClusterView, invocation: &Invocation) -> Result<CommandOutput> {
    let (nodes, no_match) = view.nodes().select(&invocation.identifiers).into_parts();
    let text = render(&nodes, invocation.format, |wide| {
        nodes_table(&nodes, wide, invocation.show_labels)
    })?;
    Ok(CommandOutput::new(text).with_error(no_match))
}

fn get_volumes(view: &ClusterView, invocation: &Invocation) -> Result<CommandOutput> {
    let (volumes, no_match) = view.volumes().select(&invocation.identifiers).into_parts();
    let resolver = view.resolver();
    let summaries = volumes
        .into_iter()
        .map(|volume| {
            resolver.attached_state(volume).map(|state| VolumeSummary {
                volume,
                state: state.to_string(),
            })
        })
        .collect::<Result<Vec<_>>>()?;

    let text = render(&summaries, invocation.format, |_| volumes_table(&summaries))?;
    Ok(CommandOutput::new(text).with_error(no_match))
}

fn get_claims(view: &ClusterView, invocation: &Invocation) -> Result<CommandOutput> {
    let (claims, no_match) = select_claims(view, &invocation.identifiers)?.into_parts();
    let resolver = view.resolver();
    let summaries = claims
        .iter()
        .map(|claim| {
            resolver.attached_state(&claim.volume).map(|state| ClaimSummary {
                claim,
                state: state.to_string(),
            })
        })
        .collect::<Result<Vec<_>>>()?;

    let text = render(&summaries, invocation.format, |_| claims_table(&summaries))?;
    Ok(CommandOutput::new(text).with_error(no_match))
}

// =============================================================================
// describe
// =============================================================================

fn describe_volumes(view: &ClusterView, invocation: &Invocation) -> Result<CommandOutput> {
    let (volumes, no_match) = view.volumes().select(&invocation.identifiers).into_parts();
    let descriptions = volumes
        .into_iter()
        .map(|volume| describe_volume(view, volume))
        .collect::<Result<Vec<_>>>()?;

    let text = render(&descriptions, invocation.format, |_| blocks(&descriptions))?;
    Ok(CommandOutput::new(text).with_error(no_match))
}

fn describe_volume<'v>(view: &'v ClusterView, volume: &'v Volume) -> Result<VolumeDescription<'v>> {
    let resolver = view.resolver();
    let bound: Vec<&Claim> = view.claims().claims_for_volume(volume);

    let mut pods = IndexSet::new();
    for claim in &bound {
        for pod in view
            .pods()
            .pods_using_namespaced_claim(&claim.namespace, &claim.name)
        {
            pods.insert(pod.qualified_name());
        }
    }

    Ok(VolumeDescription {
        volume,
        state: resolver.attached_state(volume)?.to_string(),
        replication: resolver.replication_info(volume)?,
        claims: bound
            .iter()
            .map(|claim| format!("{}/{}", claim.namespace, claim.name))
            .collect(),
        pods: pods.into_iter().collect(),
    })
}

fn describe_claims(view: &ClusterView, invocation: &Invocation) -> Result<CommandOutput> {
    let (claims, no_match) = select_claims(view, &invocation.identifiers)?.into_parts();
    let resolver = view.resolver();
    let descriptions = claims
        .iter()
        .map(|claim| {
            let containers = view
                .pods()
                .containers_for_claim(&claim.name)
                .into_iter()
                .filter(|c| claim.namespace.is_empty() || c.pod.namespace == claim.namespace)
                .map(|c| format!("{}: {}", c.pod.qualified_name(), c.container))
                .collect();
            resolver.attached_state(&claim.volume).map(|state| ClaimDescription {
                claim,
                state: state.to_string(),
                containers,
            })
        })
        .collect::<Result<Vec<_>>>()?;

    let text = render(&descriptions, invocation.format, |_| blocks(&descriptions))?;
    Ok(CommandOutput::new(text).with_error(no_match))
}

fn describe_cluster(view: &ClusterView, invocation: &Invocation) -> Result<CommandOutput> {
    let description = ClusterDescription::new(view.captured_at(), view.nodes());
    let text = render(&description, invocation.format, |_| description.to_string())?;
    Ok(CommandOutput::new(text))
}

// =============================================================================
// Helpers
// =============================================================================

/// Correlate the claims backed by this storage cluster and filter them
fn select_claims(view: &ClusterView, identifiers: &[String]) -> Result<Selection<CorrelatedClaim>> {
    let correlator = view.correlator();
    let managed: Vec<Claim> = correlator
        .managed_claims(view.claims().all())
        .into_iter()
        .cloned()
        .collect();
    debug!(
        claims = view.claims().all().len(),
        managed = managed.len(),
        "Selecting claims"
    );

    let correlated = correlator.correlate(&managed)?;
    Ok(correlator.filter_by_identifiers(correlated, identifiers))
}

/// Detail blocks separated by blank lines
fn blocks<T: std::fmt::Display>(items: &[T]) -> String {
    if items.is_empty() {
        return NO_RESOURCES.to_string();
    }
    items
        .iter()
        .map(|item| item.to_string())
        .collect::<Vec<_>>()
        .join("\n")
}
