//! Command Registry
//!
//! Commands are registered on a [`CommandRegistry`] built once at startup.
//! The registry produces the clap command tree and maps parsed matches back
//! to the handler that serves them.

use crate::engine::ClusterView;
use crate::error::{Error, Result};
use crate::output::OutputFormat;
use clap::{ArgMatches, Command};

/// Argument id of the positional identifier list
pub const IDENTIFIERS: &str = "identifiers";

/// Argument id of `--show-labels`
pub const SHOW_LABELS: &str = "show-labels";

// =============================================================================
// Invocation
// =============================================================================

/// What a handler needs from the command line
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Invocation {
    pub format: OutputFormat,
    /// Names, IDs or hostnames; empty selects everything
    pub identifiers: Vec<String>,
    pub show_labels: bool,
}

impl Invocation {
    pub fn new(format: OutputFormat, leaf: &ArgMatches) -> Self {
        let identifiers = leaf
            .try_get_many::<String>(IDENTIFIERS)
            .ok()
            .flatten()
            .map(|values| values.cloned().collect())
            .unwrap_or_default();
        let show_labels = leaf
            .try_get_one::<bool>(SHOW_LABELS)
            .ok()
            .flatten()
            .copied()
            .unwrap_or(false);

        Self {
            format,
            identifiers,
            show_labels,
        }
    }
}

/// Rendered result of a command
#[derive(Debug)]
pub struct CommandOutput {
    pub text: String,
    /// Set when some identifiers matched nothing; `text` still holds the
    /// matches
    pub error: Option<Error>,
}

impl CommandOutput {
    pub fn new(text: String) -> Self {
        Self { text, error: None }
    }

    pub fn with_error(mut self, error: Option<Error>) -> Self {
        self.error = error;
        self
    }
}

pub type Handler = fn(&ClusterView, &Invocation) -> Result<CommandOutput>;

// =============================================================================
// Registry
// =============================================================================

/// A leaf command such as `get nodes`
#[derive(Clone)]
pub struct CommandSpec {
    pub group: &'static str,
    pub name: &'static str,
    pub about: &'static str,
    pub aliases: &'static [&'static str],
    /// Adds the command's arguments
    pub args: fn(Command) -> Command,
    pub handler: Handler,
}

impl std::fmt::Debug for CommandSpec {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CommandSpec")
            .field("group", &self.group)
            .field("name", &self.name)
            .field("aliases", &self.aliases)
            .finish_non_exhaustive()
    }
}

impl CommandSpec {
    fn answers_to(&self, name: &str) -> bool {
        self.name == name || self.aliases.iter().any(|alias| *alias == name)
    }

    fn command(&self) -> Command {
        (self.args)(
            Command::new(self.name)
                .about(self.about)
                .visible_aliases(self.aliases.iter().copied()),
        )
    }
}

#[derive(Debug, Clone)]
struct Group {
    name: &'static str,
    about: &'static str,
}

/// Registered command groups and their leaf commands
#[derive(Debug, Clone, Default)]
pub struct CommandRegistry {
    groups: Vec<Group>,
    commands: Vec<CommandSpec>,
}

impl CommandRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a command group such as `get`
    pub fn group(&mut self, name: &'static str, about: &'static str) -> Result<()> {
        if self.groups.iter().any(|g| g.name == name) {
            return Err(Error::Configuration(format!(
                "command group {} registered twice",
                name
            )));
        }
        self.groups.push(Group { name, about });
        Ok(())
    }

    /// Add a leaf command to a registered group
    pub fn register(&mut self, spec: CommandSpec) -> Result<()> {
        if !self.groups.iter().any(|g| g.name == spec.group) {
            return Err(Error::Configuration(format!(
                "command {} registered under unknown group {}",
                spec.name, spec.group
            )));
        }

        let clash = std::iter::once(spec.name)
            .chain(spec.aliases.iter().copied())
            .find(|name| {
                self.commands
                    .iter()
                    .any(|existing| existing.group == spec.group && existing.answers_to(name))
            });
        if let Some(name) = clash {
            return Err(Error::Configuration(format!(
                "command {} {} registered twice",
                spec.group, name
            )));
        }

        self.commands.push(spec);
        Ok(())
    }

    pub fn commands(&self) -> &[CommandSpec] {
        &self.commands
    }

    /// Attach every group and command to `root`
    pub fn build(&self, root: Command) -> Command {
        let root = root.subcommand_required(true).arg_required_else_help(true);
        self.groups.iter().fold(root, |root, group| {
            let command = self
                .commands
                .iter()
                .filter(|spec| spec.group == group.name)
                .fold(
                    Command::new(group.name)
                        .about(group.about)
                        .subcommand_required(true)
                        .arg_required_else_help(true),
                    |command, spec| command.subcommand(spec.command()),
                );
            root.subcommand(command)
        })
    }

    /// The command selected by `matches` and its argument matches
    pub fn resolve<'m>(&self, matches: &'m ArgMatches) -> Option<(&CommandSpec, &'m ArgMatches)> {
        let (group, group_matches) = matches.subcommand()?;
        let (name, leaf) = group_matches.subcommand()?;
        self.commands
            .iter()
            .find(|spec| spec.group == group && spec.answers_to(name))
            .map(|spec| (spec, leaf))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;
    use clap::{Arg, ArgAction};

    fn noop(_: &ClusterView, _: &Invocation) -> Result<CommandOutput> {
        Ok(CommandOutput::new(String::new()))
    }

    fn with_identifiers(command: Command) -> Command {
        command
            .arg(Arg::new(IDENTIFIERS).num_args(1..))
            .arg(Arg::new(SHOW_LABELS).long("show-labels").action(ArgAction::SetTrue))
    }

    fn spec(group: &'static str, name: &'static str, aliases: &'static [&'static str]) -> CommandSpec {
        CommandSpec {
            group,
            name,
            about: "test command",
            aliases,
            args: with_identifiers,
            handler: noop,
        }
    }

    fn registry() -> CommandRegistry {
        let mut registry = CommandRegistry::new();
        registry.group("get", "List resources").unwrap();
        registry.register(spec("get", "nodes", &["node"])).unwrap();
        registry.register(spec("get", "volumes", &["volume"])).unwrap();
        registry
    }

    #[test]
    fn test_build_is_valid() {
        registry().build(Command::new("storctl")).debug_assert();
    }

    #[test]
    fn test_resolve_by_name_and_alias() {
        let registry = registry();
        let root = registry.build(Command::new("storctl"));

        for argv in [["storctl", "get", "nodes", "h1"], ["storctl", "get", "node", "h1"]] {
            let matches = root.clone().try_get_matches_from(argv).unwrap();
            let (spec, leaf) = registry.resolve(&matches).unwrap();
            assert_eq!(spec.name, "nodes");

            let invocation = Invocation::new(OutputFormat::Table, leaf);
            assert_eq!(invocation.identifiers, vec!["h1"]);
            assert!(!invocation.show_labels);
        }
    }

    #[test]
    fn test_invocation_flags() {
        let registry = registry();
        let matches = registry
            .build(Command::new("storctl"))
            .try_get_matches_from(["storctl", "get", "nodes", "--show-labels"])
            .unwrap();
        let (_, leaf) = registry.resolve(&matches).unwrap();
        let invocation = Invocation::new(OutputFormat::Wide, leaf);
        assert!(invocation.identifiers.is_empty());
        assert!(invocation.show_labels);
    }

    #[test]
    fn test_invocation_without_declared_args() {
        let matches = Command::new("cluster").get_matches_from(["cluster"]);
        let invocation = Invocation::new(OutputFormat::Json, &matches);
        assert_eq!(invocation, Invocation { format: OutputFormat::Json, ..Default::default() });
    }

    #[test]
    fn test_duplicate_registration_rejected() {
        let mut registry = registry();
        assert_matches!(
            registry.register(spec("get", "nodes", &[])),
            Err(Error::Configuration(_))
        );
        assert_matches!(
            registry.register(spec("get", "storage-nodes", &["node"])),
            Err(Error::Configuration(_))
        );
        assert_matches!(registry.group("get", "again"), Err(Error::Configuration(_)));
        assert_eq!(registry.commands().len(), 2);
    }

    #[test]
    fn test_unknown_group_rejected() {
        let mut registry = registry();
        assert_matches!(
            registry.register(spec("delete", "nodes", &[])),
            Err(Error::Configuration(_))
        );
    }

    #[test]
    fn test_missing_subcommand_is_a_parse_error() {
        let root = registry().build(Command::new("storctl"));
        assert!(root.clone().try_get_matches_from(["storctl", "get"]).is_err());
        assert!(root.try_get_matches_from(["storctl", "get", "pods"]).is_err());
    }
}
