//! Output Rendering
//!
//! Turns engine results into what the operator sees: aligned tables, detail
//! blocks, or JSON/YAML for scripting.

pub mod describe;
pub mod table;

pub use describe::*;
pub use table::*;

use crate::error::Result;
use bytesize::ByteSize;
use clap::ValueEnum;
use comfy_table::{presets, Table};
use serde::Serialize;

/// Printed instead of an empty table
pub const NO_RESOURCES: &str = "No resources found";

const GIB: f64 = 1024.0 * 1024.0 * 1024.0;

/// Output format selected with `--output`
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    #[default]
    Table,
    /// Table with extra columns
    Wide,
    Json,
    Yaml,
}

/// Render `data` in the requested format. `text` produces the human-readable
/// form and receives whether wide output was asked for.
pub fn render<T>(data: &T, format: OutputFormat, text: impl FnOnce(bool) -> String) -> Result<String>
where
    T: Serialize + ?Sized,
{
    Ok(match format {
        OutputFormat::Table => text(false),
        OutputFormat::Wide => text(true),
        OutputFormat::Json => serde_json::to_string_pretty(data)?,
        OutputFormat::Yaml => serde_yaml::to_string(data)?,
    })
}

/// Borderless table with the given header
pub(crate) fn new_table<I, S>(header: I) -> Table
where
    I: IntoIterator<Item = S>,
    S: Into<comfy_table::Cell>,
{
    let mut table = Table::new();
    table.load_preset(presets::NOTHING);
    table.set_header(header);
    table
}

/// Human-readable binary size, e.g. `10.0 GiB`
pub fn format_bytes(bytes: u64) -> String {
    ByteSize::b(bytes).to_string_as(true)
}

/// Bytes as GiB with two decimals
pub fn format_gib(bytes: u64) -> String {
    format!("{:.2}", bytes as f64 / GIB)
}

/// Comma-joined list, `<none>` when empty
pub fn join_or_none<S: AsRef<str>>(values: &[S]) -> String {
    if values.is_empty() {
        return "<none>".to_string();
    }
    values
        .iter()
        .map(|v| v.as_ref())
        .collect::<Vec<_>>()
        .join(",")
}
