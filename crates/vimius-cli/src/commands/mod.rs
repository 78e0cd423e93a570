pub mod active;
pub mod check;
pub mod completions;
pub mod deps;
pub mod disable;
pub mod enable;
pub mod groups;
pub mod list;
pub mod show;

use console::Style;
use std::path::Path;
use vimius_core::{Config, CoreError};
use vimius_schema::SubmoduleRecord;

pub const EXIT_SUCCESS: u8 = 0;
pub const EXIT_FAILURE: u8 = 1;
pub const EXIT_MANIFEST_ERROR: u8 = 2;
pub const EXIT_RESOLVE_ERROR: u8 = 3;
pub const EXIT_CONFIG_ERROR: u8 = 4;

pub fn json_pretty(value: &impl serde::Serialize) -> Result<String, String> {
    serde_json::to_string_pretty(value).map_err(|e| format!("JSON serialization failed: {e}"))
}

/// Load the config from `path`, or from `~/vimius.yml` when none was given.
pub fn load_config(path: Option<&Path>) -> Result<Config, String> {
    match path {
        Some(path) => Config::load(path),
        None => Config::load_default(),
    }
    .map_err(|e| CoreError::from(e).to_string())
}

/// Map an error message from `vimius_core::CoreError` to a process exit code.
pub fn exit_code_for(msg: &str) -> u8 {
    if msg.starts_with("manifest error:") {
        EXIT_MANIFEST_ERROR
    } else if msg.starts_with("submodule not found:")
        || msg.starts_with("dependency cycle")
        || msg.contains("is required by:")
    {
        EXIT_RESOLVE_ERROR
    } else if msg.starts_with("config error:") {
        EXIT_CONFIG_ERROR
    } else {
        EXIT_FAILURE
    }
}

pub fn colorize_group(group: &str) -> String {
    const PALETTE: [fn(Style) -> Style; 5] = [
        Style::green,
        Style::cyan,
        Style::yellow,
        Style::magenta,
        Style::blue,
    ];
    let slot = group.bytes().fold(0usize, |acc, b| acc.wrapping_add(usize::from(b)));
    PALETTE[slot % PALETTE.len()](Style::new())
        .apply_to(group)
        .to_string()
}

pub fn print_records<'a>(records: impl IntoIterator<Item = &'a SubmoduleRecord>) {
    println!("{:<20} {:<12} {:<40} DEPENDENCIES", "NAME", "GROUP", "PATH");
    for record in records {
        println!(
            "{:<20} {:<12} {:<40} {}",
            record.name,
            colorize_group(&record.group),
            record.path,
            join_names(&record.dependencies)
        );
    }
}

pub fn join_names<T: AsRef<str>>(names: &[T]) -> String {
    names.iter().map(AsRef::as_ref).collect::<Vec<_>>().join(", ")
}
