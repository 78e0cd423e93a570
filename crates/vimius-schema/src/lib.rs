//! Submodule manifest model for vimius.
//!
//! This crate defines the schema layer: the `SubmoduleRecord` data model,
//! the format-independent `Node` tree that YAML and TOML documents are
//! lowered into, and the validation that turns a parsed document into an
//! ordered list of records (`parse_manifest_str`, `parse_manifest_file`).

pub mod manifest;
pub mod node;
pub mod types;

pub use manifest::{
    parse_manifest_file, parse_manifest_str, records_from_node, ManifestError, ManifestFormat,
    SubmoduleRecord, SUBMODULES_KEY,
};
pub use node::Node;
pub use types::{GroupName, SubmoduleName};
