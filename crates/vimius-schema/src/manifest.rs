use crate::node::Node;
use crate::types::{GroupName, SubmoduleName};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fs;
use std::path::Path;
use thiserror::Error;

/// Top-level key every manifest must carry.
pub const SUBMODULES_KEY: &str = "submodules";

#[derive(Debug, Error)]
pub enum ManifestError {
    #[error("failed to read manifest file: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse manifest: {0}")]
    ParseYaml(#[from] serde_yaml_ng::Error),
    #[error("failed to parse manifest: {0}")]
    ParseToml(#[from] toml::de::Error),
    #[error("manifest is empty")]
    Empty,
    #[error("manifest must be a mapping, found {0}")]
    NotAMapping(&'static str),
    #[error("manifest does not contain the '{SUBMODULES_KEY}' root key")]
    MissingSubmodules,
    #[error("invalid manifest shape: {0}")]
    InvalidShape(String),
    #[error("invalid submodule '{name}': {reason}")]
    InvalidEntry { name: String, reason: String },
    #[error("submodule '{0}' depends on itself")]
    SelfDependency(String),
    #[error("submodule '{0}' is declared more than once")]
    DuplicateSubmodule(String),
}

/// One installable unit declared in the manifest.
///
/// `name` is injected from the manifest key; the entry body never carries it.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SubmoduleRecord {
    pub name: SubmoduleName,
    pub path: String,
    pub group: GroupName,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub dependencies: Vec<SubmoduleName>,
}

impl SubmoduleRecord {
    pub fn has_dependencies(&self) -> bool {
        !self.dependencies.is_empty()
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ManifestFormat {
    #[default]
    Yaml,
    Toml,
}

impl ManifestFormat {
    /// Pick a format from the file extension. Anything that is not `.toml`
    /// is treated as YAML.
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|e| e.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("toml") => ManifestFormat::Toml,
            _ => ManifestFormat::Yaml,
        }
    }

    pub fn parse(self, input: &str) -> Result<Node, ManifestError> {
        match self {
            ManifestFormat::Yaml => {
                let value: serde_yaml_ng::Value = serde_yaml_ng::from_str(input)?;
                Node::from_yaml(value)
            }
            ManifestFormat::Toml => {
                let table: toml::Table = toml::from_str(input)?;
                Ok(Node::from_toml_table(table))
            }
        }
    }
}

pub fn parse_manifest_str(
    input: &str,
    format: ManifestFormat,
) -> Result<Vec<SubmoduleRecord>, ManifestError> {
    records_from_node(format.parse(input)?)
}

pub fn parse_manifest_file(path: impl AsRef<Path>) -> Result<Vec<SubmoduleRecord>, ManifestError> {
    let path = path.as_ref();
    let content = fs::read_to_string(path)?;
    parse_manifest_str(&content, ManifestFormat::from_path(path))
}

/// Validate a parsed document into records, preserving entry order.
pub fn records_from_node(document: Node) -> Result<Vec<SubmoduleRecord>, ManifestError> {
    let root = match document {
        Node::Null => return Err(ManifestError::Empty),
        Node::Mapping(entries) => entries,
        other => return Err(ManifestError::NotAMapping(other.kind())),
    };

    let Some((_, submodules)) = root.into_iter().find(|(k, _)| k == SUBMODULES_KEY) else {
        return Err(ManifestError::MissingSubmodules);
    };

    let entries = match submodules {
        Node::Mapping(entries) => entries,
        // `submodules:` with nothing under it.
        Node::Null => Vec::new(),
        other => {
            return Err(ManifestError::InvalidShape(format!(
                "'{SUBMODULES_KEY}' must be a mapping, found {}",
                other.kind()
            )))
        }
    };

    let mut seen = HashSet::with_capacity(entries.len());
    let mut records = Vec::with_capacity(entries.len());
    for (name, body) in entries {
        // Keys get the same trimming as dependency names so references match.
        let name = name.trim().to_owned();
        if !seen.insert(name.clone()) {
            return Err(ManifestError::DuplicateSubmodule(name));
        }
        records.push(record_from_entry(name, &body)?);
    }
    Ok(records)
}

fn record_from_entry(name: String, body: &Node) -> Result<SubmoduleRecord, ManifestError> {
    let invalid = |reason: String| ManifestError::InvalidEntry {
        name: name.clone(),
        reason,
    };

    if name.trim().is_empty() {
        return Err(invalid("name must not be empty".to_owned()));
    }

    let Node::Mapping(fields) = body else {
        return Err(invalid(format!("expected a mapping, found {}", body.kind())));
    };

    if let Some((unknown, _)) = fields
        .iter()
        .find(|(k, _)| !matches!(k.as_str(), "path" | "group" | "dependencies"))
    {
        return Err(invalid(format!("unknown field '{unknown}'")));
    }

    let path = required_scalar(body, "path").map_err(invalid)?;
    let group = required_scalar(body, "group").map_err(invalid)?;

    let dependencies = match body.get("dependencies") {
        None | Some(Node::Null) => Vec::new(),
        Some(Node::Sequence(items)) => items
            .iter()
            .map(|item| match item.as_scalar() {
                Some(dep) if !dep.trim().is_empty() => Ok(SubmoduleName::new(dep.trim())),
                Some(_) => Err(invalid("dependency names must not be empty".to_owned())),
                None => Err(invalid(format!(
                    "dependencies must be names, found {}",
                    item.kind()
                ))),
            })
            .collect::<Result<Vec<_>, _>>()?,
        Some(other) => {
            return Err(invalid(format!(
                "dependencies must be a sequence, found {}",
                other.kind()
            )))
        }
    };

    if dependencies.iter().any(|dep| *dep == name) {
        return Err(ManifestError::SelfDependency(name));
    }

    Ok(SubmoduleRecord {
        name: SubmoduleName::new(name),
        path,
        group: GroupName::new(group),
        dependencies,
    })
}

fn required_scalar(body: &Node, field: &str) -> Result<String, String> {
    match body.get(field) {
        None | Some(Node::Null) => Err(format!("missing '{field}'")),
        Some(Node::Scalar(value)) => {
            let value = value.trim();
            if value.is_empty() {
                Err(format!("'{field}' must not be empty"))
            } else {
                Ok(value.to_owned())
            }
        }
        Some(other) => Err(format!("'{field}' must be a scalar, found {}", other.kind())),
    }
}
