//! Dependency resolution engine for vimius submodules.
//!
//! This crate ties the schema layer to a lazily loaded, process-lifetime
//! manifest cache and answers structural queries over it through
//! `Submodules`: record lookup, transitive dependency closures, active
//! filtering, and grouped views. It also provides the user configuration
//! file (`Config`) that supplies the active submodule list, and the
//! enable/disable operations that keep that list dependency-consistent.

pub mod activation;
pub mod cache;
pub mod closure;
pub mod config;
pub mod resolver;
pub mod source;
pub mod views;

pub use activation::{disable, enable};
pub use cache::{Catalog, ManifestCache};
pub use config::{Config, ConfigError};
pub use resolver::Submodules;
pub use source::{FileSource, ManifestSource, StaticSource};
pub use views::GroupedSubmodules;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum CoreError {
    #[error("manifest error: {0}")]
    Manifest(#[from] vimius_schema::ManifestError),
    #[error("submodule not found: {0}")]
    SubmoduleNotFound(String),
    #[error("dependency cycle detected: {}", cycle.join(" -> "))]
    DependencyCycle { cycle: Vec<String> },
    #[error("submodule '{name}' is required by: {}", required_by.join(", "))]
    StillRequired {
        name: String,
        required_by: Vec<String>,
    },
    #[error("config error: {0}")]
    Config(#[from] ConfigError),
}
