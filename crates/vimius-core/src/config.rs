use serde_yaml_ng::{Mapping, Value};
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;
use thiserror::Error;
use tracing::{debug, info};

/// Root key of the user configuration document.
pub const ROOT_KEY: &str = "vimius";
/// Key under the root holding the active submodule names.
pub const SUBMODULES_KEY: &str = "submodules";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("HOME not set")]
    HomeNotSet,
    #[error("config file is not readable: {path}: {source}")]
    NotReadable {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("config file is not writable: {path}: {source}")]
    NotWritable {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("config file is empty: {0}")]
    Empty(PathBuf),
    #[error("not a valid config file: {0}")]
    NotValid(String),
}

/// User configuration file (`~/vimius.yml` by default).
///
/// Only the `vimius` section is exposed; any other top-level keys are kept
/// as they were and written back untouched on `save`.
#[derive(Debug, Clone)]
pub struct Config {
    path: PathBuf,
    document: Mapping,
    section: Mapping,
}

impl Config {
    pub fn default_path() -> Result<PathBuf, ConfigError> {
        let home = std::env::var("HOME").map_err(|_| ConfigError::HomeNotSet)?;
        Ok(PathBuf::from(home).join("vimius.yml"))
    }

    pub fn load_default() -> Result<Self, ConfigError> {
        Self::load(Self::default_path()?)
    }

    /// Load the config, creating an empty one first if the file is missing.
    pub fn load(path: impl Into<PathBuf>) -> Result<Self, ConfigError> {
        let path = path.into();
        if !path.exists() {
            initialize(&path)?;
        }

        let content = fs::read_to_string(&path).map_err(|source| ConfigError::NotReadable {
            path: path.clone(),
            source,
        })?;
        let value: Value = serde_yaml_ng::from_str(&content)
            .map_err(|e| ConfigError::NotValid(format!("{}: not valid YAML: {e}", path.display())))?;

        let document = match value {
            Value::Mapping(document) => document,
            Value::Null => return Err(ConfigError::Empty(path)),
            _ => {
                return Err(ConfigError::NotValid(format!(
                    "{}: expected a mapping at the top level",
                    path.display()
                )))
            }
        };

        let section = match document.get(ROOT_KEY) {
            Some(Value::Mapping(section)) => section.clone(),
            Some(Value::Null) => Mapping::new(),
            Some(_) => {
                return Err(ConfigError::NotValid(format!(
                    "{}: '{ROOT_KEY}' must be a mapping",
                    path.display()
                )))
            }
            None => {
                return Err(ConfigError::NotValid(format!(
                    "{}: missing '{ROOT_KEY}' root key",
                    path.display()
                )))
            }
        };

        debug!("loaded config from {}", path.display());
        Ok(Self {
            path,
            document,
            section,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.section.get(key)
    }

    pub fn set(&mut self, key: &str, value: impl Into<Value>) {
        self.section.insert(Value::from(key), value.into());
    }

    /// Active submodule names, in the order the user listed them.
    pub fn active_submodules(&self) -> Result<Vec<String>, ConfigError> {
        match self.get(SUBMODULES_KEY) {
            None | Some(Value::Null) => Ok(Vec::new()),
            Some(Value::Sequence(items)) => items
                .iter()
                .map(|item| match item {
                    // Scalars become names the way manifest keys do.
                    Value::String(name) => Ok(name.clone()),
                    Value::Number(n) => Ok(n.to_string()),
                    Value::Bool(b) => Ok(b.to_string()),
                    other => Err(ConfigError::NotValid(format!(
                        "{}: '{SUBMODULES_KEY}' entries must be names, found {other:?}",
                        self.path.display()
                    ))),
                })
                .collect(),
            Some(_) => Err(ConfigError::NotValid(format!(
                "{}: '{SUBMODULES_KEY}' must be a list",
                self.path.display()
            ))),
        }
    }

    pub fn set_active_submodules<S: AsRef<str>>(&mut self, names: &[S]) {
        let list: Vec<Value> = names.iter().map(|n| Value::from(n.as_ref())).collect();
        self.set(SUBMODULES_KEY, Value::Sequence(list));
    }

    pub fn save(&mut self) -> Result<(), ConfigError> {
        self.document
            .insert(Value::from(ROOT_KEY), Value::Mapping(self.section.clone()));
        let content = serde_yaml_ng::to_string(&self.document)
            .map_err(|e| ConfigError::NotValid(format!("failed to serialize config: {e}")))?;
        write_atomic(&self.path, &content).map_err(|source| ConfigError::NotWritable {
            path: self.path.clone(),
            source,
        })?;
        info!("saved config to {}", self.path.display());
        Ok(())
    }
}

fn write_atomic(dest: &Path, content: &str) -> std::io::Result<()> {
    let dir = dest
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."));
    let mut tmp = NamedTempFile::new_in(dir)?;
    tmp.write_all(content.as_bytes())?;
    tmp.as_file().sync_all()?;
    tmp.persist(dest).map_err(|e| e.error)?;
    Ok(())
}

fn initialize(path: &Path) -> Result<(), ConfigError> {
    let not_writable = |source| ConfigError::NotWritable {
        path: path.to_path_buf(),
        source,
    };
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(not_writable)?;
    }
    fs::write(path, format!("{ROOT_KEY}: {{}}\n")).map_err(not_writable)?;
    info!("initialized empty config at {}", path.display());
    Ok(())
}
