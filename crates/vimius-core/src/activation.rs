//! Keep the configured active list closed under dependencies.
//!
//! Both operations only mutate the in-memory `Config`; callers decide when
//! to `save`.

use crate::config::Config;
use crate::resolver::Submodules;
use crate::CoreError;
use tracing::info;
use vimius_schema::SubmoduleName;

/// Activate `name` together with its dependency closure.
///
/// Returns the names that were newly added, dependencies first.
pub fn enable(
    submodules: &Submodules,
    config: &mut Config,
    name: &str,
) -> Result<Vec<SubmoduleName>, CoreError> {
    let record = submodules.submodule(name)?;
    let mut wanted = submodules.dependencies(name)?;
    wanted.push(record.name.clone());

    let mut active = config.active_submodules()?;
    let mut added = Vec::new();
    for dep in wanted {
        if !active.iter().any(|a| dep == *a) {
            active.push(dep.to_string());
            added.push(dep);
        }
    }

    if !added.is_empty() {
        config.set_active_submodules(&active);
        info!("enabled {name} ({} added)", added.len());
    }
    Ok(added)
}

/// Deactivate `name`.
///
/// Fails with `StillRequired` if another active submodule depends on it.
/// Names unknown to the manifest are removed without a dependency check.
/// Returns whether the active list changed.
pub fn disable(submodules: &Submodules, config: &mut Config, name: &str) -> Result<bool, CoreError> {
    let mut active = config.active_submodules()?;
    if !active.iter().any(|a| a == name) {
        return Ok(false);
    }

    if submodules.submodules_by_name()?.contains_key(name) {
        let required_by: Vec<String> = submodules
            .dependents(name)?
            .into_iter()
            .filter(|r| active.iter().any(|a| r.name == *a))
            .map(|r| r.name.to_string())
            .collect();
        if !required_by.is_empty() {
            return Err(CoreError::StillRequired {
                name: name.to_owned(),
                required_by,
            });
        }
    }

    active.retain(|a| a != name);
    config.set_active_submodules(&active);
    info!("disabled {name}");
    Ok(true)
}
