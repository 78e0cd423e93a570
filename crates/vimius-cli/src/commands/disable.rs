use super::{json_pretty, load_config, EXIT_SUCCESS};
use std::path::Path;
use vimius_core::{CoreError, Submodules};

pub fn run(
    submodules: &Submodules,
    config_path: Option<&Path>,
    name: &str,
    json: bool,
) -> Result<u8, String> {
    let mut config = load_config(config_path)?;
    let changed = vimius_core::disable(submodules, &mut config, name).map_err(|e| e.to_string())?;
    if changed {
        config.save().map_err(|e| CoreError::from(e).to_string())?;
    }

    if json {
        println!(
            "{}",
            json_pretty(&serde_json::json!({ "disabled": name, "changed": changed }))?
        );
    } else if changed {
        println!("disabled {name}");
    } else {
        println!("{name} is not enabled");
    }
    Ok(EXIT_SUCCESS)
}
