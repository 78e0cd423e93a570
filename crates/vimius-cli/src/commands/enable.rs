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
    let added = vimius_core::enable(submodules, &mut config, name).map_err(|e| e.to_string())?;
    if !added.is_empty() {
        config.save().map_err(|e| CoreError::from(e).to_string())?;
    }

    if json {
        println!(
            "{}",
            json_pretty(&serde_json::json!({ "enabled": name, "added": added }))?
        );
    } else if added.is_empty() {
        println!("{name} is already enabled");
    } else {
        for dep in &added {
            println!("enabled {dep}");
        }
    }
    Ok(EXIT_SUCCESS)
}
