use super::{json_pretty, load_config, print_records, EXIT_SUCCESS};
use std::path::Path;
use vimius_core::{CoreError, Submodules};

pub fn run(
    submodules: &Submodules,
    config_path: Option<&Path>,
    with_deps: bool,
    json: bool,
) -> Result<u8, String> {
    let config = load_config(config_path)?;
    let names = config
        .active_submodules()
        .map_err(|e| CoreError::from(e).to_string())?;

    let records = if with_deps {
        submodules.active_with_dependencies(&names)
    } else {
        submodules.active(&names)
    }
    .map_err(|e| e.to_string())?;

    if json {
        println!("{}", json_pretty(&records)?);
    } else if records.is_empty() {
        println!("no active submodules");
    } else {
        print_records(records);
    }
    Ok(EXIT_SUCCESS)
}
