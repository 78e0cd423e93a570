use super::{json_pretty, EXIT_SUCCESS};
use vimius_core::Submodules;

pub fn run(submodules: &Submodules, name: &str, json: bool) -> Result<u8, String> {
    let deps = submodules.dependencies(name).map_err(|e| e.to_string())?;
    if json {
        println!("{}", json_pretty(&deps)?);
    } else if deps.is_empty() {
        println!("{name} has no dependencies");
    } else {
        for dep in &deps {
            println!("{dep}");
        }
    }
    Ok(EXIT_SUCCESS)
}
