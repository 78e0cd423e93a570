use super::{colorize_group, json_pretty, EXIT_SUCCESS};
use vimius_core::Submodules;

pub fn run(submodules: &Submodules, json: bool) -> Result<u8, String> {
    let groups = submodules.groups().map_err(|e| e.to_string())?;
    if json {
        println!("{}", json_pretty(&groups)?);
    } else {
        for group in groups {
            println!("{}", colorize_group(group));
        }
    }
    Ok(EXIT_SUCCESS)
}
