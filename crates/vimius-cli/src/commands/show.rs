use super::{colorize_group, join_names, json_pretty, print_records, EXIT_SUCCESS};
use vimius_core::Submodules;

pub fn run(submodules: &Submodules, name: &str, with_deps: bool, json: bool) -> Result<u8, String> {
    if with_deps {
        let records = submodules
            .submodule_with_dependencies(name)
            .map_err(|e| e.to_string())?;
        if json {
            println!("{}", json_pretty(&records)?);
        } else {
            print_records(records);
        }
        return Ok(EXIT_SUCCESS);
    }

    let record = submodules.submodule(name).map_err(|e| e.to_string())?;
    if json {
        println!("{}", json_pretty(record)?);
    } else {
        println!("name:          {}", record.name);
        println!("path:          {}", record.path);
        println!("group:         {}", colorize_group(&record.group));
        if record.has_dependencies() {
            println!("dependencies:  {}", join_names(&record.dependencies));
        } else {
            println!("dependencies:  (none)");
        }
    }
    Ok(EXIT_SUCCESS)
}
