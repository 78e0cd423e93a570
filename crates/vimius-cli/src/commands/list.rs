use super::{colorize_group, json_pretty, print_records, EXIT_SUCCESS};
use vimius_core::Submodules;

pub fn run(
    submodules: &Submodules,
    group: Option<&str>,
    by_group: bool,
    json: bool,
) -> Result<u8, String> {
    if by_group {
        let mut grouped = submodules.submodules_by_group().map_err(|e| e.to_string())?;
        if let Some(group) = group {
            grouped.retain_group(group);
        }
        if json {
            println!("{}", json_pretty(&grouped)?);
            return Ok(EXIT_SUCCESS);
        }
        for (name, bucket) in grouped.iter() {
            println!("{}:", colorize_group(name));
            for record in bucket {
                println!("  {:<20} {}", record.name, record.path);
            }
        }
        return Ok(EXIT_SUCCESS);
    }

    let records: Vec<_> = submodules
        .submodules()
        .map_err(|e| e.to_string())?
        .iter()
        .filter(|r| group.map_or(true, |g| r.group == g))
        .collect();

    if json {
        println!("{}", json_pretty(&records)?);
    } else if records.is_empty() {
        println!("no submodules found");
    } else {
        print_records(records);
    }
    Ok(EXIT_SUCCESS)
}
