use super::{json_pretty, EXIT_SUCCESS};
use vimius_core::Submodules;

pub fn run(submodules: &Submodules, json: bool) -> Result<u8, String> {
    submodules.check().map_err(|e| e.to_string())?;
    let count = submodules.submodules().map_err(|e| e.to_string())?.len();
    if json {
        println!(
            "{}",
            json_pretty(&serde_json::json!({ "ok": true, "submodules": count }))?
        );
    } else {
        println!("manifest ok: {count} submodules, all dependencies resolve");
    }
    Ok(EXIT_SUCCESS)
}
