use std::fs;
use std::path::Path;

use tales_dsl::write_script;

pub fn run(file: &Path, write: bool) -> Result<(), String> {
    let script = super::load(file)?;
    let formatted = write_script(&script);

    if !write {
        print!("{formatted}");
        return Ok(());
    }

    let original =
        fs::read_to_string(file).map_err(|e| format!("cannot read {}: {e}", file.display()))?;
    if original == formatted {
        println!("  {} already formatted", file.display());
        return Ok(());
    }
    fs::write(file, &formatted).map_err(|e| format!("cannot write {}: {e}", file.display()))?;
    println!("  Formatted {}", file.display());
    Ok(())
}
