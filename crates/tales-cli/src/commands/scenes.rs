use std::path::Path;

use comfy_table::{ContentArrangement, Table};

pub fn run(path: &Path, json: bool) -> Result<(), String> {
    let script = super::load(path)?;

    if json {
        let text = serde_json::to_string_pretty(&script)
            .map_err(|e| format!("failed to serialize script: {e}"))?;
        println!("{text}");
        return Ok(());
    }

    if script.is_empty() {
        println!("  No scenes found.");
        return Ok(());
    }

    let mut table = Table::new();
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(vec!["Scene", "Dialogue", "Choices", "Leads to"]);

    for scene in script.scenes() {
        let mut targets = scene.transition_targets();
        targets.sort_unstable();
        targets.dedup();
        let targets = if targets.is_empty() {
            "-".to_string()
        } else {
            targets.join(", ")
        };
        table.add_row(vec![
            scene.name.clone(),
            scene.dialogue_count().to_string(),
            scene.choice_count().to_string(),
            targets,
        ]);
    }

    println!("{table}");
    println!();
    println!("  {}", super::plural(script.len(), "scene"));
    Ok(())
}
