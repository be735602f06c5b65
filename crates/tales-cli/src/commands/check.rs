use std::fs;
use std::path::PathBuf;

use colored::Colorize;
use tales_core::Script;
use tales_dsl::diagnostics::{render_diagnostics, render_parse_error};

pub fn run(paths: &[PathBuf]) -> Result<(), String> {
    let mut files = Vec::new();
    for path in paths {
        if path.is_dir() {
            files.extend(tales_dsl::source_files(path).map_err(|e| e.to_string())?);
        } else {
            files.push(path.clone());
        }
    }

    let mut script = Script::new();
    let mut sources = Vec::new();
    let mut errors = 0;

    for path in &files {
        let filename = path.display().to_string();
        let text = match fs::read_to_string(path) {
            Ok(text) => text,
            Err(e) => {
                eprintln!("{} cannot read {filename}: {e}", "error:".red().bold());
                errors += 1;
                continue;
            }
        };
        log::debug!("checking {filename}");
        match tales_dsl::load(&text) {
            Ok(part) => match script.merge(part) {
                Ok(()) => sources.push((filename, text)),
                Err(e) => {
                    eprintln!("{} {filename}: {e}", "error:".red().bold());
                    errors += 1;
                }
            },
            Err(e) => {
                eprint!("{}", render_parse_error(&text, &filename, &e));
                errors += 1;
            }
        }
    }

    if errors > 0 {
        return Err(format!("check failed with {}", super::plural(errors, "error")));
    }

    // Only meaningful once every file is in; scenes may reference each other.
    let mut warnings = 0;
    for (filename, text) in &sources {
        let diagnostics = tales_dsl::lint(text, &script);
        if !diagnostics.is_empty() {
            log::debug!("{filename}: {} warnings", diagnostics.len());
            eprint!("{}", render_diagnostics(text, filename, &diagnostics));
            warnings += diagnostics.len();
        }
    }

    let choices: usize = script.scenes().iter().map(|s| s.choice_count()).sum();
    println!(
        "  {} {}, {}",
        "ok".green().bold(),
        super::plural(script.len(), "scene"),
        super::plural(choices, "choice"),
    );
    if warnings > 0 {
        println!("  {}", super::plural(warnings, "warning"));
    }
    Ok(())
}
