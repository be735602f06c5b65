//! Headless playthrough with scripted selections.

use std::path::Path;
use std::sync::Arc;

use colored::Colorize;
use comfy_table::{ContentArrangement, Table};
use tales_core::value::parse_integer;
use tales_core::{StateStore, Value};
use tales_runtime::{Interpreter, RuntimeConfig, Step, UnknownScenePolicy};

/// Arguments of `tales trace`.
pub struct TraceOptions {
    pub scene: String,
    pub selections: Vec<usize>,
    pub assignments: Vec<String>,
    pub lenient: bool,
    pub json: bool,
}

pub fn run(path: &Path, opts: &TraceOptions) -> Result<(), String> {
    let script = Arc::new(super::load(path)?);

    let mut state = StateStore::new();
    for assignment in &opts.assignments {
        seed(&mut state, assignment)?;
    }

    let policy = if opts.lenient {
        UnknownScenePolicy::Remain
    } else {
        UnknownScenePolicy::Error
    };
    let config = RuntimeConfig::default().with_unknown_scene(policy);
    log::info!("tracing from `{}` with {policy:?} for unknown scenes", opts.scene);
    let mut session = Interpreter::start_with_config(script, &opts.scene, state, config)
        .map_err(|e| e.to_string())?;

    let mut picks = opts.selections.iter();
    let mut scene = String::new();
    loop {
        if session.scene() != scene {
            scene = session.scene().to_string();
            println!("{}", format!("@scene {scene}").cyan().bold());
        }
        match session.advance() {
            Step::Dialogue(line) if line.is_narration() => println!("  {}", line.text),
            Step::Dialogue(line) => println!("  {}: {}", line.speaker.bold(), line.text),
            Step::Menu(menu) => {
                for (i, option) in menu.options.iter().enumerate() {
                    println!("    [{i}] {option}");
                }
                let Some(&pick) = picks.next() else {
                    println!("  {}", "(awaiting a choice)".dimmed());
                    break;
                };
                log::debug!("turn {}: selecting option {pick}", session.turn());
                session.select(pick).map_err(|e| e.to_string())?;
                let text = menu.options.get(pick).map_or("", String::as_str);
                println!("  {} {text}", "->".green());
            }
            Step::SceneExhausted(name) => {
                println!("  {}", format!("(end of {name})").dimmed());
                break;
            }
        }
    }

    let unused = picks.count();
    if unused > 0 {
        eprintln!(
            "{} {} left unused",
            "warning:".yellow().bold(),
            super::plural(unused, "selection")
        );
    }

    println!();
    if opts.json {
        let text = serde_json::to_string_pretty(session.state())
            .map_err(|e| format!("failed to serialize state: {e}"))?;
        println!("{text}");
    } else {
        print_state(session.state(), session.turn());
    }
    Ok(())
}

/// Apply a `kind:key:value` assignment from the command line.
fn seed(state: &mut StateStore, assignment: &str) -> Result<(), String> {
    let mut parts = assignment.splitn(3, ':').map(str::trim);
    let (Some(kind), Some(key), Some(value)) = (parts.next(), parts.next(), parts.next()) else {
        return Err(format!("invalid --set `{assignment}`; expected KIND:KEY:VALUE"));
    };
    if key.is_empty() {
        return Err(format!("invalid --set `{assignment}`; key is empty"));
    }
    log::debug!("seed {kind} `{key}` = {value}");

    if kind == "var" {
        state.set_var(key, Value::infer(value));
        return Ok(());
    }
    let number = parse_integer(value)
        .ok_or_else(|| format!("invalid --set `{assignment}`; `{value}` is not an integer"))?;
    match kind {
        "stat" => state.set_stat(key, number),
        "item" => state.set_item(key, number),
        "journal" => state.set_journal(key, number),
        _ => {
            return Err(format!(
                "invalid --set `{assignment}`; kind must be var, stat, item, or journal"
            ));
        }
    }
    Ok(())
}

fn print_state(state: &StateStore, turn: u64) {
    let mut table = Table::new();
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(vec!["Kind", "Key", "Value"]);

    let mut rows = 0;
    for (key, value) in state.variables() {
        table.add_row(vec!["var".to_string(), key.clone(), value.to_string()]);
        rows += 1;
    }
    let counters = [
        ("stat", state.stats()),
        ("item", state.items()),
        ("journal", state.journal()),
    ];
    for (kind, map) in counters {
        for (key, value) in map {
            table.add_row(vec![kind.to_string(), key.clone(), value.to_string()]);
            rows += 1;
        }
    }
    for encounter in state.encounters() {
        table.add_row(vec!["encounter".to_string(), encounter.clone(), "-".to_string()]);
        rows += 1;
    }

    if rows > 0 {
        println!("{table}");
    } else {
        println!("  State is empty.");
    }
    println!("  {turn} selection(s) made");
}
