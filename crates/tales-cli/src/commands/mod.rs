pub mod check;
pub mod fmt;
pub mod scenes;
pub mod trace;

use std::path::Path;

use tales_core::Script;
use tales_dsl::LoadError;
use tales_dsl::diagnostics::render_parse_error;

/// Load a file or directory, printing parse errors to stderr with ariadne.
fn load(path: &Path) -> Result<Script, String> {
    tales_dsl::load_path(path).map_err(|e| report(&e))
}

/// Print a load error and return the one-line summary for `main`.
fn report(error: &LoadError) -> String {
    match error {
        LoadError::Parse { path, text, error } => {
            let filename = path.display().to_string();
            eprint!("{}", render_parse_error(text, &filename, error));
            format!("{filename} failed to parse")
        }
        other => other.to_string(),
    }
}

fn plural(count: usize, word: &str) -> String {
    format!("{count} {word}{}", if count == 1 { "" } else { "s" })
}
