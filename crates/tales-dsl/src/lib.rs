//! TALES source handling: lexing, parsing, diagnostics, and the canonical writer.
//!
//! ```text
//! @scene village_entrance
//! > Guard: Halt! Who goes there?
//! * Buy a torch {check_stat:gold:>=:5} {add_stat:gold:-5} {add_item:Torch:1}
//! * Leave -> road
//! ```

/// Diagnostic rendering with ariadne.
pub mod diagnostics;
/// Parse and load errors.
pub mod error;
/// Condition and effect expressions.
pub mod expr;
/// Canonical writer.
pub mod format;
/// Comment stripping and logical lines.
pub mod lexer;
/// Warnings for sources that parse.
pub mod lint;
/// The line-oriented document builder.
pub mod parser;

use std::path::{Path, PathBuf};

use tales_core::{Script, ScriptError};

pub use diagnostics::Diagnostic;
pub use error::{LoadError, ParseError, ParseErrorKind};
pub use format::write_script;
pub use lint::lint;

/// File extension for TALES sources.
pub const EXTENSION: &str = "tales";

/// Parse a source string into a script.
pub fn load(source: &str) -> Result<Script, ParseError> {
    parser::parse(source)
}

/// Read and parse one file.
pub fn load_file(path: &Path) -> Result<Script, LoadError> {
    let text = std::fs::read_to_string(path).map_err(|source| LoadError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    log::debug!("parsing {}", path.display());
    match parser::parse(&text) {
        Ok(script) => Ok(script),
        Err(error) => Err(LoadError::Parse {
            path: path.to_path_buf(),
            text,
            error,
        }),
    }
}

/// The `.tales` files directly inside a directory, sorted by path.
pub fn source_files(dir: &Path) -> Result<Vec<PathBuf>, LoadError> {
    let io_error = |source| LoadError::Io {
        path: dir.to_path_buf(),
        source,
    };
    let mut paths: Vec<_> = std::fs::read_dir(dir)
        .map_err(io_error)?
        .filter_map(|e| e.ok())
        .map(|e| e.path())
        .filter(|p| p.extension().is_some_and(|ext| ext == EXTENSION))
        .collect();

    // Sort for deterministic ordering
    paths.sort();
    Ok(paths)
}

/// Parse every `.tales` file in a directory and merge them into one script.
///
/// Files are read in sorted order, so scene order is deterministic. Each file
/// is parsed on its own; a scene declared in two files is an error.
pub fn load_dir(dir: &Path) -> Result<Script, LoadError> {
    let mut script = Script::new();
    for path in source_files(dir)? {
        let part = load_file(&path)?;
        script.merge(part).map_err(|e| match e {
            ScriptError::DuplicateScene(name) => LoadError::DuplicateScene {
                path: path.clone(),
                name,
            },
        })?;
    }
    log::debug!("loaded {} scenes from {}", script.len(), dir.display());
    Ok(script)
}

/// Load a file or, if `path` is a directory, every `.tales` file in it.
pub fn load_path(path: &Path) -> Result<Script, LoadError> {
    if path.is_dir() {
        load_dir(path)
    } else {
        load_file(path)
    }
}
