//! Warnings for sources that parse but are probably not what the author meant.
//!
//! Linting works on lexed lines rather than the built [`Script`], so each
//! warning points at the text that caused it.

use tales_core::Script;

use crate::diagnostics::Diagnostic;
use crate::lexer::{self, LogicalLine};

/// Collect warnings for one source file.
///
/// `script` is everything loaded alongside the file; a transition only warns
/// when no loaded file declares its target.
pub fn lint(source: &str, script: &Script) -> Vec<Diagnostic> {
    let mut diagnostics = Vec::new();
    let mut scene = String::new();
    // (indent, line number) of the latest choice at each depth.
    let mut parents: Vec<(usize, usize)> = Vec::new();

    for line in lexer::lex(source) {
        if let Some(directive) = line.text.strip_prefix('@') {
            let mut words = directive.split_whitespace();
            if words.next() == Some("scene") {
                scene = words.next().unwrap_or_default().to_string();
            }
            parents.clear();
            continue;
        }
        if !line.text.starts_with('*') {
            continue;
        }

        let raw = &source[line.span.clone()];
        let depth = raw.len() - raw.trim_start_matches('*').len();
        if let Some(diag) = nesting(&line, depth, &mut parents) {
            diagnostics.push(diag);
        }

        let Some((offset, target)) = transition(raw) else {
            continue;
        };
        if !script.contains(target) {
            let start = line.span.start + offset;
            diagnostics.push(
                Diagnostic::warning(
                    start..start + target.len(),
                    format!("scene `{scene}` transitions to undeclared scene `{target}`"),
                )
                .with_label("no loaded file declares this scene"),
            );
        }
    }

    diagnostics
}

/// A nested choice should sit deeper than the choice it hangs under.
fn nesting(
    line: &LogicalLine,
    depth: usize,
    parents: &mut Vec<(usize, usize)>,
) -> Option<Diagnostic> {
    parents.truncate(depth - 1);
    if parents.len() != depth - 1 {
        // Orphaned after a block boundary; the parser decides what this means.
        return None;
    }
    parents.push((line.indent, line.number));

    let &(indent, number) = parents.get(depth.checked_sub(2)?)?;
    (line.indent <= indent).then(|| {
        Diagnostic::warning(
            line.span.start..line.span.start + depth,
            format!("depth {depth} choice is not indented past its parent"),
        )
        .with_label(format!("nests under the choice on line {number}"))
    })
}

/// Byte offset and name of a choice's `-> target`, skipping `{...}` blocks.
fn transition(raw: &str) -> Option<(usize, &str)> {
    let mut depth = 0usize;
    for (i, c) in raw.char_indices() {
        match c {
            '{' => depth += 1,
            '}' => depth = depth.saturating_sub(1),
            '-' if depth == 0 && raw[i..].starts_with("->") => {
                let after = &raw[i + 2..];
                let start = i + 2 + (after.len() - after.trim_start().len());
                let word = &raw[start..];
                let len = word
                    .find(|c: char| c.is_whitespace() || c == '{' || c == '}')
                    .unwrap_or(word.len());
                if len == 0 {
                    return None;
                }
                return Some((start, &word[..len]));
            }
            _ => {}
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diagnostics::Severity;
    use crate::parser::parse;

    fn warnings(source: &str) -> Vec<Diagnostic> {
        let script = parse(source).unwrap();
        lint(source, &script)
    }

    #[test]
    fn clean_source_has_no_warnings() {
        let source = "@scene gate\n\
                      * Ask {add_journal:gate}\n\
                      \x20   ** Why? -> market\n\
                      @scene market\n\
                      * Leave -> gate\n";
        assert!(warnings(source).is_empty());
    }

    #[test]
    fn undeclared_target_points_at_the_name() {
        let source = "@scene gate\n* Go {set_var:x:a->b} -> vault // later\n";
        let diags = warnings(source);
        assert_eq!(diags.len(), 1);
        assert_eq!(diags[0].severity, Severity::Warning);
        assert_eq!(&source[diags[0].span.clone()], "vault");
        assert_eq!(diags[0].message, "scene `gate` transitions to undeclared scene `vault`");
    }

    #[test]
    fn targets_resolve_against_the_whole_script() {
        let source = "@scene gate\n* Go -> vault\n";
        let mut script = parse(source).unwrap();
        script.merge(parse("@scene vault\n").unwrap()).unwrap();
        assert!(lint(source, &script).is_empty());
    }

    #[test]
    fn flat_nested_choice_warns() {
        let source = "@scene a\n\
                      \x20 * Ask\n\
                      \x20 ** Who?\n\
                      \x20   *** Me\n";
        let diags = warnings(source);
        assert_eq!(diags.len(), 1);
        assert_eq!(&source[diags[0].span.clone()], "**");
        assert_eq!(diags[0].label.as_deref(), Some("nests under the choice on line 2"));
    }

    #[test]
    fn tabs_count_toward_nesting() {
        let source = "@scene a\n    * Ask\n\t** Who?\n";
        assert_eq!(warnings(source).len(), 1);
        let source = "@scene a\n* Ask\n\t** Who?\n";
        assert!(warnings(source).is_empty());
    }

    #[test]
    fn directives_restart_nesting() {
        let source = "@scene a\n\
                      * Ask\n\
                      @if has_item:key\n\
                      * Unlock\n\
                      \x20   ** Carefully\n\
                      @endif\n";
        assert!(warnings(source).is_empty());
    }
}
