//! Canonical TALES writer.
//!
//! Output re-parses to an equal [`Script`]. Comments and original spacing are
//! not preserved.

use tales_core::{Choice, ConditionalBlock, DialogueLine, Node, Script};

const INDENT: &str = "    ";

/// Render a script as canonical TALES text.
pub fn write_script(script: &Script) -> String {
    let mut out = String::new();
    for (i, scene) in script.scenes().iter().enumerate() {
        if i > 0 {
            out.push('\n');
        }
        out.push_str(&format!("@scene {}\n", scene.name));
        write_nodes(&mut out, &scene.nodes, 0);
    }
    out
}

fn write_nodes(out: &mut String, nodes: &[Node], level: usize) {
    for node in nodes {
        match node {
            Node::Dialogue(line) => write_dialogue(out, line, level),
            Node::Choice(choice) => write_choice(out, choice, level),
            Node::Conditional(block) => write_conditional(out, block, level),
        }
    }
}

fn indent(out: &mut String, level: usize) {
    for _ in 0..level {
        out.push_str(INDENT);
    }
}

/// Escape text so it survives comment stripping and speaker splitting.
/// Backslashes go first so the escapes added after them stay unambiguous.
fn escape(text: &str) -> String {
    text.replace('\\', "\\\\")
        .replace("//", "\\//")
        .replace(':', "\\:")
}

fn write_dialogue(out: &mut String, line: &DialogueLine, level: usize) {
    indent(out, level);
    out.push_str("> ");
    if !line.is_narration() {
        out.push_str(&escape(&line.speaker));
        out.push_str(": ");
    }
    out.push_str(&escape(&line.text));
    out.push('\n');
}

fn write_choice(out: &mut String, choice: &Choice, level: usize) {
    indent(out, level + choice.depth.saturating_sub(1));
    out.push_str(&"*".repeat(choice.depth));
    out.push(' ');
    out.push_str(&choice.text.replace("//", "\\//"));
    match &choice.condition {
        Some(condition) => out.push_str(&format!(" {{{condition}}}")),
        // An empty guard keeps the first effect out of the condition slot.
        None if !choice.effects.is_empty() => out.push_str(" {}"),
        None => {}
    }
    for effect in &choice.effects {
        out.push_str(&format!(" {{{effect}}}"));
    }
    if let Some(target) = &choice.transition {
        out.push_str(&format!(" -> {target}"));
    }
    out.push('\n');
    write_nodes(out, &choice.children, level);
}

fn write_conditional(out: &mut String, block: &ConditionalBlock, level: usize) {
    indent(out, level);
    // Braced, so `//` inside a value is not read as a comment.
    out.push_str(&format!("@if {{{}}}\n", block.condition));
    write_nodes(out, &block.then_body, level + 1);
    if let Some(else_body) = &block.else_body {
        indent(out, level);
        out.push_str("@else\n");
        write_nodes(out, else_body, level + 1);
    }
    indent(out, level);
    out.push_str("@endif\n");
}
