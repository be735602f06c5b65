use std::fmt;
use std::ops::Range;

use ariadne::{Color, Config, IndexType, Label, Report, ReportKind, Source};

use crate::error::{ParseError, ParseErrorKind};

/// Severity level for diagnostics.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    /// Stops the script from loading.
    Error,
    /// Reported, but the script is still usable.
    Warning,
}

/// A diagnostic message with source location.
#[derive(Debug, Clone)]
pub struct Diagnostic {
    /// How serious the problem is.
    pub severity: Severity,
    /// Byte range in the source.
    pub span: Range<usize>,
    /// Headline message.
    pub message: String,
    /// Text attached to the highlighted span; defaults to the message.
    pub label: Option<String>,
}

impl Diagnostic {
    /// An error diagnostic.
    pub fn error(span: Range<usize>, message: impl Into<String>) -> Self {
        Self {
            severity: Severity::Error,
            span,
            message: message.into(),
            label: None,
        }
    }

    /// A warning diagnostic.
    pub fn warning(span: Range<usize>, message: impl Into<String>) -> Self {
        Self {
            severity: Severity::Warning,
            span,
            message: message.into(),
            label: None,
        }
    }

    /// Attach a label to the highlighted span.
    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }
}

impl From<&ParseError> for Diagnostic {
    fn from(err: &ParseError) -> Self {
        let diag = Diagnostic::error(err.span.clone(), err.kind.to_string());
        match hint(&err.kind) {
            Some(hint) => diag.with_label(hint),
            None => diag,
        }
    }
}

fn hint(kind: &ParseErrorKind) -> Option<&'static str> {
    Some(match kind {
        ParseErrorKind::UnknownDirective(_) => "expected @scene, @if, @else, or @endif",
        ParseErrorKind::UnclosedConditional { .. } => "opened here",
        ParseErrorKind::UnterminatedBlock => "this `{` needs a matching `}` on the same line",
        ParseErrorKind::UnknownConditionKind(_) => {
            "expected check_var, check_stat, check_item, or has_item"
        }
        ParseErrorKind::UnknownEffectKind(_) => {
            "expected set_var, set_stat, add_stat, add_item, remove_item, add_journal, or start_encounter"
        }
        ParseErrorKind::OrphanChoice { .. } => "no choice one level up to nest under",
        ParseErrorKind::ContentOutsideScene => "add `@scene <name>` above this line",
        _ => return None,
    })
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let prefix = match self.severity {
            Severity::Error => "error",
            Severity::Warning => "warning",
        };
        write!(f, "{prefix}: {}", self.message)
    }
}

/// Render diagnostics using ariadne for terminal output.
pub fn render_diagnostics(source: &str, filename: &str, diagnostics: &[Diagnostic]) -> String {
    let mut output = Vec::new();

    for diag in diagnostics {
        let (kind, color) = match diag.severity {
            Severity::Error => (ReportKind::Error, Color::Red),
            Severity::Warning => (ReportKind::Warning, Color::Yellow),
        };

        let label_text = diag.label.as_deref().unwrap_or(&diag.message);
        Report::build(kind, (filename, diag.span.clone()))
            .with_config(Config::default().with_index_type(IndexType::Byte))
            .with_message(&diag.message)
            .with_label(
                Label::new((filename, diag.span.clone()))
                    .with_message(label_text)
                    .with_color(color),
            )
            .finish()
            .write((filename, Source::from(source)), &mut output)
            .ok();
    }

    String::from_utf8(output).unwrap_or_default()
}

/// Render a single parse error.
pub fn render_parse_error(source: &str, filename: &str, err: &ParseError) -> String {
    render_diagnostics(source, filename, &[Diagnostic::from(err)])
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::parse;

    #[test]
    fn diagnostic_display() {
        let d = Diagnostic::warning(0..5, "transition to undeclared scene `cave`");
        assert_eq!(d.to_string(), "warning: transition to undeclared scene `cave`");
    }

    #[test]
    fn parse_error_carries_hint() {
        let err = parse("@scene a\n@goto b\n").unwrap_err();
        let diag = Diagnostic::from(&err);
        assert_eq!(diag.severity, Severity::Error);
        assert_eq!(diag.message, "unknown directive `@goto`");
        assert!(diag.label.unwrap().contains("@endif"));
    }

    #[test]
    fn render_produces_output() {
        let source = "@scene a\n* Buy {check_stat:gold:>=:5\n";
        let err = parse(source).unwrap_err();
        let output = render_parse_error(source, "shop.tales", &err);
        assert!(output.contains("unterminated"));
        assert!(output.contains("shop.tales"));
    }
}
