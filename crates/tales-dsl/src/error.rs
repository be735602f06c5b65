//! Parse and load errors.

use std::ops::Range;
use std::path::PathBuf;

use thiserror::Error;

/// A fatal parse error tied to a source line.
///
/// Parsing stops at the first error; no partial script is returned.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("line {line}: {kind}")]
pub struct ParseError {
    /// 1-based line number.
    pub line: usize,
    /// Byte range in the source that the error points at.
    pub span: Range<usize>,
    /// What went wrong.
    pub kind: ParseErrorKind,
}

impl ParseError {
    /// Create a parse error.
    pub fn new(line: usize, span: Range<usize>, kind: ParseErrorKind) -> Self {
        Self { line, span, kind }
    }
}

/// The kinds of parse failure.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseErrorKind {
    /// Content appeared before the first `@scene`.
    #[error("content outside of a scene; start one with `@scene <name>`")]
    ContentOutsideScene,

    /// `@scene` without a name.
    #[error("`@scene` requires a name")]
    MissingSceneName,

    /// Scene name with whitespace in it.
    #[error("invalid scene name `{0}`; scene names are single words")]
    InvalidSceneName(String),

    /// A scene with the same name was already declared.
    #[error("scene `{0}` is already defined")]
    DuplicateScene(String),

    /// `@` followed by an unrecognized keyword.
    #[error("unknown directive `@{0}`")]
    UnknownDirective(String),

    /// A line that is not a directive, dialogue, or choice.
    #[error("unrecognized line; expected `@directive`, `>` dialogue, or `*` choice")]
    UnrecognizedLine,

    /// Text left over where nothing more was expected.
    #[error("unexpected text `{0}`")]
    UnexpectedText(String),

    /// `@else` with no open `@if`.
    #[error("`@else` without a matching `@if`")]
    ElseWithoutIf,

    /// `@endif` with no open `@if`.
    #[error("`@endif` without a matching `@if`")]
    EndifWithoutIf,

    /// A second `@else` for the same `@if`.
    #[error("duplicate `@else` for the same `@if`")]
    DuplicateElse,

    /// A scene or file ended with an `@if` still open.
    #[error("`@if` opened on line {opened_at} is never closed with `@endif`")]
    UnclosedConditional {
        /// Line of the unclosed `@if`.
        opened_at: usize,
    },

    /// `@if` without a condition.
    #[error("`@if` requires a condition")]
    MissingCondition,

    /// A `{` block that is not closed on the same line.
    #[error("unterminated `{{` block")]
    UnterminatedBlock,

    /// A `}` with no open block.
    #[error("unexpected `}}`")]
    UnexpectedBrace,

    /// A choice marker with no text after it.
    #[error("choice has no text")]
    EmptyChoiceText,

    /// More than one `->` on a choice.
    #[error("choice has more than one transition")]
    MultipleTransitions,

    /// `->` with no scene name after it.
    #[error("`->` requires a target scene")]
    MissingTransitionTarget,

    /// A nested choice with no parent one level up.
    #[error("choice at depth {depth} has no parent choice at depth {}", .depth - 1)]
    OrphanChoice {
        /// Depth of the orphaned choice.
        depth: usize,
    },

    /// A `>` line with no text.
    #[error("dialogue line has no text")]
    EmptyDialogue,

    /// An unrecognized condition kind.
    #[error("unknown condition kind `{0}`")]
    UnknownConditionKind(String),

    /// An unrecognized effect kind.
    #[error("unknown effect kind `{0}`")]
    UnknownEffectKind(String),

    /// A condition written where only effects are allowed.
    #[error("`{0}` is a condition and cannot be used as an effect")]
    ConditionAsEffect(String),

    /// A block whose segments do not fit its kind.
    #[error("malformed expression: {0}")]
    MalformedExpression(String),

    /// A stat, item, or journal value that is not an integer.
    #[error("expected an integer, found `{0}`")]
    ExpectedInteger(String),
}

/// Errors from loading scripts off disk.
#[derive(Debug, Error)]
pub enum LoadError {
    /// A file or directory could not be read.
    #[error("cannot read {}: {source}", .path.display())]
    Io {
        /// Path that failed.
        path: PathBuf,
        /// Underlying I/O error.
        source: std::io::Error,
    },

    /// A file failed to parse.
    #[error("{}: {error}", .path.display())]
    Parse {
        /// File that failed.
        path: PathBuf,
        /// The file's contents, for rendering diagnostics.
        text: String,
        /// The parse error.
        error: ParseError,
    },

    /// Two files declare the same scene.
    #[error("{}: scene `{name}` is already defined in another file", .path.display())]
    DuplicateScene {
        /// File with the second declaration.
        path: PathBuf,
        /// Scene name.
        name: String,
    },
}
