//! Condition and effect expressions: the text inside `{...}` blocks.
//!
//! A block is split into `:`-separated segments (each trimmed), and the first
//! segment names the kind. Everything here is structural; nothing is
//! evaluated.

use std::ops::Range;

use chumsky::prelude::*;
use tales_core::value::parse_integer;
use tales_core::{Comparison, Condition, Effect, Value};

use crate::error::ParseErrorKind;

/// A parsed block: either a condition or an effect.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Expr {
    /// A condition kind (`check_var`, `has_item`, ...).
    Condition(Condition),
    /// An effect kind (`set_var`, `add_item`, ...).
    Effect(Effect),
}

/// An expression error with a byte range relative to the block content.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExprError {
    /// What went wrong.
    pub kind: ParseErrorKind,
    /// Byte range within the block content.
    pub span: Range<usize>,
}

impl ExprError {
    fn new(kind: ParseErrorKind, span: Range<usize>) -> Self {
        Self { kind, span }
    }

    fn malformed(span: Range<usize>, message: impl Into<String>) -> Self {
        Self::new(ParseErrorKind::MalformedExpression(message.into()), span)
    }
}

/// One trimmed `:`-separated piece of a block.
#[derive(Debug, Clone)]
struct Segment<'a> {
    text: &'a str,
    span: Range<usize>,
}

fn segments<'a>() -> impl Parser<'a, &'a str, Vec<Segment<'a>>, extra::Err<Rich<'a, char>>> {
    any()
        .filter(|c: &char| *c != ':')
        .repeated()
        .to_slice()
        .map_with(|raw: &'a str, e| {
            let span: SimpleSpan = e.span();
            let start = span.start + (raw.len() - raw.trim_start().len());
            let text = raw.trim();
            Segment {
                text,
                span: start..start + text.len(),
            }
        })
        .separated_by(just(':'))
        .at_least(1)
        .collect::<Vec<_>>()
        .then_ignore(end())
}

fn split(src: &str) -> Result<Vec<Segment<'_>>, ExprError> {
    segments().parse(src).into_result().map_err(|errors| {
        let span = errors
            .first()
            .map_or(0..src.len(), |e| e.span().into_range());
        ExprError::malformed(span, "cannot split expression")
    })
}

/// Parse a block whose kind decides whether it is a condition or an effect.
///
/// Returns `Ok(None)` for an empty block.
pub fn parse_block(src: &str) -> Result<Option<Expr>, ExprError> {
    let segments = split(src)?;
    let Some((head, args)) = head(&segments) else {
        return Ok(None);
    };
    if Condition::is_kind(head.text) {
        condition(src, head, args).map(|c| Some(Expr::Condition(c)))
    } else if Effect::is_kind(head.text) {
        effect(src, head, args).map(|e| Some(Expr::Effect(e)))
    } else {
        Err(unknown_kind(head, ParseErrorKind::UnknownConditionKind))
    }
}

/// Parse a block that must hold a condition. Returns `Ok(None)` when empty.
pub fn parse_condition(src: &str) -> Result<Option<Condition>, ExprError> {
    let segments = split(src)?;
    let Some((head, args)) = head(&segments) else {
        return Ok(None);
    };
    if !Condition::is_kind(head.text) {
        return Err(unknown_kind(head, ParseErrorKind::UnknownConditionKind));
    }
    condition(src, head, args).map(Some)
}

/// Parse a block that must hold an effect. Returns `Ok(None)` when empty.
pub fn parse_effect(src: &str) -> Result<Option<Effect>, ExprError> {
    let segments = split(src)?;
    let Some((head, args)) = head(&segments) else {
        return Ok(None);
    };
    if Condition::is_kind(head.text) {
        return Err(ExprError::new(
            ParseErrorKind::ConditionAsEffect(head.text.to_string()),
            head.span.clone(),
        ));
    }
    if !Effect::is_kind(head.text) {
        return Err(unknown_kind(head, ParseErrorKind::UnknownEffectKind));
    }
    effect(src, head, args).map(Some)
}

/// Split off the kind segment; `None` for a block that is entirely blank.
fn head<'s, 'a>(segments: &'s [Segment<'a>]) -> Option<(&'s Segment<'a>, &'s [Segment<'a>])> {
    match segments {
        [only] if only.text.is_empty() => None,
        _ => segments.split_first(),
    }
}

fn unknown_kind(head: &Segment<'_>, kind: fn(String) -> ParseErrorKind) -> ExprError {
    if head.text.is_empty() {
        ExprError::malformed(head.span.clone(), "missing kind before `:`")
    } else {
        ExprError::new(kind(head.text.to_string()), head.span.clone())
    }
}

fn key<'s, 'a>(
    head: &Segment<'_>,
    args: &'s [Segment<'a>],
) -> Result<(String, &'s [Segment<'a>]), ExprError> {
    match args.split_first() {
        Some((key, rest)) if !key.text.is_empty() => Ok((key.text.to_string(), rest)),
        Some((key, _)) => Err(ExprError::malformed(key.span.clone(), "missing key")),
        None => Err(ExprError::malformed(
            head.span.clone(),
            format!("`{}` requires a key", head.text),
        )),
    }
}

fn integer(segment: &Segment<'_>) -> Result<i64, ExprError> {
    parse_integer(segment.text).ok_or_else(|| {
        ExprError::new(
            ParseErrorKind::ExpectedInteger(segment.text.to_string()),
            segment.span.clone(),
        )
    })
}

fn no_more(rest: &[Segment<'_>]) -> Result<(), ExprError> {
    match rest.first() {
        None => Ok(()),
        Some(extra) => Err(ExprError::malformed(
            extra.span.clone(),
            format!("unexpected segment `{}`", extra.text),
        )),
    }
}

/// An optional trailing count, defaulting to 1.
fn count(rest: &[Segment<'_>]) -> Result<i64, ExprError> {
    match rest.split_first() {
        None => Ok(1),
        Some((n, extra)) => {
            no_more(extra)?;
            integer(n)
        }
    }
}

/// A single integer argument.
fn single_integer(head: &Segment<'_>, rest: &[Segment<'_>]) -> Result<i64, ExprError> {
    match rest.split_first() {
        None => Err(ExprError::malformed(
            head.span.clone(),
            format!("`{}` requires a value", head.text),
        )),
        Some((n, extra)) => {
            no_more(extra)?;
            integer(n)
        }
    }
}

/// The remaining segments read back as one literal, so values may contain `:`.
fn literal(src: &str, head: &Segment<'_>, rest: &[Segment<'_>]) -> Result<Value, ExprError> {
    let (Some(first), Some(last)) = (rest.first(), rest.last()) else {
        return Err(ExprError::malformed(
            head.span.clone(),
            format!("`{}` requires a value", head.text),
        ));
    };
    let text = &src[first.span.start..last.span.end];
    if text.is_empty() {
        return Err(ExprError::malformed(first.span.clone(), "empty value"));
    }
    Ok(Value::infer(text))
}

fn condition(src: &str, head: &Segment<'_>, args: &[Segment<'_>]) -> Result<Condition, ExprError> {
    let (key, rest) = key(head, args)?;

    if head.text == "has_item" {
        return Ok(Condition::HasItem {
            key,
            count: count(rest)?,
        });
    }

    // `kind:key:value` compares with `==`; otherwise the first segment is the operator.
    let (op, value) = match rest {
        [] => {
            return Err(ExprError::malformed(
                head.span.clone(),
                format!("`{}` requires a value", head.text),
            ));
        }
        [_] => (Comparison::Eq, rest),
        [op, value @ ..] => match Comparison::parse(op.text) {
            Some(op) => (op, value),
            None => {
                return Err(ExprError::malformed(
                    op.span.clone(),
                    format!("unknown comparison operator `{}`", op.text),
                ));
            }
        },
    };

    Ok(match head.text {
        "check_var" => Condition::CheckVar {
            key,
            op,
            value: literal(src, head, value)?,
        },
        "check_stat" => Condition::CheckStat {
            key,
            op,
            value: single_integer(head, value)?,
        },
        _ => Condition::CheckItem {
            key,
            op,
            value: single_integer(head, value)?,
        },
    })
}

fn effect(src: &str, head: &Segment<'_>, args: &[Segment<'_>]) -> Result<Effect, ExprError> {
    let (key, rest) = key(head, args)?;
    Ok(match head.text {
        "set_var" => Effect::SetVar {
            key,
            value: literal(src, head, rest)?,
        },
        "set_stat" => Effect::SetStat {
            key,
            value: single_integer(head, rest)?,
        },
        "add_stat" => Effect::AddStat {
            key,
            delta: single_integer(head, rest)?,
        },
        "add_item" => Effect::AddItem {
            key,
            count: count(rest)?,
        },
        "remove_item" => Effect::RemoveItem {
            key,
            count: count(rest)?,
        },
        "add_journal" => Effect::AddJournal {
            key,
            count: count(rest)?,
        },
        _ => {
            no_more(rest)?;
            Effect::StartEncounter { key }
        }
    })
}
