use std::ops::Range;

use logos::Logos;

/// A non-blank source line with its comment removed.
///
/// The lexer knows nothing about directives, dialogue, or choices; it only
/// decides where comments start and which lines carry content. Structural
/// recognition happens in the parser.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogicalLine {
    /// 1-based line number in the source.
    pub number: usize,
    /// Byte range of the trimmed content in the source.
    pub span: Range<usize>,
    /// Width of the leading whitespace, tabs counting as four.
    pub indent: usize,
    /// Trimmed content with comments stripped and `\//` unescaped.
    pub text: String,
}

/// Internal logos token. Anything that is not a brace, slash, backslash, or
/// newline is swallowed into `Text`, so lexing cannot fail.
#[derive(Logos, Debug, Clone, Copy, PartialEq)]
enum RawToken {
    #[token("{")]
    LBrace,

    #[token("}")]
    RBrace,

    #[token("//")]
    Comment,

    #[token("\\//")]
    EscapedComment,

    #[token("\n")]
    Newline,

    #[regex(r"[^{}/\\\n]+")]
    Text,

    #[token("/")]
    Slash,

    #[token("\\")]
    Backslash,
}

/// Accumulates one physical line.
struct LineBuilder {
    start: usize,
    text: String,
    depth: usize,
    comment_at: Option<usize>,
}

impl LineBuilder {
    fn new(start: usize) -> Self {
        Self {
            start,
            text: String::new(),
            depth: 0,
            comment_at: None,
        }
    }

    fn finish(self, source: &str, end: usize, number: usize, out: &mut Vec<LogicalLine>) {
        let text = self.text.trim();
        if text.is_empty() {
            return;
        }
        let raw = &source[self.start..self.comment_at.unwrap_or(end)];
        let leading = raw.len() - raw.trim_start().len();
        let indent = raw[..leading]
            .chars()
            .map(|c| if c == '\t' { 4 } else { 1 })
            .sum();
        out.push(LogicalLine {
            number,
            span: self.start + leading..self.start + raw.trim_end().len(),
            indent,
            text: text.to_string(),
        });
    }
}

/// Split source text into logical lines.
///
/// A comment starts at the first `//` outside a `{...}` block and runs to the
/// end of the line. Inside an open `{` the sequence is literal text. `\//`
/// always stands for a literal `//`. Blank and comment-only lines are dropped.
pub fn lex(source: &str) -> Vec<LogicalLine> {
    let mut lines = Vec::new();
    let mut line = LineBuilder::new(0);
    let mut number = 1;
    let mut lexer = RawToken::lexer(source);

    while let Some(result) = lexer.next() {
        let span = lexer.span();
        let Ok(token) = result else {
            line.text.push_str(lexer.slice());
            continue;
        };

        if line.comment_at.is_some() && token != RawToken::Newline {
            continue;
        }

        match token {
            RawToken::Newline => {
                line.finish(source, span.start, number, &mut lines);
                number += 1;
                line = LineBuilder::new(span.end);
            }
            RawToken::Comment if line.depth == 0 => line.comment_at = Some(span.start),
            RawToken::Comment | RawToken::EscapedComment => line.text.push_str("//"),
            RawToken::LBrace => {
                line.depth += 1;
                line.text.push('{');
            }
            RawToken::RBrace => {
                line.depth = line.depth.saturating_sub(1);
                line.text.push('}');
            }
            RawToken::Text | RawToken::Slash | RawToken::Backslash => {
                line.text.push_str(lexer.slice());
            }
        }
    }
    line.finish(source, source.len(), number, &mut lines);

    log::trace!("lexed {} logical lines", lines.len());
    lines
}

#[cfg(test)]
mod tests {
    use super::*;

    fn texts(source: &str) -> Vec<String> {
        lex(source).into_iter().map(|l| l.text).collect()
    }

    #[test]
    fn drops_blank_and_comment_lines() {
        let lines = lex("@scene start\n\n   // a note\n> Hi there // trailing\n\t\n");
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0].number, 1);
        assert_eq!(lines[0].text, "@scene start");
        assert_eq!(lines[1].number, 4);
        assert_eq!(lines[1].text, "> Hi there");
    }

    #[test]
    fn comment_inside_block_is_literal() {
        assert_eq!(
            texts("* Read the sign {set_var:url:http//x} // note"),
            ["* Read the sign {set_var:url:http//x}"]
        );
    }

    #[test]
    fn unterminated_block_keeps_rest_of_line() {
        assert_eq!(
            texts("* Take {add_item:rope // oops\n> next"),
            ["* Take {add_item:rope // oops", "> next"]
        );
    }

    #[test]
    fn escaped_slashes_are_not_comments() {
        assert_eq!(texts(r"> See \// here // gone"), ["> See // here"]);
    }

    #[test]
    fn single_slash_and_backslash_pass_through() {
        assert_eq!(texts(r"> and/or \: kept"), [r"> and/or \: kept"]);
    }

    #[test]
    fn crlf_line_endings() {
        assert_eq!(texts("@scene a\r\n> x\r\n"), ["@scene a", "> x"]);
    }

    #[test]
    fn span_and_indent_point_at_content() {
        let source = "@scene a\n    @if has_item:Torch   // lit?\n";
        let lines = lex(source);
        let line = &lines[1];
        assert_eq!(line.indent, 4);
        assert_eq!(&source[line.span.clone()], "@if has_item:Torch");
    }

    #[test]
    fn tabs_count_as_four() {
        let lines = lex("\t\t* deep");
        assert_eq!(lines[0].indent, 8);
    }

    #[test]
    fn empty_source() {
        assert!(lex("").is_empty());
        assert!(lex("// only a comment").is_empty());
    }
}
