use std::ops::Range;

use tales_core::{Choice, Condition, ConditionalBlock, DialogueLine, Effect, Node, Scene, Script};

use crate::error::{ParseError, ParseErrorKind};
use crate::expr::{self, Expr, ExprError};
use crate::lexer::{self, LogicalLine};

/// An error located relative to the start of a line's text.
type Located = (ParseErrorKind, Range<usize>);

/// Whether `name` can be used as a scene name or transition target.
pub fn is_scene_name(name: &str) -> bool {
    !name.is_empty()
        && name
            .chars()
            .all(|c| c.is_alphanumeric() || matches!(c, '_' | '-' | '.'))
}

/// Parse TALES source text into a [`Script`].
///
/// Fails on the first structural or expression error. Transition targets are
/// not resolved here.
pub fn parse(source: &str) -> Result<Script, ParseError> {
    let mut builder = Builder::new(source);
    for line in lexer::lex(source) {
        builder.line(&line)?;
    }
    builder.finish()
}

struct OpenScene {
    name: String,
    nodes: Vec<Node>,
    line: usize,
    span: Range<usize>,
}

struct OpenBlock {
    condition: Condition,
    then_body: Vec<Node>,
    else_body: Option<Vec<Node>>,
    line: usize,
    span: Range<usize>,
}

struct Builder<'s> {
    source: &'s str,
    script: Script,
    scene: Option<OpenScene>,
    blocks: Vec<OpenBlock>,
}

fn error(line: &LogicalLine, kind: ParseErrorKind) -> ParseError {
    ParseError::new(line.number, line.span.clone(), kind)
}

impl<'s> Builder<'s> {
    fn new(source: &'s str) -> Self {
        Self {
            source,
            script: Script::new(),
            scene: None,
            blocks: Vec::new(),
        }
    }

    /// Map a range within a line's text back onto the source.
    fn error_at(&self, line: &LogicalLine, (kind, range): Located) -> ParseError {
        let clamp = |offset: usize| {
            let mut pos = (line.span.start + offset).min(line.span.end);
            while !self.source.is_char_boundary(pos) {
                pos -= 1;
            }
            pos
        };
        ParseError::new(line.number, clamp(range.start)..clamp(range.end), kind)
    }

    /// The node list currently being filled.
    fn body(&mut self) -> Option<&mut Vec<Node>> {
        if let Some(block) = self.blocks.last_mut() {
            return Some(match &mut block.else_body {
                Some(body) => body,
                None => &mut block.then_body,
            });
        }
        self.scene.as_mut().map(|scene| &mut scene.nodes)
    }

    fn push(&mut self, line: &LogicalLine, node: Node) -> Result<(), ParseError> {
        match self.body() {
            Some(body) => {
                body.push(node);
                Ok(())
            }
            None => Err(error(line, ParseErrorKind::ContentOutsideScene)),
        }
    }

    fn line(&mut self, line: &LogicalLine) -> Result<(), ParseError> {
        let text = line.text.as_str();
        if let Some(rest) = text.strip_prefix('@') {
            return self.directive(line, rest);
        }
        if self.scene.is_none() {
            return Err(error(line, ParseErrorKind::ContentOutsideScene));
        }
        if let Some(rest) = text.strip_prefix('>') {
            let dialogue = dialogue(rest).map_err(|kind| error(line, kind))?;
            self.push(line, Node::Dialogue(dialogue))
        } else if text.starts_with('*') {
            let choice = choice(text).map_err(|located| self.error_at(line, located))?;
            self.attach(line, choice)
        } else {
            Err(error(line, ParseErrorKind::UnrecognizedLine))
        }
    }

    fn directive(&mut self, line: &LogicalLine, rest: &str) -> Result<(), ParseError> {
        let name_len = rest
            .find(|c: char| !(c.is_alphanumeric() || c == '_'))
            .unwrap_or(rest.len());
        let (name, args) = rest.split_at(name_len);
        let args = args.trim();
        let args_at = line.text.len() - args.len();
        let unexpected = |builder: &Self| {
            builder.error_at(
                line,
                (
                    ParseErrorKind::UnexpectedText(args.to_string()),
                    args_at..line.text.len(),
                ),
            )
        };

        match name {
            "scene" => self.open_scene(line, args),
            "if" | "else" | "endif" if self.scene.is_none() => {
                Err(error(line, ParseErrorKind::ContentOutsideScene))
            }
            "if" => {
                let condition = if_condition(args).map_err(|(kind, range)| {
                    self.error_at(line, (kind, args_at + range.start..args_at + range.end))
                })?;
                log::trace!("line {}: open @if {condition}", line.number);
                self.blocks.push(OpenBlock {
                    condition,
                    then_body: Vec::new(),
                    else_body: None,
                    line: line.number,
                    span: line.span.clone(),
                });
                Ok(())
            }
            "else" => {
                if !args.is_empty() {
                    return Err(unexpected(self));
                }
                let Some(block) = self.blocks.last_mut() else {
                    return Err(error(line, ParseErrorKind::ElseWithoutIf));
                };
                if block.else_body.is_some() {
                    return Err(error(line, ParseErrorKind::DuplicateElse));
                }
                block.else_body = Some(Vec::new());
                Ok(())
            }
            "endif" => {
                if !args.is_empty() {
                    return Err(unexpected(self));
                }
                let Some(block) = self.blocks.pop() else {
                    return Err(error(line, ParseErrorKind::EndifWithoutIf));
                };
                let node = Node::Conditional(ConditionalBlock {
                    condition: block.condition,
                    then_body: block.then_body,
                    else_body: block.else_body,
                });
                self.push(line, node)
            }
            _ => Err(self.error_at(
                line,
                (
                    ParseErrorKind::UnknownDirective(name.to_string()),
                    0..name_len + 1,
                ),
            )),
        }
    }

    fn open_scene(&mut self, line: &LogicalLine, name: &str) -> Result<(), ParseError> {
        if name.is_empty() {
            return Err(error(line, ParseErrorKind::MissingSceneName));
        }
        if !is_scene_name(name) {
            return Err(error(line, ParseErrorKind::InvalidSceneName(name.to_string())));
        }
        self.close_scene()?;
        if self.script.contains(name) {
            return Err(error(line, ParseErrorKind::DuplicateScene(name.to_string())));
        }
        log::trace!("line {}: scene {name}", line.number);
        self.scene = Some(OpenScene {
            name: name.to_string(),
            nodes: Vec::new(),
            line: line.number,
            span: line.span.clone(),
        });
        Ok(())
    }

    fn close_scene(&mut self) -> Result<(), ParseError> {
        if let Some(block) = self.blocks.last() {
            return Err(ParseError::new(
                block.line,
                block.span.clone(),
                ParseErrorKind::UnclosedConditional {
                    opened_at: block.line,
                },
            ));
        }
        if let Some(open) = self.scene.take() {
            let scene = Scene {
                name: open.name,
                nodes: open.nodes,
            };
            self.script.insert(scene).map_err(|e| match e {
                tales_core::ScriptError::DuplicateScene(name) => ParseError::new(
                    open.line,
                    open.span,
                    ParseErrorKind::DuplicateScene(name),
                ),
            })?;
        }
        Ok(())
    }

    /// Attach a choice under the last choice one level up, along the most
    /// recent path through the current body.
    fn attach(&mut self, line: &LogicalLine, choice: Choice) -> Result<(), ParseError> {
        let depth = choice.depth;
        let Some(mut list) = self.body() else {
            return Err(error(line, ParseErrorKind::ContentOutsideScene));
        };
        for _ in 1..depth {
            let parent = list.iter_mut().rev().find_map(|node| match node {
                Node::Choice(parent) => Some(parent),
                _ => None,
            });
            list = match parent {
                Some(parent) => &mut parent.children,
                None => return Err(error(line, ParseErrorKind::OrphanChoice { depth })),
            };
        }
        list.push(Node::Choice(choice));
        Ok(())
    }

    fn finish(mut self) -> Result<Script, ParseError> {
        self.close_scene()?;
        log::debug!("parsed {} scenes", self.script.len());
        Ok(self.script)
    }
}

/// `\\` and `\:` stand for the second character; other backslashes are literal.
fn unescape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut chars = text.chars().peekable();
    while let Some(c) = chars.next() {
        match (c, chars.peek()) {
            ('\\', Some(&next @ ('\\' | ':'))) => {
                out.push(next);
                chars.next();
            }
            _ => out.push(c),
        }
    }
    out
}

/// Position of the first `:` that is not escaped.
fn unescaped_colon(text: &str) -> Option<usize> {
    let mut chars = text.char_indices();
    while let Some((i, c)) = chars.next() {
        match c {
            ':' => return Some(i),
            '\\' => {
                chars.next();
            }
            _ => {}
        }
    }
    None
}

fn dialogue(rest: &str) -> Result<DialogueLine, ParseErrorKind> {
    let rest = rest.trim();
    let (speaker, text) = match unescaped_colon(rest) {
        Some(i) => (&rest[..i], &rest[i + 1..]),
        None => ("", rest),
    };
    let text = unescape(text.trim());
    if text.is_empty() {
        return Err(ParseErrorKind::EmptyDialogue);
    }
    Ok(DialogueLine::new(unescape(speaker.trim()), text))
}

/// The condition of an `@if`, written bare or wrapped in braces.
fn if_condition(args: &str) -> Result<Condition, Located> {
    if args.is_empty() {
        return Err((ParseErrorKind::MissingCondition, 0..0));
    }
    let (inner, offset) = match args.strip_prefix('{') {
        Some(inner) => match inner.strip_suffix('}') {
            Some(inner) => (inner, 1),
            None => return Err((ParseErrorKind::UnterminatedBlock, 0..args.len())),
        },
        None => (args, 0),
    };
    if let Some(i) = inner.find(['{', '}']) {
        return Err((ParseErrorKind::UnexpectedBrace, offset + i..offset + i + 1));
    }
    match expr::parse_condition(inner) {
        Ok(Some(condition)) => Ok(condition),
        Ok(None) => Err((ParseErrorKind::MissingCondition, 0..args.len())),
        Err(ExprError { kind, span }) => Err((kind, offset + span.start..offset + span.end)),
    }
}

/// Parse a choice line: `*`s, text, then any mix of `{...}` blocks and one
/// `-> target`.
fn choice(text: &str) -> Result<Choice, Located> {
    let depth = text.len() - text.trim_start_matches('*').len();
    let body = &text[depth..];
    let text_end = [body.find('{'), body.find('}'), body.find("->")]
        .into_iter()
        .flatten()
        .min()
        .unwrap_or(body.len());
    let label = body[..text_end].trim();
    if label.is_empty() {
        return Err((ParseErrorKind::EmptyChoiceText, 0..text.len()));
    }

    let mut blocks: Vec<(&str, usize)> = Vec::new();
    let mut transition: Option<String> = None;
    let mut pos = depth + text_end;
    loop {
        let rest = &text[pos..];
        let trimmed = rest.trim_start();
        pos += rest.len() - trimmed.len();
        if trimmed.is_empty() {
            break;
        }

        if let Some(inner) = trimmed.strip_prefix('{') {
            match inner.find(['{', '}']) {
                Some(i) if inner[i..].starts_with('}') => {
                    blocks.push((&inner[..i], pos + 1));
                    pos += i + 2;
                }
                _ => return Err((ParseErrorKind::UnterminatedBlock, pos..text.len())),
            }
        } else if let Some(after) = trimmed.strip_prefix("->") {
            if transition.is_some() {
                return Err((ParseErrorKind::MultipleTransitions, pos..pos + 2));
            }
            let start = pos + 2 + (after.len() - after.trim_start().len());
            let word = &text[start..];
            let len = word
                .find(|c: char| c.is_whitespace() || c == '{' || c == '}')
                .unwrap_or(word.len());
            let target = &word[..len];
            if target.is_empty() {
                return Err((ParseErrorKind::MissingTransitionTarget, pos..pos + 2));
            }
            if !is_scene_name(target) {
                return Err((
                    ParseErrorKind::InvalidSceneName(target.to_string()),
                    start..start + len,
                ));
            }
            transition = Some(target.to_string());
            pos = start + len;
        } else if trimmed.starts_with('}') {
            return Err((ParseErrorKind::UnexpectedBrace, pos..pos + 1));
        } else {
            let stray = trimmed.split_whitespace().next().unwrap_or(trimmed);
            return Err((
                ParseErrorKind::UnexpectedText(stray.to_string()),
                pos..pos + stray.len(),
            ));
        }
    }

    // The first block is the guard unless its kind makes it an effect.
    let mut condition = None;
    let mut effects: Vec<Effect> = Vec::new();
    for (index, (content, at)) in blocks.into_iter().enumerate() {
        let locate = |e: ExprError| (e.kind, at + e.span.start..at + e.span.end);
        if index == 0 {
            match expr::parse_block(content).map_err(locate)? {
                None => {}
                Some(Expr::Condition(c)) => condition = Some(c),
                Some(Expr::Effect(e)) => effects.push(e),
            }
        } else if let Some(effect) = expr::parse_effect(content).map_err(locate)? {
            effects.push(effect);
        }
    }

    Ok(Choice {
        text: label.to_string(),
        depth,
        condition,
        effects,
        transition,
        children: Vec::new(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use tales_core::{Comparison, Value};

    fn scene<'a>(script: &'a Script, name: &str) -> &'a [Node] {
        &script.scene(name).unwrap().nodes
    }

    fn as_choice(node: &Node) -> &Choice {
        match node {
            Node::Choice(c) => c,
            other => panic!("expected choice, got {other:?}"),
        }
    }

    fn as_block(node: &Node) -> &ConditionalBlock {
        match node {
            Node::Conditional(b) => b,
            other => panic!("expected conditional, got {other:?}"),
        }
    }

    fn parse_err(source: &str) -> ParseError {
        parse(source).unwrap_err()
    }

    #[test]
    fn parse_dialogue_and_narration() {
        let script = parse(
            "@scene village_entrance\n\
             > The gate creaks open.\n\
             > Guard: Halt! Who goes there?\n\
             > Elder\\: the wise: Welcome.\n",
        )
        .unwrap();
        let nodes = scene(&script, "village_entrance");
        assert_eq!(
            nodes,
            [
                Node::Dialogue(DialogueLine::narration("The gate creaks open.")),
                Node::Dialogue(DialogueLine::new("Guard", "Halt! Who goes there?")),
                Node::Dialogue(DialogueLine::new("Elder: the wise", "Welcome.")),
            ]
        );
    }

    #[test]
    fn doubled_backslashes_in_dialogue() {
        let script = parse(
            "@scene a\n\
             > Sir\\\\: Hello\n\
             > C\\:\\\\temp \\x\n",
        )
        .unwrap();
        assert_eq!(
            scene(&script, "a"),
            [
                Node::Dialogue(DialogueLine::new("Sir\\", "Hello")),
                Node::Dialogue(DialogueLine::narration("C:\\temp \\x")),
            ]
        );
    }

    #[test]
    fn parse_choice_with_condition_effects_and_transition() {
        let script = parse(
            "@scene shop\n\
             * Buy a torch (5 gold) {check_stat:gold:>=:5} {add_stat:gold:-5} {add_item:Torch:1} -> market\n",
        )
        .unwrap();
        let choice = as_choice(&scene(&script, "shop")[0]);
        assert_eq!(choice.text, "Buy a torch (5 gold)");
        assert_eq!(choice.depth, 1);
        assert_eq!(
            choice.condition,
            Some(Condition::CheckStat {
                key: "gold".into(),
                op: Comparison::Ge,
                value: 5,
            })
        );
        assert_eq!(
            choice.effects,
            [
                Effect::AddStat {
                    key: "gold".into(),
                    delta: -5,
                },
                Effect::AddItem {
                    key: "Torch".into(),
                    count: 1,
                },
            ]
        );
        assert_eq!(choice.transition.as_deref(), Some("market"));
    }

    #[test]
    fn irregular_block_spacing() {
        let script = parse(
            "@scene cave\n\
             *   Press on   {}{ add_stat:courage:-5 }   {  add_journal : dark_cave  }->deep_cave\n",
        )
        .unwrap();
        let choice = as_choice(&scene(&script, "cave")[0]);
        assert_eq!(choice.text, "Press on");
        assert_eq!(choice.condition, None);
        assert_eq!(choice.effects.len(), 2);
        assert_eq!(choice.effects[1].to_string(), "add_journal:dark_cave:1");
        assert_eq!(choice.transition.as_deref(), Some("deep_cave"));
    }

    #[test]
    fn first_block_with_effect_kind_is_an_effect() {
        let script = parse("@scene a\n* Rest {add_stat:hp:5}\n").unwrap();
        let choice = as_choice(&scene(&script, "a")[0]);
        assert_eq!(choice.condition, None);
        assert_eq!(choice.effects[0].to_string(), "add_stat:hp:5");
    }

    #[test]
    fn transition_before_blocks() {
        let script = parse("@scene a\n* Leave -> b {} {set_var:left:true}\n").unwrap();
        let choice = as_choice(&scene(&script, "a")[0]);
        assert_eq!(choice.transition.as_deref(), Some("b"));
        assert_eq!(choice.effects[0].to_string(), "set_var:left:true");
    }

    #[test]
    fn nested_choices_attach_to_last_parent() {
        let script = parse(
            "@scene tavern\n\
             * Ask about the map\n\
             ** The old one\n\
             *** Where is it?\n\
             ** The new one\n\
             * Leave -> street\n",
        )
        .unwrap();
        let nodes = scene(&script, "tavern");
        assert_eq!(nodes.len(), 2);
        let ask = as_choice(&nodes[0]);
        assert_eq!(ask.children.len(), 2);
        let old = as_choice(&ask.children[0]);
        assert_eq!(old.depth, 2);
        assert_eq!(as_choice(&old.children[0]).text, "Where is it?");
        assert_eq!(as_choice(&ask.children[1]).text, "The new one");
        assert!(as_choice(&nodes[1]).children.is_empty());
    }

    #[test]
    fn nested_choice_skips_intervening_dialogue() {
        let script = parse(
            "@scene a\n\
             * Ask\n\
             > Barkeep: About what?\n\
             ** The map\n",
        )
        .unwrap();
        let nodes = scene(&script, "a");
        assert_eq!(nodes.len(), 2);
        assert_eq!(as_choice(&nodes[0]).children.len(), 1);
    }

    #[test]
    fn conditionals_nest_with_else() {
        let script = parse(
            "@scene gate\n\
             @if check_var:seeking_treasure:==:true\n\
             > Guard: Treasure, eh?\n\
                 @if {has_item:Map}\n\
                 * Show the map\n\
                 @else\n\
                 > Guard: No map, no entry.\n\
                 @endif\n\
             @else\n\
             > Guard: Move along.\n\
             @endif\n\
             > The wind howls.\n",
        )
        .unwrap();
        let nodes = scene(&script, "gate");
        assert_eq!(nodes.len(), 2);
        let outer = as_block(&nodes[0]);
        assert_eq!(
            outer.condition,
            Condition::CheckVar {
                key: "seeking_treasure".into(),
                op: Comparison::Eq,
                value: Value::Bool(true),
            }
        );
        assert_eq!(outer.then_body.len(), 2);
        let inner = as_block(&outer.then_body[1]);
        assert_eq!(inner.then_body.len(), 1);
        assert_eq!(inner.else_body.as_ref().map(Vec::len), Some(1));
        assert_eq!(outer.else_body.as_ref().map(Vec::len), Some(1));
    }

    #[test]
    fn forward_references_and_scene_order() {
        let script = parse(
            "@scene start\n* Go -> later\n\n@scene later\n> Done.\n@scene empty\n",
        )
        .unwrap();
        assert_eq!(
            script.scene_names().collect::<Vec<_>>(),
            ["start", "later", "empty"]
        );
        assert!(script.scene("empty").unwrap().nodes.is_empty());
    }

    #[test]
    fn unresolved_target_is_not_a_parse_error() {
        let script = parse("@scene start\n* Go -> nowhere\n").unwrap();
        assert_eq!(script.unresolved_targets(), [("start", "nowhere")]);
    }

    #[test]
    fn comments_everywhere() {
        let script = parse(
            "// header\n@scene a // the first\n> Hi // greeting\n* Ok {add_stat:x:1} // note\n@if has_item:Torch // lit\n@endif // done\n",
        )
        .unwrap();
        assert_eq!(scene(&script, "a").len(), 3);
    }

    #[test]
    fn empty_source_is_empty_script() {
        assert!(parse("").unwrap().is_empty());
        assert!(parse("// nothing\n\n").unwrap().is_empty());
    }

    // -----------------------------------------------------------------------
    // Errors
    // -----------------------------------------------------------------------

    #[test]
    fn error_content_outside_scene() {
        let err = parse_err("> Hello\n@scene a\n");
        assert_eq!(err.line, 1);
        assert_eq!(err.kind, ParseErrorKind::ContentOutsideScene);
        assert_eq!(
            parse_err("@if has_item:x\n").kind,
            ParseErrorKind::ContentOutsideScene
        );
    }

    #[test]
    fn error_unknown_directive() {
        let source = "@scene a\n@goto b\n";
        let err = parse_err(source);
        assert_eq!(err.line, 2);
        assert_eq!(err.kind, ParseErrorKind::UnknownDirective("goto".into()));
        assert_eq!(&source[err.span], "@goto");
    }

    #[test]
    fn error_scene_names() {
        assert_eq!(parse_err("@scene\n").kind, ParseErrorKind::MissingSceneName);
        assert_eq!(
            parse_err("@scene two words\n").kind,
            ParseErrorKind::InvalidSceneName("two words".into())
        );
        let err = parse_err("@scene a\n> x\n@scene a\n");
        assert_eq!(err.line, 3);
        assert_eq!(err.kind, ParseErrorKind::DuplicateScene("a".into()));
    }

    #[test]
    fn error_unbalanced_blocks() {
        let err = parse_err("@scene a\n@else\n");
        assert_eq!((err.line, err.kind), (2, ParseErrorKind::ElseWithoutIf));

        let err = parse_err("@scene a\n@endif\n");
        assert_eq!((err.line, err.kind), (2, ParseErrorKind::EndifWithoutIf));

        let err = parse_err("@scene a\n@if has_item:x\n@else\n@else\n@endif\n");
        assert_eq!((err.line, err.kind), (4, ParseErrorKind::DuplicateElse));
    }

    #[test]
    fn error_unclosed_at_scene_end_and_eof() {
        let err = parse_err("@scene a\n@if has_item:x\n> hi\n@scene b\n");
        assert_eq!(err.line, 2);
        assert_eq!(err.kind, ParseErrorKind::UnclosedConditional { opened_at: 2 });

        let err = parse_err("@scene a\n@if has_item:x\n@if has_item:y\n@endif\n");
        assert_eq!(err.kind, ParseErrorKind::UnclosedConditional { opened_at: 2 });
    }

    #[test]
    fn error_trailing_text_after_else() {
        let err = parse_err("@scene a\n@if has_item:x\n@else has_item:y\n@endif\n");
        assert_eq!(err.kind, ParseErrorKind::UnexpectedText("has_item:y".into()));
    }

    #[test]
    fn error_if_conditions() {
        assert_eq!(
            parse_err("@scene a\n@if\n").kind,
            ParseErrorKind::MissingCondition
        );
        assert_eq!(
            parse_err("@scene a\n@if {}\n").kind,
            ParseErrorKind::MissingCondition
        );
        assert_eq!(
            parse_err("@scene a\n@if {has_item:x\n").kind,
            ParseErrorKind::UnterminatedBlock
        );
        assert_eq!(
            parse_err("@scene a\n@if set_var:x:true\n").kind,
            ParseErrorKind::UnknownConditionKind("set_var".into())
        );
    }

    #[test]
    fn error_malformed_choice_blocks() {
        let source = "@scene a\n* Buy {check_stat:gold:>=:5 {add_stat:gold:-5}\n";
        let err = parse_err(source);
        assert_eq!(err.line, 2);
        assert_eq!(err.kind, ParseErrorKind::UnterminatedBlock);

        assert_eq!(
            parse_err("@scene a\n* Buy {add_stat:gold:-5\n").kind,
            ParseErrorKind::UnterminatedBlock
        );
        assert_eq!(
            parse_err("@scene a\n* Buy } oops\n").kind,
            ParseErrorKind::UnexpectedBrace
        );
        assert_eq!(
            parse_err("@scene a\n* Buy {} stray\n").kind,
            ParseErrorKind::UnexpectedText("stray".into())
        );
    }

    #[test]
    fn error_expression_kinds() {
        assert_eq!(
            parse_err("@scene a\n* Go {check_luck:x:==:1}\n").kind,
            ParseErrorKind::UnknownConditionKind("check_luck".into())
        );
        assert_eq!(
            parse_err("@scene a\n* Go {} {teleport:x}\n").kind,
            ParseErrorKind::UnknownEffectKind("teleport".into())
        );
        assert_eq!(
            parse_err("@scene a\n* Go {} {has_item:x}\n").kind,
            ParseErrorKind::ConditionAsEffect("has_item".into())
        );
        let source = "@scene a\n* Go {add_stat:gold:many}\n";
        let err = parse_err(source);
        assert_eq!(err.kind, ParseErrorKind::ExpectedInteger("many".into()));
        assert_eq!(&source[err.span], "many");
    }

    #[test]
    fn error_transitions() {
        assert_eq!(
            parse_err("@scene a\n* Go -> b -> c\n").kind,
            ParseErrorKind::MultipleTransitions
        );
        assert_eq!(
            parse_err("@scene a\n* Go ->\n").kind,
            ParseErrorKind::MissingTransitionTarget
        );
    }

    #[test]
    fn error_orphan_choice() {
        let err = parse_err("@scene a\n** Too deep\n");
        assert_eq!((err.line, err.kind), (2, ParseErrorKind::OrphanChoice { depth: 2 }));

        let err = parse_err("@scene a\n* One\n*** Three\n");
        assert_eq!(err.kind, ParseErrorKind::OrphanChoice { depth: 3 });

        let err = parse_err("@scene a\n* One\n@if has_item:x\n** Two\n@endif\n");
        assert_eq!(err.kind, ParseErrorKind::OrphanChoice { depth: 2 });
    }

    #[test]
    fn error_empty_lines_of_content() {
        assert_eq!(
            parse_err("@scene a\n*   {add_stat:x:1}\n").kind,
            ParseErrorKind::EmptyChoiceText
        );
        assert_eq!(parse_err("@scene a\n>\n").kind, ParseErrorKind::EmptyDialogue);
        assert_eq!(
            parse_err("@scene a\n> Guard:\n").kind,
            ParseErrorKind::EmptyDialogue
        );
        assert_eq!(
            parse_err("@scene a\nplain text\n").kind,
            ParseErrorKind::UnrecognizedLine
        );
    }
}
