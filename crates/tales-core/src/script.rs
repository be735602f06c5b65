use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::condition::Condition;
use crate::effect::Effect;
use crate::error::{ScriptError, ScriptResult};
use crate::state::StateStore;

/// A line of narration or character speech.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DialogueLine {
    /// Speaker label; empty for narration.
    pub speaker: String,
    /// The spoken or narrated text.
    pub text: String,
}

impl DialogueLine {
    /// A line spoken by `speaker`.
    pub fn new(speaker: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            speaker: speaker.into(),
            text: text.into(),
        }
    }

    /// A narration line with no speaker.
    pub fn narration(text: impl Into<String>) -> Self {
        Self::new("", text)
    }

    /// Whether this line has no speaker.
    pub fn is_narration(&self) -> bool {
        self.speaker.is_empty()
    }
}

/// A player-selectable option.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Choice {
    /// Text shown in the menu.
    pub text: String,
    /// Nesting depth (number of leading `*`), at least 1.
    pub depth: usize,
    /// Guard; `None` means always visible.
    pub condition: Option<Condition>,
    /// Effects applied in order on selection.
    pub effects: Vec<Effect>,
    /// Scene to jump to after selection.
    pub transition: Option<String>,
    /// Choices one level deeper, reachable only after this one is selected.
    pub children: Vec<Node>,
}

impl Choice {
    /// Create a choice with no guard, effects, transition, or children.
    pub fn new(depth: usize, text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            depth,
            condition: None,
            effects: Vec::new(),
            transition: None,
            children: Vec::new(),
        }
    }

    /// Set the guard condition.
    pub fn with_condition(mut self, condition: Condition) -> Self {
        self.condition = Some(condition);
        self
    }

    /// Append an effect.
    pub fn with_effect(mut self, effect: Effect) -> Self {
        self.effects.push(effect);
        self
    }

    /// Set the transition target.
    pub fn with_transition(mut self, scene: impl Into<String>) -> Self {
        self.transition = Some(scene.into());
        self
    }

    /// Append a nested choice.
    pub fn with_child(mut self, child: Choice) -> Self {
        self.children.push(Node::Choice(child));
        self
    }

    /// Whether the choice belongs in a menu for the given state.
    pub fn is_visible(&self, state: &StateStore) -> bool {
        self.condition.as_ref().is_none_or(|c| c.evaluate(state))
    }
}

/// A branch on a condition, with an optional else body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConditionalBlock {
    /// The tested condition.
    pub condition: Condition,
    /// Nodes traversed when the condition holds.
    pub then_body: Vec<Node>,
    /// Nodes traversed otherwise, if an `@else` was given.
    pub else_body: Option<Vec<Node>>,
}

/// One element of a scene's or block's body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Node {
    /// A dialogue or narration line.
    Dialogue(DialogueLine),
    /// A choice offered to the player.
    Choice(Choice),
    /// A conditional block.
    Conditional(ConditionalBlock),
}

/// A named, ordered sequence of nodes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Scene {
    /// Scene identifier.
    pub name: String,
    /// Top-level nodes in source order.
    pub nodes: Vec<Node>,
}

impl Scene {
    /// Create an empty scene.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            nodes: Vec::new(),
        }
    }

    /// Total number of choices in the scene, at any depth.
    pub fn choice_count(&self) -> usize {
        fn count(nodes: &[Node]) -> usize {
            nodes
                .iter()
                .map(|node| match node {
                    Node::Dialogue(_) => 0,
                    Node::Choice(c) => 1 + count(&c.children),
                    Node::Conditional(b) => {
                        count(&b.then_body) + b.else_body.as_deref().map_or(0, count)
                    }
                })
                .sum()
        }
        count(&self.nodes)
    }

    /// Total number of dialogue lines in the scene, at any depth.
    pub fn dialogue_count(&self) -> usize {
        fn count(nodes: &[Node]) -> usize {
            nodes
                .iter()
                .map(|node| match node {
                    Node::Dialogue(_) => 1,
                    Node::Choice(c) => count(&c.children),
                    Node::Conditional(b) => {
                        count(&b.then_body) + b.else_body.as_deref().map_or(0, count)
                    }
                })
                .sum()
        }
        count(&self.nodes)
    }

    /// Transition targets named anywhere in the scene, in source order.
    pub fn transition_targets(&self) -> Vec<&str> {
        fn collect<'a>(nodes: &'a [Node], out: &mut Vec<&'a str>) {
            for node in nodes {
                match node {
                    Node::Dialogue(_) => {}
                    Node::Choice(c) => {
                        if let Some(target) = &c.transition {
                            out.push(target);
                        }
                        collect(&c.children, out);
                    }
                    Node::Conditional(b) => {
                        collect(&b.then_body, out);
                        if let Some(body) = &b.else_body {
                            collect(body, out);
                        }
                    }
                }
            }
        }
        let mut out = Vec::new();
        collect(&self.nodes, &mut out);
        out
    }
}

/// An ordered collection of uniquely named scenes.
///
/// Transition targets are not checked against the declared scenes; a script
/// may be split across files or only partly written.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Script {
    scenes: Vec<Scene>,
}

impl Script {
    /// Create an empty script.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a scene, rejecting duplicate names.
    pub fn insert(&mut self, scene: Scene) -> ScriptResult<()> {
        if self.contains(&scene.name) {
            return Err(ScriptError::DuplicateScene(scene.name));
        }
        self.scenes.push(scene);
        Ok(())
    }

    /// Append every scene of `other`, rejecting duplicate names.
    ///
    /// On error no scene from `other` has been added.
    pub fn merge(&mut self, other: Script) -> ScriptResult<()> {
        if let Some(dup) = other.scenes.iter().find(|s| self.contains(&s.name)) {
            return Err(ScriptError::DuplicateScene(dup.name.clone()));
        }
        self.scenes.extend(other.scenes);
        Ok(())
    }

    /// Look up a scene by name.
    pub fn scene(&self, name: &str) -> Option<&Scene> {
        self.scenes.iter().find(|s| s.name == name)
    }

    /// Whether a scene with this name exists.
    pub fn contains(&self, name: &str) -> bool {
        self.scene(name).is_some()
    }

    /// Scenes in declaration order.
    pub fn scenes(&self) -> &[Scene] {
        &self.scenes
    }

    /// Scene names in declaration order.
    pub fn scene_names(&self) -> impl Iterator<Item = &str> {
        self.scenes.iter().map(|s| s.name.as_str())
    }

    /// Number of scenes.
    pub fn len(&self) -> usize {
        self.scenes.len()
    }

    /// Whether the script has no scenes.
    pub fn is_empty(&self) -> bool {
        self.scenes.is_empty()
    }

    /// Every distinct transition target in the script.
    pub fn transition_targets(&self) -> BTreeSet<&str> {
        self.scenes
            .iter()
            .flat_map(|s| s.transition_targets())
            .collect()
    }

    /// `(scene, target)` pairs whose target names no declared scene.
    pub fn unresolved_targets(&self) -> Vec<(&str, &str)> {
        let mut out = Vec::new();
        for scene in &self.scenes {
            for target in scene.transition_targets() {
                if !self.contains(target) && !out.contains(&(scene.name.as_str(), target)) {
                    out.push((scene.name.as_str(), target));
                }
            }
        }
        out
    }
}
