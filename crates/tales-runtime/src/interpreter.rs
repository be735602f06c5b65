//! The pull-based interpreter.
//!
//! The host calls [`Interpreter::advance`] to get the next presentable unit
//! and [`Interpreter::select`] to answer a menu. Nothing runs between calls,
//! so a whole session can be driven synchronously from a test.

use std::collections::VecDeque;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tales_core::{Choice, DialogueLine, Node, Script, StateStore};

use crate::config::{RuntimeConfig, UnknownScenePolicy};
use crate::cursor::{Branch, Frame, resolve};
use crate::error::{RuntimeError, RuntimeResult};

/// The visible options of a choice point, in script order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChoiceMenu {
    /// Option texts; `select` takes an index into this list.
    pub options: Vec<String>,
}

impl ChoiceMenu {
    /// Number of options.
    pub fn len(&self) -> usize {
        self.options.len()
    }

    /// Whether the menu has no options. Menus handed to the host never are.
    pub fn is_empty(&self) -> bool {
        self.options.is_empty()
    }
}

/// What [`Interpreter::advance`] produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Step {
    /// A line to present.
    Dialogue(DialogueLine),
    /// A choice point; answer it with [`Interpreter::select`].
    Menu(ChoiceMenu),
    /// The named scene has no more nodes and no transition is pending.
    SceneExhausted(String),
}

/// Where the interpreter is in its cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// Entered a scene and has not advanced yet.
    AtSceneStart,
    /// Walking nodes; the last step was dialogue or a selection.
    Traversing,
    /// A menu is pending.
    AwaitingChoice,
    /// The current scene has run out.
    SceneExhausted,
}

/// A menu waiting for a selection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PendingMenu {
    /// Node indices of the visible choices in the top frame's list.
    pub nodes: Vec<usize>,
    /// Index just past the run of sibling choices.
    pub resume: usize,
    /// What the host was shown.
    pub menu: ChoiceMenu,
}

/// Everything needed to continue a session later.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionSnapshot {
    /// Current scene.
    pub scene: String,
    /// Cursor frames, outermost first.
    pub frames: Vec<Frame>,
    /// Menu awaiting a selection, if any.
    pub pending: Option<PendingMenu>,
    /// Game state.
    pub state: StateStore,
    /// Selections made so far.
    pub turn: u64,
}

/// Walks a [`Script`] against a [`StateStore`].
#[derive(Debug, Clone)]
pub struct Interpreter {
    script: Arc<Script>,
    config: RuntimeConfig,
    state: StateStore,
    scene: String,
    frames: Vec<Frame>,
    pending: Option<PendingMenu>,
    phase: Phase,
    turn: u64,
    history: VecDeque<SessionSnapshot>,
}

impl Interpreter {
    /// Start at `scene` with the default configuration.
    pub fn start(
        script: impl Into<Arc<Script>>,
        scene: &str,
        state: StateStore,
    ) -> RuntimeResult<Self> {
        Self::start_with_config(script, scene, state, RuntimeConfig::default())
    }

    /// Start at `scene`. Fails with `UnknownScene` if the script lacks it.
    pub fn start_with_config(
        script: impl Into<Arc<Script>>,
        scene: &str,
        state: StateStore,
        config: RuntimeConfig,
    ) -> RuntimeResult<Self> {
        let script = script.into();
        if !script.contains(scene) {
            return Err(RuntimeError::UnknownScene(scene.to_string()));
        }
        log::debug!("start at scene {scene}");
        Ok(Self {
            script,
            config,
            state,
            scene: scene.to_string(),
            frames: vec![Frame::root()],
            pending: None,
            phase: Phase::AtSceneStart,
            turn: 0,
            history: VecDeque::new(),
        })
    }

    /// Continue a session from a snapshot.
    ///
    /// Every frame is checked against the script, so a snapshot taken
    /// against a different version of the script is rejected rather than
    /// walked blindly.
    pub fn resume(
        script: impl Into<Arc<Script>>,
        snapshot: SessionSnapshot,
        config: RuntimeConfig,
    ) -> RuntimeResult<Self> {
        let script = script.into();
        validate(&script, &snapshot)?;
        let phase = if snapshot.pending.is_some() {
            Phase::AwaitingChoice
        } else if snapshot.frames.is_empty() {
            Phase::SceneExhausted
        } else {
            Phase::Traversing
        };
        log::debug!("resume at scene {} (turn {})", snapshot.scene, snapshot.turn);
        Ok(Self {
            script,
            config,
            state: snapshot.state,
            scene: snapshot.scene,
            frames: snapshot.frames,
            pending: snapshot.pending,
            phase,
            turn: snapshot.turn,
            history: VecDeque::new(),
        })
    }

    /// The script being walked.
    pub fn script(&self) -> &Arc<Script> {
        &self.script
    }

    /// The session configuration.
    pub fn config(&self) -> &RuntimeConfig {
        &self.config
    }

    /// The game state.
    pub fn state(&self) -> &StateStore {
        &self.state
    }

    /// Mutable access to the game state, e.g. for seeding.
    ///
    /// A menu already pending is not recomputed.
    pub fn state_mut(&mut self) -> &mut StateStore {
        &mut self.state
    }

    /// Name of the current scene.
    pub fn scene(&self) -> &str {
        &self.scene
    }

    /// Current phase.
    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// The pending menu, if a selection is awaited.
    pub fn menu(&self) -> Option<&ChoiceMenu> {
        self.pending.as_ref().map(|p| &p.menu)
    }

    /// Number of selections made so far.
    pub fn turn(&self) -> u64 {
        self.turn
    }

    /// Number of selections that can currently be undone.
    pub fn undo_depth(&self) -> usize {
        self.history.len()
    }

    /// Produce the next presentable unit.
    ///
    /// While a menu is pending this returns the same menu again; after the
    /// scene is exhausted it keeps returning `SceneExhausted`.
    pub fn advance(&mut self) -> Step {
        if let Some(pending) = &self.pending {
            return Step::Menu(pending.menu.clone());
        }

        let script = Arc::clone(&self.script);
        loop {
            let root = script
                .scene(&self.scene)
                .map_or(&[][..], |scene| scene.nodes.as_slice());
            let Some(frame) = self.frames.last_mut() else {
                log::debug!("scene {} exhausted", self.scene);
                self.phase = Phase::SceneExhausted;
                return Step::SceneExhausted(self.scene.clone());
            };
            let nodes = resolve(root, &frame.path).unwrap_or(&[]);
            let index = frame.index;

            match nodes.get(index) {
                None => {
                    let then_goto = frame.then_goto.take();
                    self.frames.pop();
                    if let Some(target) = then_goto {
                        self.enter_scene(target);
                    }
                }
                Some(Node::Dialogue(line)) => {
                    frame.index += 1;
                    self.phase = Phase::Traversing;
                    return Step::Dialogue(line.clone());
                }
                Some(Node::Conditional(block)) => {
                    frame.index += 1;
                    let branch = if block.condition.evaluate(&self.state) {
                        Some(Branch::Then)
                    } else if block.else_body.is_some() {
                        Some(Branch::Else)
                    } else {
                        None
                    };
                    log::trace!("@if {} -> {branch:?}", block.condition);
                    if let Some(branch) = branch {
                        let body = frame.enter(index, branch);
                        self.frames.push(body);
                    }
                }
                Some(Node::Choice(_)) => {
                    let end = index
                        + nodes[index..]
                            .iter()
                            .take_while(|node| matches!(node, Node::Choice(_)))
                            .count();
                    let visible: Vec<(usize, &Choice)> = nodes[index..end]
                        .iter()
                        .enumerate()
                        .filter_map(|(offset, node)| match node {
                            Node::Choice(choice) if choice.is_visible(&self.state) => {
                                Some((index + offset, choice))
                            }
                            _ => None,
                        })
                        .collect();

                    if visible.is_empty() {
                        log::debug!("no visible choices in {index}..{end}, skipping");
                        frame.index = end;
                        continue;
                    }

                    let menu = ChoiceMenu {
                        options: visible.iter().map(|(_, c)| c.text.clone()).collect(),
                    };
                    log::debug!("menu with {} of {} options", menu.len(), end - index);
                    self.pending = Some(PendingMenu {
                        nodes: visible.iter().map(|(i, _)| *i).collect(),
                        resume: end,
                        menu: menu.clone(),
                    });
                    self.phase = Phase::AwaitingChoice;
                    return Step::Menu(menu);
                }
            }
        }
    }

    /// Answer the pending menu.
    ///
    /// The transition target is checked before anything is applied, so a
    /// failed selection leaves state and menu untouched. On success the
    /// choice's effects run in order; then its nested choices are entered,
    /// or its transition is taken, or traversal continues after the menu.
    /// A choice with both nested choices and a transition takes the
    /// transition once the nested choices are done.
    pub fn select(&mut self, index: usize) -> RuntimeResult<()> {
        let Some(pending) = &self.pending else {
            return Err(RuntimeError::NotAwaitingChoice);
        };
        let Some(&node_index) = pending.nodes.get(index) else {
            return Err(RuntimeError::InvalidChoiceIndex {
                index,
                len: pending.nodes.len(),
            });
        };
        let resume = pending.resume;

        let script = Arc::clone(&self.script);
        let choice = match self.current_nodes(&script).and_then(|n| n.get(node_index)) {
            Some(Node::Choice(choice)) => choice,
            _ => {
                return Err(RuntimeError::InvalidSnapshot(format!(
                    "pending menu entry {node_index} is not a choice"
                )));
            }
        };

        let transition = match &choice.transition {
            Some(target) if script.contains(target) => Some(target.clone()),
            Some(target) => match self.config.unknown_scene {
                UnknownScenePolicy::Error => {
                    log::error!("choice \"{}\" leads to unknown scene {target}", choice.text);
                    return Err(RuntimeError::UnknownScene(target.clone()));
                }
                UnknownScenePolicy::Remain => {
                    log::warn!(
                        "choice \"{}\" leads to unknown scene {target}; staying in {}",
                        choice.text,
                        self.scene
                    );
                    None
                }
            },
            None => None,
        };

        self.record_history();
        log::debug!("turn {}: selected \"{}\"", self.turn + 1, choice.text);
        for effect in &choice.effects {
            effect.apply(&mut self.state);
        }
        self.turn += 1;
        self.pending = None;
        self.phase = Phase::Traversing;

        let nested = self.frames.last_mut().map(|frame| {
            frame.index = resume;
            frame.enter(node_index, Branch::Children)
        });
        match (nested, transition) {
            (Some(mut nested), then_goto) if !choice.children.is_empty() => {
                nested.then_goto = then_goto;
                self.frames.push(nested);
            }
            (_, Some(target)) => self.enter_scene(target),
            _ => {}
        }
        Ok(())
    }

    /// Revert the most recent selection, restoring the state and the menu it
    /// answered. Returns `false` if there is nothing to undo.
    pub fn undo(&mut self) -> bool {
        let Some(snapshot) = self.history.pop_back() else {
            return false;
        };
        log::debug!("undo to turn {} in scene {}", snapshot.turn, snapshot.scene);
        self.restore(snapshot);
        true
    }

    /// Capture the resumable state of the session.
    pub fn snapshot(&self) -> SessionSnapshot {
        SessionSnapshot {
            scene: self.scene.clone(),
            frames: self.frames.clone(),
            pending: self.pending.clone(),
            state: self.state.clone(),
            turn: self.turn,
        }
    }

    fn restore(&mut self, snapshot: SessionSnapshot) {
        self.phase = if snapshot.pending.is_some() {
            Phase::AwaitingChoice
        } else {
            Phase::Traversing
        };
        self.scene = snapshot.scene;
        self.frames = snapshot.frames;
        self.pending = snapshot.pending;
        self.state = snapshot.state;
        self.turn = snapshot.turn;
    }

    fn record_history(&mut self) {
        if self.config.history_limit == 0 {
            return;
        }
        self.history.push_back(self.snapshot());
        while self.history.len() > self.config.history_limit {
            self.history.pop_front();
        }
    }

    fn enter_scene(&mut self, scene: String) {
        log::debug!("transition {} -> {scene}", self.scene);
        self.scene = scene;
        self.frames = vec![Frame::root()];
        self.pending = None;
        self.phase = Phase::AtSceneStart;
    }

    fn current_nodes<'a>(&self, script: &'a Script) -> Option<&'a [Node]> {
        let scene = script.scene(&self.scene)?;
        resolve(&scene.nodes, &self.frames.last()?.path)
    }
}

fn invalid(message: impl Into<String>) -> RuntimeError {
    RuntimeError::InvalidSnapshot(message.into())
}

fn validate(script: &Script, snapshot: &SessionSnapshot) -> RuntimeResult<()> {
    let scene = script
        .scene(&snapshot.scene)
        .ok_or_else(|| RuntimeError::UnknownScene(snapshot.scene.clone()))?;

    for frame in &snapshot.frames {
        let nodes = resolve(&scene.nodes, &frame.path)
            .ok_or_else(|| invalid(format!("path {:?} not found in {}", frame.path, scene.name)))?;
        if frame.index > nodes.len() {
            return Err(invalid(format!(
                "frame index {} past the end of a {}-node list",
                frame.index,
                nodes.len()
            )));
        }
        if let Some(target) = &frame.then_goto {
            if !script.contains(target) {
                return Err(RuntimeError::UnknownScene(target.clone()));
            }
        }
    }

    if let Some(pending) = &snapshot.pending {
        let nodes = snapshot
            .frames
            .last()
            .and_then(|frame| resolve(&scene.nodes, &frame.path))
            .ok_or_else(|| invalid("pending menu without a frame"))?;
        if pending.nodes.is_empty() || pending.nodes.len() != pending.menu.len() {
            return Err(invalid("pending menu does not match its options"));
        }
        if pending.resume > nodes.len() {
            return Err(invalid("pending menu resumes past the end of its list"));
        }
        for &i in &pending.nodes {
            if !matches!(nodes.get(i), Some(Node::Choice(_))) {
                return Err(invalid(format!("pending menu entry {i} is not a choice")));
            }
        }
    }
    Ok(())
}
