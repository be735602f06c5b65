//! Runtime for TALES scripts.
//!
//! An [`Interpreter`] owns one session: a shared, read-only [`Script`], a
//! [`StateStore`] and a cursor. The host pulls [`Step`]s and answers menus.
//!
//! ```
//! use tales_core::{Choice, DialogueLine, Node, Scene, Script, StateStore};
//! use tales_runtime::{Interpreter, Step};
//!
//! let mut scene = Scene::new("gate");
//! scene.nodes.push(Node::Dialogue(DialogueLine::new("Guard", "Halt!")));
//! scene.nodes.push(Node::Choice(Choice::new(1, "Wave")));
//! let mut script = Script::new();
//! script.insert(scene).unwrap();
//!
//! let mut session = Interpreter::start(script, "gate", StateStore::new()).unwrap();
//! assert!(matches!(session.advance(), Step::Dialogue(_)));
//! assert!(matches!(session.advance(), Step::Menu(_)));
//! session.select(0).unwrap();
//! assert_eq!(session.advance(), Step::SceneExhausted("gate".into()));
//! ```
//!
//! [`Script`]: tales_core::Script
//! [`StateStore`]: tales_core::StateStore

/// Session configuration.
pub mod config;
/// Serializable traversal position.
pub mod cursor;
/// Runtime error types.
pub mod error;
/// The interpreter.
pub mod interpreter;

pub use config::{RuntimeConfig, UnknownScenePolicy};
pub use error::{RuntimeError, RuntimeResult};
pub use interpreter::{ChoiceMenu, Interpreter, PendingMenu, Phase, SessionSnapshot, Step};
