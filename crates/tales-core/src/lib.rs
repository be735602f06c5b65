//! Core types for TALES: the script document model and the game-state store.
//!
//! This crate defines what the DSL parses into and what the runtime walks. It
//! does no parsing itself: a [`Script`] can be built programmatically, and a
//! [`StateStore`] can be seeded or serialized by the host independently of any
//! interpreter.

/// Conditions that guard choices and conditional blocks.
pub mod condition;
/// Effects applied to the state store when a choice is selected.
pub mod effect;
/// Error types used throughout the crate.
pub mod error;
/// Scenes, nodes, and the script that owns them.
pub mod script;
/// The mutable game-state store.
pub mod state;
/// Literal values and comparison operators.
pub mod value;

/// Re-export condition and effect types.
pub use condition::Condition;
pub use effect::Effect;
/// Re-export error types.
pub use error::{ScriptError, ScriptResult};
/// Re-export document model types.
pub use script::{Choice, ConditionalBlock, DialogueLine, Node, Scene, Script};
/// Re-export the state store.
pub use state::StateStore;
/// Re-export value types.
pub use value::{Comparison, Value};
