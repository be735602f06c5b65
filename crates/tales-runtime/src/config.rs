//! Configuration for an interpreter session.

use serde::{Deserialize, Serialize};

/// What `select` does when a choice transitions to a scene that does not exist.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum UnknownScenePolicy {
    /// Reject the selection with `UnknownScene`; nothing is applied and the
    /// menu stays pending.
    #[default]
    Error,
    /// Apply the choice as if it had no transition and keep traversing the
    /// current scene.
    Remain,
}

/// Configuration for an interpreter session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RuntimeConfig {
    /// Handling of transitions to undeclared scenes.
    pub unknown_scene: UnknownScenePolicy,
    /// Number of selections that can be undone. Zero disables undo.
    pub history_limit: usize,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            unknown_scene: UnknownScenePolicy::Error,
            history_limit: 32,
        }
    }
}

impl RuntimeConfig {
    /// Set the unknown-scene policy.
    pub fn with_unknown_scene(mut self, policy: UnknownScenePolicy) -> Self {
        self.unknown_scene = policy;
        self
    }

    /// Set how many selections can be undone.
    pub fn with_history_limit(mut self, limit: usize) -> Self {
        self.history_limit = limit;
        self
    }
}
