//! Resumable traversal position.
//!
//! A cursor is a stack of frames. Each frame names a node list by its path
//! from the scene root plus the index of the next node to visit. Paths are
//! plain indices, so a cursor can be serialized and checked against a script
//! later.

use serde::{Deserialize, Serialize};
use tales_core::Node;

/// Which body of a node a path descends into.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Branch {
    /// A conditional's then-body.
    Then,
    /// A conditional's else-body.
    Else,
    /// A choice's nested choices.
    Children,
}

/// One step of a path: the node at `node`, then into `branch`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PathStep {
    /// Index of the node in its list.
    pub node: usize,
    /// Body to descend into.
    pub branch: Branch,
}

/// A node list being traversed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Frame {
    /// Path from the scene's top-level nodes to this list.
    pub path: Vec<PathStep>,
    /// Next node to visit.
    pub index: usize,
    /// Transition to take once this frame is exhausted. Set when a choice
    /// has both nested choices and a transition.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub then_goto: Option<String>,
}

impl Frame {
    /// The start of a scene.
    pub fn root() -> Self {
        Self {
            path: Vec::new(),
            index: 0,
            then_goto: None,
        }
    }

    /// A frame for a body of the node at `node` in this frame's list.
    pub fn enter(&self, node: usize, branch: Branch) -> Self {
        let mut path = self.path.clone();
        path.push(PathStep { node, branch });
        Self {
            path,
            index: 0,
            then_goto: None,
        }
    }
}

/// Follow `path` from a scene's top-level nodes.
///
/// Returns `None` when the path does not fit the nodes.
pub fn resolve<'a>(mut nodes: &'a [Node], path: &[PathStep]) -> Option<&'a [Node]> {
    for step in path {
        nodes = match (nodes.get(step.node)?, step.branch) {
            (Node::Conditional(block), Branch::Then) => &block.then_body,
            (Node::Conditional(block), Branch::Else) => block.else_body.as_deref()?,
            (Node::Choice(choice), Branch::Children) => &choice.children,
            _ => return None,
        };
    }
    Some(nodes)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tales_core::{Choice, Condition, ConditionalBlock, DialogueLine};

    fn nodes() -> Vec<Node> {
        vec![
            Node::Dialogue(DialogueLine::narration("Hello.")),
            Node::Conditional(ConditionalBlock {
                condition: Condition::HasItem {
                    key: "Torch".into(),
                    count: 1,
                },
                then_body: vec![Node::Choice(
                    Choice::new(1, "Enter").with_child(Choice::new(2, "Carefully")),
                )],
                else_body: None,
            }),
        ]
    }

    #[test]
    fn resolve_nested_paths() {
        let nodes = nodes();
        assert_eq!(resolve(&nodes, &[]).map(<[Node]>::len), Some(2));

        let root = Frame::root();
        let then = root.enter(1, Branch::Then);
        assert_eq!(resolve(&nodes, &then.path).map(<[Node]>::len), Some(1));

        let children = then.enter(0, Branch::Children);
        let list = resolve(&nodes, &children.path).unwrap();
        assert!(matches!(&list[0], Node::Choice(c) if c.text == "Carefully"));
    }

    #[test]
    fn resolve_rejects_mismatched_paths() {
        let nodes = nodes();
        let bad = [
            vec![PathStep {
                node: 0,
                branch: Branch::Then,
            }],
            vec![PathStep {
                node: 1,
                branch: Branch::Else,
            }],
            vec![PathStep {
                node: 9,
                branch: Branch::Then,
            }],
        ];
        for path in bad {
            assert!(resolve(&nodes, &path).is_none(), "{path:?}");
        }
    }
}
