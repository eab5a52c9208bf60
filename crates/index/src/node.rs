// Path: crates/index/src/node.rs

//! Trie node definitions.

use nrepo_types::{Component, Timestamp};
use parking_lot::{Mutex, MutexGuard};
use std::collections::BTreeMap;
use std::fmt::Debug;
use std::sync::Arc;

/// One node per distinct component value at a given depth.
///
/// The component is fixed at construction; everything else lives behind the
/// node's own lock.
pub struct TrieNode<R> {
    /// `None` only for the root.
    component: Option<Component>,
    state: Mutex<NodeState<R>>,
}

/// The mutable part of a node, guarded by the node lock.
pub(crate) struct NodeState<R> {
    /// Children keyed and ordered by component bytes.
    pub(crate) children: BTreeMap<Component, Arc<TrieNode<R>>>,
    /// References to objects whose explicit name ends exactly here, in insertion order.
    pub(crate) content: Vec<R>,
    /// Time of the last child addition.
    pub(crate) last_modified: Timestamp,
    /// Set when an enumeration request found nothing new and is waiting.
    pub(crate) pending_enumeration: bool,
}

impl<R> Default for NodeState<R> {
    fn default() -> Self {
        Self {
            children: BTreeMap::new(),
            content: Vec::new(),
            last_modified: Timestamp::EPOCH,
            pending_enumeration: false,
        }
    }
}

impl<R: Debug> Debug for TrieNode<R> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let state = self.state.lock();
        f.debug_struct("TrieNode")
            .field("component", &self.component)
            .field("children", &state.children.len())
            .field("content", &state.content)
            .field("last_modified", &state.last_modified)
            .field("pending_enumeration", &state.pending_enumeration)
            .finish()
    }
}

impl<R: Clone> TrieNode<R> {
    pub(crate) fn root() -> Self {
        Self {
            component: None,
            state: Mutex::new(NodeState::default()),
        }
    }

    pub(crate) fn child(component: Component) -> Self {
        debug_assert!(!component.is_empty(), "non-root node with empty component");
        Self {
            component: Some(component),
            state: Mutex::new(NodeState::default()),
        }
    }

    pub(crate) fn lock(&self) -> MutexGuard<'_, NodeState<R>> {
        self.state.lock()
    }

    /// The component this node represents; `None` for the root.
    pub fn component(&self) -> Option<&Component> {
        self.component.as_ref()
    }

    /// When a child was last added under this node.
    pub fn last_modified(&self) -> Timestamp {
        self.lock().last_modified
    }

    /// True if an enumeration request is parked on this node.
    pub fn is_pending_enumeration(&self) -> bool {
        self.lock().pending_enumeration
    }

    /// True if at least one object is stored exactly at this node.
    pub fn has_content(&self) -> bool {
        !self.lock().content.is_empty()
    }

    /// A snapshot of the content references stored exactly here.
    pub fn content(&self) -> Vec<R> {
        self.lock().content.clone()
    }

    /// A snapshot of the child components in ascending order.
    pub fn child_components(&self) -> Vec<Component> {
        self.lock().children.keys().cloned().collect()
    }

    /// Looks up a direct child.
    pub fn get_child(&self, component: &Component) -> Option<Arc<TrieNode<R>>> {
        self.lock().children.get(component).cloned()
    }

    /// Children strictly greater than `floor`, in ascending order. The lock is
    /// released before returning, so callers may descend without holding it.
    pub(crate) fn children_after(&self, floor: Option<&Component>) -> Vec<Arc<TrieNode<R>>> {
        let state = self.lock();
        match floor {
            Some(bound) => state
                .children
                .range::<Component, _>((
                    std::ops::Bound::Excluded(bound),
                    std::ops::Bound::Unbounded,
                ))
                .map(|(_, child)| child.clone())
                .collect(),
            None => state.children.values().cloned().collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn c(text: &str) -> Component {
        Component::try_from(text).unwrap()
    }

    #[test]
    fn children_are_ordered_and_floor_is_exclusive() {
        let node: TrieNode<u32> = TrieNode::root();
        {
            let mut state = node.lock();
            for name in ["c", "a", "b"] {
                state
                    .children
                    .insert(c(name), Arc::new(TrieNode::child(c(name))));
            }
        }
        assert_eq!(node.child_components(), vec![c("a"), c("b"), c("c")]);
        let after: Vec<_> = node
            .children_after(Some(&c("a")))
            .iter()
            .map(|n| n.component().cloned().unwrap())
            .collect();
        assert_eq!(after, vec![c("b"), c("c")]);
        assert_eq!(node.children_after(None).len(), 3);
        assert!(node.get_child(&c("b")).is_some());
        assert!(node.get_child(&c("z")).is_none());
        assert!(node.component().is_none());
        assert!(!node.has_content());
    }
}
