// Path: crates/index/src/tree/search.rs

//! Leftmost and rightmost constrained search below a prefix node.

use super::{first_match, ContentIndex, Match};
use crate::getter::ContentGetter;
use crate::node::TrieNode;
use crate::prescreen::{PreScreener, Screen};
use crate::LOG_TARGET;
use nrepo_types::Interest;
use std::fmt::Debug;
use std::sync::Arc;

impl<R> ContentIndex<R>
where
    R: Clone + Eq + Debug + Send + Sync,
{
    /// Finds the canonically smallest object at or below `prefix` that
    /// satisfies `interest`. `prefix` must be the node for `interest.name`.
    ///
    /// Descends depth-first in ascending child order and stops at the first
    /// match, so nothing to the right of the answer is ever resolved.
    pub fn left_search(
        &self,
        prefix: &TrieNode<R>,
        interest: &Interest,
        getter: &dyn ContentGetter<R>,
    ) -> Option<Match<R>> {
        let screener = PreScreener::new(interest);
        left_from(prefix, 0, &screener, interest, getter)
    }

    /// Finds the canonically largest object at or below `prefix` that
    /// satisfies `interest`. `prefix` must be the node for `interest.name`.
    ///
    /// Collects every candidate node in ascending order first, then tests
    /// them from the end.
    pub fn right_search(
        &self,
        prefix: &Arc<TrieNode<R>>,
        interest: &Interest,
        getter: &dyn ContentGetter<R>,
    ) -> Option<Match<R>> {
        let screener = PreScreener::new(interest);
        let mut candidates = Vec::new();
        subtree_nodes(prefix, 0, &screener, &mut candidates);
        tracing::trace!(
            target: LOG_TARGET,
            name = %interest.name,
            candidates = candidates.len(),
            "rightmost candidates collected"
        );
        candidates
            .iter()
            .rev()
            .find_map(|node| first_match(node.content().iter().rev(), interest, getter))
    }
}

fn left_from<R>(
    node: &TrieNode<R>,
    depth: usize,
    screener: &PreScreener<'_>,
    interest: &Interest,
    getter: &dyn ContentGetter<R>,
) -> Option<Match<R>>
where
    R: Clone + Eq + Debug + Send + Sync,
{
    match screener.screen(node.component(), depth) {
        Screen::RejectSubtree => return None,
        Screen::RejectNode => {}
        Screen::Accept => {
            if let Some(found) = first_match(node.content().iter(), interest, getter) {
                return Some(found);
            }
        }
    }
    if !screener.may_descend(depth) {
        return None;
    }
    // Once past the first suffix level every sibling is already beyond the
    // exclusion floor, so only the prefix node's children are clipped.
    let floor = if depth == 0 {
        screener.lower_bound()
    } else {
        None
    };
    for child in node.children_after(floor) {
        tracing::trace!(target: LOG_TARGET, depth = depth + 1, component = ?child.component(), "descending");
        if let Some(found) = left_from(&child, depth + 1, screener, interest, getter) {
            return Some(found);
        }
    }
    None
}

/// Pushes, in ascending order, every node at or below `node` that passes the
/// screener and holds content.
fn subtree_nodes<R>(
    node: &Arc<TrieNode<R>>,
    depth: usize,
    screener: &PreScreener<'_>,
    out: &mut Vec<Arc<TrieNode<R>>>,
) where
    R: Clone,
{
    match screener.screen(node.component(), depth) {
        Screen::RejectSubtree => return,
        Screen::RejectNode => {}
        Screen::Accept => {
            if node.has_content() {
                out.push(node.clone());
            }
        }
    }
    if !screener.may_descend(depth) {
        return;
    }
    let floor = if depth == 0 {
        screener.lower_bound()
    } else {
        None
    };
    for child in node.children_after(floor) {
        subtree_nodes(&child, depth + 1, screener, out);
    }
}
