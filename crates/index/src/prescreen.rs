// Path: crates/index/src/prescreen.rs

//! A cheap structural filter built once per Interest.
//!
//! Depth is measured from the node reached by the Interest's explicit name,
//! which sits at depth 0; a node at depth `d` therefore ends a name with `d`
//! suffix components. The screener never rejects a node the full Interest
//! predicate could accept, it only avoids asking.

use nrepo_types::{Component, Interest};

/// The verdict for one node.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Screen {
    /// Test this node's content and consider its children.
    Accept,
    /// Skip this node's content but consider its children.
    RejectNode,
    /// Skip this node and everything below it.
    RejectSubtree,
}

/// Suffix-window and first-component checks derived from an [`Interest`].
#[derive(Debug)]
pub struct PreScreener<'a> {
    interest: &'a Interest,
    min: usize,
    max: Option<usize>,
}

impl<'a> PreScreener<'a> {
    pub fn new(interest: &'a Interest) -> Self {
        debug_assert!(
            interest
                .exclude
                .as_ref()
                .map_or(true, |filter| filter.is_well_formed()),
            "exclude filter components out of order"
        );
        Self {
            interest,
            min: interest.min_suffix_components.unwrap_or(0),
            max: interest.max_suffix_components,
        }
    }

    /// Screens the node for `component` at `depth`. The component is ignored
    /// at depth 0.
    pub fn screen(&self, component: Option<&Component>, depth: usize) -> Screen {
        if self.max.is_some_and(|max| depth > max) {
            return Screen::RejectSubtree;
        }
        if depth == 1 {
            if let Some(component) = component {
                if self.interest.excludes(component) {
                    return Screen::RejectSubtree;
                }
            }
        }
        // At depth 0 an exclusion filter makes the implicit digest the first
        // suffix component, so content there counts one suffix.
        let effective = if depth == 0 && self.interest.exclude.is_some() {
            1
        } else {
            depth
        };
        if effective < self.min {
            return Screen::RejectNode;
        }
        Screen::Accept
    }

    /// True if children of a node at `depth` can still fall inside the window.
    pub fn may_descend(&self, depth: usize) -> bool {
        self.max.map_or(true, |max| depth < max)
    }

    /// Every first suffix component at or below this value is excluded.
    pub fn lower_bound(&self) -> Option<&'a Component> {
        self.interest.exclude.as_ref().and_then(|f| f.lower_bound())
    }
}
