// Path: crates/index/src/tree/mod.rs

//! The content index trie.

mod search;

use crate::enumeration::EnumerationResponse;
use crate::getter::ContentGetter;
use crate::node::TrieNode;
use crate::LOG_TARGET;
use nrepo_telemetry::index_metrics;
use nrepo_telemetry::time::SearchTimer;
use nrepo_types::config::IndexConfig;
use nrepo_types::{ChildSelector, ContentObject, Interest, Name, Timestamp};
use std::fmt::Debug;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

/// The result of [`ContentIndex::insert`].
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct InsertOutcome {
    /// False if an equal object was already stored under the same name.
    pub inserted: bool,
    /// A parked enumeration request on an ancestor that this insert answered.
    pub enumeration: Option<EnumerationResponse>,
}

/// A content reference together with the object it resolved to.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Match<R> {
    pub content_ref: R,
    pub object: Arc<ContentObject>,
}

/// A trie over name components mapping explicit names to content references.
///
/// `R` is opaque to the index. It is stored, compared, and handed back to the
/// [`ContentGetter`] supplied with each call; it is never interpreted.
pub struct ContentIndex<R> {
    root: Arc<TrieNode<R>>,
    default_selector: ChildSelector,
    objects: AtomicUsize,
    nodes: AtomicUsize,
}

impl<R> Debug for ContentIndex<R> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ContentIndex")
            .field("default_selector", &self.default_selector)
            .field("objects", &self.objects.load(Ordering::Relaxed))
            .field("nodes", &self.nodes.load(Ordering::Relaxed))
            .finish()
    }
}

impl<R> Default for ContentIndex<R>
where
    R: Clone + Eq + Debug + Send + Sync,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<R> ContentIndex<R>
where
    R: Clone + Eq + Debug + Send + Sync,
{
    /// Creates an empty index that treats unspecified child selectors as leftmost.
    pub fn new() -> Self {
        Self {
            root: Arc::new(TrieNode::root()),
            default_selector: ChildSelector::Leftmost,
            objects: AtomicUsize::new(0),
            // The root.
            nodes: AtomicUsize::new(1),
        }
    }

    /// Creates an empty index configured by `config`.
    pub fn with_config(config: &IndexConfig) -> Self {
        Self {
            default_selector: config.default_child_selector,
            ..Self::new()
        }
    }

    /// Number of content references stored.
    pub fn len(&self) -> usize {
        self.objects.load(Ordering::Relaxed)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Number of trie nodes, including the root.
    pub fn node_count(&self) -> usize {
        self.nodes.load(Ordering::Relaxed)
    }

    /// The root node.
    pub fn root(&self) -> &Arc<TrieNode<R>> {
        &self.root
    }

    /// Registers `object` under its explicit name.
    ///
    /// The path is extended as needed, one node lock at a time. Every
    /// reference already stored at the name is resolved through `getter` and
    /// compared with `object`; an equal one makes this a no-op.
    /// The getter is called with the terminal node locked and must not call
    /// back into the index.
    pub fn insert(
        &self,
        object: &ContentObject,
        content_ref: R,
        timestamp: Timestamp,
        getter: &dyn ContentGetter<R>,
    ) -> InsertOutcome {
        let name = &object.name;
        if name.is_empty() {
            tracing::debug!(target: LOG_TARGET, "refusing to store content at the root");
            return InsertOutcome::default();
        }

        let mut node = self.root.clone();
        let mut created = false;
        let mut enumeration = None;
        for (depth, component) in name.components().iter().enumerate() {
            let next = {
                let mut state = node.lock();
                match state.children.get(component) {
                    Some(child) => child.clone(),
                    None => {
                        let child = Arc::new(TrieNode::child(component.clone()));
                        state.children.insert(component.clone(), child.clone());
                        state.last_modified = timestamp;
                        self.nodes.fetch_add(1, Ordering::Relaxed);
                        if !created && state.pending_enumeration {
                            state.pending_enumeration = false;
                            enumeration =
                                Some(EnumerationResponse::from_state(name.truncate(depth), &state));
                        }
                        created = true;
                        child
                    }
                }
            };
            node = next;
        }

        if let Some(response) = &enumeration {
            index_metrics().inc_enumeration_answered();
            tracing::debug!(
                target: LOG_TARGET,
                prefix = %response.prefix,
                children = response.children.len(),
                "insert answered parked enumeration"
            );
        }

        let mut state = node.lock();
        // A node created by this call may already hold a racing insert's ref.
        if self.holds_equal(&state.content, object, getter) {
            drop(state);
            index_metrics().inc_duplicates();
            tracing::debug!(target: LOG_TARGET, %name, "duplicate insert suppressed");
            return InsertOutcome {
                inserted: false,
                enumeration,
            };
        }
        state.content.push(content_ref);
        drop(state);

        self.objects.fetch_add(1, Ordering::Relaxed);
        index_metrics().inc_inserts();
        tracing::debug!(target: LOG_TARGET, %name, new_path = created, "content indexed");
        InsertOutcome {
            inserted: true,
            enumeration,
        }
    }

    fn holds_equal(
        &self,
        content: &[R],
        object: &ContentObject,
        getter: &dyn ContentGetter<R>,
    ) -> bool {
        content.iter().any(|existing| match getter.get(existing) {
            Some(stored) => *stored == *object,
            None => {
                index_metrics().inc_stale_refs();
                tracing::warn!(
                    target: LOG_TARGET,
                    name = %object.name,
                    content_ref = ?existing,
                    "stale content reference during duplicate check"
                );
                false
            }
        })
    }

    /// Descends exactly `depth` components of `name`. Returns `None` as soon
    /// as a component is missing, or if `depth` exceeds the name's length.
    pub fn lookup_node(&self, name: &Name, depth: usize) -> Option<Arc<TrieNode<R>>> {
        assert!(
            self.root.component().is_none(),
            "content index root carries a component"
        );
        let components = name.components().get(..depth)?;
        let mut node = self.root.clone();
        for component in components {
            node = node.get_child(component)?;
        }
        Some(node)
    }

    /// The references stored exactly at `name`, in insertion order.
    pub fn lookup(&self, name: &Name) -> Option<Vec<R>> {
        let node = self.lookup_node(name, name.count())?;
        let content = node.content();
        (!content.is_empty()).then_some(content)
    }

    /// Resolves an Interest to a single stored object.
    pub fn get(&self, interest: &Interest, getter: &dyn ContentGetter<R>) -> Option<Match<R>> {
        let selector = interest.child_selector.unwrap_or(self.default_selector);
        let label = match selector {
            _ if interest.is_exact() => "exact",
            ChildSelector::Leftmost => "leftmost",
            ChildSelector::Rightmost => "rightmost",
        };
        let timer = SearchTimer::start(index_metrics(), label);

        let found = if interest.is_exact() {
            self.exact_match(interest, getter)
        } else {
            match self.lookup_node(&interest.name, interest.name.count()) {
                Some(prefix) => match selector {
                    ChildSelector::Leftmost => self.left_search(&prefix, interest, getter),
                    ChildSelector::Rightmost => self.right_search(&prefix, interest, getter),
                },
                None => self.digest_match(interest, getter),
            }
        };

        timer.finish(found.is_some());
        tracing::debug!(
            target: LOG_TARGET,
            name = %interest.name,
            selector = label,
            matched = ?found.as_ref().map(|m| &m.object.name),
            "interest resolved"
        );
        found
    }

    fn exact_match(&self, interest: &Interest, getter: &dyn ContentGetter<R>) -> Option<Match<R>> {
        match self.lookup(&interest.name) {
            Some(refs) => first_match(refs.iter(), interest, getter),
            None => self.digest_match(interest, getter),
        }
    }

    /// An Interest whose last component is an object's implicit digest finds
    /// no node of its own; the candidates live at the parent.
    fn digest_match(&self, interest: &Interest, getter: &dyn ContentGetter<R>) -> Option<Match<R>> {
        let parent_depth = interest.name.count().checked_sub(1)?;
        let parent = self.lookup_node(&interest.name, parent_depth)?;
        first_match(parent.content().iter(), interest, getter)
    }
}

/// Resolves each reference in turn and returns the first whose object
/// satisfies the full Interest predicate. Stale references are skipped.
pub(crate) fn first_match<'r, R, I>(
    refs: I,
    interest: &Interest,
    getter: &dyn ContentGetter<R>,
) -> Option<Match<R>>
where
    R: Clone + Debug + 'r,
    I: Iterator<Item = &'r R>,
{
    for content_ref in refs {
        let Some(object) = getter.get(content_ref) else {
            index_metrics().inc_stale_refs();
            tracing::warn!(target: LOG_TARGET, ?content_ref, "skipping stale content reference");
            continue;
        };
        if interest.matches_object(&object) {
            return Some(Match {
                content_ref: content_ref.clone(),
                object,
            });
        }
    }
    None
}
