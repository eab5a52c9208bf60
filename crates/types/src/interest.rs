// Path: crates/types/src/interest.rs

//! The Interest: a query for the canonically smallest or largest object whose
//! name falls under a prefix and satisfies a set of constraints.

use crate::content::{ContentObject, PublisherDigest};
use crate::exclude::ExcludeFilter;
use crate::name::{Component, Name};
use serde::{Deserialize, Serialize};

/// Which end of the canonical order a search should prefer.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChildSelector {
    /// The canonically smallest qualifying name.
    #[default]
    Leftmost,
    /// The canonically largest qualifying name.
    Rightmost,
}

/// A query over the name space.
///
/// Suffix components are counted beyond `name`: a candidate `/a/b/c` has two
/// suffix components under the Interest name `/a`.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Interest {
    /// The required name prefix.
    pub name: Name,
    /// Minimum number of suffix components a match must have.
    pub min_suffix_components: Option<usize>,
    /// Maximum number of suffix components a match may have.
    pub max_suffix_components: Option<usize>,
    /// Search preference. `None` behaves as [`ChildSelector::Leftmost`].
    pub child_selector: Option<ChildSelector>,
    /// Filter applied to the component immediately following `name`.
    pub exclude: Option<ExcludeFilter>,
    /// If set, only objects signed by this publisher match.
    pub publisher: Option<PublisherDigest>,
}

impl Interest {
    /// An unconstrained Interest for everything under `name`.
    pub fn new(name: Name) -> Self {
        Self {
            name,
            ..Self::default()
        }
    }

    /// Sets the minimum suffix component count.
    pub fn with_min_suffix_components(mut self, min: usize) -> Self {
        self.min_suffix_components = Some(min);
        self
    }

    /// Sets the maximum suffix component count.
    pub fn with_max_suffix_components(mut self, max: usize) -> Self {
        self.max_suffix_components = Some(max);
        self
    }

    /// Sets the search preference.
    pub fn with_child_selector(mut self, selector: ChildSelector) -> Self {
        self.child_selector = Some(selector);
        self
    }

    /// Sets the exclusion filter.
    pub fn with_exclude(mut self, exclude: ExcludeFilter) -> Self {
        self.exclude = Some(exclude);
        self
    }

    /// Restricts matches to a single publisher.
    pub fn with_publisher(mut self, publisher: PublisherDigest) -> Self {
        self.publisher = Some(publisher);
        self
    }

    /// True if the Interest asks for exactly its own name and nothing below it.
    pub fn is_exact(&self) -> bool {
        self.max_suffix_components == Some(0)
    }

    /// True if the Interest prefers the canonically largest match.
    pub fn prefers_rightmost(&self) -> bool {
        self.child_selector == Some(ChildSelector::Rightmost)
    }

    /// True if `component`, as the first suffix component, is excluded.
    pub fn excludes(&self, component: &Component) -> bool {
        self.exclude
            .as_ref()
            .is_some_and(|filter| filter.matches(component))
    }

    /// Tests a candidate name and the publisher that signed it.
    pub fn matches_name(&self, candidate: &Name, publisher: Option<&PublisherDigest>) -> bool {
        if !self.name.is_prefix_of(candidate) {
            return false;
        }
        let suffix = candidate.count() - self.name.count();
        if self.max_suffix_components.is_some_and(|max| suffix > max) {
            return false;
        }
        if self.min_suffix_components.is_some_and(|min| suffix < min) {
            return false;
        }
        if suffix > 0 {
            if let Some(next) = candidate.component(self.name.count()) {
                if self.excludes(next) {
                    return false;
                }
            }
        }
        match (&self.publisher, publisher) {
            (None, _) => true,
            (Some(wanted), Some(actual)) => wanted == actual,
            (Some(_), None) => false,
        }
    }

    /// The full match predicate against a decoded object.
    ///
    /// The candidate name is the object's explicit name, except when the digest
    /// must take part: if an exclusion filter is present and the Interest name is
    /// exactly one component shorter than the full name, the filter applies to the
    /// digest itself; and an Interest name as long as the full name names the digest.
    pub fn matches_object(&self, object: &ContentObject) -> bool {
        let full_count = object.name.count() + 1;
        let digest_inclusive = (self.exclude.is_some() && self.name.count() == full_count - 1)
            || self.name.count() == full_count;
        if digest_inclusive {
            self.matches_name(&object.full_name(), Some(&object.publisher))
        } else {
            self.matches_name(&object.name, Some(&object.publisher))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::time::Timestamp;

    fn name(uri: &str) -> Name {
        Name::parse(uri).unwrap()
    }

    fn c(text: &str) -> Component {
        Component::try_from(text).unwrap()
    }

    fn object(uri: &str) -> ContentObject {
        ContentObject::new(
            name(uri),
            PublisherDigest::of_key(b"alice"),
            Timestamp::from_ticks(1),
            &b"payload"[..],
        )
    }

    #[test]
    fn suffix_window_is_inclusive() {
        let interest = Interest::new(name("/a"))
            .with_min_suffix_components(1)
            .with_max_suffix_components(2);
        assert!(!interest.matches_name(&name("/a"), None));
        assert!(interest.matches_name(&name("/a/b"), None));
        assert!(interest.matches_name(&name("/a/b/c"), None));
        assert!(!interest.matches_name(&name("/a/b/c/d"), None));
        assert!(!interest.matches_name(&name("/b/c"), None));
    }

    #[test]
    fn degenerate_window_never_matches() {
        let interest = Interest::new(name("/a"))
            .with_min_suffix_components(3)
            .with_max_suffix_components(1);
        assert!(!interest.matches_name(&name("/a/b"), None));
        assert!(!interest.matches_name(&name("/a/b/c/d"), None));
    }

    #[test]
    fn exclusion_applies_to_first_suffix_component_only() {
        let interest =
            Interest::new(name("/a")).with_exclude(ExcludeFilter::from_components([c("b")]));
        assert!(!interest.matches_name(&name("/a/b"), None));
        assert!(!interest.matches_name(&name("/a/b/x"), None));
        assert!(interest.matches_name(&name("/a/c/b"), None));
        assert!(interest.matches_name(&name("/a"), None));
    }

    #[test]
    fn publisher_constraint() {
        let alice = PublisherDigest::of_key(b"alice");
        let bob = PublisherDigest::of_key(b"bob");
        let interest = Interest::new(name("/a")).with_publisher(alice);
        assert!(interest.matches_object(&object("/a/x")));
        assert!(!interest.matches_name(&name("/a/x"), Some(&bob)));
        assert!(!interest.matches_name(&name("/a/x"), None));
    }

    #[test]
    fn exclusion_reaches_digest_when_interest_names_the_object() {
        let obj = object("/a/b");
        let digest = obj.digest_component();

        let excluding_digest =
            Interest::new(name("/a/b")).with_exclude(ExcludeFilter::from_components([digest]));
        assert!(!excluding_digest.matches_object(&obj));

        let excluding_other =
            Interest::new(name("/a/b")).with_exclude(ExcludeFilter::from_components([c("zz")]));
        assert!(excluding_other.matches_object(&obj));

        // Without an exclusion filter the digest does not count as a suffix.
        let exact = Interest::new(name("/a/b")).with_max_suffix_components(0);
        assert!(exact.matches_object(&obj));
    }

    #[test]
    fn interest_naming_the_digest_matches_only_that_object() {
        let obj = object("/a/b");
        let interest = Interest::new(obj.full_name());
        assert!(interest.matches_object(&obj));

        let mut other = obj.clone();
        other.payload = bytes::Bytes::from_static(b"different");
        assert!(!interest.matches_object(&other));
    }
}
