// Path: crates/types/src/name.rs

//! Hierarchical names made of opaque binary components.
//!
//! Names are totally ordered component-wise. Components compare as unsigned
//! byte strings, and a shorter name sorts before any name it is a prefix of.
//! This is the order the content index walks children in, so every search
//! preference (leftmost, rightmost) is defined in terms of it.

use crate::error::NameError;
use crate::prelude::OptionExt;
use crate::time::Timestamp;
use bytes::Bytes;
use serde::{Deserialize, Serialize};
use std::fmt;

/// First byte of a version component.
pub const VERSION_MARKER: u8 = 0xFD;
/// First byte of a segment component.
pub const SEGMENT_MARKER: u8 = 0x00;
/// The command marker component that introduces a one-level name enumeration.
pub const ENUMERATION_MARKER: &[u8] = &[0xC1, b'.', b'E', b'.', b'b', b'e'];

const URI_SCHEME: &str = "ccnx:";
const VERSION_BITS: usize = 48;

/// A single, non-empty name component.
#[derive(Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Component(Bytes);

impl Component {
    /// Creates a component from raw bytes. Empty components are rejected.
    pub fn new(bytes: impl Into<Bytes>) -> Result<Self, NameError> {
        let bytes = bytes.into();
        if bytes.is_empty() {
            return Err(NameError::EmptyComponent);
        }
        Ok(Self(bytes))
    }

    /// Creates a component from a static byte string known to be non-empty.
    fn from_static_unchecked(bytes: &'static [u8]) -> Self {
        Self(Bytes::from_static(bytes))
    }

    /// Wraps a SHA-256 digest, which is never empty.
    pub(crate) fn from_digest(digest: [u8; 32]) -> Self {
        Self(Bytes::copy_from_slice(&digest))
    }

    /// The enumeration command marker.
    pub fn enumeration_marker() -> Self {
        Self::from_static_unchecked(ENUMERATION_MARKER)
    }

    /// A version component carrying `ts`.
    ///
    /// Versions use a fixed 48-bit width so that byte order and time order
    /// agree; tick counts beyond 48 bits widen to 64.
    pub fn version(ts: Timestamp) -> Self {
        let be = ts.ticks().to_be_bytes();
        let width = if ts.ticks() >> VERSION_BITS == 0 { VERSION_BITS / 8 } else { 8 };
        let mut out = Vec::with_capacity(1 + width);
        out.push(VERSION_MARKER);
        out.extend(be.iter().skip(be.len() - width));
        Self(Bytes::from(out))
    }

    /// A segment component carrying `segment`. Segment zero is the bare marker byte.
    pub fn segment(segment: u64) -> Self {
        Self(marked(SEGMENT_MARKER, segment))
    }

    /// Decodes a version component.
    pub fn as_version(&self) -> Option<Timestamp> {
        unmarked(&self.0, VERSION_MARKER).map(Timestamp::from_ticks)
    }

    /// Decodes a segment component.
    pub fn as_segment(&self) -> Option<u64> {
        unmarked(&self.0, SEGMENT_MARKER)
    }

    /// True if this is the enumeration command marker.
    pub fn is_enumeration_marker(&self) -> bool {
        self.0.as_ref() == ENUMERATION_MARKER
    }

    /// The component bytes.
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    /// The component length in bytes. Always non-zero.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Always false; provided for API symmetry with byte containers.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    fn write_uri(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // A component made only of periods is written with three extra periods
        // so it cannot be confused with `.`/`..` path segments.
        if self.0.iter().all(|b| *b == b'.') {
            f.write_str("...")?;
        }
        f.write_str(&urlencoding::encode_binary(&self.0))
    }
}

impl AsRef<[u8]> for Component {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

impl TryFrom<&str> for Component {
    type Error = NameError;

    fn try_from(text: &str) -> Result<Self, Self::Error> {
        parse_component(text, text, 0)
    }
}

impl fmt::Debug for Component {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Component(")?;
        self.write_uri(f)?;
        write!(f, ")")
    }
}

impl fmt::Display for Component {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.write_uri(f)
    }
}

fn marked(marker: u8, value: u64) -> Bytes {
    let be = value.to_be_bytes();
    let skip = be.iter().take_while(|b| **b == 0).count();
    let mut out = Vec::with_capacity(1 + be.len() - skip);
    out.push(marker);
    out.extend(be.iter().skip(skip));
    Bytes::from(out)
}

fn unmarked(bytes: &[u8], marker: u8) -> Option<u64> {
    let (first, rest) = bytes.split_first()?;
    if *first != marker || rest.len() > 8 {
        return None;
    }
    Some(rest.iter().fold(0u64, |acc, b| (acc << 8) | u64::from(*b)))
}

/// Offset of the first `%` not followed by two hex digits.
fn first_bad_escape(raw: &[u8]) -> Option<usize> {
    raw.iter()
        .enumerate()
        .filter(|(_, byte)| **byte == b'%')
        .map(|(at, _)| at)
        .find(|at| {
            raw.get(at + 1..at + 3)
                .map_or(true, |pair| hex::decode(pair).is_err())
        })
}

fn parse_component(text: &str, uri: &str, base: usize) -> Result<Component, NameError> {
    let raw = text.as_bytes();
    if let Some(at) = first_bad_escape(raw) {
        return Err(NameError::InvalidEscape {
            uri: uri.to_string(),
            offset: base + at,
        });
    }
    let mut out = urlencoding::decode_binary(raw).into_owned();
    if !text.contains('%') && !out.is_empty() && out.iter().all(|b| *b == b'.') {
        if out.len() < 3 {
            return Err(NameError::DotSegment(uri.to_string()));
        }
        out.truncate(out.len() - 3);
    }
    Component::new(out)
}

/// An ordered sequence of components.
#[derive(Clone, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Name {
    components: Vec<Component>,
}

impl Name {
    /// The empty (root) name.
    pub fn root() -> Self {
        Self::default()
    }

    /// Builds a name from already-validated components.
    pub fn from_components(components: impl IntoIterator<Item = Component>) -> Self {
        Self {
            components: components.into_iter().collect(),
        }
    }

    /// Parses a `/`-separated URI such as `ccnx:/a/b%00`.
    pub fn parse(uri: &str) -> Result<Self, NameError> {
        let (body, base) = match uri.strip_prefix(URI_SCHEME) {
            Some(rest) => (rest, URI_SCHEME.len()),
            None => (uri, 0),
        };
        let path = body
            .strip_prefix('/')
            .required(NameError::NotAbsolute(uri.to_string()))?;
        let mut components = Vec::new();
        let mut offset = base + 1;
        for segment in path.split('/') {
            // A single trailing slash is tolerated: `/a/b/` names `/a/b`.
            if segment.is_empty() && offset + segment.len() == uri.len() {
                break;
            }
            components.push(parse_component(segment, uri, offset)?);
            offset += segment.len() + 1;
        }
        Ok(Self { components })
    }

    /// Number of components.
    pub fn count(&self) -> usize {
        self.components.len()
    }

    /// True for the root name.
    pub fn is_empty(&self) -> bool {
        self.components.is_empty()
    }

    /// The `i`th component, if present.
    pub fn component(&self, i: usize) -> Option<&Component> {
        self.components.get(i)
    }

    /// The final component, if any.
    pub fn last(&self) -> Option<&Component> {
        self.components.last()
    }

    /// All components in order.
    pub fn components(&self) -> &[Component] {
        &self.components
    }

    /// True if every component of `self` is a leading component of `other`.
    pub fn is_prefix_of(&self, other: &Name) -> bool {
        other.components.starts_with(&self.components)
    }

    /// The first `n` components. Asking for more than `count()` returns a clone.
    pub fn truncate(&self, n: usize) -> Name {
        Self {
            components: self.components.iter().take(n).cloned().collect(),
        }
    }

    /// Appends a component in place.
    pub fn push(&mut self, component: Component) {
        self.components.push(component);
    }

    /// Returns a new name with `component` appended.
    pub fn with_component(&self, component: Component) -> Name {
        let mut next = self.clone();
        next.push(component);
        next
    }

    /// Index of the first component equal to `marker`.
    pub fn position_of(&self, marker: &[u8]) -> Option<usize> {
        self.components.iter().position(|c| c.as_bytes() == marker)
    }

    /// The prefix preceding the first occurrence of `marker`, if it occurs.
    pub fn cut_at(&self, marker: &[u8]) -> Option<Name> {
        self.position_of(marker).map(|at| self.truncate(at))
    }
}

impl fmt::Display for Name {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.components.is_empty() {
            return f.write_str("/");
        }
        for component in &self.components {
            f.write_str("/")?;
            component.write_uri(f)?;
        }
        Ok(())
    }
}

impl fmt::Debug for Name {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Name({self})")
    }
}

impl std::str::FromStr for Name {
    type Err = NameError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Name::parse(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn name(uri: &str) -> Name {
        Name::parse(uri).unwrap()
    }

    #[test]
    fn parse_and_display_round_trip() {
        let n = name("ccnx:/a/b%00c/%C1.E.be");
        assert_eq!(n.count(), 3);
        assert_eq!(n.component(1).unwrap().as_bytes(), b"b\x00c");
        assert!(n.component(2).unwrap().is_enumeration_marker());
        assert_eq!(n.to_string(), "/a/b%00c/%C1.E.be");
        assert_eq!(name(&n.to_string()), n);
    }

    #[test]
    fn parse_rejects_bad_input() {
        assert_eq!(
            Name::parse("a/b"),
            Err(NameError::NotAbsolute("a/b".into()))
        );
        assert!(matches!(
            Name::parse("/a/%G0"),
            Err(NameError::InvalidEscape { offset: 3, .. })
        ));
        assert_eq!(Name::parse("/a//b"), Err(NameError::EmptyComponent));
        assert_eq!(Name::parse("/a/..."), Err(NameError::EmptyComponent));
        assert!(matches!(
            Name::parse("/a/b%4"),
            Err(NameError::InvalidEscape { offset: 4, .. })
        ));
        assert!(matches!(
            Name::parse("ccnx:/x/%zz"),
            Err(NameError::InvalidEscape { offset: 8, .. })
        ));
    }

    #[test]
    fn dot_segments_are_rejected() {
        assert_eq!(
            Name::parse("/a/./b"),
            Err(NameError::DotSegment("/a/./b".into()))
        );
        assert_eq!(
            Name::parse("/.."),
            Err(NameError::DotSegment("/..".into()))
        );
        // Escaped periods are ordinary bytes.
        assert_eq!(name("/%2E").component(0).unwrap().as_bytes(), b".");
    }

    #[test]
    fn escaping_leaves_unreserved_bytes_alone() {
        let c = Component::new(&b"Az09-._~ /%\xff"[..]).unwrap();
        assert_eq!(c.to_string(), "Az09-._~%20%2F%25%FF");
        assert_eq!(Component::try_from("%25%41").unwrap().as_bytes(), b"%A");
    }

    #[test]
    fn dotted_components_are_escaped() {
        let n = Name::from_components([Component::new(&b".."[..]).unwrap()]);
        assert_eq!(n.to_string(), "/.....");
        assert_eq!(name("/....."), n);
        assert_eq!(name("/"), Name::root());
        assert_eq!(name("/a/"), name("/a"));
    }

    #[test]
    fn ordering_is_component_wise_with_shorter_first() {
        assert!(name("/a") < name("/a/b"));
        assert!(name("/a/b") < name("/a/c"));
        assert!(name("/a/z") < name("/b"));
        assert!(name("/a/%00") < name("/a/%01"));
        assert!(name("/ab") > name("/a/z"));
    }

    #[test]
    fn prefix_truncate_and_cut() {
        let n = name("/a/b/%C1.E.be/x");
        assert!(name("/a/b").is_prefix_of(&n));
        assert!(Name::root().is_prefix_of(&n));
        assert!(!name("/a/c").is_prefix_of(&n));
        assert_eq!(n.truncate(2), name("/a/b"));
        assert_eq!(n.truncate(10), n);
        assert_eq!(n.cut_at(ENUMERATION_MARKER), Some(name("/a/b")));
        assert_eq!(name("/a").cut_at(ENUMERATION_MARKER), None);
    }

    #[test]
    fn version_and_segment_markers() {
        let ts = Timestamp::from_ticks(0x0102_0304);
        let v = Component::version(ts);
        assert_eq!(v.as_bytes(), &[0xFD, 0x00, 0x00, 0x01, 0x02, 0x03, 0x04]);
        assert_eq!(v.as_version(), Some(ts));
        assert_eq!(v.as_segment(), None);

        // Fixed width keeps byte order aligned with time order.
        let earlier = Component::version(Timestamp::from_ticks(0xFF));
        let later = Component::version(Timestamp::from_ticks(0x100));
        assert!(earlier < later);

        let s0 = Component::segment(0);
        assert_eq!(s0.as_bytes(), &[0x00]);
        assert_eq!(s0.as_segment(), Some(0));
        assert_eq!(Component::segment(258).as_segment(), Some(258));
    }

    proptest! {
        #[test]
        fn uri_round_trips_arbitrary_components(
            parts in prop::collection::vec(prop::collection::vec(any::<u8>(), 1..8), 0..6)
        ) {
            let n = Name::from_components(parts.into_iter().map(|p| Component::new(p).unwrap()));
            prop_assert_eq!(Name::parse(&n.to_string()).unwrap(), n);
        }
    }
}
