// Path: crates/types/src/content.rs

//! Content objects: a name bound to a payload by a publisher.
//!
//! Every object has an implicit final name component, its digest, that is not
//! carried in `name` but is appended by [`ContentObject::full_name`]. Two
//! objects with the same name are distinct whenever any field differs.

use crate::name::{Component, Name};
use crate::time::Timestamp;
use bytes::Bytes;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

/// A SHA-256 digest of a publisher's public key.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct PublisherDigest(pub [u8; 32]);

impl std::fmt::Debug for PublisherDigest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "PublisherDigest({})", hex::encode(self.0))
    }
}

impl PublisherDigest {
    /// Derives a publisher digest from raw public key bytes.
    pub fn of_key(key: &[u8]) -> Self {
        Self(Sha256::digest(key).into())
    }
}

/// The kind of payload an object carries.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ContentType {
    /// Application data.
    #[default]
    Data,
    /// A public key.
    Key,
    /// A link to another name.
    Link,
    /// A negative acknowledgement: the name exists but carries no data.
    Nack,
}

impl ContentType {
    fn tag(self) -> u8 {
        match self {
            Self::Data => 0,
            Self::Key => 1,
            Self::Link => 2,
            Self::Nack => 3,
        }
    }
}

/// A fully decoded content object.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ContentObject {
    /// The explicit name, without the implicit digest component.
    pub name: Name,
    /// The publisher that signed this object.
    pub publisher: PublisherDigest,
    /// When the publisher created this object.
    pub timestamp: Timestamp,
    /// What the payload is.
    pub content_type: ContentType,
    /// The payload bytes.
    pub payload: Bytes,
}

impl ContentObject {
    /// Creates a data object.
    pub fn new(
        name: Name,
        publisher: PublisherDigest,
        timestamp: Timestamp,
        payload: impl Into<Bytes>,
    ) -> Self {
        Self {
            name,
            publisher,
            timestamp,
            content_type: ContentType::Data,
            payload: payload.into(),
        }
    }

    /// The SHA-256 digest over a length-prefixed canonical serialization of
    /// every field.
    pub fn digest(&self) -> [u8; 32] {
        let mut hasher = Sha256::new();
        hasher.update((self.name.count() as u64).to_be_bytes());
        for component in self.name.components() {
            hasher.update((component.len() as u64).to_be_bytes());
            hasher.update(component.as_bytes());
        }
        hasher.update(self.publisher.0);
        hasher.update(self.timestamp.ticks().to_be_bytes());
        hasher.update([self.content_type.tag()]);
        hasher.update((self.payload.len() as u64).to_be_bytes());
        hasher.update(&self.payload);
        hasher.finalize().into()
    }

    /// The digest as a name component.
    pub fn digest_component(&self) -> Component {
        Component::from_digest(self.digest())
    }

    /// `name` with the implicit digest component appended.
    pub fn full_name(&self) -> Name {
        self.name.with_component(self.digest_component())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn object(uri: &str, payload: &'static [u8]) -> ContentObject {
        ContentObject::new(
            Name::parse(uri).unwrap(),
            PublisherDigest::of_key(b"publisher"),
            Timestamp::from_ticks(7),
            payload,
        )
    }

    #[test]
    fn digest_changes_with_any_field() {
        let a = object("/a/b", b"one");
        let mut b = a.clone();
        assert_eq!(a.digest(), b.digest());
        b.payload = Bytes::from_static(b"two");
        assert_ne!(a.digest(), b.digest());
        let mut c = a.clone();
        c.content_type = ContentType::Key;
        assert_ne!(a.digest(), c.digest());
    }

    #[test]
    fn full_name_appends_digest() {
        let a = object("/a/b", b"one");
        let full = a.full_name();
        assert_eq!(full.count(), 3);
        assert!(a.name.is_prefix_of(&full));
        assert_eq!(full.last().unwrap().as_bytes(), &a.digest());
    }

    #[test]
    fn digest_component_is_the_raw_digest() {
        let a = object("/a", b"one");
        let component = a.digest_component();
        assert_eq!(component.len(), 32);
        assert_eq!(component.as_bytes(), &a.digest());
        assert_ne!(component, object("/a", b"two").digest_component());
    }
}
