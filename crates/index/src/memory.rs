// Path: crates/index/src/memory.rs

//! An in-memory content store usable as the index's [`ContentGetter`].

use crate::getter::ContentGetter;
use dashmap::DashMap;
use nrepo_types::ContentObject;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

/// A handle to an object held by a [`MemoryContentStore`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SlotRef(pub u64);

/// Holds decoded objects in memory, addressed by monotonically assigned slots.
///
/// Slots are never reused, so an evicted slot stays stale forever.
#[derive(Debug, Default)]
pub struct MemoryContentStore {
    objects: DashMap<SlotRef, Arc<ContentObject>>,
    next: AtomicU64,
}

impl MemoryContentStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stores `object` and returns its slot.
    pub fn put(&self, object: ContentObject) -> SlotRef {
        let slot = SlotRef(self.next.fetch_add(1, Ordering::Relaxed));
        self.objects.insert(slot, Arc::new(object));
        slot
    }

    /// Drops the object behind `slot`. Returns whether it was present.
    pub fn evict(&self, slot: SlotRef) -> bool {
        self.objects.remove(&slot).is_some()
    }

    pub fn len(&self) -> usize {
        self.objects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }
}

impl ContentGetter<SlotRef> for MemoryContentStore {
    fn get(&self, content_ref: &SlotRef) -> Option<Arc<ContentObject>> {
        self.objects.get(content_ref).map(|entry| entry.value().clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use nrepo_types::{Name, PublisherDigest, Timestamp};

    #[test]
    fn put_get_evict() {
        let store = MemoryContentStore::new();
        let object = ContentObject::new(
            Name::parse("/a").unwrap(),
            PublisherDigest::of_key(b"k"),
            Timestamp::from_ticks(1),
            &b"x"[..],
        );
        let first = store.put(object.clone());
        let second = store.put(object.clone());
        assert_ne!(first, second);
        assert_eq!(store.len(), 2);
        assert_eq!(store.get(&first).as_deref(), Some(&object));

        assert!(store.evict(first));
        assert!(!store.evict(first));
        assert!(store.get(&first).is_none());
        assert!(store.get(&second).is_some());
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn concurrent_puts_get_distinct_slots() {
        let store = MemoryContentStore::new();
        let object = ContentObject::new(
            Name::parse("/a").unwrap(),
            PublisherDigest::of_key(b"k"),
            Timestamp::from_ticks(1),
            &b"x"[..],
        );
        std::thread::scope(|scope| {
            for _ in 0..4 {
                scope.spawn(|| {
                    for _ in 0..50 {
                        let slot = store.put(object.clone());
                        assert!(store.get(&slot).is_some());
                    }
                });
            }
        });
        assert_eq!(store.len(), 200);
        assert!((0..200).all(|n| store.get(&SlotRef(n)).is_some()));
    }
}
