// Path: crates/index/src/getter.rs

//! The storage collaborator's side of the index contract.

use nrepo_types::ContentObject;
use std::sync::Arc;

/// Dereferences an opaque content reference to its decoded object.
///
/// Returning `None` means the reference no longer resolves (for example the
/// log segment holding it was rotated away). The index skips such candidates
/// and never treats them as errors.
pub trait ContentGetter<R>: Send + Sync {
    /// Loads the object behind `content_ref`.
    fn get(&self, content_ref: &R) -> Option<Arc<ContentObject>>;
}

impl<R, F> ContentGetter<R> for F
where
    F: Fn(&R) -> Option<Arc<ContentObject>> + Send + Sync,
{
    fn get(&self, content_ref: &R) -> Option<Arc<ContentObject>> {
        self(content_ref)
    }
}
