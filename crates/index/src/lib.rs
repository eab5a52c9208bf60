// Path: crates/index/src/lib.rs
#![cfg_attr(
    not(test),
    deny(
        clippy::unwrap_used,
        clippy::expect_used,
        clippy::panic,
        clippy::unimplemented,
        clippy::todo,
        clippy::indexing_slicing
    )
)]

//! # nrepo Content Index
//!
//! An in-memory trie keyed by binary name components. Every stored object is
//! registered here under its explicit name together with an opaque reference
//! that only the storage collaborator knows how to dereference.
//!
//! ## Key Features
//!
//! *   **Constrained search:** Interests are resolved to the canonically
//!     smallest (leftmost) or largest (rightmost) stored name under a prefix that
//!     satisfies suffix-count bounds, an exclusion filter, and the Interest's full
//!     match predicate.
//!
//! *   **Duplicate suppression:** Re-inserting an object that is equal to one
//!     already stored at the same name is a no-op.
//!
//! *   **Name enumeration:** One-level child listings with a long-poll protocol.
//!     A request that finds nothing new parks on the node and is answered by the
//!     next insert that adds a child there.
//!
//! *   **Per-node locking:** Each node carries its own lock and no operation
//!     holds more than one at a time, so inserts into disjoint subtrees and
//!     concurrent searches proceed independently.

pub mod enumeration;
pub mod getter;
pub mod memory;
pub mod node;
pub mod prescreen;
pub mod tree;

pub use enumeration::{EnumerationResponder, EnumerationResponse};
pub use getter::ContentGetter;
pub use memory::{MemoryContentStore, SlotRef};
pub use node::TrieNode;
pub use prescreen::{PreScreener, Screen};
pub use tree::{ContentIndex, InsertOutcome, Match};

/// The `tracing` target used by every log line emitted from this crate.
pub const LOG_TARGET: &str = "index";
