// Path: crates/types/src/lib.rs
#![forbid(unsafe_code)]
#![deny(missing_docs)]

//! # nrepo Types
//!
//! This crate is the foundational library for the nrepo content repository,
//! containing the naming model, query (Interest) model, content objects,
//! exclusion filters, error types, and configuration objects.
//!
//! ## Architectural Role
//!
//! As the base crate, `nrepo-types` has minimal dependencies and is itself a
//! dependency for the telemetry and index crates. The content index only ever
//! consumes these types through their public predicates (`Interest::matches_object`,
//! `ExcludeFilter::matches`, `Name::is_prefix_of`); it never re-implements them.

/// Repository configuration loaded from TOML.
pub mod config;
/// Signed content objects and their implicit digest component.
pub mod content;
/// A unified set of all error types used across the workspace.
pub mod error;
/// Exclusion filters over a single name component, including the Bloom variant.
pub mod exclude;
/// The Interest (query) model and its full match predicate.
pub mod interest;
/// Hierarchical binary names, components, and well-known marker components.
pub mod name;
/// A prelude containing useful extension traits like `OptionExt`.
pub mod prelude;
/// Binary timestamps used for versions and last-modified bookkeeping.
pub mod time;

pub use content::{ContentObject, ContentType, PublisherDigest};
pub use exclude::{Bloom, ExcludeElement, ExcludeFilter};
pub use interest::{ChildSelector, Interest};
pub use name::{Component, Name};
pub use time::Timestamp;
