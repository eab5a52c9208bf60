// Path: crates/index/src/enumeration.rs

//! One-level name enumeration with long-poll deferral.
//!
//! A request names `<prefix>/<marker>`, optionally followed by a responder id
//! and an exclusion over versions the caller already holds. If the node at
//! `<prefix>` has nothing the caller wants, the request is parked on the node
//! and the next insert that adds a child there produces the answer.

use crate::node::NodeState;
use crate::tree::ContentIndex;
use crate::LOG_TARGET;
use nrepo_telemetry::{error_metrics, index_metrics};
use nrepo_types::config::IndexConfig;
use nrepo_types::error::{ConfigError, ErrorCode};
use nrepo_types::{Component, Interest, Name, Timestamp};
use std::fmt::Debug;

/// A one-level child listing of a node.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EnumerationResponse {
    /// The enumerated node's name followed by the enumeration marker.
    pub prefix: Name,
    /// Each direct child as a single-component name, in ascending order.
    pub children: Vec<Name>,
    /// The node's `last_modified` when the listing was taken.
    pub version: Timestamp,
}

impl EnumerationResponse {
    /// Snapshots `state`, which belongs to the node named `node_name`.
    pub(crate) fn from_state<R>(node_name: Name, state: &NodeState<R>) -> Self {
        Self {
            prefix: node_name.with_component(Component::enumeration_marker()),
            children: state
                .children
                .keys()
                .map(|c| Name::from_components([c.clone()]))
                .collect(),
            version: state.last_modified,
        }
    }

    /// The name this listing is published under:
    /// `prefix/<responder>/<version>/<segment 0>`.
    pub fn response_name(&self, responder: &Component) -> Name {
        response_name(&self.prefix, responder, self.version)
    }
}

fn response_name(prefix: &Name, responder: &Component, version: Timestamp) -> Name {
    let mut name = prefix.with_component(responder.clone());
    name.push(Component::version(version));
    name.push(Component::segment(0));
    name
}

/// Answers enumeration requests under a fixed responder id.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EnumerationResponder {
    responder: Component,
}

impl EnumerationResponder {
    pub fn new(responder: Component) -> Self {
        Self { responder }
    }

    /// Builds a responder from `index.responder_id`.
    pub fn from_config(config: &IndexConfig) -> Result<Self, ConfigError> {
        match config.responder_component() {
            Ok(responder) => Ok(Self::new(responder)),
            Err(err) => {
                error_metrics().inc_error("config", err.code());
                tracing::error!(target: LOG_TARGET, error = %err, "invalid responder id");
                Err(err)
            }
        }
    }

    pub fn responder(&self) -> &Component {
        &self.responder
    }

    /// See [`ContentIndex::list_children`].
    pub fn respond<R>(
        &self,
        index: &ContentIndex<R>,
        interest: &Interest,
    ) -> Option<EnumerationResponse>
    where
        R: Clone + Eq + Debug + Send + Sync,
    {
        index.list_children(interest, &self.responder)
    }

    /// The name `response` is published under by this responder.
    pub fn response_name(&self, response: &EnumerationResponse) -> Name {
        response.response_name(&self.responder)
    }
}

impl<R> ContentIndex<R>
where
    R: Clone + Eq + Debug + Send + Sync,
{
    /// Answers an enumeration Interest, or parks it.
    ///
    /// Returns `None` when the Interest carries no enumeration marker, when the
    /// prefix does not exist, or when the node has nothing the caller wants yet.
    /// Only the last case marks the node pending.
    pub fn list_children(
        &self,
        interest: &Interest,
        responder: &Component,
    ) -> Option<EnumerationResponse> {
        let marker = Component::enumeration_marker();
        let Some(marker_at) = interest.name.position_of(marker.as_bytes()) else {
            tracing::debug!(target: LOG_TARGET, name = %interest.name, "enumeration interest without marker");
            return None;
        };
        let prefix = interest.name.truncate(marker_at);
        let Some(node) = self.lookup_node(&prefix, prefix.count()) else {
            tracing::debug!(target: LOG_TARGET, %prefix, "dropping enumeration under unknown prefix");
            return None;
        };

        let mut state = node.lock();
        let marked = prefix.with_component(marker);
        let candidate = response_name(&marked, responder, state.last_modified);
        let wanted = interest.matches_name(&candidate, interest.publisher.as_ref());
        if state.children.is_empty() || !wanted {
            state.pending_enumeration = true;
            index_metrics().inc_enumeration_deferred();
            tracing::debug!(
                target: LOG_TARGET,
                %prefix,
                version = %state.last_modified,
                children = state.children.len(),
                "enumeration deferred"
            );
            return None;
        }

        state.pending_enumeration = false;
        let response = EnumerationResponse::from_state(prefix, &state);
        drop(state);
        index_metrics().inc_enumeration_answered();
        tracing::debug!(
            target: LOG_TARGET,
            prefix = %response.prefix,
            children = response.children.len(),
            "enumeration answered"
        );
        Some(response)
    }
}
