//! # Stream Node
//!
//! [`StreamNode`] is the identity every stream and table node is built on: the
//! topology it belongs to, its name, and the set of source nodes it is derived
//! from. It is the gatekeeper for co-partitioning; every join must call
//! [`StreamNode::ensure_joinable_with`] before wiring its output node.
//!
//! ## Sharing
//!
//! A node never owns its topology. Cloning a node (the way stream and table
//! wrappers extend an existing node) shares both the topology and the
//! source-node set with the original and skips validation. Neither can change
//! after construction.
//!
//! ## Example
//!
//! ```rust
//! use streamweave_kstream::stream_node::StreamNode;
//! use streamweave_kstream::topology::{Topology, TopologyBuilder};
//! use std::collections::BTreeSet;
//! use std::sync::Arc;
//!
//! let topology: Arc<dyn Topology> = Arc::new(TopologyBuilder::new());
//! let orders: StreamNode<String> =
//!   StreamNode::new(Arc::clone(&topology), "orders", BTreeSet::from(["A".to_string()]))?;
//! let payments: StreamNode<String> =
//!   StreamNode::new(Arc::clone(&topology), "payments", BTreeSet::from(["B".to_string()]))?;
//!
//! let sources = orders.ensure_joinable_with(&payments);
//! let joined: StreamNode<String> = orders.derive("orders-join-payments", sources)?;
//! assert_eq!(joined.source_nodes().len(), 2);
//! # Ok::<(), streamweave_kstream::error::TopologyError>(())
//! ```

use crate::error::{TopologyError, TopologyResult};
use crate::topic;
use crate::topology::Topology;
use std::collections::BTreeSet;
use std::fmt;
use std::marker::PhantomData;
use std::sync::Arc;
use tracing::{debug, trace};

/// Handle for a stream or table node keyed by `K`.
pub struct StreamNode<K> {
  topology: Arc<dyn Topology>,
  name: String,
  source_nodes: Arc<BTreeSet<String>>,
  _key: PhantomData<fn() -> K>,
}

impl<K> StreamNode<K> {
  /// Creates a node derived from `source_nodes`.
  ///
  /// # Errors
  ///
  /// Returns [`TopologyError::InvalidArgument`] if `source_nodes` is empty:
  /// every node must trace back to at least one source.
  pub fn new(
    topology: Arc<dyn Topology>,
    name: impl Into<String>,
    source_nodes: impl Into<Arc<BTreeSet<String>>>,
  ) -> TopologyResult<Self> {
    let source_nodes = source_nodes.into();
    if source_nodes.is_empty() {
      return Err(TopologyError::invalid_argument(
        "source_nodes must not be empty",
      ));
    }
    Ok(Self {
      topology,
      name: name.into(),
      source_nodes,
      _key: PhantomData,
    })
  }

  /// Creates a downstream node on the same topology.
  ///
  /// # Errors
  ///
  /// Returns [`TopologyError::InvalidArgument`] if `source_nodes` is empty.
  pub fn derive<K2>(
    &self,
    name: impl Into<String>,
    source_nodes: impl Into<Arc<BTreeSet<String>>>,
  ) -> TopologyResult<StreamNode<K2>> {
    StreamNode::new(Arc::clone(&self.topology), name, source_nodes)
  }

  /// The topology this node belongs to.
  pub fn topology(&self) -> &Arc<dyn Topology> {
    &self.topology
  }

  /// Node name, unique within the topology.
  pub fn name(&self) -> &str {
    &self.name
  }

  /// Source nodes this node is derived from; never empty.
  pub fn source_nodes(&self) -> &BTreeSet<String> {
    &self.source_nodes
  }

  /// Requires this node and `other` to be co-partitioned.
  ///
  /// Registers the union of both source-node sets with the topology and returns
  /// it, so the caller can use it as the source set of the joined node.
  pub fn ensure_joinable_with(&self, other: &StreamNode<K>) -> BTreeSet<String> {
    let all_source_nodes: BTreeSet<String> = self
      .source_nodes
      .union(&other.source_nodes)
      .cloned()
      .collect();

    self.topology.copartition_sources(&all_source_nodes);
    debug!(
      node = %self.name,
      other = %other.name,
      sources = ?all_source_nodes,
      "ensured nodes are joinable"
    );
    all_source_nodes
  }

  /// Returns `queryable_store_name` if given, otherwise a fresh store name
  /// generated from `prefix`.
  ///
  /// # Errors
  ///
  /// Returns [`TopologyError::NameInvalid`] if the resulting name is not legal.
  pub fn get_or_create_name(
    &self,
    queryable_store_name: Option<&str>,
    prefix: &str,
  ) -> TopologyResult<String> {
    let name = match queryable_store_name {
      Some(name) => name.to_string(),
      None => self.topology.new_store_name(prefix),
    };
    topic::validate(&name)?;
    trace!(node = %self.name, store = %name, "resolved store name");
    Ok(name)
  }
}

impl<K> Clone for StreamNode<K> {
  fn clone(&self) -> Self {
    Self {
      topology: Arc::clone(&self.topology),
      name: self.name.clone(),
      source_nodes: Arc::clone(&self.source_nodes),
      _key: PhantomData,
    }
  }
}

impl<K> From<&StreamNode<K>> for StreamNode<K> {
  fn from(node: &StreamNode<K>) -> Self {
    node.clone()
  }
}

impl<K> fmt::Debug for StreamNode<K> {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.debug_struct("StreamNode")
      .field("name", &self.name)
      .field("source_nodes", &self.source_nodes)
      .finish_non_exhaustive()
  }
}
