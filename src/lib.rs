//! # StreamWeave KStream
//!
//! Shared foundation of the stream and table nodes of a record-stream topology.
//!
//! Before a join or aggregation is wired, its operator uses this crate to:
//!
//! 1. enforce co-partitioning between its inputs with
//!    [`StreamNode::ensure_joinable_with`](stream_node::StreamNode::ensure_joinable_with),
//! 2. describe the state it needs with
//!    [`key_value_store`](state_store::key_value_store) or
//!    [`windowed_store`](state_store::windowed_store),
//! 3. normalize the user's functions into their key-aware shape with the
//!    adapters in [`key_adapter`].
//!
//! All of this happens while the topology is being built, on a single thread,
//! before any record is processed. Every failure is returned as a
//! [`TopologyError`](error::TopologyError) and aborts construction.
//!
//! ## Quick Start
//!
//! ```rust
//! use streamweave_kstream::key_adapter::joiner_with_key;
//! use streamweave_kstream::serialization::JsonSerde;
//! use streamweave_kstream::state_store::windowed_store;
//! use streamweave_kstream::stream_node::StreamNode;
//! use streamweave_kstream::topology::{Topology, TopologyBuilder};
//! use streamweave_kstream::window::JoinWindows;
//! use std::collections::BTreeSet;
//! use std::sync::Arc;
//! use std::time::Duration;
//!
//! let builder = Arc::new(TopologyBuilder::new());
//! builder.add_source("orders-source", ["orders"])?;
//! builder.add_source("payments-source", ["payments"])?;
//! let topology: Arc<dyn Topology> = builder.clone();
//!
//! let orders: StreamNode<String> =
//!   StreamNode::new(topology.clone(), "orders", BTreeSet::from(["orders-source".to_string()]))?;
//! let payments: StreamNode<String> =
//!   StreamNode::new(topology, "payments", BTreeSet::from(["payments-source".to_string()]))?;
//!
//! let sources = orders.ensure_joinable_with(&payments);
//! let store_name = orders.get_or_create_name(None, "KSTREAM-JOIN-")?;
//! let store = windowed_store(
//!   Arc::new(JsonSerde::<String>::new()),
//!   Arc::new(JsonSerde::<String>::new()),
//!   &JoinWindows::of(Duration::from_secs(60)),
//!   Some(store_name.as_str()),
//! )?;
//! let joiner = joiner_with_key(Some(|order: String, payment: String| format!("{order}/{payment}")))?;
//!
//! builder.add_state_store(&store, &["KSTREAM-JOIN-0000000001"])?;
//! assert_eq!(sources.len(), 2);
//! # let _ = joiner;
//! # Ok::<(), streamweave_kstream::error::TopologyError>(())
//! ```

// Documentation enforcement - treat missing docs as errors
#![deny(missing_docs)]

/// Topology-wide configuration.
pub mod config;
/// Errors raised while building a topology.
pub mod error;
/// User function shapes, key-oblivious and key-aware.
pub mod functions;
/// Adapters from key-oblivious to key-aware functions.
pub mod key_adapter;
/// Processor context handed to stateful functions.
pub mod processor;
/// Serialization strategies carried by store descriptors.
pub mod serialization;
/// Persistent, cached state store descriptors.
pub mod state_store;
/// Fluent store factory.
pub mod stores;
/// Stream and table node handles.
pub mod stream_node;
/// Legal-name checks for stores and topics.
pub mod topic;
/// Topology collaborator: names, co-partitioning, state stores.
pub mod topology;
/// Windowing specifications for windowed stores.
pub mod window;

#[cfg(test)]
mod topology_test;
