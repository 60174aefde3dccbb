//! # Topology
//!
//! The topology collaborator every stream node shares: it hands out unique
//! names, records co-partitioning requirements and tracks the state stores of
//! the topology being built.
//!
//! Stream nodes hold an `Arc<dyn Topology>`; [`TopologyBuilder`] is the
//! in-memory implementation. It uses interior mutability so that every handle
//! sees the same registrations, and it is `Send + Sync` so handles can be
//! shared with the tasks that later run the topology.
//!
//! ## Co-partitioning
//!
//! A join registers the union of the source nodes of its two inputs.
//! Registration is idempotent. Because co-partitioning is transitive,
//! [`TopologyBuilder::copartition_groups`] merges overlapping registrations
//! before mapping source nodes to their topics.
//!
//! ## Example
//!
//! ```rust
//! use streamweave_kstream::topology::{Topology, TopologyBuilder};
//! use std::collections::BTreeSet;
//!
//! let topology = TopologyBuilder::new();
//! topology.add_source("orders-source", ["orders"])?;
//! topology.add_source("customers-source", ["customers"])?;
//!
//! let sources: BTreeSet<String> =
//!   ["orders-source", "customers-source"].into_iter().map(String::from).collect();
//! topology.copartition_sources(&sources);
//!
//! assert_eq!(topology.copartition_groups().len(), 1);
//! assert_eq!(topology.new_store_name("KSTREAM-JOIN-"), "KSTREAM-JOIN-STATE-STORE-0000000000");
//! # Ok::<(), streamweave_kstream::error::TopologyError>(())
//! ```

use crate::config::TopologyConfig;
use crate::error::{TopologyError, TopologyResult};
use crate::stores::{StoreDescriptor, StoreSpec};
use crate::topic;
use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};
use tracing::{debug, trace};

/// Infix of generated state store names.
pub const STATE_STORE_NAME: &str = "STATE-STORE-";

/// Operations stream nodes need from the topology they belong to.
pub trait Topology: Send + Sync {
  /// Returns a fresh, unique processor name starting with `prefix`.
  fn new_name(&self, prefix: &str) -> String;

  /// Returns a fresh, unique state store name starting with `prefix`.
  fn new_store_name(&self, prefix: &str) -> String;

  /// Records that all `source_nodes` must be co-partitioned.
  ///
  /// Registering the same set more than once has no further effect.
  fn copartition_sources(&self, source_nodes: &BTreeSet<String>);
}

#[derive(Debug, Default)]
struct TopologyState {
  /// Source node name -> topics it reads.
  sources: BTreeMap<String, Vec<String>>,
  /// Registered co-partitioning requirements, as source node sets.
  copartition_source_groups: BTreeSet<BTreeSet<String>>,
  /// Store name -> store spec.
  state_stores: BTreeMap<String, StoreSpec>,
  /// Store name -> processors connected to it.
  store_users: BTreeMap<String, BTreeSet<String>>,
}

/// Serializable snapshot of a topology's registrations.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TopologyDescription {
  /// Application the topology belongs to.
  pub application_id: String,
  /// Source node name -> topics.
  pub sources: BTreeMap<String, Vec<String>>,
  /// Merged co-partition topic groups.
  pub copartition_groups: Vec<BTreeSet<String>>,
  /// Registered state stores.
  pub state_stores: Vec<StoreSpec>,
  /// Store name -> changelog topic, for logged stores.
  pub changelog_topics: BTreeMap<String, String>,
}

/// In-memory [`Topology`] implementation.
#[derive(Debug)]
pub struct TopologyBuilder {
  config: TopologyConfig,
  index: AtomicU64,
  state: RwLock<TopologyState>,
}

impl Default for TopologyBuilder {
  fn default() -> Self {
    Self {
      config: TopologyConfig::default(),
      index: AtomicU64::new(0),
      state: RwLock::new(TopologyState::default()),
    }
  }
}

impl TopologyBuilder {
  /// Creates a topology builder with the default configuration.
  pub fn new() -> Self {
    Self::default()
  }

  /// Creates a topology builder with `config`.
  ///
  /// # Errors
  ///
  /// Returns [`TopologyError::NameInvalid`] if the configuration cannot produce legal names.
  pub fn with_config(config: TopologyConfig) -> TopologyResult<Self> {
    config.validate()?;
    Ok(Self {
      config,
      ..Self::default()
    })
  }

  /// The configuration in use.
  pub fn config(&self) -> &TopologyConfig {
    &self.config
  }

  // Registrations stay consistent even if a panicking thread held the lock:
  // every write below completes before the guard is released.
  fn read(&self) -> RwLockReadGuard<'_, TopologyState> {
    self.state.read().unwrap_or_else(PoisonError::into_inner)
  }

  fn write(&self) -> RwLockWriteGuard<'_, TopologyState> {
    self.state.write().unwrap_or_else(PoisonError::into_inner)
  }

  fn next_index(&self) -> u64 {
    self.index.fetch_add(1, Ordering::SeqCst)
  }

  /// Registers a source node reading `topics`.
  ///
  /// # Errors
  ///
  /// - [`TopologyError::InvalidArgument`] if `name` is already registered or `topics` is empty.
  /// - [`TopologyError::NameInvalid`] if a topic name is illegal.
  pub fn add_source<I, T>(&self, name: impl Into<String>, topics: I) -> TopologyResult<()>
  where
    I: IntoIterator<Item = T>,
    T: Into<String>,
  {
    let name = name.into();
    let topics: Vec<String> = topics.into_iter().map(Into::into).collect();
    if topics.is_empty() {
      return Err(TopologyError::invalid_argument(format!(
        "source node {} must read at least one topic",
        name
      )));
    }
    for topic_name in &topics {
      topic::validate(topic_name)?;
    }

    let mut state = self.write();
    if state.sources.contains_key(&name) {
      return Err(TopologyError::invalid_argument(format!(
        "source node {} is already added",
        name
      )));
    }
    debug!(source = %name, ?topics, "added source node");
    state.sources.insert(name, topics);
    Ok(())
  }

  /// Topics read by source node `name`.
  pub fn source_topics(&self, name: &str) -> Option<Vec<String>> {
    self.read().sources.get(name).cloned()
  }

  /// Co-partitioning requirements exactly as registered.
  pub fn copartition_source_groups(&self) -> Vec<BTreeSet<String>> {
    self.read().copartition_source_groups.iter().cloned().collect()
  }

  /// Topic groups that must share a partitioning scheme.
  ///
  /// Overlapping registrations are merged. Source nodes that were never added
  /// through [`add_source`](Self::add_source) contribute no topics.
  pub fn copartition_groups(&self) -> Vec<BTreeSet<String>> {
    let state = self.read();
    let mut merged: Vec<BTreeSet<String>> = Vec::new();
    for group in &state.copartition_source_groups {
      let mut current = group.clone();
      let mut i = 0;
      while i < merged.len() {
        if merged[i].is_disjoint(&current) {
          i += 1;
        } else {
          current.extend(merged.swap_remove(i));
        }
      }
      merged.push(current);
    }

    let mut groups: Vec<BTreeSet<String>> = merged
      .into_iter()
      .map(|nodes| {
        nodes
          .iter()
          .filter_map(|node| state.sources.get(node))
          .flatten()
          .cloned()
          .collect::<BTreeSet<String>>()
      })
      .filter(|topics| !topics.is_empty())
      .collect();
    groups.sort();
    groups
  }

  /// Registers the store described by `descriptor`, used by `processors`.
  ///
  /// # Errors
  ///
  /// - [`TopologyError::InvalidArgument`] if a store with the same name is already added.
  /// - [`TopologyError::NameInvalid`] if the store is logged and its changelog
  ///   topic name is not legal, for instance because it is too long.
  pub fn add_state_store<K, V>(
    &self,
    descriptor: &StoreDescriptor<K, V>,
    processors: &[&str],
  ) -> TopologyResult<()> {
    let spec = descriptor.spec();
    if let Some(changelog) = self.changelog_topic_for(spec) {
      topic::validate(&changelog)?;
    }
    let mut state = self.write();
    if state.state_stores.contains_key(&spec.name) {
      return Err(TopologyError::invalid_argument(format!(
        "state store {} is already added",
        spec.name
      )));
    }
    state.state_stores.insert(spec.name.clone(), spec.clone());
    state
      .store_users
      .entry(spec.name.clone())
      .or_default()
      .extend(processors.iter().map(|p| p.to_string()));
    debug!(store = %spec.name, ?processors, "added state store");
    Ok(())
  }

  /// Connects additional `processors` to an already added store.
  ///
  /// # Errors
  ///
  /// Returns [`TopologyError::InvalidArgument`] if the store is unknown.
  pub fn connect_processors_to_store(&self, store_name: &str, processors: &[&str]) -> TopologyResult<()> {
    let mut state = self.write();
    if !state.state_stores.contains_key(store_name) {
      return Err(TopologyError::invalid_argument(format!(
        "state store {} is not added yet",
        store_name
      )));
    }
    state
      .store_users
      .entry(store_name.to_string())
      .or_default()
      .extend(processors.iter().map(|p| p.to_string()));
    Ok(())
  }

  /// Spec of the store called `name`.
  pub fn state_store(&self, name: &str) -> Option<StoreSpec> {
    self.read().state_stores.get(name).cloned()
  }

  /// Processors connected to the store called `name`.
  pub fn store_processors(&self, name: &str) -> BTreeSet<String> {
    self.read().store_users.get(name).cloned().unwrap_or_default()
  }

  /// Changelog topic of the store called `name`, if it is registered and logged.
  pub fn changelog_topic(&self, name: &str) -> Option<String> {
    let state = self.read();
    self.changelog_topic_for(state.state_stores.get(name)?)
  }

  fn changelog_topic_for(&self, spec: &StoreSpec) -> Option<String> {
    spec.logging.then(|| {
      format!(
        "{}-{}{}",
        self.config.application_id, spec.name, self.config.changelog_suffix
      )
    })
  }

  /// Snapshot of the current registrations.
  pub fn describe(&self) -> TopologyDescription {
    let copartition_groups = self.copartition_groups();
    let state = self.read();
    let changelog_topics = state
      .state_stores
      .values()
      .filter_map(|spec| {
        self
          .changelog_topic_for(spec)
          .map(|topic_name| (spec.name.clone(), topic_name))
      })
      .collect();
    TopologyDescription {
      application_id: self.config.application_id.clone(),
      sources: state.sources.clone(),
      copartition_groups,
      state_stores: state.state_stores.values().cloned().collect(),
      changelog_topics,
    }
  }
}

impl Topology for TopologyBuilder {
  fn new_name(&self, prefix: &str) -> String {
    let name = format!("{}{:010}", prefix, self.next_index());
    trace!(%name, "generated processor name");
    name
  }

  fn new_store_name(&self, prefix: &str) -> String {
    let name = format!("{}{}{:010}", prefix, STATE_STORE_NAME, self.next_index());
    trace!(%name, "generated store name");
    name
  }

  fn copartition_sources(&self, source_nodes: &BTreeSet<String>) {
    let inserted = self
      .write()
      .copartition_source_groups
      .insert(source_nodes.clone());
    if inserted {
      debug!(?source_nodes, "registered co-partitioning requirement");
    }
  }
}
