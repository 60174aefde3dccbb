//! Store factory: fluent construction of state store descriptors.
//!
//! A [`StoreDescriptor`] only describes a store; the engine that consumes it
//! creates the physical store.
//!
//! ```rust
//! use streamweave_kstream::serialization::JsonSerde;
//! use streamweave_kstream::stores::{StoreKind, Stores};
//! use std::sync::Arc;
//!
//! let descriptor = Stores::create("counts")
//!   .with_keys(Arc::new(JsonSerde::<String>::new()))
//!   .with_values(Arc::new(JsonSerde::<u64>::new()))
//!   .persistent()
//!   .enable_caching()
//!   .build();
//!
//! assert_eq!(descriptor.name(), "counts");
//! assert_eq!(descriptor.spec().kind, StoreKind::KeyValue);
//! ```

use crate::serialization::Serde;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;
use std::time::Duration;

/// Parameters of a windowed store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct WindowedSpec {
  /// Size of a single window.
  pub window_size: Duration,
  /// How long windows are retained.
  pub retention: Duration,
  /// Number of segments the retention is split into.
  pub segments: u32,
  /// Whether duplicate values for the same window key are kept.
  pub retain_duplicates: bool,
}

/// Kind of store a descriptor requests.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum StoreKind {
  /// Plain key-indexed store.
  KeyValue,
  /// Store keyed by (key, window).
  Windowed(WindowedSpec),
}

/// Type-erased, serializable part of a store descriptor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoreSpec {
  /// Store name.
  pub name: String,
  /// Tag of the key type.
  pub key_type: String,
  /// Tag of the value type.
  pub value_type: String,
  /// Whether the store is backed by durable storage.
  pub persistent: bool,
  /// Whether writes are cached before being flushed downstream.
  pub caching: bool,
  /// Whether changes are written to a changelog topic.
  pub logging: bool,
  /// Topic configuration for the changelog.
  pub log_config: BTreeMap<String, String>,
  /// Key-value or windowed.
  pub kind: StoreKind,
}

/// Request for a state store, consumed by the store-construction engine.
pub struct StoreDescriptor<K, V> {
  spec: StoreSpec,
  key_serde: Arc<dyn Serde<K>>,
  value_serde: Arc<dyn Serde<V>>,
}

impl<K, V> StoreDescriptor<K, V> {
  /// Store name.
  pub fn name(&self) -> &str {
    &self.spec.name
  }

  /// Type-erased description of the requested store.
  pub fn spec(&self) -> &StoreSpec {
    &self.spec
  }

  /// Windowed parameters, if this describes a windowed store.
  pub fn windowed(&self) -> Option<&WindowedSpec> {
    match &self.spec.kind {
      StoreKind::Windowed(spec) => Some(spec),
      StoreKind::KeyValue => None,
    }
  }

  /// Key serialization strategy.
  pub fn key_serde(&self) -> &Arc<dyn Serde<K>> {
    &self.key_serde
  }

  /// Value serialization strategy.
  pub fn value_serde(&self) -> &Arc<dyn Serde<V>> {
    &self.value_serde
  }
}

impl<K, V> Clone for StoreDescriptor<K, V> {
  fn clone(&self) -> Self {
    Self {
      spec: self.spec.clone(),
      key_serde: Arc::clone(&self.key_serde),
      value_serde: Arc::clone(&self.value_serde),
    }
  }
}

impl<K, V> fmt::Debug for StoreDescriptor<K, V> {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.debug_struct("StoreDescriptor")
      .field("spec", &self.spec)
      .finish_non_exhaustive()
  }
}

/// Entry point of the fluent store factory.
pub struct Stores;

impl Stores {
  /// Starts describing a store called `name`.
  pub fn create(name: impl Into<String>) -> KeyStep {
    KeyStep { name: name.into() }
  }
}

/// Factory step awaiting the key serde.
#[derive(Debug)]
pub struct KeyStep {
  name: String,
}

impl KeyStep {
  /// Sets the key serialization strategy.
  pub fn with_keys<K>(self, key_serde: Arc<dyn Serde<K>>) -> ValueStep<K> {
    ValueStep {
      name: self.name,
      key_serde,
    }
  }
}

/// Factory step awaiting the value serde.
pub struct ValueStep<K> {
  name: String,
  key_serde: Arc<dyn Serde<K>>,
}

impl<K> ValueStep<K> {
  /// Sets the value serialization strategy.
  pub fn with_values<V>(self, value_serde: Arc<dyn Serde<V>>) -> StoreFactory<K, V> {
    StoreFactory {
      name: self.name,
      key_serde: self.key_serde,
      value_serde,
      persistent: false,
      caching: false,
      logging: true,
      log_config: BTreeMap::new(),
      windowed: None,
    }
  }
}

/// Configurable store factory; defaults to an in-memory, uncached, logged
/// key-value store.
pub struct StoreFactory<K, V> {
  name: String,
  key_serde: Arc<dyn Serde<K>>,
  value_serde: Arc<dyn Serde<V>>,
  persistent: bool,
  caching: bool,
  logging: bool,
  log_config: BTreeMap<String, String>,
  windowed: Option<WindowedSpec>,
}

impl<K, V> StoreFactory<K, V> {
  /// Requests durable storage.
  pub fn persistent(mut self) -> Self {
    self.persistent = true;
    self
  }

  /// Requests a write cache in front of the store.
  pub fn enable_caching(mut self) -> Self {
    self.caching = true;
    self
  }

  /// Requests a changelog with the given topic configuration.
  pub fn enable_logging(mut self, config: BTreeMap<String, String>) -> Self {
    self.logging = true;
    self.log_config = config;
    self
  }

  /// Disables the changelog.
  pub fn disable_logging(mut self) -> Self {
    self.logging = false;
    self.log_config.clear();
    self
  }

  /// Turns the store into a windowed store.
  pub fn windowed(
    mut self,
    window_size: Duration,
    retention: Duration,
    segments: u32,
    retain_duplicates: bool,
  ) -> Self {
    self.windowed = Some(WindowedSpec {
      window_size,
      retention,
      segments,
      retain_duplicates,
    });
    self
  }

  /// Produces the descriptor.
  pub fn build(self) -> StoreDescriptor<K, V> {
    let kind = match self.windowed {
      Some(spec) => StoreKind::Windowed(spec),
      None => StoreKind::KeyValue,
    };
    StoreDescriptor {
      spec: StoreSpec {
        name: self.name,
        key_type: self.key_serde.type_tag().to_string(),
        value_type: self.value_serde.type_tag().to_string(),
        persistent: self.persistent,
        caching: self.caching,
        logging: self.logging,
        log_config: self.log_config,
        kind,
      },
      key_serde: self.key_serde,
      value_serde: self.value_serde,
    }
  }
}
