//! State store descriptors for stateful operators.
//!
//! Every store requested through this module is persistent and has caching
//! enabled. Windowed stores never retain duplicates: the last write for a
//! (key, window) pair wins.

use crate::error::{TopologyError, TopologyResult};
use crate::serialization::Serde;
use crate::stores::{StoreDescriptor, StoreFactory, Stores};
use crate::topic;
use crate::window::Windows;
use std::sync::Arc;
use tracing::debug;

fn require_store_name(store_name: Option<&str>) -> TopologyResult<&str> {
  let store_name = store_name.ok_or_else(|| TopologyError::null_required("store_name"))?;
  topic::validate(store_name)?;
  Ok(store_name)
}

/// Persistent, caching-enabled factory both descriptor builders start from.
pub fn store_factory<K, V>(
  key_serde: Arc<dyn Serde<K>>,
  value_serde: Arc<dyn Serde<V>>,
  store_name: &str,
) -> StoreFactory<K, V> {
  Stores::create(store_name)
    .with_keys(key_serde)
    .with_values(value_serde)
    .persistent()
    .enable_caching()
}

/// Describes a persistent, caching-enabled key-value store.
///
/// # Errors
///
/// - [`TopologyError::NullRequired`] if `store_name` is `None`.
/// - [`TopologyError::NameInvalid`] if `store_name` is not a legal name.
pub fn key_value_store<K, V>(
  key_serde: Arc<dyn Serde<K>>,
  value_serde: Arc<dyn Serde<V>>,
  store_name: Option<&str>,
) -> TopologyResult<StoreDescriptor<K, V>> {
  let store_name = require_store_name(store_name)?;
  let descriptor = store_factory(key_serde, value_serde, store_name).build();
  debug!(store = store_name, "described key-value store");
  Ok(descriptor)
}

/// Describes a persistent, caching-enabled windowed store sized by `windows`.
///
/// # Errors
///
/// - [`TopologyError::NullRequired`] if `store_name` is `None`.
/// - [`TopologyError::NameInvalid`] if `store_name` is not a legal name.
pub fn windowed_store<K, V, W>(
  key_serde: Arc<dyn Serde<K>>,
  value_serde: Arc<dyn Serde<V>>,
  windows: &W,
  store_name: Option<&str>,
) -> TopologyResult<StoreDescriptor<K, V>>
where
  W: Windows + ?Sized,
{
  let store_name = require_store_name(store_name)?;
  let descriptor = store_factory(key_serde, value_serde, store_name)
    .windowed(windows.size(), windows.maintain(), windows.segments(), false)
    .build();
  debug!(
    store = store_name,
    window_size = ?windows.size(),
    retention = ?windows.maintain(),
    segments = windows.segments(),
    "described windowed store"
  );
  Ok(descriptor)
}
