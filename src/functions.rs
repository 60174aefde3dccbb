//! # User Function Shapes
//!
//! The function values operators accept from users, in both calling
//! conventions:
//!
//! - **Key-oblivious**: [`ValueMapper`], [`ValueJoiner`], [`Reducer`],
//!   [`Initializer`], [`ValueTransformer`], [`ValueTransformerSupplier`].
//! - **Key-aware**: [`ValueMapperWithKey`], [`ValueJoinerWithKey`],
//!   [`ReducerWithKey`], [`InitializerWithKey`], [`ValueTransformerWithKey`],
//!   [`ValueTransformerWithKeySupplier`].
//!
//! The execution engine only deals with the key-aware shapes; the adapters in
//! [`key_adapter`](crate::key_adapter) lift key-oblivious values into them.
//!
//! Keys are always passed by shared reference. They are read-only: a function
//! that could change a key could silently break partitioning.
//!
//! Stateless shapes are implemented for plain closures, so
//! `|a: i32, b: i32| a + b` is a `ValueJoiner<i32, i32, i32>` and
//! `|_k: &String, a: i32, b: i32| a + b` is a `ValueJoinerWithKey<String, i32, i32, i32>`.

use crate::processor::ProcessorContext;
use chrono::{DateTime, Utc};
use std::sync::Arc;

/// Maps a value to a new value.
pub trait ValueMapper<V, VR>: Send + Sync {
  /// Maps `value` to a new value.
  fn apply(&self, value: V) -> VR;
}

impl<V, VR, F> ValueMapper<V, VR> for F
where
  F: Fn(V) -> VR + Send + Sync,
{
  fn apply(&self, value: V) -> VR {
    self(value)
  }
}

/// Maps a value to a new value given its read-only key.
pub trait ValueMapperWithKey<K, V, VR>: Send + Sync {
  /// Maps `value` to a new value.
  fn apply(&self, key: &K, value: V) -> VR;
}

impl<K, V, VR, F> ValueMapperWithKey<K, V, VR> for F
where
  F: Fn(&K, V) -> VR + Send + Sync,
{
  fn apply(&self, key: &K, value: V) -> VR {
    self(key, value)
  }
}

/// Joins two values into a new value.
pub trait ValueJoiner<V1, V2, VR>: Send + Sync {
  /// Joins `value1` and `value2`.
  fn apply(&self, value1: V1, value2: V2) -> VR;
}

impl<V1, V2, VR, F> ValueJoiner<V1, V2, VR> for F
where
  F: Fn(V1, V2) -> VR + Send + Sync,
{
  fn apply(&self, value1: V1, value2: V2) -> VR {
    self(value1, value2)
  }
}

/// Joins two values into a new value given their shared read-only key.
pub trait ValueJoinerWithKey<K, V1, V2, VR>: Send + Sync {
  /// Joins `value1` and `value2` for `key`.
  fn apply(&self, key: &K, value1: V1, value2: V2) -> VR;
}

impl<K, V1, V2, VR, F> ValueJoinerWithKey<K, V1, V2, VR> for F
where
  F: Fn(&K, V1, V2) -> VR + Send + Sync,
{
  fn apply(&self, key: &K, value1: V1, value2: V2) -> VR {
    self(key, value1, value2)
  }
}

/// Combines two values of the same type into one.
pub trait Reducer<V>: Send + Sync {
  /// Combines the aggregate `value1` with the new `value2`.
  fn apply(&self, value1: V, value2: V) -> V;
}

impl<V, F> Reducer<V> for F
where
  F: Fn(V, V) -> V + Send + Sync,
{
  fn apply(&self, value1: V, value2: V) -> V {
    self(value1, value2)
  }
}

/// Combines two values of the same type into one given their read-only key.
pub trait ReducerWithKey<K, V>: Send + Sync {
  /// Combines the aggregate `value1` with the new `value2` for `key`.
  fn apply(&self, key: &K, value1: V, value2: V) -> V;
}

impl<K, V, F> ReducerWithKey<K, V> for F
where
  F: Fn(&K, V, V) -> V + Send + Sync,
{
  fn apply(&self, key: &K, value1: V, value2: V) -> V {
    self(key, value1, value2)
  }
}

/// Produces the initial value of an aggregation.
pub trait Initializer<VA>: Send + Sync {
  /// Returns a fresh initial aggregate.
  fn apply(&self) -> VA;
}

impl<VA, F> Initializer<VA> for F
where
  F: Fn() -> VA + Send + Sync,
{
  fn apply(&self) -> VA {
    self()
  }
}

/// Produces the initial value of an aggregation for a read-only key.
pub trait InitializerWithKey<K, VA>: Send + Sync {
  /// Returns a fresh initial aggregate for `key`.
  fn apply(&self, key: &K) -> VA;
}

impl<K, VA, F> InitializerWithKey<K, VA> for F
where
  F: Fn(&K) -> VA + Send + Sync,
{
  fn apply(&self, key: &K) -> VA {
    self(key)
  }
}

/// Stateful, record-by-record value transformation.
///
/// Lifecycle: `init` is called exactly once before the first `transform`,
/// `close` exactly once after the last use. `punctuate` may be called at any
/// time in between.
pub trait ValueTransformer<V, VR>: Send {
  /// Initializes the transformer with the context of its task.
  fn init(&mut self, context: Arc<dyn ProcessorContext>);

  /// Transforms a single value.
  fn transform(&mut self, value: V) -> VR;

  /// Performs scheduled work; returns a value to forward, if any.
  fn punctuate(&mut self, timestamp: DateTime<Utc>) -> Option<VR>;

  /// Releases resources held by the transformer.
  fn close(&mut self);
}

/// Stateful value transformation that sees the read-only record key.
///
/// Follows the same lifecycle as [`ValueTransformer`].
pub trait ValueTransformerWithKey<K, V, VR>: Send {
  /// Initializes the transformer with the context of its task.
  fn init(&mut self, context: Arc<dyn ProcessorContext>);

  /// Transforms a single value of the record with `key`.
  fn transform(&mut self, key: &K, value: V) -> VR;

  /// Performs scheduled work; returns a value to forward, if any.
  fn punctuate(&mut self, timestamp: DateTime<Utc>) -> Option<VR>;

  /// Releases resources held by the transformer.
  fn close(&mut self);
}

/// Creates a new [`ValueTransformer`] per task.
pub trait ValueTransformerSupplier<V, VR>: Send + Sync {
  /// The transformer type produced.
  type Transformer: ValueTransformer<V, VR>;

  /// Returns a new transformer instance; instances are never shared.
  fn get(&self) -> Self::Transformer;
}

impl<V, VR, T, F> ValueTransformerSupplier<V, VR> for F
where
  F: Fn() -> T + Send + Sync,
  T: ValueTransformer<V, VR>,
{
  type Transformer = T;

  fn get(&self) -> T {
    self()
  }
}

/// Creates a new [`ValueTransformerWithKey`] per task.
pub trait ValueTransformerWithKeySupplier<K, V, VR>: Send + Sync {
  /// The transformer type produced.
  type Transformer: ValueTransformerWithKey<K, V, VR>;

  /// Returns a new transformer instance; instances are never shared.
  fn get(&self) -> Self::Transformer;
}

impl<K, V, VR, T, F> ValueTransformerWithKeySupplier<K, V, VR> for F
where
  F: Fn() -> T + Send + Sync,
  T: ValueTransformerWithKey<K, V, VR>,
{
  type Transformer = T;

  fn get(&self) -> T {
    self()
  }
}
