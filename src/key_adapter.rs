//! # Key Adaptation
//!
//! Lifts key-oblivious user functions into their key-aware shape, and reverses
//! the argument order of binary joiners, so operators only ever call one
//! convention.
//!
//! Each adapter is a small stateless wrapper struct that implements the
//! key-aware trait by forwarding to the wrapped function:
//!
//! | Adapter | Wraps | Implements |
//! |---|---|---|
//! | [`ReversedJoiner`] | `ValueJoiner<V1, V2, VR>` | `ValueJoiner<V2, V1, VR>` |
//! | [`ReversedJoinerWithKey`] | `ValueJoinerWithKey<K, V1, V2, VR>` | `ValueJoinerWithKey<K, V2, V1, VR>` |
//! | [`KeyIgnoringMapper`] | `ValueMapper<V, VR>` | `ValueMapperWithKey<K, V, VR>` |
//! | [`KeyIgnoringJoiner`] | `ValueJoiner<V1, V2, VR>` | `ValueJoinerWithKey<K, V1, V2, VR>` |
//! | [`KeyIgnoringTransformer`] | `ValueTransformer<V, VR>` | `ValueTransformerWithKey<K, V, VR>` |
//! | [`KeyIgnoringTransformerSupplier`] | `ValueTransformerSupplier<V, VR>` | `ValueTransformerWithKeySupplier<K, V, VR>` |
//! | [`KeyIgnoringReducer`] | `Reducer<V>` | `ReducerWithKey<K, V>` |
//! | [`KeyIgnoringInitializer`] | `Initializer<VA>` | `InitializerWithKey<K, VA>` |
//!
//! The `*_with_key` functions take the function slot as an `Option`, the way an
//! operator receives it from its builder, and reject an unset slot with
//! [`TopologyError::InvalidArgument`].
//!
//! ## Example
//!
//! ```rust
//! use streamweave_kstream::functions::{ValueJoiner, ValueJoinerWithKey};
//! use streamweave_kstream::key_adapter::{joiner_with_key, reverse_joiner};
//!
//! let concat = |left: String, right: i32| format!("{}:{}", left, right);
//!
//! let reversed = reverse_joiner(concat);
//! assert_eq!(ValueJoiner::apply(&reversed, 7, "a".to_string()), "a:7");
//!
//! let keyed = joiner_with_key(Some(concat)).unwrap();
//! assert_eq!(ValueJoinerWithKey::apply(&keyed, &"key", "a".to_string(), 7), "a:7");
//! ```

use crate::error::{TopologyError, TopologyResult};
use crate::functions::{
  Initializer, InitializerWithKey, Reducer, ReducerWithKey, ValueJoiner, ValueJoinerWithKey,
  ValueMapper, ValueMapperWithKey, ValueTransformer, ValueTransformerSupplier,
  ValueTransformerWithKey, ValueTransformerWithKeySupplier,
};
use crate::processor::ProcessorContext;
use chrono::{DateTime, Utc};
use std::sync::Arc;

fn require<F>(function: Option<F>, parameter: &str) -> TopologyResult<F> {
  function.ok_or_else(|| TopologyError::invalid_argument(format!("{} must not be null", parameter)))
}

/// Joiner that takes its inputs in the opposite order of the wrapped joiner.
#[derive(Debug, Clone, Copy)]
pub struct ReversedJoiner<J> {
  joiner: J,
}

impl<J> ReversedJoiner<J> {
  /// Wraps `joiner`.
  pub fn new(joiner: J) -> Self {
    Self { joiner }
  }

  /// Returns the wrapped joiner.
  pub fn into_inner(self) -> J {
    self.joiner
  }
}

impl<V1, V2, VR, J> ValueJoiner<V2, V1, VR> for ReversedJoiner<J>
where
  J: ValueJoiner<V1, V2, VR>,
{
  fn apply(&self, value2: V2, value1: V1) -> VR {
    self.joiner.apply(value1, value2)
  }
}

/// Key-aware joiner that takes its values in the opposite order of the wrapped joiner.
#[derive(Debug, Clone, Copy)]
pub struct ReversedJoinerWithKey<J> {
  joiner: J,
}

impl<J> ReversedJoinerWithKey<J> {
  /// Wraps `joiner`.
  pub fn new(joiner: J) -> Self {
    Self { joiner }
  }

  /// Returns the wrapped joiner.
  pub fn into_inner(self) -> J {
    self.joiner
  }
}

impl<K, V1, V2, VR, J> ValueJoinerWithKey<K, V2, V1, VR> for ReversedJoinerWithKey<J>
where
  J: ValueJoinerWithKey<K, V1, V2, VR>,
{
  fn apply(&self, key: &K, value2: V2, value1: V1) -> VR {
    self.joiner.apply(key, value1, value2)
  }
}

/// Reverses a joiner for evaluation from the second input's perspective.
///
/// `reverse_joiner(j).apply(b, a)` returns `j.apply(a, b)`.
pub fn reverse_joiner<J>(joiner: J) -> ReversedJoiner<J> {
  ReversedJoiner::new(joiner)
}

/// Reverses a key-aware joiner; the key is passed through unchanged.
///
/// `reverse_joiner_with_key(j).apply(k, b, a)` returns `j.apply(k, a, b)`.
pub fn reverse_joiner_with_key<J>(joiner: J) -> ReversedJoinerWithKey<J> {
  ReversedJoinerWithKey::new(joiner)
}

/// Key-aware mapper that ignores the key.
#[derive(Debug, Clone, Copy)]
pub struct KeyIgnoringMapper<M> {
  mapper: M,
}

impl<M> KeyIgnoringMapper<M> {
  /// Wraps `mapper`.
  pub fn new(mapper: M) -> Self {
    Self { mapper }
  }
}

impl<K, V, VR, M> ValueMapperWithKey<K, V, VR> for KeyIgnoringMapper<M>
where
  M: ValueMapper<V, VR>,
{
  fn apply(&self, _key: &K, value: V) -> VR {
    self.mapper.apply(value)
  }
}

/// Lifts a value mapper into a key-aware mapper.
///
/// # Errors
///
/// Returns [`TopologyError::InvalidArgument`] if `mapper` is `None`.
pub fn mapper_with_key<M>(mapper: Option<M>) -> TopologyResult<KeyIgnoringMapper<M>> {
  require(mapper, "value_mapper").map(KeyIgnoringMapper::new)
}

/// Key-aware joiner that ignores the key.
#[derive(Debug, Clone, Copy)]
pub struct KeyIgnoringJoiner<J> {
  joiner: J,
}

impl<J> KeyIgnoringJoiner<J> {
  /// Wraps `joiner`.
  pub fn new(joiner: J) -> Self {
    Self { joiner }
  }
}

impl<K, V1, V2, VR, J> ValueJoinerWithKey<K, V1, V2, VR> for KeyIgnoringJoiner<J>
where
  J: ValueJoiner<V1, V2, VR>,
{
  fn apply(&self, _key: &K, value1: V1, value2: V2) -> VR {
    self.joiner.apply(value1, value2)
  }
}

/// Lifts a value joiner into a key-aware joiner.
///
/// # Errors
///
/// Returns [`TopologyError::InvalidArgument`] if `joiner` is `None`.
pub fn joiner_with_key<J>(joiner: Option<J>) -> TopologyResult<KeyIgnoringJoiner<J>> {
  require(joiner, "value_joiner").map(KeyIgnoringJoiner::new)
}

/// Key-aware transformer that drops the key before calling the wrapped transformer.
///
/// `init`, `punctuate` and `close` are forwarded unchanged and in the order the
/// caller issues them; the wrapper adds no lifecycle of its own.
#[derive(Debug)]
pub struct KeyIgnoringTransformer<T> {
  transformer: T,
}

impl<T> KeyIgnoringTransformer<T> {
  /// Wraps `transformer`.
  pub fn new(transformer: T) -> Self {
    Self { transformer }
  }

  /// Returns the wrapped transformer.
  pub fn into_inner(self) -> T {
    self.transformer
  }
}

impl<K, V, VR, T> ValueTransformerWithKey<K, V, VR> for KeyIgnoringTransformer<T>
where
  T: ValueTransformer<V, VR>,
{
  fn init(&mut self, context: Arc<dyn ProcessorContext>) {
    self.transformer.init(context);
  }

  fn transform(&mut self, _key: &K, value: V) -> VR {
    self.transformer.transform(value)
  }

  fn punctuate(&mut self, timestamp: DateTime<Utc>) -> Option<VR> {
    self.transformer.punctuate(timestamp)
  }

  fn close(&mut self) {
    self.transformer.close();
  }
}

/// Lifts a value transformer into a key-aware transformer.
///
/// # Errors
///
/// Returns [`TopologyError::InvalidArgument`] if `transformer` is `None`.
pub fn transformer_with_key<T>(transformer: Option<T>) -> TopologyResult<KeyIgnoringTransformer<T>> {
  require(transformer, "value_transformer").map(KeyIgnoringTransformer::new)
}

/// Key-aware supplier that wraps every freshly supplied transformer.
#[derive(Debug, Clone, Copy)]
pub struct KeyIgnoringTransformerSupplier<S> {
  supplier: S,
}

impl<S> KeyIgnoringTransformerSupplier<S> {
  /// Wraps `supplier`.
  pub fn new(supplier: S) -> Self {
    Self { supplier }
  }
}

impl<K, V, VR, S> ValueTransformerWithKeySupplier<K, V, VR> for KeyIgnoringTransformerSupplier<S>
where
  S: ValueTransformerSupplier<V, VR>,
{
  type Transformer = KeyIgnoringTransformer<S::Transformer>;

  fn get(&self) -> Self::Transformer {
    KeyIgnoringTransformer::new(self.supplier.get())
  }
}

/// Lifts a value transformer supplier into a key-aware supplier.
///
/// # Errors
///
/// Returns [`TopologyError::InvalidArgument`] if `supplier` is `None`.
pub fn transformer_supplier_with_key<S>(
  supplier: Option<S>,
) -> TopologyResult<KeyIgnoringTransformerSupplier<S>> {
  require(supplier, "value_transformer_supplier").map(KeyIgnoringTransformerSupplier::new)
}

/// Key-aware reducer that ignores the key.
#[derive(Debug, Clone, Copy)]
pub struct KeyIgnoringReducer<R> {
  reducer: R,
}

impl<R> KeyIgnoringReducer<R> {
  /// Wraps `reducer`.
  pub fn new(reducer: R) -> Self {
    Self { reducer }
  }
}

impl<K, V, R> ReducerWithKey<K, V> for KeyIgnoringReducer<R>
where
  R: Reducer<V>,
{
  fn apply(&self, _key: &K, value1: V, value2: V) -> V {
    self.reducer.apply(value1, value2)
  }
}

/// Lifts a reducer into a key-aware reducer.
///
/// # Errors
///
/// Returns [`TopologyError::InvalidArgument`] if `reducer` is `None`.
pub fn reducer_with_key<R>(reducer: Option<R>) -> TopologyResult<KeyIgnoringReducer<R>> {
  require(reducer, "reducer").map(KeyIgnoringReducer::new)
}

/// Key-aware initializer that ignores the key.
#[derive(Debug, Clone, Copy)]
pub struct KeyIgnoringInitializer<I> {
  initializer: I,
}

impl<I> KeyIgnoringInitializer<I> {
  /// Wraps `initializer`.
  pub fn new(initializer: I) -> Self {
    Self { initializer }
  }
}

impl<K, VA, I> InitializerWithKey<K, VA> for KeyIgnoringInitializer<I>
where
  I: Initializer<VA>,
{
  fn apply(&self, _key: &K) -> VA {
    self.initializer.apply()
  }
}

/// Lifts an initializer into a key-aware initializer.
///
/// # Errors
///
/// Returns [`TopologyError::InvalidArgument`] if `initializer` is `None`.
pub fn initializer_with_key<I>(initializer: Option<I>) -> TopologyResult<KeyIgnoringInitializer<I>> {
  require(initializer, "initializer").map(KeyIgnoringInitializer::new)
}
