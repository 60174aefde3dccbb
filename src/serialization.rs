//! Serialization strategies handed to state store descriptors.
//!
//! The core never serializes records itself; it only carries a [`Serde`] for
//! the key and the value of each store so the store factory can build it.
//! [`JsonSerde`] is the default strategy, backed by `serde_json`.

use serde::Serialize;
use serde::de::DeserializeOwned;
use std::fmt;
use std::marker::PhantomData;
use thiserror::Error;

/// Error type for serialization strategies.
#[derive(Error, Debug)]
pub enum SerdeError {
  /// Encoding a value failed.
  #[error("serialization failed for topic {topic}: {message}")]
  Serialize {
    /// Topic the value was destined for.
    topic: String,
    /// Underlying error message.
    message: String,
  },
  /// Decoding bytes failed.
  #[error("deserialization failed for topic {topic}: {message}")]
  Deserialize {
    /// Topic the bytes came from.
    topic: String,
    /// Underlying error message.
    message: String,
  },
}

/// Serializer/deserializer pair for values of type `T`.
pub trait Serde<T>: Send + Sync {
  /// Encodes `data` destined for `topic`.
  fn serialize(&self, topic: &str, data: &T) -> Result<Vec<u8>, SerdeError>;

  /// Decodes `bytes` read from `topic`.
  fn deserialize(&self, topic: &str, bytes: &[u8]) -> Result<T, SerdeError>;

  /// Tag naming the serialized type, used in store descriptors.
  fn type_tag(&self) -> &'static str {
    std::any::type_name::<T>()
  }
}

/// JSON serialization strategy.
pub struct JsonSerde<T> {
  _marker: PhantomData<fn() -> T>,
}

impl<T> JsonSerde<T> {
  /// Creates a JSON serde for `T`.
  pub fn new() -> Self {
    Self {
      _marker: PhantomData,
    }
  }
}

impl<T> Default for JsonSerde<T> {
  fn default() -> Self {
    Self::new()
  }
}

impl<T> Clone for JsonSerde<T> {
  fn clone(&self) -> Self {
    Self::new()
  }
}

impl<T> fmt::Debug for JsonSerde<T> {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "JsonSerde<{}>", std::any::type_name::<T>())
  }
}

impl<T> Serde<T> for JsonSerde<T>
where
  T: Serialize + DeserializeOwned,
{
  fn serialize(&self, topic: &str, data: &T) -> Result<Vec<u8>, SerdeError> {
    serde_json::to_vec(data).map_err(|e| SerdeError::Serialize {
      topic: topic.to_string(),
      message: e.to_string(),
    })
  }

  fn deserialize(&self, topic: &str, bytes: &[u8]) -> Result<T, SerdeError> {
    serde_json::from_slice(bytes).map_err(|e| SerdeError::Deserialize {
      topic: topic.to_string(),
      message: e.to_string(),
    })
  }
}
