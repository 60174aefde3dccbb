//! # Error Handling
//!
//! Errors raised while a topology is being built. Every failure in this crate is
//! detected synchronously, at construction or adaptation time, and is returned
//! to the topology-building caller, which is expected to abort construction.
//!
//! ## Error Kinds
//!
//! - **InvalidArgument**: an argument violates a precondition (an empty
//!   source-node set, an unset function slot, an invalid window parameter, a
//!   duplicate registration).
//! - **NullRequired**: a mandatory value, such as a store name, was not supplied.
//! - **NameInvalid**: an identifier is not a legal store/topic name.
//!
//! Nothing here is retried: every operation is deterministic, so a retry would
//! reproduce the same failure.
//!
//! ## Example
//!
//! ```rust
//! use streamweave_kstream::error::{TopologyError, TopologyResult};
//!
//! fn require_store_name(name: Option<&str>) -> TopologyResult<&str> {
//!     name.ok_or_else(|| TopologyError::null_required("store_name"))
//! }
//!
//! assert!(require_store_name(None).is_err());
//! ```

use thiserror::Error;

/// Error type for topology construction.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TopologyError {
  /// An argument violated a precondition.
  #[error("invalid argument: {0}")]
  InvalidArgument(String),
  /// A mandatory value was not supplied.
  #[error("{0} can't be null")]
  NullRequired(String),
  /// An identifier failed the legal-name check.
  #[error("invalid name: {0}")]
  NameInvalid(String),
}

impl TopologyError {
  /// Creates an [`TopologyError::InvalidArgument`] error.
  pub fn invalid_argument(message: impl Into<String>) -> Self {
    TopologyError::InvalidArgument(message.into())
  }

  /// Creates a [`TopologyError::NullRequired`] error naming the missing parameter.
  pub fn null_required(parameter: impl Into<String>) -> Self {
    TopologyError::NullRequired(parameter.into())
  }

  /// Creates a [`TopologyError::NameInvalid`] error.
  pub fn name_invalid(message: impl Into<String>) -> Self {
    TopologyError::NameInvalid(message.into())
  }

  /// Returns true for [`TopologyError::InvalidArgument`].
  pub fn is_invalid_argument(&self) -> bool {
    matches!(self, TopologyError::InvalidArgument(_))
  }

  /// Returns true for [`TopologyError::NullRequired`].
  pub fn is_null_required(&self) -> bool {
    matches!(self, TopologyError::NullRequired(_))
  }

  /// Returns true for [`TopologyError::NameInvalid`].
  pub fn is_name_invalid(&self) -> bool {
    matches!(self, TopologyError::NameInvalid(_))
  }
}

/// Result type for topology construction.
pub type TopologyResult<T> = Result<T, TopologyError>;
