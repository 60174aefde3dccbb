//! Topology-wide configuration.
//!
//! Values here shape names the topology derives on its own, such as changelog
//! topics for logged state stores. Loading configuration from files or the
//! environment is left to the application.

use crate::error::TopologyResult;
use crate::topic;
use serde::{Deserialize, Serialize};

/// Default suffix appended to changelog topic names.
pub const DEFAULT_CHANGELOG_SUFFIX: &str = "-changelog";

/// Configuration for a [`TopologyBuilder`](crate::topology::TopologyBuilder).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TopologyConfig {
  /// Application identifier; prefixes every changelog topic.
  pub application_id: String,
  /// Suffix appended to `<application_id>-<store>` for changelog topics.
  pub changelog_suffix: String,
}

impl Default for TopologyConfig {
  fn default() -> Self {
    Self {
      application_id: "streamweave-app".to_string(),
      changelog_suffix: DEFAULT_CHANGELOG_SUFFIX.to_string(),
    }
  }
}

impl TopologyConfig {
  /// Creates a configuration with default values.
  pub fn new() -> Self {
    Self::default()
  }

  /// Sets the application identifier.
  pub fn with_application_id(mut self, application_id: impl Into<String>) -> Self {
    self.application_id = application_id.into();
    self
  }

  /// Sets the changelog topic suffix.
  pub fn with_changelog_suffix(mut self, suffix: impl Into<String>) -> Self {
    self.changelog_suffix = suffix.into();
    self
  }

  /// Checks that names derived from this configuration can be legal.
  ///
  /// # Errors
  ///
  /// Returns [`TopologyError::NameInvalid`](crate::error::TopologyError::NameInvalid)
  /// if the application id or the changelog suffix contains illegal characters.
  pub fn validate(&self) -> TopologyResult<()> {
    topic::validate(&self.application_id)?;
    topic::validate(&format!("x{}", self.changelog_suffix))
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_defaults_are_valid() {
    let config = TopologyConfig::default();
    assert_eq!(config.changelog_suffix, "-changelog");
    assert!(config.validate().is_ok());
  }

  #[test]
  fn test_builder_methods() {
    let config = TopologyConfig::new()
      .with_application_id("orders")
      .with_changelog_suffix("-log");
    assert_eq!(config.application_id, "orders");
    assert_eq!(config.changelog_suffix, "-log");
  }

  #[test]
  fn test_rejects_illegal_application_id() {
    let config = TopologyConfig::new().with_application_id("my app");
    assert!(config.validate().unwrap_err().is_name_invalid());
  }

  #[test]
  fn test_deserialize_fills_defaults() {
    let config: TopologyConfig = serde_json::from_str(r#"{"application_id":"billing"}"#).unwrap();
    assert_eq!(config.application_id, "billing");
    assert_eq!(config.changelog_suffix, DEFAULT_CHANGELOG_SUFFIX);
  }
}
