//! Legal-name checks for store and topic identifiers.
//!
//! Store names double as changelog topic names, so they obey the same rules as
//! topics: non-empty, not `.` or `..`, at most [`MAX_NAME_LENGTH`] characters,
//! and only ASCII alphanumerics, `.`, `_` and `-`.

use crate::error::{TopologyError, TopologyResult};
use regex::Regex;
use std::sync::LazyLock;

/// Maximum length of a legal store/topic name.
pub const MAX_NAME_LENGTH: usize = 249;

static LEGAL_CHARS: LazyLock<Regex> =
  LazyLock::new(|| Regex::new(r"^[a-zA-Z0-9._-]+$").expect("legal-name pattern compiles"));

/// Validates `name` as a legal store/topic identifier.
///
/// # Errors
///
/// Returns [`TopologyError::NameInvalid`] describing the first rule `name` breaks.
pub fn validate(name: &str) -> TopologyResult<()> {
  if name.is_empty() {
    return Err(TopologyError::name_invalid(
      "name is illegal, it can't be empty",
    ));
  }
  if name == "." || name == ".." {
    return Err(TopologyError::name_invalid(
      "name cannot be \".\" or \"..\"",
    ));
  }
  if name.len() > MAX_NAME_LENGTH {
    return Err(TopologyError::name_invalid(format!(
      "name is illegal, it can't be longer than {} characters, name: {}",
      MAX_NAME_LENGTH, name
    )));
  }
  if !LEGAL_CHARS.is_match(name) {
    return Err(TopologyError::name_invalid(format!(
      "name \"{}\" is illegal, it contains a character other than ASCII alphanumerics, '.', '_' and '-'",
      name
    )));
  }
  Ok(())
}

/// Returns true if `name` passes [`validate`].
pub fn is_valid(name: &str) -> bool {
  validate(name).is_ok()
}
