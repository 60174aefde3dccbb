//! Windowing specifications for windowed state stores.
//!
//! This module describes windows only as far as a windowed store needs them:
//! a window size, a retention ("maintain") duration and the number of segments
//! the store splits that retention into. Assigning records to windows is the
//! execution engine's job.
//!
//! # Window Types
//!
//! - [`TimeWindows`]: fixed-size windows, tumbling or hopping
//! - [`JoinWindows`]: the time band around a record used by stream-stream joins
//!
//! # Example
//!
//! ```rust
//! use streamweave_kstream::window::{TimeWindows, Windows};
//! use std::time::Duration;
//!
//! let windows = TimeWindows::of(Duration::from_secs(300))?
//!   .advance_by(Duration::from_secs(60))?
//!   .until(Duration::from_secs(3600))?;
//!
//! assert_eq!(windows.size(), Duration::from_secs(300));
//! assert_eq!(windows.maintain(), Duration::from_secs(3600));
//! # Ok::<(), streamweave_kstream::error::TopologyError>(())
//! ```

use crate::error::{TopologyError, TopologyResult};
use std::time::Duration;

/// Default retention of windowed state: one day.
pub const DEFAULT_MAINTAIN_DURATION: Duration = Duration::from_secs(24 * 60 * 60);

/// Default number of segments of a windowed store.
pub const DEFAULT_NUM_SEGMENTS: u32 = 3;

/// Parameters a windowed store derives from a windowing specification.
pub trait Windows: Send + Sync {
  /// Size of a single window.
  fn size(&self) -> Duration;

  /// How long windows are retained; never smaller than [`size`](Self::size).
  fn maintain(&self) -> Duration;

  /// Number of segments the retention period is split into.
  fn segments(&self) -> u32;
}

/// Retention settings shared by every window type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Retention {
  maintain: Duration,
  segments: u32,
}

impl Default for Retention {
  fn default() -> Self {
    Self {
      maintain: DEFAULT_MAINTAIN_DURATION,
      segments: DEFAULT_NUM_SEGMENTS,
    }
  }
}

impl Retention {
  fn until(self, maintain: Duration, size: Duration) -> TopologyResult<Self> {
    if maintain < size {
      return Err(TopologyError::invalid_argument(format!(
        "window retention ({:?}) cannot be smaller than the window size ({:?})",
        maintain, size
      )));
    }
    Ok(Self { maintain, ..self })
  }

  fn with_segments(self, segments: u32) -> TopologyResult<Self> {
    if segments < 2 {
      return Err(TopologyError::invalid_argument(
        "number of segments must be at least 2",
      ));
    }
    Ok(Self { segments, ..self })
  }
}

/// Fixed-size time windows.
///
/// With the default advance equal to the size the windows tumble; a smaller
/// advance makes them hop (overlap).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeWindows {
  size: Duration,
  advance: Duration,
  retention: Retention,
}

impl TimeWindows {
  /// Creates tumbling windows of `size`.
  ///
  /// # Errors
  ///
  /// Returns [`TopologyError::InvalidArgument`] if `size` is zero.
  pub fn of(size: Duration) -> TopologyResult<Self> {
    if size.is_zero() {
      return Err(TopologyError::invalid_argument(
        "window size must be larger than zero",
      ));
    }
    Ok(Self {
      size,
      advance: size,
      retention: Retention::default(),
    })
  }

  /// Makes the windows hop by `advance`.
  ///
  /// # Errors
  ///
  /// Returns [`TopologyError::InvalidArgument`] unless `0 < advance <= size`.
  pub fn advance_by(self, advance: Duration) -> TopologyResult<Self> {
    if advance.is_zero() || advance > self.size {
      return Err(TopologyError::invalid_argument(format!(
        "advance ({:?}) must lie within interval (0, {:?}]",
        advance, self.size
      )));
    }
    Ok(Self { advance, ..self })
  }

  /// Sets how long windows are retained.
  ///
  /// # Errors
  ///
  /// Returns [`TopologyError::InvalidArgument`] if `maintain` is smaller than the size.
  pub fn until(self, maintain: Duration) -> TopologyResult<Self> {
    let retention = self.retention.until(maintain, self.size)?;
    Ok(Self { retention, ..self })
  }

  /// Sets the number of store segments.
  ///
  /// # Errors
  ///
  /// Returns [`TopologyError::InvalidArgument`] if `segments` is less than 2.
  pub fn with_segments(self, segments: u32) -> TopologyResult<Self> {
    let retention = self.retention.with_segments(segments)?;
    Ok(Self { retention, ..self })
  }

  /// Distance between the starts of consecutive windows.
  pub fn advance(&self) -> Duration {
    self.advance
  }

  /// Returns true if consecutive windows do not overlap.
  pub fn is_tumbling(&self) -> bool {
    self.advance == self.size
  }
}

impl Windows for TimeWindows {
  fn size(&self) -> Duration {
    self.size
  }

  fn maintain(&self) -> Duration {
    self.retention.maintain.max(self.size)
  }

  fn segments(&self) -> u32 {
    self.retention.segments
  }
}

/// Join windows: records join when their timestamps lie within
/// `[t - before, t + after]` of each other.
///
/// The window size is `before + after`, saturating at [`Duration::MAX`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct JoinWindows {
  before: Duration,
  after: Duration,
  retention: Retention,
}

impl JoinWindows {
  /// Creates symmetric join windows of `time_difference` on both sides.
  pub fn of(time_difference: Duration) -> Self {
    Self {
      before: time_difference,
      after: time_difference,
      retention: Retention::default(),
    }
  }

  /// Sets how far back from a record the window reaches.
  pub fn before(self, before: Duration) -> Self {
    Self { before, ..self }
  }

  /// Sets how far ahead of a record the window reaches.
  pub fn after(self, after: Duration) -> Self {
    Self { after, ..self }
  }

  /// Sets how long windows are retained.
  ///
  /// # Errors
  ///
  /// Returns [`TopologyError::InvalidArgument`] if `maintain` is smaller than the size.
  pub fn until(self, maintain: Duration) -> TopologyResult<Self> {
    let retention = self.retention.until(maintain, self.size())?;
    Ok(Self { retention, ..self })
  }

  /// Sets the number of store segments.
  ///
  /// # Errors
  ///
  /// Returns [`TopologyError::InvalidArgument`] if `segments` is less than 2.
  pub fn with_segments(self, segments: u32) -> TopologyResult<Self> {
    let retention = self.retention.with_segments(segments)?;
    Ok(Self { retention, ..self })
  }

  /// Reach before a record.
  pub fn before_duration(&self) -> Duration {
    self.before
  }

  /// Reach after a record.
  pub fn after_duration(&self) -> Duration {
    self.after
  }
}

impl Windows for JoinWindows {
  fn size(&self) -> Duration {
    self.before.saturating_add(self.after)
  }

  fn maintain(&self) -> Duration {
    self.retention.maintain.max(self.size())
  }

  fn segments(&self) -> u32 {
    self.retention.segments
  }
}
