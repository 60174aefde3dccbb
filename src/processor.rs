//! Processor context handed to stateful user functions.
//!
//! The execution engine implements [`ProcessorContext`]; transformers receive it
//! once through `init` and may keep it for the rest of their lifetime.

use chrono::{DateTime, Utc};

/// Read-only view of the task a transformer runs in.
pub trait ProcessorContext: Send + Sync {
  /// Application identifier of the running topology.
  fn application_id(&self) -> &str;

  /// Identifier of the task executing the processor.
  fn task_id(&self) -> &str;

  /// Partition of the record currently being processed.
  fn partition(&self) -> u32;

  /// Timestamp of the record currently being processed.
  fn timestamp(&self) -> DateTime<Utc>;
}
