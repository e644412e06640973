//! Storage error taxonomy.

use thiserror::Error;

/// Errors from the durable state store.
///
/// `Serialization` means a record could not cross the storage
/// boundary (encode on write, decode on read). A decode failure is
/// deliberately an error rather than a silent default: the stored
/// record is the source of truth for the domain's state, and
/// fabricating a fresh one would violate the history invariants.
#[derive(Error, Debug)]
pub enum StoreError {
    /// The record could not be serialized or deserialized.
    #[error("record serialization failed: {0}")]
    Serialization(#[from] serde_json::Error),

    /// The storage backend failed.
    #[error("storage backend error: {0}")]
    Backend(#[from] sqlx::Error),
}
