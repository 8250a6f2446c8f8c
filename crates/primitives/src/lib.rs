//! Core types for record editing: identifiers, form snapshots, and save status.

/// Editable form fields and immutable form snapshots.
pub mod form;
/// Async future aliases.
pub mod future;
/// Record identifiers and stored records.
pub mod record;
/// Tri-state autosave status.
pub mod status;

pub use form::{Field, FormSnapshot, UnknownField};
pub use future::{BoxFutureSend, BoxFutureStatic};
pub use record::{EditableRecord, InvalidRecordId, RecordId, UNTITLED_HEADING};
pub use status::SaveStatus;
