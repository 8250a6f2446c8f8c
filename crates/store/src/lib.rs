//! Record store collaborator for the edit form.
//!
//! The autosave core only ever talks to a [`RecordStore`]: `load` to open a
//! record and `save` to persist a form snapshot. Identifier validation happens
//! here, in [`fetch`], so malformed route segments never reach the core.

mod error;
mod file;
mod memory;

use async_trait::async_trait;
pub use error::{Result, StoreError};
pub use file::JsonFileStore;
pub use memory::MemoryStore;
use scribe_primitives::{EditableRecord, FormSnapshot, RecordId};

/// Loads and saves records by identifier.
#[async_trait]
pub trait RecordStore: Send + Sync {
	/// Returns `None` when no record has this identifier.
	async fn load(&self, id: RecordId) -> Result<Option<EditableRecord>>;

	/// Writes every field of `fields` to the record and returns the stored result.
	async fn save(&self, id: RecordId, fields: &FormSnapshot) -> Result<EditableRecord>;
}

/// Parses a raw route identifier and loads the matching record.
pub async fn fetch(store: &dyn RecordStore, raw_id: &str) -> Result<Option<EditableRecord>> {
	let id = RecordId::parse(raw_id)?;
	store.load(id).await
}

/// Applies a snapshot to a record, storing every field as a plain string.
pub(crate) fn apply_snapshot(record: &mut EditableRecord, fields: &FormSnapshot) {
	record.title = Some(fields.title.clone());
	record.subhead = Some(fields.subhead.clone());
	record.description = Some(fields.description.clone());
}
