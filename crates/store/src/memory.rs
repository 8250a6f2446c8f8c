use std::collections::BTreeMap;
use std::sync::Arc;

use async_trait::async_trait;
use parking_lot::RwLock;
use scribe_primitives::{EditableRecord, FormSnapshot, RecordId};

use crate::{RecordStore, Result, StoreError, apply_snapshot};

/// Process-local store. Clones share the same records.
#[derive(Debug, Default, Clone)]
pub struct MemoryStore {
	records: Arc<RwLock<BTreeMap<RecordId, EditableRecord>>>,
}

impl MemoryStore {
	pub fn new() -> Self {
		Self::default()
	}

	/// Inserts or replaces a record.
	pub fn insert(&self, record: EditableRecord) {
		self.records.write().insert(record.id, record);
	}

	pub fn get(&self, id: RecordId) -> Option<EditableRecord> {
		self.records.read().get(&id).cloned()
	}

	pub fn len(&self) -> usize {
		self.records.read().len()
	}

	pub fn is_empty(&self) -> bool {
		self.records.read().is_empty()
	}
}

impl FromIterator<EditableRecord> for MemoryStore {
	fn from_iter<I: IntoIterator<Item = EditableRecord>>(iter: I) -> Self {
		let store = Self::new();
		for record in iter {
			store.insert(record);
		}
		store
	}
}

#[async_trait]
impl RecordStore for MemoryStore {
	async fn load(&self, id: RecordId) -> Result<Option<EditableRecord>> {
		Ok(self.get(id))
	}

	async fn save(&self, id: RecordId, fields: &FormSnapshot) -> Result<EditableRecord> {
		let mut records = self.records.write();
		let record = records.get_mut(&id).ok_or(StoreError::NotFound(id))?;
		apply_snapshot(record, fields);
		tracing::debug!(record_id = id.get(), "store.memory.save");
		Ok(record.clone())
	}
}
