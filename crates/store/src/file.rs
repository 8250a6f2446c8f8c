use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use scribe_primitives::{EditableRecord, FormSnapshot, RecordId};
use tokio::sync::Mutex;

use crate::{RecordStore, Result, StoreError, apply_snapshot};

/// Store backed by one pretty-printed JSON array of records.
///
/// A missing file reads as an empty store. Saves rewrite the whole file via a
/// sibling temp file and rename, serialized by an internal lock.
#[derive(Debug)]
pub struct JsonFileStore {
	path: PathBuf,
	write_lock: Mutex<()>,
}

impl JsonFileStore {
	pub fn new(path: impl Into<PathBuf>) -> Self {
		Self {
			path: path.into(),
			write_lock: Mutex::new(()),
		}
	}

	pub fn path(&self) -> &Path {
		&self.path
	}

	/// Replaces the file contents with `records`.
	pub async fn write_all(&self, records: &[EditableRecord]) -> Result<()> {
		let _guard = self.write_lock.lock().await;
		self.write_records(records).await
	}

	async fn read_records(&self) -> Result<Vec<EditableRecord>> {
		let bytes = match tokio::fs::read(&self.path).await {
			Ok(bytes) => bytes,
			Err(error) if error.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
			Err(error) => return Err(self.io_error(error)),
		};
		serde_json::from_slice(&bytes).map_err(|error| StoreError::Json {
			path: self.path.clone(),
			error,
		})
	}

	async fn write_records(&self, records: &[EditableRecord]) -> Result<()> {
		let json = serde_json::to_vec_pretty(records).map_err(|error| StoreError::Json {
			path: self.path.clone(),
			error,
		})?;

		if let Some(parent) = self.path.parent()
			&& !parent.as_os_str().is_empty()
		{
			tokio::fs::create_dir_all(parent).await.map_err(|e| self.io_error(e))?;
		}

		let tmp = self.path.with_extension("json.tmp");
		tokio::fs::write(&tmp, json).await.map_err(|e| self.io_error(e))?;
		tokio::fs::rename(&tmp, &self.path).await.map_err(|e| self.io_error(e))
	}

	fn io_error(&self, error: std::io::Error) -> StoreError {
		StoreError::Io {
			path: self.path.clone(),
			error,
		}
	}
}

#[async_trait]
impl RecordStore for JsonFileStore {
	async fn load(&self, id: RecordId) -> Result<Option<EditableRecord>> {
		let records = self.read_records().await?;
		Ok(records.into_iter().find(|record| record.id == id))
	}

	async fn save(&self, id: RecordId, fields: &FormSnapshot) -> Result<EditableRecord> {
		let _guard = self.write_lock.lock().await;
		let mut records = self.read_records().await?;
		let record = records
			.iter_mut()
			.find(|record| record.id == id)
			.ok_or(StoreError::NotFound(id))?;
		apply_snapshot(record, fields);
		let saved = record.clone();

		self.write_records(&records).await?;
		tracing::debug!(record_id = id.get(), path = %self.path.display(), "store.file.save");
		Ok(saved)
	}
}
