use std::path::PathBuf;

use scribe_primitives::{InvalidRecordId, RecordId};
use thiserror::Error;

/// Errors raised by record stores.
#[derive(Debug, Error)]
pub enum StoreError {
	#[error(transparent)]
	InvalidId(#[from] InvalidRecordId),

	#[error("record {0} not found")]
	NotFound(RecordId),

	#[error("store I/O error at {path}: {error}")]
	Io {
		path: PathBuf,
		#[source]
		error: std::io::Error,
	},

	#[error("malformed store file {path}: {error}")]
	Json {
		path: PathBuf,
		#[source]
		error: serde_json::Error,
	},
}

pub type Result<T> = std::result::Result<T, StoreError>;
