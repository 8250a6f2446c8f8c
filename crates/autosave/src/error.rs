use scribe_store::StoreError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AutosaveError {
	/// No tokio runtime was available and the fallback could not be built.
	#[error("no async runtime available: {0}")]
	Runtime(#[from] std::io::Error),

	#[error(transparent)]
	Store(#[from] StoreError),
}

pub type Result<T> = std::result::Result<T, AutosaveError>;
