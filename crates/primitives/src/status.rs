use std::fmt;

use serde::{Deserialize, Serialize};

/// Autosave progress as shown next to the form.
///
/// A failed save leaves the status at [`SaveStatus::Saving`] until the next
/// successful save; there is no failure state.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SaveStatus {
	/// Nothing edited since the form was opened.
	#[default]
	Idle,
	/// An edit is waiting for, or undergoing, a save.
	Saving,
	/// The most recent save completed.
	Saved,
}

impl SaveStatus {
	pub const fn as_str(self) -> &'static str {
		match self {
			Self::Idle => "idle",
			Self::Saving => "saving",
			Self::Saved => "saved",
		}
	}
}

impl fmt::Display for SaveStatus {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.as_str())
	}
}
