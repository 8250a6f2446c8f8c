use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::record::EditableRecord;

/// Field name outside the editable set.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown field: {name:?}")]
pub struct UnknownField {
	pub name: String,
}

/// One of the editable text fields of a record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Field {
	Title,
	Subhead,
	Description,
}

impl Field {
	pub const ALL: [Field; 3] = [Field::Title, Field::Subhead, Field::Description];

	pub const fn as_str(self) -> &'static str {
		match self {
			Self::Title => "title",
			Self::Subhead => "subhead",
			Self::Description => "description",
		}
	}
}

impl FromStr for Field {
	type Err = UnknownField;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		Self::ALL
			.into_iter()
			.find(|field| field.as_str() == s)
			.ok_or_else(|| UnknownField { name: s.to_string() })
	}
}

impl fmt::Display for Field {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.as_str())
	}
}

/// Current value of every editable field of one record.
///
/// Snapshots are replaced wholesale on each edit; [`FormSnapshot::with_field`]
/// returns a new value and leaves the receiver untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FormSnapshot {
	pub title: String,
	pub subhead: String,
	pub description: String,
}

impl FormSnapshot {
	/// Builds the initial form state, normalizing absent fields to `""`.
	pub fn from_record(record: &EditableRecord) -> Self {
		Self {
			title: record.title.clone().unwrap_or_default(),
			subhead: record.subhead.clone().unwrap_or_default(),
			description: record.description.clone().unwrap_or_default(),
		}
	}

	pub fn get(&self, field: Field) -> &str {
		match field {
			Field::Title => &self.title,
			Field::Subhead => &self.subhead,
			Field::Description => &self.description,
		}
	}

	#[must_use]
	pub fn with_field(&self, field: Field, value: impl Into<String>) -> Self {
		let mut next = self.clone();
		let slot = match field {
			Field::Title => &mut next.title,
			Field::Subhead => &mut next.subhead,
			Field::Description => &mut next.description,
		};
		*slot = value.into();
		next
	}
}
