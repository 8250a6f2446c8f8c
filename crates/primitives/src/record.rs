use std::fmt;
use std::num::NonZeroU64;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Header text shown for a record with no title.
pub const UNTITLED_HEADING: &str = "Untitled Project";

/// Largest integer a route segment may coerce to without losing precision.
const MAX_SAFE_INTEGER: f64 = 9_007_199_254_740_991.0;

/// Raw identifier that does not coerce to a positive integer.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid record id: {raw:?}")]
pub struct InvalidRecordId {
	pub raw: String,
}

/// Positive integer identifying one stored record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RecordId(NonZeroU64);

impl RecordId {
	/// Returns `None` for zero.
	pub const fn new(raw: u64) -> Option<Self> {
		match NonZeroU64::new(raw) {
			Some(id) => Some(Self(id)),
			None => None,
		}
	}

	pub const fn get(self) -> u64 {
		self.0.get()
	}

	/// Coerces a raw route segment into an identifier.
	///
	/// Surrounding whitespace is ignored and numeric spellings such as `"3.0"`
	/// or `"1e2"` are accepted as long as they denote a positive integer.
	pub fn parse(raw: &str) -> Result<Self, InvalidRecordId> {
		let invalid = || InvalidRecordId { raw: raw.to_string() };
		let trimmed = raw.trim();

		if let Ok(value) = trimmed.parse::<u64>() {
			return Self::new(value).ok_or_else(invalid);
		}

		let value: f64 = trimmed.parse().map_err(|_| invalid())?;
		if value.fract() != 0.0 || !(1.0..=MAX_SAFE_INTEGER).contains(&value) {
			return Err(invalid());
		}
		Self::new(value as u64).ok_or_else(invalid)
	}
}

impl FromStr for RecordId {
	type Err = InvalidRecordId;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		Self::parse(s)
	}
}

impl fmt::Display for RecordId {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "{}", self.0)
	}
}

/// A record as the store hands it out.
///
/// Text fields may be absent; the edit form normalizes them to empty strings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EditableRecord {
	pub id: RecordId,
	#[serde(default)]
	pub title: Option<String>,
	#[serde(default)]
	pub subhead: Option<String>,
	#[serde(default)]
	pub description: Option<String>,
}

impl EditableRecord {
	pub fn new(id: RecordId) -> Self {
		Self {
			id,
			title: None,
			subhead: None,
			description: None,
		}
	}

	/// Page header text: the title, or [`UNTITLED_HEADING`] when it is missing or empty.
	pub fn heading(&self) -> &str {
		match self.title.as_deref() {
			Some(title) if !title.is_empty() => title,
			_ => UNTITLED_HEADING,
		}
	}
}
