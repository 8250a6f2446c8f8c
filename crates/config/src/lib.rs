//! Configuration for the scribe editor.
//!
//! Configuration is a single TOML file. Every section and key is optional;
//! unknown keys are rejected.
//!
//! # Location
//!
//! 1. The path given on the command line (`--config`)
//! 2. `$XDG_CONFIG_HOME/scribe/config.toml` (or the platform equivalent)
//! 3. Built-in defaults
//!
//! # Schema
//!
//! ```toml
//! [autosave]
//! quiet_window_ms = 700
//!
//! [store]
//! path = "projects.json"   # relative paths resolve against the config file
//!
//! [log]
//! filter = "scribe=info"
//! ```
//!
//! Without `store.path` the editor runs against an in-memory store.

pub mod error;

use std::path::{Path, PathBuf};
use std::time::Duration;

pub use error::{ConfigError, Result};
use serde::{Deserialize, Serialize};

/// Parsed configuration file.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
	pub autosave: AutosaveConfig,
	pub store: StoreConfig,
	pub log: LogConfig,
}

/// `[autosave]` section.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AutosaveConfig {
	/// Milliseconds without edits before the form is saved.
	pub quiet_window_ms: u64,
}

impl Default for AutosaveConfig {
	fn default() -> Self {
		Self { quiet_window_ms: 700 }
	}
}

impl AutosaveConfig {
	pub fn quiet_window(&self) -> Duration {
		Duration::from_millis(self.quiet_window_ms)
	}
}

/// `[store]` section.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct StoreConfig {
	/// JSON file holding the records. `None` selects the in-memory store.
	pub path: Option<PathBuf>,
}

/// `[log]` section.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LogConfig {
	/// `tracing` filter directive, used when `RUST_LOG` is unset.
	pub filter: Option<String>,
}

impl Config {
	/// Parse a TOML string into a [`Config`].
	pub fn parse(input: &str) -> Result<Self> {
		Ok(toml::from_str(input)?)
	}

	/// Load configuration from a file.
	///
	/// A relative `store.path` is resolved against the file's directory.
	pub fn load(path: impl AsRef<Path>) -> Result<Self> {
		let path = path.as_ref();
		let content = std::fs::read_to_string(path).map_err(|e| ConfigError::Io {
			path: path.to_path_buf(),
			error: e,
		})?;
		let mut config = Self::parse(&content)?;

		if let Some(store_path) = &config.store.path
			&& store_path.is_relative()
			&& let Some(dir) = path.parent()
		{
			config.store.path = Some(dir.join(store_path));
		}

		tracing::debug!(path = %path.display(), "config.load");
		Ok(config)
	}

	/// Load the user's configuration file, or defaults when it does not exist.
	pub fn load_default() -> Result<Self> {
		match default_path() {
			Some(path) if path.is_file() => Self::load(path),
			_ => Ok(Self::default()),
		}
	}
}

/// `$XDG_CONFIG_HOME/scribe/config.toml`, if a config directory is known.
pub fn default_path() -> Option<PathBuf> {
	dirs::config_dir().map(|dir| dir.join("scribe").join("config.toml"))
}

#[cfg(test)]
mod tests;
