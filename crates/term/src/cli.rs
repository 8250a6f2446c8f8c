//! CLI schema for the scribe binary.

use std::path::PathBuf;

use clap::Parser;

#[derive(Parser, Debug)]
#[command(name = "scribe")]
#[command(about = "Edit a project record with autosave")]
#[command(version)]
/// Command-line arguments.
pub struct Cli {
	/// Identifier of the project to open
	#[arg(value_name = "PROJECT_ID")]
	pub project_id: String,

	/// Configuration file (defaults to $XDG_CONFIG_HOME/scribe/config.toml)
	#[arg(long, short = 'c', value_name = "PATH")]
	pub config: Option<PathBuf>,

	/// JSON record store, overriding the configured one
	#[arg(long, short = 's', value_name = "PATH")]
	pub store: Option<PathBuf>,

	/// Milliseconds without edits before saving
	#[arg(long, value_name = "MS")]
	pub quiet_window_ms: Option<u64>,

	/// Verbose logging
	#[arg(long, short = 'v')]
	pub verbose: bool,
}
