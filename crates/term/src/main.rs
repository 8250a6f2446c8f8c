//! Scribe terminal front end.
//!
//! Opens one project record as an autosaving form and reads line commands
//! from stdin. Edits are saved after a quiet window, when a link is followed,
//! on back/forward, and on quit.

mod app;
mod cli;
mod command;
mod page;
mod router;

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use app::App;
use clap::Parser;
use cli::Cli;
use scribe_autosave::{FlushChannel, SessionOptions};
use scribe_config::Config;
use scribe_primitives::{EditableRecord, RecordId};
use scribe_store::{JsonFileStore, MemoryStore, RecordStore};
use tokio::io::BufReader;
use tracing::info;

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
	let cli = Cli::parse();

	let config = match &cli.config {
		Some(path) => Config::load(path).with_context(|| format!("failed to load config {}", path.display()))?,
		None => Config::load_default().context("failed to load default config")?,
	};

	setup_tracing(cli.verbose, config.log.filter.as_deref());

	let quiet_window = cli
		.quiet_window_ms
		.map(Duration::from_millis)
		.unwrap_or_else(|| config.autosave.quiet_window());
	let store = open_store(cli.store.or(config.store.path));
	info!(quiet_window_ms = quiet_window.as_millis() as u64, "starting scribe");

	let app = App::new(
		store,
		FlushChannel::global().clone(),
		SessionOptions::default().with_quiet_window(quiet_window),
		&cli.project_id,
	)?;
	app.run(BufReader::new(tokio::io::stdin()), tokio::io::stdout()).await
}

fn open_store(path: Option<PathBuf>) -> Arc<dyn RecordStore> {
	match path {
		Some(path) => {
			info!(path = %path.display(), "using JSON record store");
			Arc::new(JsonFileStore::new(path))
		}
		None => {
			info!("using in-memory record store");
			Arc::new(MemoryStore::from_iter(demo_record()))
		}
	}
}

fn demo_record() -> Option<EditableRecord> {
	let mut record = EditableRecord::new(RecordId::new(1)?);
	record.title = Some("Launch plan".to_string());
	record.subhead = Some("Q3 roadmap".to_string());
	Some(record)
}

fn setup_tracing(verbose: bool, filter: Option<&str>) {
	use std::fs::OpenOptions;

	use tracing_subscriber::EnvFilter;
	use tracing_subscriber::prelude::*;

	let default_filter = || match (verbose, filter) {
		(true, _) => EnvFilter::new("scribe=trace,scribe_autosave=trace,debug"),
		(false, Some(filter)) => EnvFilter::new(filter),
		(false, None) => EnvFilter::new("scribe=info,scribe_autosave=info,warn"),
	};

	// Support SCRIBE_LOG_DIR for smoke testing
	if let Some(log_dir) = std::env::var("SCRIBE_LOG_DIR").ok().map(PathBuf::from)
		&& std::fs::create_dir_all(&log_dir).is_ok()
	{
		let log_path = log_dir.join(format!("scribe.{}.log", std::process::id()));

		if let Ok(file) = OpenOptions::new().create(true).append(true).open(&log_path) {
			let file_layer = tracing_subscriber::fmt::layer()
				.with_writer(file)
				.with_ansi(false)
				.with_target(true);

			tracing_subscriber::registry()
				.with(EnvFilter::try_from_default_env().unwrap_or_else(|_| default_filter()))
				.with(file_layer)
				.init();

			tracing::info!(path = ?log_path, "tracing initialized");
			return;
		}
	}

	// Stdout carries the UI, so logs go to stderr.
	tracing_subscriber::fmt()
		.with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| default_filter()))
		.with_writer(std::io::stderr)
		.init();
}
