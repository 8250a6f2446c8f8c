use std::fs;

use pretty_assertions::assert_eq;

use super::*;

#[test]
fn empty_input_yields_defaults() {
	let config = Config::parse("").unwrap();
	assert_eq!(config, Config::default());
	assert_eq!(config.autosave.quiet_window(), Duration::from_millis(700));
	assert_eq!(config.store.path, None);
}

#[test]
fn parses_every_section() {
	let config = Config::parse(
		r#"
[autosave]
quiet_window_ms = 250

[store]
path = "/var/lib/scribe/projects.json"

[log]
filter = "scribe_autosave=trace"
"#,
	)
	.unwrap();

	assert_eq!(config.autosave.quiet_window(), Duration::from_millis(250));
	assert_eq!(config.store.path, Some(PathBuf::from("/var/lib/scribe/projects.json")));
	assert_eq!(config.log.filter.as_deref(), Some("scribe_autosave=trace"));
}

#[test]
fn unknown_keys_are_rejected() {
	assert!(matches!(
		Config::parse("[autosave]\ndelay = 5\n"),
		Err(ConfigError::Parse(_))
	));
	assert!(matches!(Config::parse("[editor]\n"), Err(ConfigError::Parse(_))));
}

#[test]
fn wrong_types_are_rejected() {
	assert!(matches!(
		Config::parse("[autosave]\nquiet_window_ms = \"fast\"\n"),
		Err(ConfigError::Parse(_))
	));
	assert!(matches!(
		Config::parse("[autosave]\nquiet_window_ms = -1\n"),
		Err(ConfigError::Parse(_))
	));
}

#[test]
fn load_resolves_relative_store_path() {
	let dir = tempfile::tempdir().unwrap();
	let path = dir.path().join("config.toml");
	fs::write(&path, "[store]\npath = \"data/projects.json\"\n").unwrap();

	let config = Config::load(&path).unwrap();

	assert_eq!(config.store.path, Some(dir.path().join("data/projects.json")));
}

#[test]
fn load_keeps_absolute_store_path() {
	let dir = tempfile::tempdir().unwrap();
	let path = dir.path().join("config.toml");
	let absolute = dir.path().join("elsewhere.json");
	fs::write(&path, format!("[store]\npath = {:?}\n", absolute.display().to_string())).unwrap();

	let config = Config::load(&path).unwrap();

	assert_eq!(config.store.path, Some(absolute));
}

#[test]
fn load_missing_file_reports_path() {
	let dir = tempfile::tempdir().unwrap();
	let path = dir.path().join("absent.toml");

	match Config::load(&path) {
		Err(ConfigError::Io { path: reported, .. }) => assert_eq!(reported, path),
		other => panic!("expected Io error, got {other:?}"),
	}
}

#[test]
fn default_path_ends_with_scribe_config() {
	if let Some(path) = default_path() {
		assert!(path.ends_with("scribe/config.toml"));
	}
}
