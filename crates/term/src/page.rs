//! Routes, page layouts, and text rendering.

use std::fmt;

use scribe_dom::{Document, DomError};
use scribe_primitives::{Field, FormSnapshot, RecordId, SaveStatus};

pub const LIST_PATH: &str = "/projects";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Route {
	/// `/projects`
	List,
	/// `/projects/<raw id>`; the segment is validated when the record is fetched.
	Edit(String),
}

impl Route {
	/// Returns `None` for URLs outside the app.
	pub fn parse(url: &str) -> Option<Self> {
		let path = url.split(['?', '#']).next().unwrap_or_default().trim_end_matches('/');
		if path == LIST_PATH {
			return Some(Self::List);
		}
		let segment = path.strip_prefix(LIST_PATH)?.strip_prefix('/')?;
		(!segment.is_empty() && !segment.contains('/')).then(|| Self::Edit(segment.to_string()))
	}

	pub fn edit_path(id: RecordId) -> String {
		format!("{LIST_PATH}/{id}")
	}
}

/// Lines queued for the terminal.
#[derive(Debug, Default)]
pub struct Screen {
	lines: Vec<String>,
}

impl Screen {
	pub fn line(&mut self, line: impl fmt::Display) {
		self.lines.push(line.to_string());
	}

	pub fn is_empty(&self) -> bool {
		self.lines.is_empty()
	}

	pub fn take(&mut self) -> String {
		let mut text = self.lines.join("\n");
		if !text.is_empty() {
			text.push('\n');
		}
		self.lines.clear();
		text
	}
}

/// Rebuilds `document` as the edit form for one record.
pub fn build_edit(document: &Document) -> Result<(), DomError> {
	document.reset();
	let header = document.append(document.body(), "header", &[])?;
	document.append(header, "a", &[("id", "projects"), ("href", LIST_PATH)])?;
	document.append(header, "a", &[("id", "help"), ("href", "")])?;
	let form = document.append(document.body(), "form", &[("id", "editor")])?;
	for field in Field::ALL {
		let tag = if field == Field::Description { "textarea" } else { "input" };
		document.append(form, tag, &[("id", field.as_str()), ("name", field.as_str())])?;
	}
	let footer = document.append(document.body(), "footer", &[])?;
	let docs = document.append(footer, "a", &[("id", "docs"), ("href", "https://scribe.invalid/docs")])?;
	document.append(docs, "span", &[("id", "docs-label")])?;
	Ok(())
}

/// Rebuilds `document` as the project list, linking back to `id`.
pub fn build_list(document: &Document, id: Option<RecordId>) -> Result<(), DomError> {
	document.reset();
	let list = document.append(document.body(), "ul", &[])?;
	if let Some(id) = id {
		let item = document.append(list, "li", &[])?;
		let element_id = format!("project-{id}");
		let href = Route::edit_path(id);
		document.append(item, "a", &[("id", element_id.as_str()), ("href", href.as_str())])?;
	}
	Ok(())
}

pub fn render_edit(screen: &mut Screen, heading: &str, form: &FormSnapshot, status: SaveStatus) {
	screen.line(format!("== {heading} =="));
	for field in Field::ALL {
		screen.line(format!("  {:<12} {}", format!("{field}:"), form.get(field)));
	}
	screen.line(format!("  [{status}]"));
	screen.line("  links: #projects #help #docs");
}

pub fn render_list(screen: &mut Screen, id: Option<RecordId>) {
	screen.line("== Projects ==");
	match id {
		Some(id) => screen.line(format!("  #project-{id} -> {}", Route::edit_path(id))),
		None => screen.line("  (none)"),
	}
}
