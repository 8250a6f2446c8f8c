use parking_lot::Mutex;

use crate::event::{Event, EventTarget};

#[derive(Debug)]
struct History {
	entries: Vec<String>,
	index: usize,
}

/// Session history plus window-level listeners.
#[derive(Debug)]
pub struct Window {
	history: Mutex<History>,
	events: EventTarget,
}

impl Window {
	pub fn new(initial_url: impl Into<String>) -> Self {
		Self {
			history: Mutex::new(History {
				entries: vec![initial_url.into()],
				index: 0,
			}),
			events: EventTarget::new(),
		}
	}

	pub fn events(&self) -> &EventTarget {
		&self.events
	}

	pub fn location(&self) -> String {
		let history = self.history.lock();
		history.entries[history.index].clone()
	}

	/// Records a new entry after the current one, discarding forward entries.
	///
	/// Like a link navigation, this does not dispatch popstate.
	pub fn push(&self, url: impl Into<String>) {
		let mut history = self.history.lock();
		let keep = history.index + 1;
		history.entries.truncate(keep);
		history.entries.push(url.into());
		history.index = keep;
	}

	pub fn back(&self) -> Option<String> {
		self.go(-1)
	}

	pub fn forward(&self) -> Option<String> {
		self.go(1)
	}

	/// Moves `delta` entries through history and dispatches popstate.
	///
	/// Returns the new location, or `None` (and dispatches nothing) when the
	/// move would leave the history list.
	pub fn go(&self, delta: isize) -> Option<String> {
		let url = {
			let mut history = self.history.lock();
			let target = history.index.checked_add_signed(delta).filter(|&i| i < history.entries.len())?;
			if target == history.index {
				return None;
			}
			history.index = target;
			history.entries[target].clone()
		};

		tracing::debug!(url = %url, delta, "dom.history.traverse");
		self.events.dispatch(&Event::pop_state(url.clone()));
		Some(url)
	}

	pub fn can_go_back(&self) -> bool {
		self.history.lock().index > 0
	}

	pub fn can_go_forward(&self) -> bool {
		let history = self.history.lock();
		history.index + 1 < history.entries.len()
	}
}
