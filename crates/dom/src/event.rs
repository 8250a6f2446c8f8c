use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};

use parking_lot::Mutex;

use crate::document::NodeId;

/// Event types the page model dispatches.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventKind {
	/// Pointer activation on an element.
	Click,
	/// Session history traversal (back/forward).
	PopState,
}

impl EventKind {
	pub const fn as_str(self) -> &'static str {
		match self {
			Self::Click => "click",
			Self::PopState => "popstate",
		}
	}
}

/// Dispatch phase a listener subscribes to.
///
/// Capture listeners run before bubble listeners for the same event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Phase {
	Capture,
	Bubble,
}

/// One dispatched event.
#[derive(Debug)]
pub struct Event {
	kind: EventKind,
	target: Option<NodeId>,
	url: Option<String>,
	default_prevented: AtomicBool,
}

impl Event {
	pub fn click(target: NodeId) -> Self {
		Self {
			kind: EventKind::Click,
			target: Some(target),
			url: None,
			default_prevented: AtomicBool::new(false),
		}
	}

	pub fn pop_state(url: impl Into<String>) -> Self {
		Self {
			kind: EventKind::PopState,
			target: None,
			url: Some(url.into()),
			default_prevented: AtomicBool::new(false),
		}
	}

	pub fn kind(&self) -> EventKind {
		self.kind
	}

	/// Element the event was dispatched at, for click events.
	pub fn target(&self) -> Option<NodeId> {
		self.target
	}

	/// Location after traversal, for popstate events.
	pub fn url(&self) -> Option<&str> {
		self.url.as_deref()
	}

	/// Suppresses the default action (link navigation) after dispatch.
	pub fn prevent_default(&self) {
		self.default_prevented.store(true, Ordering::Release);
	}

	pub fn default_prevented(&self) -> bool {
		self.default_prevented.load(Ordering::Acquire)
	}
}

/// Listener callback.
pub type Listener = Arc<dyn Fn(&Event) + Send + Sync>;

/// Handle returned by [`EventTarget::add_listener`], used for removal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListenerId(u64);

struct Registered {
	id: ListenerId,
	kind: EventKind,
	phase: Phase,
	callback: Listener,
}

/// Listener table for one dispatch point.
#[derive(Default)]
pub struct EventTarget {
	listeners: Mutex<Vec<Registered>>,
	next_id: AtomicU64,
}

impl std::fmt::Debug for EventTarget {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("EventTarget")
			.field("listeners", &self.listeners.lock().len())
			.finish()
	}
}

impl EventTarget {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn add_listener(&self, kind: EventKind, phase: Phase, callback: impl Fn(&Event) + Send + Sync + 'static) -> ListenerId {
		let id = ListenerId(self.next_id.fetch_add(1, Ordering::Relaxed));
		self.listeners.lock().push(Registered {
			id,
			kind,
			phase,
			callback: Arc::new(callback),
		});
		tracing::trace!(kind = kind.as_str(), ?phase, "dom.listener.add");
		id
	}

	/// Returns `false` if the listener was already removed.
	pub fn remove_listener(&self, id: ListenerId) -> bool {
		let mut listeners = self.listeners.lock();
		let before = listeners.len();
		listeners.retain(|registered| registered.id != id);
		before != listeners.len()
	}

	pub fn listener_count(&self, kind: EventKind) -> usize {
		self.listeners.lock().iter().filter(|registered| registered.kind == kind).count()
	}

	/// Runs capture listeners, then bubble listeners, in registration order.
	///
	/// The listener list is snapshotted first, so callbacks may add or remove
	/// listeners. A panicking listener is logged and skipped.
	pub fn dispatch(&self, event: &Event) {
		let snapshot: Vec<Listener> = {
			let guard = self.listeners.lock();
			let listeners: &[Registered] = &guard;
			[Phase::Capture, Phase::Bubble]
				.into_iter()
				.flat_map(move |phase| {
					listeners
						.iter()
						.filter(move |registered| registered.kind == event.kind && registered.phase == phase)
				})
				.map(|registered| registered.callback.clone())
				.collect()
		};

		for callback in snapshot {
			if let Err(message) = scribe_worker::isolate(|| callback(event)) {
				tracing::warn!(kind = event.kind.as_str(), error = %message, "dom.listener.panicked");
			}
		}
	}
}
