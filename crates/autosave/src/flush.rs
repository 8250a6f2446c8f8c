//! Single-slot registry for "flush before leaving" callbacks.
//!
//! At most one [`FlushTarget`] is active per [`FlushChannel`]. Registration
//! overwrites, clearing empties, and every [`FlushListener`] observes the
//! latest value. Nothing is queued.

use std::fmt;
use std::sync::{Arc, LazyLock};

use tokio::sync::watch;
use tracing::{debug, trace, warn};

/// Callback that synchronously initiates a pending save.
#[derive(Clone)]
pub struct FlushTarget {
	label: Arc<str>,
	callback: Arc<dyn Fn() + Send + Sync>,
}

impl FlushTarget {
	pub fn new(label: impl Into<String>, callback: impl Fn() + Send + Sync + 'static) -> Self {
		Self {
			label: Arc::from(label.into()),
			callback: Arc::new(callback),
		}
	}

	pub fn label(&self) -> &str {
		&self.label
	}

	pub fn call(&self) {
		(self.callback)();
	}

	/// Whether both handles share one callback allocation.
	pub fn same_callback(&self, other: &FlushTarget) -> bool {
		Arc::ptr_eq(&self.callback, &other.callback)
	}
}

impl fmt::Debug for FlushTarget {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_tuple("FlushTarget").field(&self.label).finish()
	}
}

/// Message accepted by [`FlushChannel::send`].
#[derive(Debug, Clone)]
pub enum FlushMessage {
	SetActive(FlushTarget),
	ClearActive,
}

/// Result of invoking the active flush.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlushOutcome {
	/// The active callback ran to completion.
	Flushed,
	/// Nothing was registered.
	Empty,
	/// The active callback panicked; the panic was contained.
	Panicked,
}

static GLOBAL: LazyLock<FlushChannel> = LazyLock::new(FlushChannel::new);

/// Broadcast channel carrying the active flush target.
///
/// Clones address the same slot.
#[derive(Clone)]
pub struct FlushChannel {
	tx: Arc<watch::Sender<Option<FlushTarget>>>,
}

impl Default for FlushChannel {
	fn default() -> Self {
		Self::new()
	}
}

impl fmt::Debug for FlushChannel {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("FlushChannel")
			.field("active", &self.active().map(|t| t.label.clone()))
			.field("listeners", &self.tx.receiver_count())
			.finish()
	}
}

impl FlushChannel {
	pub fn new() -> Self {
		let (tx, _) = watch::channel(None);
		Self { tx: Arc::new(tx) }
	}

	/// Process-wide channel shared by hosts that do not wire their own.
	pub fn global() -> &'static FlushChannel {
		&GLOBAL
	}

	pub fn send(&self, message: FlushMessage) {
		match message {
			FlushMessage::SetActive(target) => {
				debug!(target_label = target.label(), "autosave.flush.register");
				self.tx.send_replace(Some(target));
			}
			FlushMessage::ClearActive => {
				debug!("autosave.flush.clear");
				self.tx.send_replace(None);
			}
		}
	}

	/// Makes `target` the active flush, replacing any previous one.
	pub fn register(&self, target: FlushTarget) {
		self.send(FlushMessage::SetActive(target));
	}

	/// Clears the active flush regardless of who registered it.
	pub fn unregister(&self) {
		self.send(FlushMessage::ClearActive);
	}

	pub fn active(&self) -> Option<FlushTarget> {
		self.tx.borrow().clone()
	}

	/// Runs the active flush, containing any panic it raises.
	pub fn invoke(&self) -> FlushOutcome {
		invoke_target(self.active())
	}

	pub fn subscribe(&self) -> FlushListener {
		FlushListener { rx: self.tx.subscribe() }
	}
}

/// Read side of a [`FlushChannel`].
#[derive(Debug, Clone)]
pub struct FlushListener {
	rx: watch::Receiver<Option<FlushTarget>>,
}

impl FlushListener {
	/// The most recently registered target, if any.
	pub fn current(&self) -> Option<FlushTarget> {
		self.rx.borrow().clone()
	}

	pub fn invoke(&self) -> FlushOutcome {
		invoke_target(self.current())
	}

	/// Waits for the next registration or clear.
	///
	/// Resolves to `None` once every [`FlushChannel`] clone has been dropped.
	pub async fn changed(&mut self) -> Option<Option<FlushTarget>> {
		self.rx.changed().await.ok()?;
		Some(self.rx.borrow_and_update().clone())
	}
}

fn invoke_target(target: Option<FlushTarget>) -> FlushOutcome {
	// Cloned out of the slot first so the callback may re-register.
	let Some(target) = target else {
		trace!("autosave.flush.empty");
		return FlushOutcome::Empty;
	};

	match scribe_worker::isolate(|| target.call()) {
		Ok(()) => {
			trace!(target_label = target.label(), "autosave.flush.invoked");
			FlushOutcome::Flushed
		}
		Err(error) => {
			warn!(target_label = target.label(), %error, "autosave.flush.panicked");
			FlushOutcome::Panicked
		}
	}
}

#[cfg(test)]
mod tests;
