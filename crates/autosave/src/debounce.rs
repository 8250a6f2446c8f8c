//! Trailing-edge debounced save scheduler.
//!
//! [`DebouncedSave`] keeps at most one pending snapshot and one countdown.
//! Each [`DebouncedSave::schedule`] replaces the snapshot and restarts the
//! countdown; when the countdown elapses untouched the latest snapshot is
//! handed to the save function. [`DebouncedSave::flush`] short-circuits the
//! countdown.
//!
//! # Stale wake-ups
//!
//! Countdown tasks carry the generation they were armed with and re-check it
//! under the lock before firing, so a countdown superseded or flushed between
//! waking and locking does nothing.

use std::fmt;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, LazyLock, Weak};
use std::time::Duration;

use parking_lot::Mutex;
use scribe_primitives::BoxFutureStatic;
use scribe_worker::{GenerationClock, TaskClass, spawn_on};
use tokio::runtime::Handle;
use tokio::sync::Notify;
use tokio::time::Instant;
use tokio_util::sync::CancellationToken;
use tracing::{debug, trace, warn};

use crate::error::Result;
use crate::flush::FlushTarget;

/// Save function wrapped by a scheduler.
pub type SaveFn<S> = Arc<dyn Fn(S) -> BoxFutureStatic<Result<()>> + Send + Sync>;

static SCHEDULER_IDS: LazyLock<GenerationClock> = LazyLock::new(GenerationClock::new);

/// Identity of one scheduler instance. Clones of a scheduler share it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SchedulerId(u64);

impl SchedulerId {
	pub const fn get(self) -> u64 {
		self.0
	}
}

impl fmt::Display for SchedulerId {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "scheduler-{}", self.0)
	}
}

struct Countdown<S> {
	pending: Option<S>,
	generation: u64,
	timer: Option<CancellationToken>,
}

#[derive(Default)]
struct InFlight {
	count: AtomicUsize,
	idle: Notify,
}

/// Decrements the in-flight count when a save task ends, even by panic.
struct InFlightGuard(Arc<InFlight>);

impl InFlightGuard {
	fn begin(in_flight: &Arc<InFlight>) -> Self {
		in_flight.count.fetch_add(1, Ordering::AcqRel);
		Self(in_flight.clone())
	}
}

impl Drop for InFlightGuard {
	fn drop(&mut self) {
		if self.0.count.fetch_sub(1, Ordering::AcqRel) == 1 {
			self.0.idle.notify_waiters();
		}
	}
}

struct Inner<S> {
	id: SchedulerId,
	quiet_window: Duration,
	save: SaveFn<S>,
	handle: Handle,
	countdown: Mutex<Countdown<S>>,
	in_flight: Arc<InFlight>,
}

impl<S: Send + 'static> Inner<S> {
	/// Countdown expiry for `generation`.
	fn fire(&self, generation: u64) {
		let snapshot = {
			let mut countdown = self.countdown.lock();
			if countdown.generation != generation {
				trace!(scheduler = self.id.0, generation, "autosave.debounce.stale_wakeup");
				return;
			}
			countdown.timer = None;
			countdown.pending.take()
		};

		if let Some(snapshot) = snapshot {
			debug!(scheduler = self.id.0, generation, "autosave.debounce.elapsed");
			self.dispatch(snapshot);
		}
	}

	fn flush(&self) -> bool {
		let snapshot = {
			let mut countdown = self.countdown.lock();
			if let Some(timer) = countdown.timer.take() {
				timer.cancel();
			}
			countdown.pending.take()
		};

		match snapshot {
			Some(snapshot) => {
				debug!(scheduler = self.id.0, "autosave.debounce.flush");
				self.dispatch(snapshot);
				true
			}
			None => {
				trace!(scheduler = self.id.0, "autosave.debounce.flush_noop");
				false
			}
		}
	}

	/// Invokes the save function now and drives its future on the runtime.
	fn dispatch(&self, snapshot: S) {
		let guard = InFlightGuard::begin(&self.in_flight);
		let save = (self.save)(snapshot);
		let id = self.id;

		spawn_on(&self.handle, TaskClass::Interactive, async move {
			let _guard = guard;
			match save.await {
				Ok(()) => debug!(scheduler = id.0, "autosave.save.done"),
				Err(error) => warn!(scheduler = id.0, %error, "autosave.save.failed"),
			}
		});
	}
}

impl<S> Drop for Inner<S> {
	fn drop(&mut self) {
		if let Some(timer) = self.countdown.get_mut().timer.take() {
			timer.cancel();
		}
	}
}

/// Debounced wrapper around an asynchronous save function.
///
/// Clones share one countdown and one pending snapshot. Dropping the last
/// clone cancels the countdown without saving; call [`Self::flush`] first to
/// keep the pending snapshot.
pub struct DebouncedSave<S> {
	inner: Arc<Inner<S>>,
}

impl<S> Clone for DebouncedSave<S> {
	fn clone(&self) -> Self {
		Self {
			inner: self.inner.clone(),
		}
	}
}

impl<S> fmt::Debug for DebouncedSave<S> {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		let countdown = self.inner.countdown.lock();
		f.debug_struct("DebouncedSave")
			.field("id", &self.inner.id)
			.field("quiet_window", &self.inner.quiet_window)
			.field("pending", &countdown.pending.is_some())
			.field("in_flight", &self.inner.in_flight.count.load(Ordering::Acquire))
			.finish()
	}
}

impl<S: Send + 'static> DebouncedSave<S> {
	/// Creates a scheduler bound to the ambient tokio runtime.
	pub fn new<F>(quiet_window: Duration, save: F) -> Result<Self>
	where
		F: Fn(S) -> BoxFutureStatic<Result<()>> + Send + Sync + 'static,
	{
		let handle = scribe_worker::runtime_handle()?;
		let id = SchedulerId(SCHEDULER_IDS.next());
		trace!(scheduler = id.0, quiet_window_ms = quiet_window.as_millis() as u64, "autosave.debounce.new");
		Ok(Self {
			inner: Arc::new(Inner {
				id,
				quiet_window,
				save: Arc::new(save),
				handle,
				countdown: Mutex::new(Countdown {
					pending: None,
					generation: 0,
					timer: None,
				}),
				in_flight: Arc::default(),
			}),
		})
	}

	pub fn id(&self) -> SchedulerId {
		self.inner.id
	}

	pub fn quiet_window(&self) -> Duration {
		self.inner.quiet_window
	}

	/// Replaces the pending snapshot and restarts the countdown.
	pub fn schedule(&self, snapshot: S) {
		let deadline = Instant::now() + self.inner.quiet_window;
		let (generation, token) = {
			let mut countdown = self.inner.countdown.lock();
			if let Some(previous) = countdown.timer.take() {
				previous.cancel();
			}
			countdown.pending = Some(snapshot);
			countdown.generation = countdown.generation.wrapping_add(1);
			let token = CancellationToken::new();
			countdown.timer = Some(token.clone());
			(countdown.generation, token)
		};
		trace!(scheduler = self.inner.id.0, generation, "autosave.debounce.schedule");

		let inner = Arc::downgrade(&self.inner);
		spawn_on(&self.inner.handle, TaskClass::Background, async move {
			tokio::select! {
				() = token.cancelled() => {}
				() = tokio::time::sleep_until(deadline) => {
					if let Some(inner) = inner.upgrade() {
						inner.fire(generation);
					}
				}
			}
		});
	}

	/// Saves the pending snapshot immediately, cancelling the countdown.
	///
	/// Returns `false` (and saves nothing) when no snapshot is pending,
	/// including when the last one is already in flight.
	pub fn flush(&self) -> bool {
		self.inner.flush()
	}

	/// Drops the pending snapshot and countdown without saving.
	pub fn cancel(&self) {
		let mut countdown = self.inner.countdown.lock();
		if let Some(timer) = countdown.timer.take() {
			timer.cancel();
		}
		countdown.pending = None;
		countdown.generation = countdown.generation.wrapping_add(1);
		trace!(scheduler = self.inner.id.0, "autosave.debounce.cancel");
	}

	/// Whether a snapshot is waiting for its countdown.
	pub fn is_pending(&self) -> bool {
		self.inner.countdown.lock().pending.is_some()
	}

	/// Number of dispatched saves that have not finished.
	pub fn in_flight(&self) -> usize {
		self.inner.in_flight.count.load(Ordering::Acquire)
	}

	/// Resolves once no save is in flight.
	pub async fn settled(&self) {
		loop {
			let idle = self.inner.in_flight.idle.notified();
			if self.in_flight() == 0 {
				return;
			}
			idle.await;
		}
	}

	/// Flush target that flushes this scheduler while it is alive.
	pub fn flush_target(&self) -> FlushTarget {
		let inner: Weak<Inner<S>> = Arc::downgrade(&self.inner);
		FlushTarget::new(self.inner.id.to_string(), move || {
			if let Some(inner) = inner.upgrade() {
				inner.flush();
			}
		})
	}
}

#[cfg(test)]
mod tests;
