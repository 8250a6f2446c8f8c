//! Edit session for one record.
//!
//! An [`EditSession`] owns the form snapshot, feeds every edit to its
//! [`DebouncedSave`], and publishes [`SaveStatus`] over a watch channel. While
//! mounted it keeps its scheduler registered on a [`FlushChannel`].
//!
//! # Status
//!
//! ```text
//! idle --edit--> saving --save ok--> saved --edit--> saving
//! ```
//!
//! A failed save is logged and leaves the status at `saving`.

use std::sync::Arc;
use std::time::Duration;

use parking_lot::Mutex;
use scribe_primitives::{BoxFutureStatic, EditableRecord, Field, FormSnapshot, RecordId, SaveStatus};
use scribe_store::RecordStore;
use tokio::sync::watch;
use tracing::{debug, info};

use crate::debounce::DebouncedSave;
use crate::error::Result;
use crate::flush::FlushChannel;

/// Quiet window used when none is configured.
pub const DEFAULT_QUIET_WINDOW: Duration = Duration::from_millis(700);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionOptions {
	pub quiet_window: Duration,
}

impl Default for SessionOptions {
	fn default() -> Self {
		Self {
			quiet_window: DEFAULT_QUIET_WINDOW,
		}
	}
}

impl SessionOptions {
	pub fn with_quiet_window(mut self, quiet_window: Duration) -> Self {
		self.quiet_window = quiet_window;
		self
	}
}

/// Mounted editor for one [`EditableRecord`].
///
/// Unmounting, explicitly or by drop, clears the flush registration and
/// flushes the pending edit so nothing typed is lost.
pub struct EditSession {
	record_id: RecordId,
	form: Mutex<FormSnapshot>,
	status: Arc<watch::Sender<SaveStatus>>,
	store: Arc<dyn RecordStore>,
	channel: FlushChannel,
	scheduler: DebouncedSave<FormSnapshot>,
	/// Swapped-out schedulers whose saves may still be in flight.
	retired: Vec<DebouncedSave<FormSnapshot>>,
	mounted: bool,
}

impl EditSession {
	pub fn mount(record: &EditableRecord, store: Arc<dyn RecordStore>, channel: &FlushChannel, options: SessionOptions) -> Result<Self> {
		let status = Arc::new(watch::channel(SaveStatus::Idle).0);
		let scheduler = save_scheduler(record.id, &store, &status, options.quiet_window)?;
		channel.register(scheduler.flush_target());

		info!(
			record_id = record.id.get(),
			scheduler = scheduler.id().get(),
			quiet_window_ms = options.quiet_window.as_millis() as u64,
			"autosave.session.mount"
		);

		Ok(Self {
			record_id: record.id,
			form: Mutex::new(FormSnapshot::from_record(record)),
			status,
			store,
			channel: channel.clone(),
			scheduler,
			retired: Vec::new(),
			mounted: true,
		})
	}

	pub fn record_id(&self) -> RecordId {
		self.record_id
	}

	/// Replaces one field and schedules a save of the whole form.
	pub fn update(&self, field: Field, value: impl Into<String>) {
		let snapshot = {
			let mut form = self.form.lock();
			*form = form.with_field(field, value);
			form.clone()
		};

		let started = self.status.send_if_modified(|status| {
			if *status == SaveStatus::Saving {
				return false;
			}
			*status = SaveStatus::Saving;
			true
		});
		if started {
			debug!(record_id = self.record_id.get(), "autosave.session.saving");
		}

		self.scheduler.schedule(snapshot);
	}

	pub fn snapshot(&self) -> FormSnapshot {
		self.form.lock().clone()
	}

	pub fn status(&self) -> SaveStatus {
		*self.status.borrow()
	}

	pub fn subscribe_status(&self) -> watch::Receiver<SaveStatus> {
		self.status.subscribe()
	}

	pub fn quiet_window(&self) -> Duration {
		self.scheduler.quiet_window()
	}

	/// Whether an edit is waiting for its quiet window.
	pub fn is_pending(&self) -> bool {
		self.scheduler.is_pending()
	}

	/// Swaps in a scheduler with a new quiet window.
	///
	/// The outgoing scheduler is unregistered and flushed before the new one
	/// is registered.
	pub fn set_quiet_window(&mut self, quiet_window: Duration) -> Result<()> {
		if quiet_window == self.scheduler.quiet_window() {
			return Ok(());
		}

		let next = save_scheduler(self.record_id, &self.store, &self.status, quiet_window)?;
		let previous = std::mem::replace(&mut self.scheduler, next);

		if self.mounted {
			self.channel.unregister();
			previous.flush();
			self.channel.register(self.scheduler.flush_target());
		} else {
			previous.flush();
		}

		debug!(
			record_id = self.record_id.get(),
			from = previous.id().get(),
			to = self.scheduler.id().get(),
			"autosave.session.scheduler_swap"
		);
		self.retired.retain(|scheduler| scheduler.in_flight() > 0);
		self.retired.push(previous);
		Ok(())
	}

	/// Resolves once every save this session dispatched has finished.
	pub async fn settled(&self) {
		self.pending().settled().await;
	}

	/// Unregisters, flushes the pending edit, and hands back its in-flight saves.
	pub fn unmount(mut self) -> PendingSaves {
		self.teardown();
		self.pending()
	}

	fn pending(&self) -> PendingSaves {
		let mut schedulers = self.retired.clone();
		schedulers.push(self.scheduler.clone());
		PendingSaves { schedulers }
	}

	fn teardown(&mut self) {
		if !self.mounted {
			return;
		}
		self.mounted = false;
		self.channel.unregister();
		let flushed = self.scheduler.flush();
		info!(record_id = self.record_id.get(), flushed, "autosave.session.unmount");
	}
}

impl Drop for EditSession {
	fn drop(&mut self) {
		self.teardown();
	}
}

impl std::fmt::Debug for EditSession {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("EditSession")
			.field("record_id", &self.record_id)
			.field("status", &self.status())
			.field("scheduler", &self.scheduler)
			.field("mounted", &self.mounted)
			.finish_non_exhaustive()
	}
}

/// Saves still running after a session was unmounted.
#[must_use = "await `settled` to wait for the final save"]
#[derive(Debug)]
pub struct PendingSaves {
	schedulers: Vec<DebouncedSave<FormSnapshot>>,
}

impl PendingSaves {
	pub fn in_flight(&self) -> usize {
		self.schedulers.iter().map(DebouncedSave::in_flight).sum()
	}

	pub async fn settled(self) {
		for scheduler in &self.schedulers {
			scheduler.settled().await;
		}
	}
}

fn save_scheduler(
	id: RecordId,
	store: &Arc<dyn RecordStore>,
	status: &Arc<watch::Sender<SaveStatus>>,
	quiet_window: Duration,
) -> Result<DebouncedSave<FormSnapshot>> {
	let store = store.clone();
	let status = status.clone();
	DebouncedSave::new(quiet_window, move |snapshot: FormSnapshot| -> BoxFutureStatic<Result<()>> {
		let store = store.clone();
		let status = status.clone();
		Box::pin(async move {
			store.save(id, &snapshot).await?;
			status.send_replace(SaveStatus::Saved);
			debug!(record_id = id.get(), "autosave.session.saved");
			Ok(())
		})
	})
}
