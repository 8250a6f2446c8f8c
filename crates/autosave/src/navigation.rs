//! Runs the active flush before the host page navigates away.

use std::sync::{Arc, Weak};

use scribe_dom::{Document, Event, EventKind, ListenerId, Phase, Window};
use scribe_worker::{TaskClass, spawn_on};
use tokio::runtime::Handle;
use tracing::debug;

use crate::error::Result;
use crate::flush::{FlushChannel, FlushListener};

/// Re-renders the current route from freshly loaded data.
pub trait Router: Send + Sync + 'static {
	fn force_refresh(&self);
}

/// Page-lifetime listener pair installed on a [`Document`] and [`Window`].
///
/// Both listeners track the channel through their own [`FlushListener`], so
/// they always run the most recent registration.
///
/// Link clicks run the active flush during capture, before any default
/// navigation. Back/forward traversal runs the flush and then requests one
/// router refresh on a later task. Dropping the interceptor removes both
/// listeners.
pub struct NavigationInterceptor {
	document: Arc<Document>,
	window: Arc<Window>,
	click: ListenerId,
	pop_state: ListenerId,
}

impl NavigationInterceptor {
	pub fn install(document: &Arc<Document>, window: &Arc<Window>, channel: &FlushChannel, router: Arc<dyn Router>) -> Result<Self> {
		let handle = scribe_worker::runtime_handle()?;
		let flush = channel.subscribe();

		let click = document.events().add_listener(
			EventKind::Click,
			Phase::Capture,
			link_click_listener(Arc::downgrade(document), flush.clone()),
		);

		let pop_state = window
			.events()
			.add_listener(EventKind::PopState, Phase::Bubble, pop_state_listener(flush, router, handle));

		debug!("autosave.navigation.install");
		Ok(Self {
			document: document.clone(),
			window: window.clone(),
			click,
			pop_state,
		})
	}
}

fn link_click_listener(document: Weak<Document>, flush: FlushListener) -> impl Fn(&Event) + Send + Sync + 'static {
	move |event: &Event| {
		let Some(target) = event.target() else {
			return;
		};
		let Some(document) = document.upgrade() else {
			return;
		};
		if let Some(href) = document.link_destination(target) {
			let outcome = flush.invoke();
			debug!(href = %href, ?outcome, "autosave.navigation.link");
		}
	}
}

fn pop_state_listener(flush: FlushListener, router: Arc<dyn Router>, handle: Handle) -> impl Fn(&Event) + Send + Sync + 'static {
	move |event: &Event| {
		let outcome = flush.invoke();
		debug!(url = event.url().unwrap_or_default(), ?outcome, "autosave.navigation.pop_state");

		let router = router.clone();
		spawn_on(&handle, TaskClass::Background, async move {
			router.force_refresh();
		});
	}
}

impl Drop for NavigationInterceptor {
	fn drop(&mut self) {
		self.document.events().remove_listener(self.click);
		self.window.events().remove_listener(self.pop_state);
		debug!("autosave.navigation.remove");
	}
}

impl std::fmt::Debug for NavigationInterceptor {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("NavigationInterceptor")
			.field("click", &self.click)
			.field("pop_state", &self.pop_state)
			.finish_non_exhaustive()
	}
}

#[cfg(test)]
mod tests;
