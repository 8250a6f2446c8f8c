use std::time::Duration;

use parking_lot::Mutex;
use pretty_assertions::assert_eq;
use scribe_dom::{ClickOutcome, NodeId};

use super::*;
use crate::flush::FlushTarget;

type Log = Arc<Mutex<Vec<&'static str>>>;

struct RecordingRouter(Log);

impl Router for RecordingRouter {
	fn force_refresh(&self) {
		self.0.lock().push("refresh");
	}
}

struct Page {
	document: Arc<Document>,
	window: Arc<Window>,
	channel: FlushChannel,
	log: Log,
	link: NodeId,
	input: NodeId,
}

impl Page {
	fn new() -> Self {
		let document = Arc::new(Document::new());
		let header = document.append(document.body(), "header", &[]).unwrap();
		let link = document.append(header, "a", &[("href", "/projects")]).unwrap();
		let input = document.append(document.body(), "input", &[("id", "title")]).unwrap();
		let window = Arc::new(Window::new("/projects"));
		window.push("/projects/1");
		Self {
			document,
			window,
			channel: FlushChannel::new(),
			log: Log::default(),
			link,
			input,
		}
	}

	fn install(&self) -> NavigationInterceptor {
		let router = Arc::new(RecordingRouter(self.log.clone()));
		NavigationInterceptor::install(&self.document, &self.window, &self.channel, router).unwrap()
	}

	fn register_logging_flush(&self) {
		let log = self.log.clone();
		self.channel.register(FlushTarget::new("test", move || log.lock().push("flush")));
	}

	fn log(&self) -> Vec<&'static str> {
		self.log.lock().clone()
	}
}

/// Lets spawned follow-up tasks run.
async fn next_tick() {
	tokio::time::sleep(Duration::from_millis(1)).await;
}

#[tokio::test(flavor = "current_thread", start_paused = true)]
async fn link_click_flushes_once_before_navigation() {
	let page = Page::new();
	let _interceptor = page.install();
	page.register_logging_flush();

	assert_eq!(page.document.click(page.link), Ok(ClickOutcome::Navigate("/projects".into())));
	next_tick().await;

	assert_eq!(page.log(), vec!["flush"]);
}

#[tokio::test(flavor = "current_thread", start_paused = true)]
async fn clicks_outside_links_do_not_flush() {
	let page = Page::new();
	let _interceptor = page.install();
	page.register_logging_flush();
	let empty = page.document.append(page.document.body(), "a", &[("href", "")]).unwrap();

	assert_eq!(page.document.click(page.input), Ok(ClickOutcome::Stay));
	assert_eq!(page.document.click(empty), Ok(ClickOutcome::Stay));
	next_tick().await;

	assert!(page.log().is_empty());
}

#[tokio::test(flavor = "current_thread", start_paused = true)]
async fn pop_state_flushes_then_refreshes_on_a_later_tick() {
	let page = Page::new();
	let _interceptor = page.install();
	page.register_logging_flush();

	assert_eq!(page.window.back().as_deref(), Some("/projects"));
	assert_eq!(page.log(), vec!["flush"]);

	next_tick().await;
	assert_eq!(page.log(), vec!["flush", "refresh"]);
}

#[tokio::test(flavor = "current_thread", start_paused = true)]
async fn pop_state_without_registration_still_refreshes_once() {
	let page = Page::new();
	let _interceptor = page.install();

	page.window.back();
	next_tick().await;

	assert_eq!(page.log(), vec!["refresh"]);
}

#[tokio::test(flavor = "current_thread", start_paused = true)]
async fn panicking_flush_does_not_block_navigation() {
	let page = Page::new();
	let _interceptor = page.install();
	page.channel.register(FlushTarget::new("broken", || panic!("flush failed")));

	assert_eq!(page.document.click(page.link), Ok(ClickOutcome::Navigate("/projects".into())));
	page.window.back();
	next_tick().await;

	assert_eq!(page.log(), vec!["refresh"]);
}

#[tokio::test(flavor = "current_thread", start_paused = true)]
async fn flush_follows_the_latest_registration() {
	let page = Page::new();
	let _interceptor = page.install();
	page.channel.register(FlushTarget::new("stale", || panic!("replaced target ran")));
	page.register_logging_flush();

	page.document.click(page.link).unwrap();
	page.window.back();
	next_tick().await;

	assert_eq!(page.log(), vec!["flush", "flush", "refresh"]);
}

#[tokio::test(flavor = "current_thread", start_paused = true)]
async fn dropping_interceptor_removes_listeners() {
	let page = Page::new();
	let interceptor = page.install();
	page.register_logging_flush();
	assert_eq!(page.document.events().listener_count(EventKind::Click), 1);
	assert_eq!(page.window.events().listener_count(EventKind::PopState), 1);

	drop(interceptor);

	assert_eq!(page.document.events().listener_count(EventKind::Click), 0);
	assert_eq!(page.window.events().listener_count(EventKind::PopState), 0);
	page.document.click(page.link).unwrap();
	page.window.back();
	next_tick().await;
	assert!(page.log().is_empty());
}
