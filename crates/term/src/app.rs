//! Interactive loop: reads commands, drives the page, and prints the view.

use std::sync::Arc;

use anyhow::Context;
use scribe_autosave::{EditSession, FlushChannel, NavigationInterceptor, PendingSaves, SessionOptions};
use scribe_dom::{ClickOutcome, Document, Window};
use scribe_primitives::{RecordId, SaveStatus};
use scribe_store::RecordStore;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt};
use tokio::sync::{mpsc, watch};
use tracing::{debug, info, warn};

use crate::command::{Command, HELP};
use crate::page::{self, LIST_PATH, Route, Screen};
use crate::router::ChannelRouter;

enum View {
	Edit {
		session: EditSession,
		status: watch::Receiver<SaveStatus>,
	},
	List,
	/// Outside the app, or a route whose record could not be loaded.
	Away,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Flow {
	Continue,
	Quit,
}

pub struct App {
	store: Arc<dyn RecordStore>,
	options: SessionOptions,
	document: Arc<Document>,
	window: Arc<Window>,
	channel: FlushChannel,
	refresh: mpsc::UnboundedReceiver<()>,
	_interceptor: NavigationInterceptor,
	view: View,
	last_record: Option<RecordId>,
	/// Saves from unmounted sessions, awaited before exit.
	pending: Vec<PendingSaves>,
	screen: Screen,
}

impl App {
	/// Builds the page with history `[/projects, /projects/<project_id>]`.
	pub fn new(
		store: Arc<dyn RecordStore>,
		channel: FlushChannel,
		options: SessionOptions,
		project_id: &str,
	) -> anyhow::Result<Self> {
		let document = Arc::new(Document::new());
		let window = Arc::new(Window::new(LIST_PATH));
		window.push(format!("{LIST_PATH}/{project_id}"));

		let (router, refresh) = ChannelRouter::new();
		let interceptor = NavigationInterceptor::install(&document, &window, &channel, Arc::new(router))
			.context("failed to install navigation interceptor")?;

		Ok(Self {
			store,
			options,
			document,
			window,
			channel,
			refresh,
			_interceptor: interceptor,
			view: View::Away,
			last_record: None,
			pending: Vec::new(),
			screen: Screen::default(),
		})
	}

	pub async fn run<R, W>(mut self, input: R, mut output: W) -> anyhow::Result<()>
	where
		R: AsyncBufRead + Unpin,
		W: AsyncWrite + Unpin,
	{
		self.enter_route().await?;
		self.present(&mut output).await?;

		let mut lines = input.lines();
		loop {
			let flow = tokio::select! {
				line = lines.next_line() => match line.context("failed to read command")? {
					Some(line) => self.handle(&line).await?,
					None => Flow::Quit,
				},
				Some(()) = self.refresh.recv() => {
					self.refresh().await;
					Flow::Continue
				}
				status = next_status(&mut self.view) => {
					self.screen.line(format!("  [{status}]"));
					Flow::Continue
				}
			};
			self.present(&mut output).await?;
			if flow == Flow::Quit {
				break;
			}
		}

		self.shutdown().await;
		self.present(&mut output).await
	}

	async fn present<W: AsyncWrite + Unpin>(&mut self, output: &mut W) -> anyhow::Result<()> {
		if self.screen.is_empty() {
			return Ok(());
		}
		output.write_all(self.screen.take().as_bytes()).await?;
		output.flush().await?;
		Ok(())
	}

	async fn handle(&mut self, line: &str) -> anyhow::Result<Flow> {
		if line.trim().is_empty() {
			return Ok(Flow::Continue);
		}
		let command = match line.parse::<Command>() {
			Ok(command) => command,
			Err(error) => {
				self.screen.line(format!("error: {error}"));
				return Ok(Flow::Continue);
			}
		};
		debug!(?command, "term.command");

		match command {
			Command::Set { field, value } => match &self.view {
				View::Edit { session, .. } => session.update(field, value),
				_ => self.screen.line("nothing to edit on this page"),
			},
			Command::Click(id) => self.click(&id).await?,
			Command::Back => self.traverse(-1).await?,
			Command::Forward => self.traverse(1).await?,
			Command::Show => self.render().await,
			Command::Status => match &self.view {
				View::Edit { session, .. } => self.screen.line(format!("  [{}]", session.status())),
				_ => self.screen.line("no form open"),
			},
			Command::Help => self.screen.line(HELP),
			Command::Quit => return Ok(Flow::Quit),
		}
		Ok(Flow::Continue)
	}

	async fn click(&mut self, id: &str) -> anyhow::Result<()> {
		let Some(node) = self.document.find_by_id(id) else {
			self.screen.line(format!("no element #{id} on this page"));
			return Ok(());
		};
		match self.document.click(node)? {
			ClickOutcome::Navigate(url) => {
				self.window.push(url);
				self.enter_route().await
			}
			ClickOutcome::Stay => Ok(()),
		}
	}

	async fn traverse(&mut self, delta: isize) -> anyhow::Result<()> {
		if self.window.go(delta).is_none() {
			self.screen.line("no history in that direction");
			return Ok(());
		}
		self.enter_route().await
	}

	/// Unmounts the current view and mounts the one for the window location.
	async fn enter_route(&mut self) -> anyhow::Result<()> {
		self.leave_view();
		let location = self.window.location();
		info!(url = %location, "term.navigate");

		match Route::parse(&location) {
			Some(Route::List) => {
				page::build_list(&self.document, self.last_record)?;
				self.view = View::List;
			}
			Some(Route::Edit(raw_id)) => match scribe_store::fetch(&*self.store, &raw_id).await {
				Ok(Some(record)) => {
					page::build_edit(&self.document)?;
					let session = EditSession::mount(&record, self.store.clone(), &self.channel, self.options)?;
					let status = session.subscribe_status();
					self.last_record = Some(record.id);
					self.view = View::Edit { session, status };
				}
				Ok(None) => self.screen.line(format!("project {raw_id} not found")),
				Err(error) => self.screen.line(format!("cannot open project {raw_id}: {error}")),
			},
			None => {
				self.document.reset();
				self.screen.line(format!("left scribe for {location}; `back` to return"));
			}
		}

		self.render().await;
		Ok(())
	}

	fn leave_view(&mut self) {
		if let View::Edit { session, .. } = std::mem::replace(&mut self.view, View::Away) {
			self.pending.retain(|pending| pending.in_flight() > 0);
			self.pending.push(session.unmount());
		}
	}

	/// Reloads server-derived data for the current view. Form contents are kept.
	async fn refresh(&mut self) {
		debug!("term.refresh");
		match &self.view {
			View::Edit { session, .. } => {
				let id = session.record_id();
				match self.store.load(id).await {
					Ok(Some(record)) => self.screen.line(format!("== {} ==", record.heading())),
					Ok(None) => self.screen.line(format!("project {id} no longer exists")),
					Err(error) => warn!(record_id = id.get(), %error, "term.refresh.failed"),
				}
			}
			View::List => page::render_list(&mut self.screen, self.last_record),
			View::Away => {}
		}
	}

	async fn render(&mut self) {
		match &self.view {
			View::Edit { session, .. } => {
				let heading = match self.store.load(session.record_id()).await {
					Ok(Some(record)) => record.heading().to_string(),
					_ => scribe_primitives::UNTITLED_HEADING.to_string(),
				};
				page::render_edit(&mut self.screen, &heading, &session.snapshot(), session.status());
			}
			View::List => page::render_list(&mut self.screen, self.last_record),
			View::Away => {}
		}
	}

	async fn shutdown(&mut self) {
		self.leave_view();
		let pending = std::mem::take(&mut self.pending);
		let in_flight: usize = pending.iter().map(PendingSaves::in_flight).sum();
		if in_flight > 0 {
			self.screen.line(format!("waiting for {in_flight} save(s)"));
		}
		for saves in pending {
			saves.settled().await;
		}
		info!("term.shutdown");
		self.screen.line("bye");
	}
}

/// Next status published by the open form; pending forever on other views.
async fn next_status(view: &mut View) -> SaveStatus {
	if let View::Edit { status, .. } = view
		&& status.changed().await.is_ok()
	{
		return *status.borrow_and_update();
	}
	std::future::pending().await
}
