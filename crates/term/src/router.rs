use scribe_autosave::Router;
use tokio::sync::mpsc;

/// Forwards refresh requests to the app loop, which reloads the current view.
#[derive(Debug, Clone)]
pub struct ChannelRouter {
	tx: mpsc::UnboundedSender<()>,
}

impl ChannelRouter {
	pub fn new() -> (Self, mpsc::UnboundedReceiver<()>) {
		let (tx, rx) = mpsc::unbounded_channel();
		(Self { tx }, rx)
	}
}

impl Router for ChannelRouter {
	fn force_refresh(&self) {
		if self.tx.send(()).is_err() {
			tracing::debug!("term.router.closed");
		}
	}
}
