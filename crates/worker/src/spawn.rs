use std::future::Future;
use std::sync::OnceLock;

use tokio::runtime::{Builder, Handle, Runtime};
use tokio::task::JoinHandle;

use crate::TaskClass;

static GLOBAL_RT: OnceLock<Runtime> = OnceLock::new();

/// Returns the ambient tokio handle, falling back to a shared runtime.
///
/// The fallback is built on first use from outside any runtime, for callers
/// such as drop paths running on a plain thread.
pub fn runtime_handle() -> std::io::Result<Handle> {
	if let Ok(handle) = Handle::try_current() {
		return Ok(handle);
	}
	if let Some(runtime) = GLOBAL_RT.get() {
		return Ok(runtime.handle().clone());
	}

	let runtime = Builder::new_multi_thread()
		.enable_all()
		.worker_threads(1)
		.thread_name("scribe-worker-global")
		.build()?;
	Ok(GLOBAL_RT.get_or_init(|| runtime).handle().clone())
}

/// Spawns an async task on `handle` with task class metadata.
pub fn spawn_on<F>(handle: &Handle, class: TaskClass, fut: F) -> JoinHandle<F::Output>
where
	F: Future + Send + 'static,
	F::Output: Send + 'static,
{
	tracing::trace!(worker_class = class.as_str(), "worker.spawn");
	handle.spawn(fut)
}
