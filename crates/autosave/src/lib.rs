//! Autosave and flush coordination for the record edit form.
//!
//! Four pieces cooperate:
//!
//! - [`DebouncedSave`] collapses bursts of edits into one trailing-edge save
//!   and can be flushed on demand.
//! - [`FlushChannel`] is a single-slot broadcast of "the flush to run before
//!   leaving the page"; registering replaces, never queues.
//! - [`NavigationInterceptor`] watches link clicks and back/forward traversal
//!   on the host page and runs the active flush before navigation proceeds.
//! - [`EditSession`] owns the form for one record, drives the scheduler, tracks
//!   [`SaveStatus`](scribe_primitives::SaveStatus), and keeps its flush
//!   registered while mounted.
//!
//! # Ordering
//!
//! - One scheduler has at most one live countdown; scheduling supersedes it.
//! - A flush cancels the countdown and saves at once; a snapshot is never
//!   saved twice.
//! - On popstate the flush is initiated before the router refresh is requested.
//!
//! In-flight saves are never cancelled. Their failures are logged and leave
//! the session status at `saving`.

mod debounce;
mod error;
mod flush;
mod navigation;
mod session;

pub use debounce::{DebouncedSave, SaveFn, SchedulerId};
pub use error::{AutosaveError, Result};
pub use flush::{FlushChannel, FlushListener, FlushMessage, FlushOutcome, FlushTarget};
pub use navigation::{NavigationInterceptor, Router};
pub use session::{DEFAULT_QUIET_WINDOW, EditSession, PendingSaves, SessionOptions};
