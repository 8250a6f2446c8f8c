//! Host page model for the navigation layer.
//!
//! A [`Document`] holds an element tree and document-level listeners; a
//! [`Window`] holds session history and dispatches [`EventKind::PopState`]
//! on back/forward traversal. Both expose an [`EventTarget`] so components can
//! install and remove listeners across their lifetime.

mod document;
mod event;
mod window;

pub use document::{ClickOutcome, Document, DomError, NodeId};
pub use event::{Event, EventKind, EventTarget, Listener, ListenerId, Phase};
pub use window::Window;
