//! Task plumbing shared by the autosave core and its host.
//!
//! Every spawn goes through [`spawn_on`] so the task class shows up in traces,
//! and every call into foreign callbacks that must not take the caller down
//! goes through [`isolate`].

mod class;
mod isolate;
mod spawn;
mod token;

pub use class::TaskClass;
pub use isolate::{isolate, panic_message};
pub use spawn::{runtime_handle, spawn_on};
pub use token::GenerationClock;
