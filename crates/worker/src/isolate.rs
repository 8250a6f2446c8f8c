use std::any::Any;
use std::panic::{AssertUnwindSafe, catch_unwind};

/// Extracts a readable message from a panic payload.
pub fn panic_message(payload: &(dyn Any + Send)) -> String {
	if let Some(msg) = payload.downcast_ref::<&'static str>() {
		(*msg).to_string()
	} else if let Some(msg) = payload.downcast_ref::<String>() {
		msg.clone()
	} else {
		"non-string panic payload".to_string()
	}
}

/// Runs a foreign callback, converting a panic into an error message.
///
/// Callers log the message and carry on; one faulty callback must not unwind
/// through the dispatcher that invoked it.
pub fn isolate<R>(f: impl FnOnce() -> R) -> Result<R, String> {
	catch_unwind(AssertUnwindSafe(f)).map_err(|payload| panic_message(payload.as_ref()))
}
