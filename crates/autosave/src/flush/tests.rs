use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use pretty_assertions::assert_eq;

use super::*;

fn counting(label: &str) -> (FlushTarget, Arc<AtomicUsize>) {
	let calls = Arc::new(AtomicUsize::new(0));
	let counter = calls.clone();
	let target = FlushTarget::new(label, move || {
		counter.fetch_add(1, Ordering::SeqCst);
	});
	(target, calls)
}

#[test]
fn invoke_without_registration_is_empty() {
	let channel = FlushChannel::new();
	assert_eq!(channel.invoke(), FlushOutcome::Empty);
	assert!(channel.active().is_none());
}

#[test]
fn registering_replaces_the_previous_target() {
	let channel = FlushChannel::new();
	let (first, first_calls) = counting("first");
	let (second, second_calls) = counting("second");

	channel.register(first);
	channel.register(second);

	assert_eq!(channel.invoke(), FlushOutcome::Flushed);
	assert_eq!(first_calls.load(Ordering::SeqCst), 0);
	assert_eq!(second_calls.load(Ordering::SeqCst), 1);
	assert_eq!(channel.active().map(|t| t.label().to_string()).as_deref(), Some("second"));
}

#[test]
fn unregister_clears_whoever_is_active() {
	let channel = FlushChannel::new();
	let (target, calls) = counting("only");
	channel.register(target);

	channel.send(FlushMessage::ClearActive);

	assert_eq!(channel.invoke(), FlushOutcome::Empty);
	assert_eq!(calls.load(Ordering::SeqCst), 0);
}

#[test]
fn clones_share_one_slot() {
	let channel = FlushChannel::new();
	let other = channel.clone();
	let (target, calls) = counting("shared");

	other.register(target);
	channel.invoke();
	other.unregister();

	assert_eq!(calls.load(Ordering::SeqCst), 1);
	assert!(channel.active().is_none());
}

#[test]
fn listeners_see_only_the_latest_value() {
	let channel = FlushChannel::new();
	let listener = channel.subscribe();
	let (a, a_calls) = counting("a");
	let (b, b_calls) = counting("b");

	channel.register(a);
	channel.register(b.clone());

	let current = listener.current().expect("registered");
	assert!(current.same_callback(&b));
	assert_eq!(listener.invoke(), FlushOutcome::Flushed);
	assert_eq!(a_calls.load(Ordering::SeqCst), 0);
	assert_eq!(b_calls.load(Ordering::SeqCst), 1);
}

#[test]
fn late_subscriber_observes_current_registration() {
	let channel = FlushChannel::new();
	let (target, _) = counting("early");
	channel.register(target.clone());

	let listener = channel.subscribe();

	assert!(listener.current().is_some_and(|t| t.same_callback(&target)));
}

#[test]
fn panicking_flush_is_contained() {
	let channel = FlushChannel::new();
	channel.register(FlushTarget::new("bad", || panic!("flush exploded")));

	assert_eq!(channel.invoke(), FlushOutcome::Panicked);
	assert!(channel.active().is_some());
}

#[test]
fn flush_may_reregister_while_running() {
	let channel = FlushChannel::new();
	let (replacement, replacement_calls) = counting("replacement");
	let inner = channel.clone();
	channel.register(FlushTarget::new("swapper", move || inner.register(replacement.clone())));

	assert_eq!(channel.invoke(), FlushOutcome::Flushed);
	assert_eq!(channel.invoke(), FlushOutcome::Flushed);
	assert_eq!(replacement_calls.load(Ordering::SeqCst), 1);
}

#[tokio::test(flavor = "current_thread")]
async fn changed_reports_each_update() {
	let channel = FlushChannel::new();
	let mut listener = channel.subscribe();
	let (target, _) = counting("watched");

	channel.register(target.clone());
	let seen = listener.changed().await.expect("channel alive");
	assert!(seen.is_some_and(|t| t.same_callback(&target)));

	channel.unregister();
	assert!(listener.changed().await.expect("channel alive").is_none());

	drop(channel);
	assert!(listener.changed().await.is_none());
}

#[test]
fn global_channel_is_shared() {
	let a = FlushChannel::global();
	let b = FlushChannel::global();
	assert!(std::ptr::eq(a, b));
}
