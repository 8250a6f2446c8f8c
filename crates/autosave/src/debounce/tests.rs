use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use parking_lot::Mutex;
use pretty_assertions::assert_eq;
use proptest::prelude::*;
use scribe_primitives::{BoxFutureStatic, RecordId};
use scribe_store::StoreError;

use super::*;
use crate::AutosaveError;

const WINDOW: Duration = Duration::from_millis(700);

type Saves = Arc<Mutex<Vec<u32>>>;

fn recording() -> (Saves, impl Fn(u32) -> BoxFutureStatic<Result<()>> + Send + Sync + 'static) {
	let saves = Saves::default();
	let sink = saves.clone();
	let save = move |value: u32| -> BoxFutureStatic<Result<()>> {
		sink.lock().push(value);
		Box::pin(async { Ok(()) })
	};
	(saves, save)
}

fn ms(n: u64) -> Duration {
	Duration::from_millis(n)
}

#[tokio::test(flavor = "current_thread", start_paused = true)]
async fn burst_collapses_to_latest_value() {
	let (saves, save) = recording();
	let scheduler = DebouncedSave::new(WINDOW, save).unwrap();

	scheduler.schedule(1);
	tokio::time::sleep(ms(100)).await;
	scheduler.schedule(2);
	tokio::time::sleep(ms(100)).await;
	scheduler.schedule(3);

	tokio::time::sleep(ms(699)).await;
	assert!(saves.lock().is_empty());
	assert!(scheduler.is_pending());

	tokio::time::sleep(ms(2)).await;
	assert_eq!(*saves.lock(), vec![3]);
	assert!(!scheduler.is_pending());
}

#[tokio::test(flavor = "current_thread", start_paused = true)]
async fn spaced_calls_each_save() {
	let (saves, save) = recording();
	let scheduler = DebouncedSave::new(WINDOW, save).unwrap();

	scheduler.schedule(1);
	tokio::time::sleep(ms(800)).await;
	scheduler.schedule(2);
	tokio::time::sleep(ms(800)).await;

	assert_eq!(*saves.lock(), vec![1, 2]);
}

#[tokio::test(flavor = "current_thread", start_paused = true)]
async fn flush_saves_immediately_and_disarms_countdown() {
	let (saves, save) = recording();
	let scheduler = DebouncedSave::new(WINDOW, save).unwrap();

	scheduler.schedule(7);
	assert!(scheduler.flush());
	assert_eq!(*saves.lock(), vec![7]);

	tokio::time::sleep(ms(2_000)).await;
	assert_eq!(*saves.lock(), vec![7]);
	assert!(!scheduler.flush());
}

#[tokio::test(flavor = "current_thread", start_paused = true)]
async fn flush_with_nothing_pending_is_a_noop() {
	let (saves, save) = recording();
	let scheduler = DebouncedSave::new(WINDOW, save).unwrap();

	assert!(!scheduler.flush());
	tokio::time::sleep(ms(1_000)).await;
	assert!(saves.lock().is_empty());
}

#[tokio::test(flavor = "current_thread", start_paused = true)]
async fn schedule_after_flush_starts_a_fresh_countdown() {
	let (saves, save) = recording();
	let scheduler = DebouncedSave::new(WINDOW, save).unwrap();

	scheduler.schedule(1);
	scheduler.flush();
	scheduler.schedule(2);
	tokio::time::sleep(ms(699)).await;
	assert_eq!(*saves.lock(), vec![1]);

	tokio::time::sleep(ms(2)).await;
	assert_eq!(*saves.lock(), vec![1, 2]);
}

#[tokio::test(flavor = "current_thread", start_paused = true)]
async fn cancel_drops_pending_snapshot() {
	let (saves, save) = recording();
	let scheduler = DebouncedSave::new(WINDOW, save).unwrap();

	scheduler.schedule(1);
	scheduler.cancel();
	tokio::time::sleep(ms(1_000)).await;

	assert!(saves.lock().is_empty());
	assert!(!scheduler.flush());
}

#[tokio::test(flavor = "current_thread", start_paused = true)]
async fn dropping_last_clone_cancels_without_saving() {
	let (saves, save) = recording();
	let scheduler = DebouncedSave::new(WINDOW, save).unwrap();
	let clone = scheduler.clone();

	scheduler.schedule(1);
	drop(scheduler);
	tokio::time::sleep(ms(100)).await;
	clone.schedule(2);
	drop(clone);

	tokio::time::sleep(ms(2_000)).await;
	assert!(saves.lock().is_empty());
}

#[tokio::test(flavor = "current_thread", start_paused = true)]
async fn settled_waits_for_in_flight_saves() {
	let finished = Arc::new(AtomicBool::new(false));
	let done = finished.clone();
	let scheduler = DebouncedSave::new(WINDOW, move |_: u32| -> BoxFutureStatic<Result<()>> {
		let done = done.clone();
		Box::pin(async move {
			tokio::time::sleep(Duration::from_millis(250)).await;
			done.store(true, Ordering::SeqCst);
			Ok(())
		})
	})
	.unwrap();

	scheduler.settled().await;
	scheduler.schedule(1);
	scheduler.flush();
	assert_eq!(scheduler.in_flight(), 1);

	scheduler.settled().await;
	assert!(finished.load(Ordering::SeqCst));
	assert_eq!(scheduler.in_flight(), 0);
}

#[tokio::test(flavor = "current_thread", start_paused = true)]
async fn failed_save_still_settles() {
	let id = RecordId::new(9).unwrap();
	let scheduler = DebouncedSave::new(WINDOW, move |_: u32| -> BoxFutureStatic<Result<()>> {
		Box::pin(async move { Err(AutosaveError::Store(StoreError::NotFound(id))) })
	})
	.unwrap();

	scheduler.schedule(1);
	scheduler.flush();
	scheduler.settled().await;

	assert_eq!(scheduler.in_flight(), 0);
	assert!(!scheduler.is_pending());
}

#[tokio::test(flavor = "current_thread", start_paused = true)]
async fn flush_target_follows_scheduler_lifetime() {
	let (saves, save) = recording();
	let scheduler = DebouncedSave::new(WINDOW, save).unwrap();
	let target = scheduler.flush_target();
	assert_eq!(target.label(), scheduler.id().to_string());

	scheduler.schedule(4);
	target.call();
	assert_eq!(*saves.lock(), vec![4]);

	scheduler.schedule(5);
	drop(scheduler);
	target.call();
	assert_eq!(*saves.lock(), vec![4]);
}

#[tokio::test(flavor = "current_thread")]
async fn scheduler_ids_are_distinct() {
	let a = DebouncedSave::new(WINDOW, |_: u32| -> BoxFutureStatic<Result<()>> { Box::pin(async { Ok(()) }) }).unwrap();
	let b = a.clone();
	let c = DebouncedSave::new(WINDOW, |_: u32| -> BoxFutureStatic<Result<()>> { Box::pin(async { Ok(()) }) }).unwrap();

	assert_eq!(a.id(), b.id());
	assert_ne!(a.id(), c.id());
}

fn gap() -> impl Strategy<Value = u64> {
	prop_oneof![0u64..650, 750u64..1_500]
}

proptest! {
	#![proptest_config(ProptestConfig::with_cases(48))]

	#[test]
	fn saves_one_value_per_quiet_period(gaps in prop::collection::vec(gap(), 0..10)) {
		let rt = tokio::runtime::Builder::new_current_thread()
			.enable_time()
			.start_paused(true)
			.build()
			.unwrap();

		let saved = rt.block_on(async {
			let (saves, save) = recording();
			let scheduler = DebouncedSave::new(WINDOW, save).unwrap();
			for (value, gap) in gaps.iter().enumerate() {
				scheduler.schedule(value as u32);
				tokio::time::sleep(ms(*gap)).await;
			}
			scheduler.schedule(gaps.len() as u32);
			tokio::time::sleep(ms(2_000)).await;
			saves.lock().clone()
		});

		let mut expected: Vec<u32> = gaps
			.iter()
			.enumerate()
			.filter(|(_, gap)| **gap >= 750)
			.map(|(value, _)| value as u32)
			.collect();
		expected.push(gaps.len() as u32);

		prop_assert_eq!(saved, expected);
	}
}
