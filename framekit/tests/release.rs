// SPDX-License-Identifier: Apache-2.0

use std::cell::Cell;
use std::rc::Rc;
use pretty_assertions::assert_eq;
use framekit::{CompositeView, ErrorKind, OperationKind, PooledSegment, Segment};
use crate::common::MockSegment;

mod common;

fn counted(segments: [MockSegment; 3]) -> (CompositeView<MockSegment, 3>, [Rc<Cell<usize>>; 3]) {
	let counts = [
		segments[0].releases(),
		segments[1].releases(),
		segments[2].releases(),
	];
	(CompositeView::new(segments), counts)
}

fn release_counts(counts: &[Rc<Cell<usize>>; 3]) -> [usize; 3] {
	[counts[0].get(), counts[1].get(), counts[2].get()]
}

#[test]
fn release_is_idempotent() {
	let (mut view, counts) = counted([
		MockSegment::new(*b"abc"),
		MockSegment::new(*b"def"),
		MockSegment::new(*b"ghi"),
	]);

	view.release().unwrap();
	assert!(view.is_released());
	assert_eq!(release_counts(&counts), [1, 1, 1]);

	view.release().unwrap();
	drop(view);
	assert_eq!(release_counts(&counts), [1, 1, 1]);
}

#[test]
fn drop_releases_once() {
	let (view, counts) = counted([
		MockSegment::new(*b"abc"),
		MockSegment::new(*b"def"),
		MockSegment::new(*b"ghi"),
	]);
	assert_eq!(release_counts(&counts), [0, 0, 0]);
	drop(view);
	assert_eq!(release_counts(&counts), [1, 1, 1]);
}

#[test]
fn failure_does_not_stop_release() {
	let (mut view, counts) = counted([
		MockSegment::new(*b"abc").failing(),
		MockSegment::new(*b"def"),
		MockSegment::new(*b"ghi").failing(),
	]);

	let error = view.release().unwrap_err();
	assert_eq!(error.kind(), ErrorKind::Release);
	assert_eq!(error.operation(), OperationKind::Release);
	let failures = error.release_failures().unwrap();
	assert_eq!(failures.parts().collect::<Vec<_>>(), [0, 2]);
	assert_eq!(failures.failures()[0].1.to_string(), "release refused");
	assert_eq!(release_counts(&counts), [1, 1, 1]);

	// Released despite the failures; nothing is retried.
	assert!(view.is_released());
	view.release().unwrap();
	assert_eq!(release_counts(&counts), [1, 1, 1]);
}

#[test]
fn reads_fail_once_released() {
	let mut view = CompositeView::pair(b"abc".to_vec(), b"def".to_vec());
	view.release().unwrap();

	assert_eq!(view.capacity(), 6);
	assert_eq!(view.get_u8(0).unwrap_err().kind(), ErrorKind::Released);
	assert_eq!(view.copy_range(0, 2).unwrap_err().kind(), ErrorKind::Released);
	assert_eq!(view.view(0, 1).unwrap_err().kind(), ErrorKind::Released);
	assert_eq!(view.materialize().unwrap_err().kind(), ErrorKind::Released);
	assert_eq!(view.write_to(0, 1, &mut Vec::<u8>::new()).unwrap_err().kind(), ErrorKind::Released);
	assert_eq!(view.copy_range(0, 0).unwrap_err().kind(), ErrorKind::Released);
	assert_eq!(view.bytes().count(), 0);
	assert_ne!(view, b"abcdef");
}

// The shared pool is global to the test binary, so block counts race.
#[cfg(not(feature = "shared-pool"))]
#[test]
fn pooled_segments_return_to_pool() {
	use framekit::pool::{pool, MutPool, Pool};

	pool().try_borrow().unwrap().shed();

	let view = CompositeView::triple(
		PooledSegment::from_slice(b"head").unwrap(),
		PooledSegment::from_slice(b"meta").unwrap(),
		PooledSegment::from_slice(b"payload").unwrap(),
	);
	assert!(view.is_direct());
	assert_eq!(view.copy_range(2, 8).unwrap(), b"admetapa");
	assert_eq!(pool().try_borrow().unwrap().len(), 0);

	drop(view);
	assert_eq!(pool().try_borrow().unwrap().len(), 3);
}

#[test]
fn pooled_segment_consumed_prefix() {
	let mut header = PooledSegment::from_slice(b"..head").unwrap();
	header.consume(2);
	assert_eq!(header.read_start(), 2);

	let view = CompositeView::pair(header, PooledSegment::from_slice(b"er").unwrap());
	assert_eq!(view.materialize().unwrap(), b"header");
}

#[cfg(not(feature = "shared-pool"))]
#[test]
fn pool_failure_is_isolated() {
	use framekit::pool::{pool, MutPool, Pool};

	let shared = pool();
	shared.try_borrow().unwrap().shed();

	let mut view = CompositeView::pair(
		PooledSegment::from_slice(b"left").unwrap(),
		PooledSegment::from_slice(b"right").unwrap(),
	);

	{
		// Hold the pool so neither block can be collected.
		let _guard = shared.try_borrow().unwrap();
		let error = view.release().unwrap_err();
		assert_eq!(error.release_failures().unwrap().parts().collect::<Vec<_>>(), [0, 1]);
	}

	assert!(view.is_released());
	assert!(view.parts().all(PooledSegment::is_released));
	assert_eq!(shared.try_borrow().unwrap().len(), 0);
}

#[cfg(not(feature = "shared-pool"))]
#[test]
fn pool_reserve_and_shed() {
	use framekit::pool::{pool, MutPool, Pool, BLOCK_SIZE};

	let shared = pool();
	shared.shed().unwrap();
	shared.try_borrow().unwrap().claim_reserve(4);
	assert_eq!(shared.try_borrow().unwrap().len(), 4);

	let mut segment = PooledSegment::claim().unwrap();
	assert_eq!(shared.try_borrow().unwrap().len(), 3);
	assert_eq!(segment.write(&[1; BLOCK_SIZE + 1]), BLOCK_SIZE);
	assert_eq!(segment.limit(), 0);

	shared.shed().unwrap();
	assert!(shared.try_borrow().unwrap().is_empty());
	drop(segment);
}

#[cfg(feature = "shared-pool")]
#[test]
fn shared_pool_under_contention() {
	use std::thread;

	thread::scope(|scope| {
		for id in 0..8u8 {
			scope.spawn(move || {
				for _ in 0..500 {
					let mut view = CompositeView::pair(
						PooledSegment::from_slice(&[id; 16]).unwrap(),
						PooledSegment::from_slice(&[id; 32]).unwrap(),
					);
					assert_eq!(view.capacity(), 48);
					assert_eq!(view.get_u8(47).unwrap(), id);
					view.release().unwrap();
				}
			});
		}
	});
}
