// SPDX-License-Identifier: Apache-2.0

#![allow(dead_code, unused_macros)]

use std::cell::{Cell, RefCell};
use std::fmt::{Arguments, Debug};
use std::io;
use std::rc::Rc;
use framekit::error::ErrorBox;
use framekit::{Segment, Subscription};

macro_rules! qc_assert_eq {
	($left:expr,$right:expr) => {{
		let left = $left;
		let right = $right;
		if left == right {
			TestResult::passed()
		} else {
			TestResult::error(
				common::format_qc_assert_error(&left, &right, None)
			)
		}
	}};
    ($left:expr,$right:expr,$($arg:tt)+) => {{
		let left = $left;
		let right = $right;
		if left == right {
			TestResult::passed()
		} else {
			TestResult::error(
				common::format_qc_assert_error(&left, &right, Some(format_args!($($arg)+)))
			)
		}
	}};
}

pub fn format_qc_assert_error<L: Debug, R: Debug>(left: &L, right: &R, msg: Option<Arguments>) -> String {
	if let Some(msg) = msg {
		format!(
			"assertion failed `(left == right)`: {msg}\n \
			left: `{left:?}`,\nright: `{right:?}`",
		)
	} else {
		format!(
			"assertion failed `(left == right)`:\n \
			left: `{left:?}`,\nright: `{right:?}`",
		)
	}
}

/// A segment with scripted capabilities, counting how often it's released.
pub struct MockSegment {
	data: Vec<u8>,
	start: usize,
	direct: bool,
	fail_release: bool,
	releases: Rc<Cell<usize>>,
}

impl MockSegment {
	pub fn new(data: impl Into<Vec<u8>>) -> Self {
		Self {
			data: data.into(),
			start: 0,
			direct: false,
			fail_release: false,
			releases: Rc::default(),
		}
	}

	/// Skips `start` bytes, as if a reader had consumed them.
	pub fn with_start(mut self, start: usize) -> Self {
		self.start = start;
		self
	}

	pub fn direct(mut self, direct: bool) -> Self {
		self.direct = direct;
		self
	}

	pub fn failing(mut self) -> Self {
		self.fail_release = true;
		self
	}

	pub fn releases(&self) -> Rc<Cell<usize>> { self.releases.clone() }
}

impl Segment for MockSegment {
	fn memory(&self) -> &[u8] { &self.data }

	fn read_start(&self) -> usize { self.start }

	fn is_direct(&self) -> bool { self.direct }

	fn release(&mut self) -> Result<(), ErrorBox> {
		self.releases.set(self.releases.get() + 1);
		if self.fail_release {
			Err("release refused".into())
		} else {
			Ok(())
		}
	}
}

/// A subscription recording the demand forwarded to it.
#[derive(Debug, Default)]
pub struct MockSubscription {
	external: u64,
	limit: u64,
	fail: bool,
	forwarded: RefCell<Vec<u64>>,
}

impl MockSubscription {
	pub fn new(external: u64, limit: u64) -> Self {
		Self { external, limit, ..Self::default() }
	}

	/// A subscription with outstanding demand under a high limit.
	pub fn eligible() -> Self { Self::new(1, 1024) }

	/// A subscription with no outstanding demand.
	pub fn idle() -> Self { Self::new(0, 1024) }

	pub fn failing(mut self) -> Self {
		self.fail = true;
		self
	}

	pub fn forwarded(&self) -> Vec<u64> { self.forwarded.borrow().clone() }

	pub fn total(&self) -> u64 { self.forwarded.borrow().iter().sum() }
}

impl Subscription for MockSubscription {
	type Error = io::Error;

	fn external_requested(&self) -> u64 { self.external }

	fn limit(&self) -> u64 { self.limit }

	fn forward_demand(&self, n: u64) -> io::Result<()> {
		if self.fail {
			return Err(io::Error::other("upstream closed"))
		}

		self.forwarded.borrow_mut().push(n);
		Ok(())
	}
}

/// Sums the demand forwarded across a snapshot.
pub fn total(snapshot: &[Option<MockSubscription>]) -> u64 {
	snapshot.iter().flatten().map(MockSubscription::total).sum()
}
