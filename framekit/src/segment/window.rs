// SPDX-License-Identifier: Apache-2.0

use std::io;
use std::io::{IoSlice, Write};
use std::ops::{Bound, RangeBounds};
use all_asserts::assert_le;
use crate::error::ErrorBox;
use super::Segment;

/// A [`Segment`] narrowed to a sub-range of another segment's readable bytes,
/// like a buffer whose reader index has advanced past a header.
#[derive(Clone, Debug)]
pub struct Window<S: Segment> {
	inner: S,
	start: usize,
	len: usize,
}

impl<S: Segment> Window<S> {
	/// Narrows `inner` to `range`, relative to its readable bytes.
	///
	/// # Panics
	///
	/// Panics if `range` is out of bounds of the readable bytes.
	pub fn new<R: RangeBounds<usize>>(inner: S, range: R) -> Self {
		let readable = inner.readable_len();
		let start = match range.start_bound() {
			Bound::Included(&start) => start,
			Bound::Excluded(&start) => start + 1,
			Bound::Unbounded => 0
		};
		let end = match range.end_bound() {
			Bound::Included(&end) => end + 1,
			Bound::Excluded(&end) => end,
			Bound::Unbounded => readable
		};
		assert_le!(start, end, "window start must not pass its end");
		assert_le!(end, readable, "window must lie within the readable bytes");

		Self {
			start: inner.read_start() + start,
			len: end - start,
			inner,
		}
	}

	/// Returns the wrapped segment.
	pub fn get_ref(&self) -> &S { &self.inner }

	/// Unwraps the inner segment.
	pub fn into_inner(self) -> S { self.inner }
}

impl<S: Segment> Segment for Window<S> {
	#[inline]
	fn memory(&self) -> &[u8] { self.inner.memory() }
	#[inline]
	fn read_start(&self) -> usize { self.start }
	#[inline]
	fn readable_len(&self) -> usize { self.len }
	#[inline]
	fn is_direct(&self) -> bool { self.inner.is_direct() }
	#[inline]
	fn view_count(&self) -> usize { self.inner.view_count() }

	fn view(&self, index: usize, len: usize) -> &[u8] {
		self.inner.view(index, len)
	}

	fn copy_to_slice(&self, index: usize, dst: &mut [u8]) {
		self.inner.copy_to_slice(index, dst)
	}

	fn io_slices<'a>(&'a self, index: usize, len: usize, out: &mut Vec<IoSlice<'a>>) {
		self.inner.io_slices(index, len, out)
	}

	fn write_to(&self, index: usize, len: usize, out: &mut dyn Write) -> io::Result<()> {
		self.inner.write_to(index, len, out)
	}

	fn release(&mut self) -> Result<(), ErrorBox> { self.inner.release() }
}
