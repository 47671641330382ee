// SPDX-License-Identifier: Apache-2.0

use std::cmp::min;
use std::iter::FusedIterator;
use std::ops::Range;
use crate::error::BoundsError;
use crate::segment::Segment;
use super::{CompositeView, Error, OperationKind, Result};

/// A logical index resolved to a segment.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub struct Position {
	/// The index of the segment within the composite.
	pub part: usize,
	/// The absolute index within the segment's memory.
	pub offset: usize,
}

/// A run of bytes within one segment, produced by splitting a logical range at
/// segment boundaries.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub struct Span {
	/// The index of the segment within the composite.
	pub part: usize,
	/// The absolute index within the segment's memory.
	pub offset: usize,
	/// The number of bytes.
	pub len: usize,
}

impl Span {
	/// Returns the absolute range within the segment's memory.
	pub fn range(&self) -> Range<usize> {
		self.offset..self.offset + self.len
	}
}

impl<S: Segment, const K: usize> CompositeView<S, K> {
	/// Resolves a logical `index` to its segment and absolute offset within it.
	pub fn resolve(&self, index: usize) -> Result<Position> {
		if self.released {
			return Err(Error::released(OperationKind::Get))
		}

		if index >= self.capacity {
			return Err(Error::out_of_bounds(
				OperationKind::Get,
				BoundsError { index, len: 1, capacity: self.capacity }
			))
		}

		Ok(self.locate(index))
	}

	/// Splits `len` bytes at logical `index` into per-segment spans.
	pub fn spans(&self, index: usize, len: usize) -> Result<Spans<'_, S, K>> {
		self.spans_for(OperationKind::Get, index, len)
	}

	pub(super) fn spans_for(
		&self,
		op: OperationKind,
		index: usize,
		len: usize
	) -> Result<Spans<'_, S, K>> {
		self.check(op, index, len)?;

		if len == 0 {
			return Ok(Spans { view: self, part: K, offset: 0, remaining: 0 })
		}

		let Position { part, offset } = self.locate(index);
		Ok(Spans { view: self, part, offset, remaining: len })
	}

	/// Checks that the view is readable and that `len` bytes at `index` lie within
	/// the capacity.
	pub(super) fn check(&self, op: OperationKind, index: usize, len: usize) -> Result {
		if self.released {
			return Err(Error::released(op))
		}

		match index.checked_add(len) {
			Some(end) if end <= self.capacity => Ok(()),
			_ => Err(Error::out_of_bounds(
				op,
				BoundsError { index, len, capacity: self.capacity }
			))
		}
	}

	/// Borrows the bytes of `span`.
	pub(super) fn span_data(&self, Span { part, offset, len }: Span) -> &[u8] {
		self.parts[part].segment.view(offset, len)
	}

	/// Scans boundaries from the last segment toward the first, selecting the
	/// first one at or below `index`. Empty segments share their boundary with
	/// the next segment and so are never selected, except an empty final segment
	/// at `index == capacity`, which callers exclude.
	fn locate(&self, index: usize) -> Position {
		let part = self.starts
					   .iter()
					   .rposition(|&start| index >= start)
					   .unwrap_or(0);
		Position {
			part,
			offset: self.parts[part].start + (index - self.starts[part])
		}
	}
}

/// An iterator over the [`Span`]s of a logical range, in order.
pub struct Spans<'a, S: Segment, const K: usize> {
	view: &'a CompositeView<S, K>,
	part: usize,
	offset: usize,
	remaining: usize,
}

impl<S: Segment, const K: usize> Spans<'_, S, K> {
	/// Returns the number of bytes not yet yielded.
	pub fn remaining(&self) -> usize { self.remaining }
}

impl<S: Segment, const K: usize> Iterator for Spans<'_, S, K> {
	type Item = Span;

	fn next(&mut self) -> Option<Span> {
		while self.remaining > 0 && self.part < K {
			let part = &self.view.parts[self.part];
			let available = part.start + part.len - self.offset;
			let len = min(available, self.remaining);
			let span = Span { part: self.part, offset: self.offset, len };

			self.part += 1;
			if let Some(next) = self.view.parts.get(self.part) {
				self.offset = next.start;
			}

			if len > 0 {
				self.remaining -= len;
				return Some(span)
			}
		}

		debug_assert_eq!(self.remaining, 0, "range should have been checked against capacity");
		None
	}

	fn size_hint(&self) -> (usize, Option<usize>) {
		if self.remaining == 0 {
			(0, Some(0))
		} else {
			(1, Some(K - self.part))
		}
	}
}

impl<S: Segment, const K: usize> FusedIterator for Spans<'_, S, K> { }

#[cfg(test)]
mod test {
	use pretty_assertions::assert_eq;
	use crate::CompositeView;
	use super::{Position, Span};

	fn triple() -> CompositeView<Vec<u8>, 3> {
		CompositeView::triple(vec![0; 3], vec![1; 5], vec![2; 4])
	}

	#[test]
	fn boundaries() {
		assert_eq!(triple().boundaries(), &[0, 3, 8]);
	}

	#[test]
	fn locate_each_part() {
		let view = triple();
		assert_eq!(view.locate(0), Position { part: 0, offset: 0 });
		assert_eq!(view.locate(2), Position { part: 0, offset: 2 });
		assert_eq!(view.locate(3), Position { part: 1, offset: 0 });
		assert_eq!(view.locate(7), Position { part: 1, offset: 4 });
		assert_eq!(view.locate(8), Position { part: 2, offset: 0 });
		assert_eq!(view.locate(11), Position { part: 2, offset: 3 });
	}

	#[test]
	fn locate_skips_empty_part() {
		let view = CompositeView::triple(vec![0; 2], vec![], vec![2; 2]);
		assert_eq!(view.boundaries(), &[0, 2, 2]);
		assert_eq!(view.locate(2), Position { part: 2, offset: 0 });
	}

	#[test]
	fn spans_skip_empty_part() {
		let view = CompositeView::triple(vec![0; 2], vec![], vec![2; 2]);
		let spans: Vec<_> = view.spans(1, 2).unwrap().collect();
		assert_eq!(
			spans,
			[
				Span { part: 0, offset: 1, len: 1 },
				Span { part: 2, offset: 0, len: 1 },
			]
		);
	}

	#[test]
	fn zero_length_at_capacity() {
		let view = triple();
		assert_eq!(view.spans(12, 0).unwrap().count(), 0);
		assert!(view.spans(13, 0).is_err());
	}
}
