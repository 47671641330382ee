// SPDX-License-Identifier: Apache-2.0

use std::io::IoSlice;
use crate::element::{Element, MAX_ELEMENT_SIZE};
use crate::error::DiscontiguousError;
use crate::segment::Segment;
use super::{CompositeView, Error, OperationKind, Part, Result, Span};

impl<S: Segment, const K: usize> CompositeView<S, K> {
	/// Returns the byte at logical `index`.
	#[inline]
	pub fn get_u8(&self, index: usize) -> Result<u8> {
		self.get(index)
	}

	/// Reads a big-endian element at logical `index`, which may straddle segments.
	pub fn get<T: Element>(&self, index: usize) -> Result<T> {
		const { assert!(T::SIZE <= MAX_ELEMENT_SIZE, "element too wide") };
		let mut buf = [0; MAX_ELEMENT_SIZE];
		let bytes = &mut buf[..T::SIZE];
		self.read_into(index, bytes)?;
		Ok(T::from_be_slice(bytes))
	}

	/// Reads a little-endian element at logical `index`, which may straddle
	/// segments.
	pub fn get_le<T: Element>(&self, index: usize) -> Result<T> {
		const { assert!(T::SIZE <= MAX_ELEMENT_SIZE, "element too wide") };
		let mut buf = [0; MAX_ELEMENT_SIZE];
		let bytes = &mut buf[..T::SIZE];
		self.read_into(index, bytes)?;
		Ok(T::from_le_slice(bytes))
	}

	/// Fills `dst` with bytes from logical `index`. To read into part of a larger
	/// slice, pass a sub-slice.
	pub fn read_into(&self, index: usize, dst: &mut [u8]) -> Result {
		let mut pos = 0;
		for span in self.spans_for(OperationKind::Get, index, dst.len())? {
			let Span { part, offset, len } = span;
			self.parts[part].segment.copy_to_slice(offset, &mut dst[pos..pos + len]);
			pos += len;
		}
		Ok(())
	}

	/// Copies `len` bytes from logical `index` into a new vector.
	pub fn copy_range(&self, index: usize, len: usize) -> Result<Vec<u8>> {
		self.check(OperationKind::Copy, index, len)?;
		let mut vec = Vec::with_capacity(len);
		self.copy_into(index, len, &mut vec)?;
		Ok(vec)
	}

	/// Appends `len` bytes from logical `index` to `dst`.
	pub fn copy_into(&self, index: usize, len: usize, dst: &mut Vec<u8>) -> Result {
		let spans = self.spans_for(OperationKind::Copy, index, len)?;
		dst.reserve(len);
		for span in spans {
			dst.extend_from_slice(self.span_data(span));
		}
		Ok(())
	}

	/// Puts `len` bytes from logical `index` into `dst`.
	///
	/// # Panics
	///
	/// Panics if `dst` has less than `len` bytes of remaining capacity and can't
	/// grow.
	#[cfg(feature = "bytes")]
	pub fn copy_into_buf(&self, index: usize, len: usize, dst: &mut impl bytes::BufMut) -> Result {
		for span in self.spans_for(OperationKind::Copy, index, len)? {
			dst.put_slice(self.span_data(span));
		}
		Ok(())
	}

	/// Copies all readable bytes into a new, contiguous vector. Use this where an
	/// operation needs one slice and [`view`](Self::view) can't provide it.
	pub fn materialize(&self) -> Result<Vec<u8>> {
		if self.released {
			return Err(Error::released(OperationKind::Copy))
		}

		let mut vec = Vec::with_capacity(self.capacity);
		for part in &self.parts {
			vec.extend_from_slice(part.data());
		}
		Ok(vec)
	}

	/// Borrows `len` bytes at logical `index` without copying. Fails with an
	/// "unsupported" error if the range spans more than one segment; the range is
	/// never truncated to fit.
	pub fn view(&self, index: usize, len: usize) -> Result<&[u8]> {
		let mut spans = self.spans_for(OperationKind::View, index, len)?;
		match (spans.next(), spans.next()) {
			(None, _) => Ok(&[]),
			(Some(span), None) => Ok(self.span_data(span)),
			(Some(_), Some(_)) => Err(Error::unsupported(
				OperationKind::View,
				DiscontiguousError { index, len, parts: 2 + spans.count() }
			))
		}
	}

	/// Borrows `len` bytes at logical `index` as one or more slices, for
	/// scatter/gather IO.
	pub fn io_slices(&self, index: usize, len: usize) -> Result<Vec<IoSlice<'_>>> {
		let spans = self.spans_for(OperationKind::View, index, len)?;
		let mut slices = Vec::with_capacity(self.view_count());
		for Span { part, offset, len } in spans {
			self.parts[part].segment.io_slices(offset, len, &mut slices);
		}
		Ok(slices)
	}

	/// Iterates over all readable bytes, in order. Yields nothing once released.
	pub fn bytes(&self) -> impl Iterator<Item = u8> + '_ {
		let released = self.released;
		self.parts
			.iter()
			.filter(move |_| !released)
			.flat_map(Part::data)
			.copied()
	}
}

impl<S: Segment, const K: usize, T: AsRef<[u8]>> PartialEq<T> for CompositeView<S, K> {
	fn eq(&self, other: &T) -> bool {
		let other = other.as_ref();
		!self.released &&
		self.capacity == other.len() &&
		self.bytes().eq(other.iter().copied())
	}
}
