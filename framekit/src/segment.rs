// SPDX-License-Identifier: Apache-2.0

mod window;

pub use window::*;

use std::io;
use std::io::{IoSlice, Write};
use std::rc::Rc;
use std::sync::Arc;
use crate::error::ErrorBox;

/// A contiguous, readable region of memory contributing to a [composite view].
///
/// Segments are read by absolute index into their [`memory`](Self::memory); the
/// readable window starts at [`read_start`](Self::read_start) and spans
/// [`readable_len`](Self::readable_len) bytes. A composite captures this window
/// once when constructed and never moves it.
///
/// All methods but `memory` have default implementations in terms of it. Pooled
/// or externally counted memory should override [`release`](Self::release).
///
/// [composite view]: crate::CompositeView
pub trait Segment {
	/// Returns the backing memory, indexed absolutely.
	fn memory(&self) -> &[u8];

	/// Returns the index of the first readable byte.
	fn read_start(&self) -> usize { 0 }

	/// Returns the number of readable bytes from [`read_start`](Self::read_start).
	fn readable_len(&self) -> usize {
		self.memory().len() - self.read_start()
	}

	/// Returns `true` if the memory is pinned outside of any growable container,
	/// suitable to hand directly to native IO.
	fn is_direct(&self) -> bool { false }

	/// Returns the number of contiguous views [`io_slices`](Self::io_slices) adds
	/// for the whole readable window.
	fn view_count(&self) -> usize { 1 }

	/// Borrows `len` bytes at absolute `index`.
	fn view(&self, index: usize, len: usize) -> &[u8] {
		&self.memory()[index..index + len]
	}

	/// Copies bytes at absolute `index` into `dst`, filling it.
	fn copy_to_slice(&self, index: usize, dst: &mut [u8]) {
		dst.copy_from_slice(self.view(index, dst.len()))
	}

	/// Pushes views of `len` bytes at absolute `index` to `out`.
	fn io_slices<'a>(&'a self, index: usize, len: usize, out: &mut Vec<IoSlice<'a>>) {
		out.push(IoSlice::new(self.view(index, len)))
	}

	/// Writes `len` bytes at absolute `index` to `out`.
	fn write_to(&self, index: usize, len: usize, out: &mut dyn Write) -> io::Result<()> {
		out.write_all(self.view(index, len))
	}

	/// Gives this segment's share of memory back to its owner. Called at most once
	/// by a composite; the segment is not read afterward.
	fn release(&mut self) -> Result<(), ErrorBox> { Ok(()) }
}

impl Segment for [u8] {
	#[inline]
	fn memory(&self) -> &[u8] { self }
}

impl<const N: usize> Segment for [u8; N] {
	#[inline]
	fn memory(&self) -> &[u8] { self }
}

impl Segment for Vec<u8> {
	#[inline]
	fn memory(&self) -> &[u8] { self }
}

impl Segment for String {
	#[inline]
	fn memory(&self) -> &[u8] { self.as_bytes() }
}

#[cfg(feature = "bytes")]
impl Segment for bytes::Bytes {
	#[inline]
	fn memory(&self) -> &[u8] { self }
}

macro_rules! forward {
	() => {
		#[inline]
		fn memory(&self) -> &[u8] { (**self).memory() }
		#[inline]
		fn read_start(&self) -> usize { (**self).read_start() }
		#[inline]
		fn readable_len(&self) -> usize { (**self).readable_len() }
		#[inline]
		fn is_direct(&self) -> bool { (**self).is_direct() }
		#[inline]
		fn view_count(&self) -> usize { (**self).view_count() }
		#[inline]
		fn view(&self, index: usize, len: usize) -> &[u8] {
			(**self).view(index, len)
		}
		#[inline]
		fn copy_to_slice(&self, index: usize, dst: &mut [u8]) {
			(**self).copy_to_slice(index, dst)
		}
		#[inline]
		fn io_slices<'a>(&'a self, index: usize, len: usize, out: &mut Vec<IoSlice<'a>>) {
			(**self).io_slices(index, len, out)
		}
		#[inline]
		fn write_to(&self, index: usize, len: usize, out: &mut dyn Write) -> io::Result<()> {
			(**self).write_to(index, len, out)
		}
	};
}

// Shared handles release their share by being dropped.

impl<S: Segment + ?Sized> Segment for &S {
	forward!();
}

impl<S: Segment + ?Sized> Segment for Rc<S> {
	forward!();
}

impl<S: Segment + ?Sized> Segment for Arc<S> {
	forward!();
}

impl<S: Segment + ?Sized> Segment for Box<S> {
	forward!();

	#[inline]
	fn release(&mut self) -> Result<(), ErrorBox> { (**self).release() }
}
