// SPDX-License-Identifier: Apache-2.0

//! Read-only views over two or more segments, addressed as one buffer.
//!
//! A [`CompositeView`] takes ownership of its segments and exposes their readable
//! bytes, in order, as the logical range `[0, capacity)`. Nothing is copied when
//! composing: each read resolves its starting index to one segment, then splits
//! across the following segments as needed. Frames assembled from separately
//! allocated parts, like a header, metadata and payload, can be read, copied, or
//! written out as a single stream this way.
//!
//! There is no read cursor; every operation takes an absolute index, so shared
//! references may be read from concurrently if the segments allow it.

mod index;
mod read;
mod write;

pub use index::*;

use std::{fmt, io, result};
use std::error::Error as StdError;
use std::fmt::{Debug, Formatter};
use amplify_derive::Display;
use itertools::Itertools;
use tracing::{debug, warn};
use crate::error;
use crate::error::{BoundsError, DiscontiguousError, ReleaseError};
use crate::segment::Segment;
use ErrorKind::{Io, OutOfBounds, Release, Released, Unsupported};

pub type Error = error::Error<OperationKind, ErrorKind>;
pub type Result<T = ()> = result::Result<T, Error>;

/// A view over two segments.
pub type Pair<S> = CompositeView<S, 2>;
/// A view over three segments.
pub type Triple<S> = CompositeView<S, 3>;

#[derive(Copy, Clone, Debug, Default, Eq, PartialEq, Display)]
pub enum OperationKind {
	#[default]
	#[display("unknown operation")]
	Unknown,
	#[display("get from composite")]
	Get,
	#[display("copy from composite")]
	Copy,
	#[display("borrow composite view")]
	View,
	#[display("write composite to sink")]
	Write,
	#[display("release composite")]
	Release,
	#[display("{0}")]
	Other(&'static str)
}

impl error::OperationKind for OperationKind {
	fn unknown() -> Self { Self::Unknown }
}

#[derive(Copy, Clone, Debug, Eq, PartialEq, Display)]
pub enum ErrorKind {
	#[display("index out of bounds")]
	OutOfBounds,
	#[display("unsupported operation")]
	Unsupported,
	#[display("composite already released")]
	Released,
	#[display("segment release failed")]
	Release,
	#[display("IO error")]
	Io,
	#[display("{0}")]
	Other(&'static str),
}

impl error::ErrorKind for ErrorKind {
	fn other(message: &'static str) -> Self { Self::Other(message) }
}

impl From<io::Error> for Error {
	fn from(value: io::Error) -> Self {
		Self::io(OperationKind::Unknown, value)
	}
}

impl Error {
	/// Creates a new "out of bounds" error.
	pub fn out_of_bounds(op: OperationKind, error: BoundsError) -> Self {
		Self::new(op, OutOfBounds, Some(error.into()))
	}

	/// Creates a new "unsupported" error, raised when a range can't be borrowed
	/// without copying.
	pub fn unsupported(op: OperationKind, error: DiscontiguousError) -> Self {
		Self::new(op, Unsupported, Some(error.into()))
	}

	/// Creates a new "released" error.
	pub fn released(op: OperationKind) -> Self {
		Self::new(op, Released, None)
	}

	/// Creates a new IO error.
	pub fn io(op: OperationKind, error: io::Error) -> Self {
		Self::new(op, Io, Some(error.into()))
	}

	/// Creates a new segment release error.
	pub fn release(error: ReleaseError) -> Self {
		Self::new(OperationKind::Release, Release, Some(error.into()))
	}

	/// Returns the source downcast into an IO Error, if possible.
	pub fn io_source(&self) -> Option<&io::Error> {
		self.source()?.downcast_ref()
	}

	/// Returns the bounds violation, if this is an "out of bounds" error.
	pub fn bounds(&self) -> Option<&BoundsError> {
		self.source_as()
	}

	/// Returns the segment release failures, if this is a release error.
	pub fn release_failures(&self) -> Option<&ReleaseError> {
		self.source_as()
	}
}

/// One segment of a composite, with the readable window captured when composed.
struct Part<S: Segment> {
	segment: S,
	start: usize,
	len: usize,
}

impl<S: Segment> Part<S> {
	fn new(segment: S) -> Self {
		Self {
			start: segment.read_start(),
			len: segment.readable_len(),
			segment,
		}
	}

	/// Returns the whole readable window.
	fn data(&self) -> &[u8] {
		self.segment.view(self.start, self.len)
	}
}

/// A read-only buffer composed of `K` owned segments, read as if contiguous.
///
/// Composing is eager and copies nothing. The segment list and each segment's
/// readable window are fixed at construction; the view has no cursor and can't
/// be written to. Dropping the view [releases](Self::release) the segments.
pub struct CompositeView<S: Segment, const K: usize> {
	parts: [Part<S>; K],
	/// The logical index at which each part begins. Non-decreasing, equal for
	/// consecutive parts only where a part is empty.
	starts: [usize; K],
	capacity: usize,
	released: bool,
}

impl<S: Segment> CompositeView<S, 2> {
	/// Composes two segments.
	pub fn pair(one: S, two: S) -> Self {
		Self::new([one, two])
	}
}

impl<S: Segment> CompositeView<S, 3> {
	/// Composes three segments.
	pub fn triple(one: S, two: S, three: S) -> Self {
		Self::new([one, two, three])
	}
}

impl<S: Segment, const K: usize> CompositeView<S, K> {
	/// Composes `segments`, in order, taking ownership of each.
	pub fn new(segments: [S; K]) -> Self {
		const { assert!(K >= 2, "a composite needs at least two segments") };

		let parts = segments.map(Part::new);
		let mut starts = [0; K];
		let mut capacity = 0;
		for (start, part) in starts.iter_mut().zip(&parts) {
			*start = capacity;
			capacity += part.len;
		}

		debug!(capacity, parts = K, "composed segments");
		Self { parts, starts, capacity, released: false }
	}

	/// Returns the number of readable bytes across all segments.
	#[inline]
	pub fn capacity(&self) -> usize { self.capacity }

	/// Returns `true` if no segment has readable bytes.
	#[inline]
	pub fn is_empty(&self) -> bool { self.capacity == 0 }

	/// Returns `true` if every segment is [direct](Segment::is_direct). A view is
	/// only as capable as its weakest segment.
	pub fn is_direct(&self) -> bool {
		self.parts.iter().all(|part| part.segment.is_direct())
	}

	/// Returns the sum of segment view counts, to pre-size gathering writes.
	pub fn view_count(&self) -> usize {
		self.parts.iter().map(|part| part.segment.view_count()).sum()
	}

	/// Returns the readable length captured for the segment at `part`.
	///
	/// # Panics
	///
	/// Panics if `part` is not less than `K`.
	pub fn len_of(&self, part: usize) -> usize { self.parts[part].len }

	/// Returns the logical index at which each segment begins.
	pub fn boundaries(&self) -> &[usize; K] { &self.starts }

	/// Iterates over the segments in order.
	pub fn parts(&self) -> impl Iterator<Item = &S> + '_ {
		self.parts.iter().map(|part| &part.segment)
	}

	/// Returns the segment containing the byte at logical `index`.
	pub fn part_at(&self, index: usize) -> Result<&S> {
		let Position { part, .. } = self.resolve(index)?;
		Ok(&self.parts[part].segment)
	}

	/// Returns `true` if the segments have been released.
	#[inline]
	pub fn is_released(&self) -> bool { self.released }

	/// Releases every segment, once. Each segment is attempted even if others
	/// fail; the collected failures are returned afterward. Subsequent calls do
	/// nothing. Reads fail once released.
	pub fn release(&mut self) -> Result {
		if self.released {
			return Ok(())
		}
		self.released = true;

		let mut error = ReleaseError::default();
		for (i, part) in self.parts.iter_mut().enumerate() {
			if let Err(cause) = part.segment.release() {
				debug!(part = i, %cause, "segment failed to release");
				error.push(i, cause);
			}
		}

		if error.is_empty() {
			Ok(())
		} else {
			Err(Error::release(error))
		}
	}
}

impl<S: Segment, const K: usize> Drop for CompositeView<S, K> {
	fn drop(&mut self) {
		if let Err(error) = self.release() {
			warn!(%error, "segments failed to release while dropping composite view");
		}
	}
}

impl<S: Segment, const K: usize> Debug for CompositeView<S, K> {
	fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
		let windows = self.parts
						  .iter()
						  .map(|Part { start, len, .. }| format!("{start}+{len}"))
						  .join(", ");
		f.debug_struct("CompositeView")
			.field("capacity", &self.capacity)
			.field("starts", &self.starts)
			.field("windows", &format_args!("[{windows}]"))
			.field("released", &self.released)
			.finish_non_exhaustive()
	}
}
