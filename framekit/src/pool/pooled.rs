// SPDX-License-Identifier: Apache-2.0

use std::cmp::min;
use std::fmt;
use std::fmt::{Debug, Formatter};
use all_asserts::assert_le;
use crate::error::ErrorBox;
use crate::segment::Segment;
use super::{Block, BLOCK_SIZE, DefaultPoolContainer, Pool, Result};

/// A [`Segment`] holding one block claimed from a [`Pool`]. Releasing the segment
/// collects its block back into the pool; dropping it unreleased frees the block.
pub struct PooledSegment<P: Pool = DefaultPoolContainer> {
	block: Option<Block>,
	start: usize,
	end: usize,
	pool: P,
}

impl PooledSegment {
	/// Claims an empty segment from the default pool.
	pub fn claim() -> Result<Self> {
		Self::claim_from(DefaultPoolContainer::get())
	}

	/// Claims a segment from the default pool, writing as much of `data` as fits
	/// in one block.
	pub fn from_slice(data: &[u8]) -> Result<Self> {
		let mut seg = Self::claim()?;
		seg.write(data);
		Ok(seg)
	}
}

impl<P: Pool> PooledSegment<P> {
	/// Claims an empty segment from `pool`.
	pub fn claim_from(pool: P) -> Result<Self> {
		let block = pool.claim_one()?;
		Ok(Self {
			block: Some(block),
			start: 0,
			end: 0,
			pool,
		})
	}

	/// Returns the number of bytes that can still be written.
	pub fn limit(&self) -> usize {
		if self.block.is_some() { BLOCK_SIZE - self.end } else { 0 }
	}

	/// Returns `true` if the block was given back to the pool.
	pub fn is_released(&self) -> bool { self.block.is_none() }

	/// Writes as many bytes from `data` as fit, returning the number written.
	pub fn write(&mut self, data: &[u8]) -> usize {
		let Some(block) = self.block.as_mut() else { return 0 };
		let count = min(BLOCK_SIZE - self.end, data.len());
		block[self.end..self.end + count].copy_from_slice(&data[..count]);
		self.end += count;
		count
	}

	/// Consumes `count` readable bytes, advancing the read start.
	///
	/// # Panics
	///
	/// Panics if `count` is greater than the readable length.
	pub fn consume(&mut self, count: usize) {
		assert_le!(count, self.end - self.start);
		self.start += count;
	}
}

impl<P: Pool> Segment for PooledSegment<P> {
	fn memory(&self) -> &[u8] {
		match &self.block {
			Some(block) => &block[..self.end],
			None => &[]
		}
	}

	#[inline]
	fn read_start(&self) -> usize {
		if self.block.is_some() { self.start } else { 0 }
	}

	#[inline]
	fn readable_len(&self) -> usize {
		if self.block.is_some() { self.end - self.start } else { 0 }
	}

	/// Pool blocks are pinned boxes; they never move while held.
	#[inline]
	fn is_direct(&self) -> bool { true }

	fn release(&mut self) -> std::result::Result<(), ErrorBox> {
		let Some(block) = self.block.take() else { return Ok(()) };
		// The block is dropped on failure; only recycling is lost.
		self.pool.collect_one(block)?;
		Ok(())
	}
}

impl<P: Pool> Debug for PooledSegment<P> {
	fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
		f.debug_struct("PooledSegment")
			.field("start", &self.start)
			.field("end", &self.end)
			.field("released", &self.is_released())
			.finish_non_exhaustive()
	}
}
