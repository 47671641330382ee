// SPDX-License-Identifier: Apache-2.0

//! A pool of reusable memory blocks backing [`PooledSegment`]s.
//!
//! Blocks are claimed from the pool to stage frame parts, then collected back
//! into it when the segment holding them is released. When the pool is empty,
//! blocks are allocated. The default pool has two modes: with the `shared-pool`
//! feature its block container is wrapped in an `Arc<Mutex<...>>`, otherwise a
//! thread-local `RefCell` is used. The latter is faster, but segments claimed on
//! one thread can only be released to that thread's pool.

mod pooled;

pub use pooled::*;

use std::ops::DerefMut;
use std::pin::Pin;
use std::result;
use cfg_if::cfg_if;
use tracing::trace;

/// The size of a pool block.
pub const BLOCK_SIZE: usize = 8192;

/// A pinned block of pool memory.
pub type Block = Pin<Box<[u8; BLOCK_SIZE]>>;

#[derive(Copy, Clone, Debug, thiserror::Error)]
#[error("failed to borrow the pool")]
pub struct PoolError;

pub type Result<T = ()> = result::Result<T, PoolError>;

pub(crate) fn alloc_block() -> Block {
	Box::pin([0; BLOCK_SIZE])
}

/// A shared handle to a block pool.
pub trait Pool: Clone {
	type Pool: MutPool + ?Sized;
	type Ref<'p>: DerefMut<Target = Self::Pool> where Self: 'p;

	/// Gets a shared reference to the pool.
	fn get() -> Self;

	/// Borrows the pool mutably, locking it for the duration of the borrow. A
	/// shared pool blocks until the lock is free; a thread-local pool fails if it
	/// is already borrowed.
	fn try_borrow(&self) -> Result<Self::Ref<'_>>;

	/// Claims a single block.
	fn claim_one(&self) -> Result<Block> {
		Ok(self.try_borrow()?.claim_one())
	}

	/// Collects a single block back into the pool.
	fn collect_one(&self, block: Block) -> Result {
		self.try_borrow()?.collect_one(block);
		Ok(())
	}

	/// Clears blocks from the pool to free space. The actual block count to be
	/// cleared is left up to implementation.
	fn shed(&self) -> Result {
		self.try_borrow()?.shed();
		Ok(())
	}
}

/// A mutably-borrowed pool, usually from a [`RefCell`](std::cell::RefCell).
pub trait MutPool {
	/// Returns the number of idle blocks held by the pool.
	fn len(&self) -> usize;

	/// Returns `true` if the pool holds no idle blocks.
	fn is_empty(&self) -> bool { self.len() == 0 }

	/// Reserves at least `count` idle blocks in the pool.
	fn claim_reserve(&mut self, count: usize);

	/// Claims a single block, allocating if none are idle.
	fn claim_one(&mut self) -> Block;

	/// Collects a single block back into the pool.
	fn collect_one(&mut self, block: Block);

	/// Clears blocks from the pool to free space.
	fn shed(&mut self);
}

#[derive(Default)]
pub struct DefaultPool(Vec<Block>);

impl MutPool for DefaultPool {
	fn len(&self) -> usize { self.0.len() }

	fn claim_reserve(&mut self, count: usize) {
		let Self(vec) = self;
		let allocate_count = count.saturating_sub(vec.len());
		vec.extend((0..allocate_count).map(|_| alloc_block()));
	}

	fn claim_one(&mut self) -> Block {
		self.0.pop().unwrap_or_else(alloc_block)
	}

	fn collect_one(&mut self, block: Block) {
		self.0.push(block)
	}

	fn shed(&mut self) {
		trace!(count = self.0.len(), "shedding idle pool blocks");
		self.0.clear()
	}
}

cfg_if! {
	if #[cfg(feature = "shared-pool")] {
		use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
		use once_cell::sync::Lazy;

		#[derive(Clone, Default)]
		pub struct DefaultPoolContainer(Arc<Mutex<DefaultPool>>);

		impl Pool for DefaultPoolContainer {
			type Pool = DefaultPool;
			type Ref<'p> = MutexGuard<'p, DefaultPool>;

			fn get() -> Self { pool() }

			fn try_borrow(&self) -> Result<Self::Ref<'_>> {
				// A panic while holding the lock leaves no block half-moved.
				Ok(self.0.lock().unwrap_or_else(PoisonError::into_inner))
			}
		}

		static POOL: Lazy<DefaultPoolContainer> = Lazy::new(DefaultPoolContainer::default);

		/// Clones a shared reference to the default block pool.
		#[inline]
		pub fn pool() -> DefaultPoolContainer { POOL.clone() }
	} else {
		use std::cell::{RefCell, RefMut};
		use std::rc::Rc;

		#[derive(Clone, Default)]
		pub struct DefaultPoolContainer(Rc<RefCell<DefaultPool>>);

		impl Pool for DefaultPoolContainer {
			type Pool = DefaultPool;
			type Ref<'p> = RefMut<'p, DefaultPool>;

			fn get() -> Self { pool() }

			fn try_borrow(&self) -> Result<Self::Ref<'_>> {
				self.0.try_borrow_mut().map_err(|_| PoolError)
			}
		}

		thread_local! {
			static POOL: DefaultPoolContainer = DefaultPoolContainer::default();
		}

		/// Clones a shared reference to this thread's default block pool.
		#[inline]
		pub fn pool() -> DefaultPoolContainer { POOL.with(Clone::clone) }
	}
}
