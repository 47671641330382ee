// SPDX-License-Identifier: Apache-2.0

//! Fair sharing of downstream demand across upstream subscriptions.
//!
//! When a consumer signals demand for `n` more items, a [`CreditDistributor`]
//! splits those credits between the live subscriptions of a registry snapshot.
//! Each pass starts at a random subscription so none is favored over many calls,
//! and grants go first to subscriptions with room under their limit. If a whole
//! scan finds no such subscription, grants are forced in scan order instead, so
//! every pass hands out all of its demand.

mod options;

pub use options::*;

use std::cmp::{max, min};
use std::error::Error as StdError;
use std::rc::Rc;
use std::sync::Arc;
use rand::Rng;
use tracing::{trace, warn};

/// The demand value meaning "unbounded". Forwarded as-is, without accounting.
pub const UNBOUNDED: u64 = u64::MAX;

/// An upstream producer's demand state, tracked by the subscription itself.
pub trait Subscription {
	type Error: StdError + 'static;

	/// Returns the demand requested of this subscription from outside.
	fn external_requested(&self) -> u64;

	/// Returns the most demand this subscription should hold.
	fn limit(&self) -> u64;

	/// Forwards `n` credits of demand upstream. Called repeatedly with partial
	/// amounts; may fail.
	fn forward_demand(&self, n: u64) -> Result<(), Self::Error>;
}

macro_rules! forward {
	($($ty:ty)+) => {
		$(
		impl<S: Subscription + ?Sized> Subscription for $ty {
			type Error = S::Error;

			#[inline]
			fn external_requested(&self) -> u64 { (**self).external_requested() }
			#[inline]
			fn limit(&self) -> u64 { (**self).limit() }
			#[inline]
			fn forward_demand(&self, n: u64) -> Result<(), Self::Error> {
				(**self).forward_demand(n)
			}
		}
		)+
	};
}

forward! { &S Box<S> Rc<S> Arc<S> }

/// A source of starting indices for distribution passes.
pub trait IndexSource {
	/// Returns an index in `[0, len)`. `len` is never zero.
	fn next_index(&self, len: usize) -> usize;
}

/// Picks uniformly random starting indices with the thread-local generator.
#[derive(Copy, Clone, Debug, Default)]
pub struct ThreadRandom;

impl IndexSource for ThreadRandom {
	#[inline]
	fn next_index(&self, len: usize) -> usize {
		rand::rng().random_range(0..len)
	}
}

impl<F: Fn(usize) -> usize> IndexSource for F {
	#[inline]
	fn next_index(&self, len: usize) -> usize { self(len) }
}

/// Shares requested demand across a snapshot of subscriptions. Holds no state
/// between passes besides its options.
#[derive(Clone, Debug, Default)]
pub struct CreditDistributor<R: IndexSource = ThreadRandom> {
	options: DistributorOptions,
	start: R,
}

impl CreditDistributor {
	/// Creates a new distributor with default options.
	pub fn new() -> Self { Self::default() }

	/// Creates a new distributor with `options`.
	pub fn with_options(options: DistributorOptions) -> Self {
		Self::with_index_source(options, ThreadRandom)
	}
}

impl<R: IndexSource> CreditDistributor<R> {
	/// Creates a new distributor picking starting indices from `start`.
	pub fn with_index_source(options: DistributorOptions, start: R) -> Self {
		Self { options, start }
	}

	/// Returns the options used to create the distributor.
	pub fn options(&self) -> DistributorOptions { self.options }

	/// Distributes `requested` credits across the live subscriptions in
	/// `snapshot`, where `None` entries are removed subscriptions.
	///
	/// [`UNBOUNDED`] demand is forwarded once to each live subscription. Bounded
	/// demand is granted in quanta of `requested / len` (at least one) while
	/// walking the snapshot circularly from a random start, until all of it is
	/// granted. A subscription is granted a quantum when it has outstanding
	/// external demand within its limit, or when the last full scan granted
	/// nothing.
	///
	/// Failures to forward demand are logged, not returned; see
	/// [`FailurePolicy`].
	pub fn distribute<S: Subscription>(&self, requested: u64, snapshot: &[Option<S>]) {
		if snapshot.is_empty() || requested == 0 {
			return
		}

		if requested == UNBOUNDED {
			self.distribute_unbounded(snapshot)
		} else {
			self.distribute_bounded(requested, snapshot)
		}
	}

	fn distribute_unbounded<S: Subscription>(&self, snapshot: &[Option<S>]) {
		trace!(len = snapshot.len(), "forwarding unbounded demand");
		for (index, sub) in snapshot.iter().enumerate() {
			let Some(sub) = sub else { continue };
			if let Err(error) = sub.forward_demand(UNBOUNDED) {
				warn!(%error, index, "subscription failed to accept unbounded demand");
				if self.options.failure_policy.is_fail_fast() {
					return
				}
			}
		}
	}

	fn distribute_bounded<S: Subscription>(&self, mut requested: u64, snapshot: &[Option<S>]) {
		let len = snapshot.len();
		let mut live = snapshot.iter().flatten().count();
		if live == 0 {
			return
		}

		// Sized on the first failure.
		let mut failed: Vec<bool> = Vec::new();
		let mut share = max(1, requested / len as u64);
		let mut index = self.start.next_index(len) % len;
		// Steps since the last grant. A full scan without one forces grants.
		let mut idle = 0;

		trace!(requested, len, start = index, share, "distributing demand");
		while requested > 0 {
			let mut granted = false;

			if let Some(sub) = &snapshot[index] {
				let excluded = failed.get(index).copied().unwrap_or(false);
				if !excluded && (idle >= len || is_eligible(sub)) {
					let grant = min(share, requested);
					match sub.forward_demand(grant) {
						Ok(()) => {
							requested -= grant;
							share = min(share, requested);
							granted = true;
						}
						Err(error) => {
							warn!(%error, index, grant, "subscription failed to accept demand");
							if self.options.failure_policy.is_fail_fast() {
								warn!(remaining = requested, "abandoning demand distribution");
								return
							}

							if failed.is_empty() {
								failed.resize(len, false);
							}
							failed[index] = true;
							live -= 1;
							if live == 0 {
								warn!(remaining = requested, "no subscription accepted demand");
								return
							}
						}
					}
				}
			}

			if granted {
				idle = 0;
			} else {
				idle += 1;
			}
			index = (index + 1) % len;
		}
	}
}

/// A subscription is eligible while it has outstanding external demand no
/// greater than its limit.
fn is_eligible(sub: &impl Subscription) -> bool {
	let external = sub.external_requested();
	external != 0 && external <= sub.limit()
}
