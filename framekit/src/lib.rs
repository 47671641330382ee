// SPDX-License-Identifier: Apache-2.0

//! ## How it works
//!
//! Protocol frames are rarely allocated in one piece: a header, metadata and
//! payload usually arrive as separate buffers. This crate provides the two
//! primitives needed to move such frames under backpressure.
//!
//! ### Composite views
//!
//! A [`CompositeView`] concatenates two or three [segments](Segment) into one
//! logical, read-only buffer without copying them. Reads take absolute indices;
//! each index is resolved to a segment by scanning a table of segment boundaries
//! from the back, and reads crossing a boundary are split into one transfer per
//! segment. Data can be copied out, borrowed as a slice when it lies within one
//! segment, gathered as IO slices, or written straight to a writer or a file.
//! Where true contiguity is needed, the view can be materialized into a fresh
//! buffer.
//!
//! The view owns its segments. Releasing it, explicitly or by dropping it, gives
//! each segment back exactly once. Segments from the block [pool] are collected
//! back into it; a failure to release one segment doesn't stop the others.
//!
//! ### Credit distribution
//!
//! A [`CreditDistributor`] shares demand signalled from downstream across the
//! upstream [subscriptions](Subscription) of a registry snapshot. Demand is handed
//! out in equal quanta, walking the snapshot in a circle from a random start, so
//! that no subscription is consistently favored. Subscriptions with outstanding
//! demand within their limit are served first; if a full scan serves none, grants
//! are forced so every pass completes.

mod composite;
mod element;
pub mod credit;
pub mod error;
pub mod pool;
pub mod segment;

pub use composite::*;
pub use credit::{CreditDistributor, DistributorOptions, FailurePolicy, Subscription, UNBOUNDED};
pub use element::Element;
pub use pool::PooledSegment;
pub use segment::{Segment, Window};
