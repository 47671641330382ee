// SPDX-License-Identifier: Apache-2.0

use std::error::Error as StdError;
use std::fmt;
use std::fmt::{Display, Formatter};
use super::ErrorBox;

/// A range lying outside `[0, capacity)`.
#[derive(Copy, Clone, Debug, Eq, PartialEq, thiserror::Error)]
#[error("range of {len} bytes at index {index} is out of bounds on capacity {capacity}")]
pub struct BoundsError {
	pub index: usize,
	pub len: usize,
	pub capacity: usize,
}

/// A range that cannot be borrowed as one contiguous slice without copying.
#[derive(Copy, Clone, Debug, Eq, PartialEq, thiserror::Error)]
#[error("range of {len} bytes at index {index} spans {parts} segments; materialize it instead")]
pub struct DiscontiguousError {
	pub index: usize,
	pub len: usize,
	pub parts: usize,
}

/// Failures collected while releasing segments. Every segment is attempted, so
/// this may hold more than one cause.
#[derive(Debug, Default)]
pub struct ReleaseError {
	failures: Vec<(usize, ErrorBox)>,
}

impl ReleaseError {
	pub(crate) fn push(&mut self, part: usize, cause: ErrorBox) {
		self.failures.push((part, cause));
	}

	pub(crate) fn is_empty(&self) -> bool { self.failures.is_empty() }

	/// Returns the indices of segments which failed to release.
	pub fn parts(&self) -> impl Iterator<Item = usize> + '_ {
		self.failures.iter().map(|&(part, _)| part)
	}

	/// Returns the failures as `(segment index, cause)` pairs.
	pub fn failures(&self) -> &[(usize, ErrorBox)] { &self.failures }
}

impl Display for ReleaseError {
	fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
		write!(f, "{} segment(s) failed to release", self.failures.len())?;
		for (part, cause) in &self.failures {
			write!(f, "; segment {part}: {cause}")?;
		}
		Ok(())
	}
}

impl StdError for ReleaseError {
	fn source(&self) -> Option<&(dyn StdError + 'static)> {
		let (_, cause) = self.failures.first()?;
		Some(&**cause)
	}
}
