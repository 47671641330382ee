// SPDX-License-Identifier: Apache-2.0

mod detail;

pub use detail::*;

use std::fmt;
use std::error::Error as StdError;
use std::fmt::{Debug, Display, Formatter};

pub type ErrorBox = Box<dyn StdError + Send + Sync>;

pub trait OperationKind: Copy + Debug + Display {
	fn unknown() -> Self;
}

pub trait ErrorKind: Copy + Debug + Display {
	fn other(message: &'static str) -> Self;
}

/// An error raised by an operation of kind `O`, failing with a reason of kind
/// `K` and an optional underlying cause.
#[derive(Debug)]
pub struct Error<O: OperationKind, K: ErrorKind> {
	op: O,
	kind: K,
	source: Option<ErrorBox>,
}

impl<O: OperationKind, K: ErrorKind> Display for Error<O, K> {
	fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
		let Self { op, kind, source } = self;
		if let Some(source) = source {
			write!(f, "{op} failed; {kind} ({source})")
		} else {
			write!(f, "{op} failed; {kind}")
		}
	}
}

impl<O: OperationKind, K: ErrorKind> StdError for Error<O, K> {
	fn source(&self) -> Option<&(dyn StdError + 'static)> {
		if let Some(ref source) = self.source {
			Some(source.as_ref())
		} else {
			None
		}
	}
}

impl<O: OperationKind, K: ErrorKind> Error<O, K> {
	pub(crate) fn new(
		op: O,
		kind: K,
		source: Option<ErrorBox>
	) -> Self {
		Self { op, kind, source }
	}

	/// Creates a new error with a custom message.
	pub fn other(
		op: O,
		message: &'static str,
		source: Option<ErrorBox>
	) -> Self {
		Self::new(op, K::other(message), source)
	}

	/// Returns the operation kind.
	pub fn operation(&self) -> O { self.op }

	/// Sets the operation kind.
	pub fn with_operation(mut self, op: O) -> Self {
		self.op = op;
		self
	}

	/// Returns the error kind.
	pub fn kind(&self) -> K { self.kind }

	/// Sets the error kind.
	pub fn with_kind(mut self, kind: K) -> Self {
		self.kind = kind;
		self
	}

	/// Returns the source downcast into `E`, if possible.
	pub fn source_as<E: StdError + 'static>(&self) -> Option<&E> {
		self.source.as_deref()?.downcast_ref()
	}
}

impl<O: OperationKind, K: ErrorKind> From<&'static str> for Error<O, K> {
	fn from(value: &'static str) -> Self {
		Self::other(O::unknown(), value, None)
	}
}

/// Attaches an operation to the error of a result.
pub trait ResultContext<T, O: OperationKind, K: ErrorKind> {
	fn context(self, op: O) -> Result<T, Error<O, K>>;
}

impl<T, O: OperationKind, K: ErrorKind> ResultContext<T, O, K> for Result<T, Error<O, K>> {
	#[inline]
	fn context(self, op: O) -> Result<T, Error<O, K>> {
		self.map_err(|err| err.with_operation(op))
	}
}
