// SPDX-License-Identifier: Apache-2.0

/// Options for tuning [`CreditDistributor`](super::CreditDistributor)'s behavior.
///
/// # Failure policy
///
/// What a distribution pass does when a subscription fails to accept forwarded
/// demand. Failures are always logged and never returned to the caller. By
/// default the failing subscription is skipped for the rest of the pass and its
/// share is offered to the others. It can also be set to stop the pass at the
/// first failure, leaving the remaining demand undistributed.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
#[non_exhaustive]
pub struct DistributorOptions {
	pub failure_policy: FailurePolicy,
}

/// The response to a subscription failing to accept demand.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq)]
pub enum FailurePolicy {
	/// Skip the failing subscription for the rest of the pass and keep
	/// distributing to the others.
	#[default]
	Isolate,
	/// Abandon the pass at the first failure.
	FailFast,
}

impl FailurePolicy {
	/// Returns `true` if the policy is [`Isolate`](Self::Isolate).
	pub fn is_isolate(&self) -> bool {
		matches!(self, Self::Isolate)
	}

	/// Returns `true` if the policy is [`FailFast`](Self::FailFast).
	pub fn is_fail_fast(&self) -> bool {
		matches!(self, Self::FailFast)
	}
}

impl Default for DistributorOptions {
	fn default() -> Self { Self::new() }
}

impl DistributorOptions {
	/// Creates a new set of distributor options.
	pub const fn new() -> Self {
		Self {
			failure_policy: FailurePolicy::Isolate,
		}
	}

	/// Returns the failure policy.
	#[inline]
	pub const fn failure_policy(&self) -> FailurePolicy { self.failure_policy }

	/// Sets the failure policy.
	#[inline]
	pub fn set_failure_policy(&mut self, value: FailurePolicy) {
		self.failure_policy = value;
	}

	/// Sets the failure policy.
	#[inline]
	pub const fn with_failure_policy(mut self, value: FailurePolicy) -> Self {
		self.failure_policy = value;
		self
	}

	/// Sets the failure policy to [`Isolate`](FailurePolicy::Isolate).
	#[inline]
	pub const fn isolate_failures(self) -> Self {
		self.with_failure_policy(FailurePolicy::Isolate)
	}

	/// Sets the failure policy to [`FailFast`](FailurePolicy::FailFast).
	#[inline]
	pub const fn fail_fast(self) -> Self {
		self.with_failure_policy(FailurePolicy::FailFast)
	}
}
