//! Optional observability helpers for normalization and credential exchanges.
//!
//! # Feature Flags
//!
//! - Enable `tracing` to emit structured spans named `gateway_context.operation` with the
//!   `operation` and `stage` (call site) fields, plus events after each normalization.
//! - Enable `metrics` to increment the `gateway_context_operation_total` counter for every
//!   attempt/success/rejection/failure, labeled by `operation` + `outcome`.

mod metrics;
mod tracing;

pub use metrics::*;
pub use tracing::*;

// self
use crate::_prelude::*;

/// Operations observed by the crate.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum OperationKind {
	/// Request-context normalization.
	Normalize,
	/// OAuth 2.0 password grant.
	PasswordGrant,
	/// Gateway request dispatch.
	Dispatch,
}
impl OperationKind {
	/// Returns a stable label suitable for span or metric fields.
	pub const fn as_str(self) -> &'static str {
		match self {
			OperationKind::Normalize => "normalize",
			OperationKind::PasswordGrant => "password_grant",
			OperationKind::Dispatch => "dispatch",
		}
	}
}
impl Display for OperationKind {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}

/// Outcome labels recorded for each attempt.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Outcome {
	/// Entry to an operation.
	Attempt,
	/// Successful completion.
	Success,
	/// Completed, but the upstream or the router refused the request.
	Rejected,
	/// Failure propagated back to the caller.
	Failure,
}
impl Outcome {
	/// Returns a stable label suitable for span or metric fields.
	pub const fn as_str(self) -> &'static str {
		match self {
			Outcome::Attempt => "attempt",
			Outcome::Success => "success",
			Outcome::Rejected => "rejected",
			Outcome::Failure => "failure",
		}
	}
}
impl Display for Outcome {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}
