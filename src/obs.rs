//! Optional observability helpers for client flows.
//!
//! # Feature Flags
//!
//! - `tracing` (on by default): one `unievents.flow` span per flow, carrying the request
//!   method and URL, the response status, and for refreshes whether the token rotated or why
//!   the session ended.
//! - `metrics`: `unievents_flow_total{flow, outcome}`, `unievents_response_total{flow, class}`
//!   and `unievents_refresh_failure_total{cause}` counters.

mod metrics;
mod tracing;

pub use metrics::*;
pub use tracing::*;

// self
use crate::_prelude::*;

/// Client flows observed by the crate.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum FlowKind {
	/// Credential refresh ahead of a wrapped call.
	Refresh,
	/// Dispatch of the wrapped call itself.
	Dispatch,
	/// Session establishment through the login endpoint.
	Login,
	/// Local session teardown.
	Logout,
	/// Account creation.
	Register,
	/// Password-reset e-mail request.
	PasswordReset,
}
impl FlowKind {
	/// Returns a stable label suitable for span or metric fields.
	pub const fn as_str(self) -> &'static str {
		match self {
			FlowKind::Refresh => "refresh",
			FlowKind::Dispatch => "dispatch",
			FlowKind::Login => "login",
			FlowKind::Logout => "logout",
			FlowKind::Register => "register",
			FlowKind::PasswordReset => "password_reset",
		}
	}
}
impl Display for FlowKind {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}

/// Outcome labels recorded for each attempt.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum FlowOutcome {
	/// Entry to a client flow.
	Attempt,
	/// Successful completion.
	Success,
	/// Failure propagated back to the caller.
	Failure,
}
impl FlowOutcome {
	/// Returns a stable label suitable for span or metric fields.
	pub const fn as_str(self) -> &'static str {
		match self {
			FlowOutcome::Attempt => "attempt",
			FlowOutcome::Success => "success",
			FlowOutcome::Failure => "failure",
		}
	}
}
impl Display for FlowOutcome {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}
