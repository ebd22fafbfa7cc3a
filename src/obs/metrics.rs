// self
use crate::{
	error::RefreshFailure,
	obs::{FlowKind, FlowOutcome},
};

/// Counts a flow attempt or outcome as `unievents_flow_total{flow, outcome}`.
pub fn record_flow_outcome(kind: FlowKind, outcome: FlowOutcome) {
	#[cfg(feature = "metrics")]
	{
		metrics::counter!(
			"unievents_flow_total",
			"flow" => kind.as_str(),
			"outcome" => outcome.as_str()
		)
		.increment(1);
	}
	#[cfg(not(feature = "metrics"))]
	{
		let _ = (kind, outcome);
	}
}

/// Counts a response as `unievents_response_total{flow, class}`, bucketing by status class.
pub fn record_response_status(kind: FlowKind, status: u16) {
	let class = status_class(status);

	#[cfg(feature = "metrics")]
	{
		metrics::counter!("unievents_response_total", "flow" => kind.as_str(), "class" => class)
			.increment(1);
	}
	#[cfg(not(feature = "metrics"))]
	{
		let _ = (kind, class);
	}
}

/// Counts a session-ending refresh as `unievents_refresh_failure_total{cause}`.
pub fn record_refresh_failure(cause: &RefreshFailure) {
	#[cfg(feature = "metrics")]
	{
		metrics::counter!("unievents_refresh_failure_total", "cause" => cause.label()).increment(1);
	}
	#[cfg(not(feature = "metrics"))]
	{
		let _ = cause;
	}
}

fn status_class(status: u16) -> &'static str {
	match status {
		100..=199 => "1xx",
		200..=299 => "2xx",
		300..=399 => "3xx",
		400..=499 => "4xx",
		500..=599 => "5xx",
		_ => "other",
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn statuses_bucket_by_class() {
		assert_eq!(status_class(204), "2xx");
		assert_eq!(status_class(401), "4xx");
		assert_eq!(status_class(503), "5xx");
		assert_eq!(status_class(42), "other");
	}

	#[test]
	fn recorders_accept_every_label() {
		for kind in [
			FlowKind::Refresh,
			FlowKind::Dispatch,
			FlowKind::Login,
			FlowKind::Logout,
			FlowKind::Register,
			FlowKind::PasswordReset,
		] {
			record_flow_outcome(kind, FlowOutcome::Attempt);
			record_response_status(kind, 200);
		}

		record_refresh_failure(&RefreshFailure::Concurrent);
	}
}
