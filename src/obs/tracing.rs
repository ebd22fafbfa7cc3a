// crates.io
use reqwest::Method;
// self
use crate::{
	_prelude::*,
	error::RefreshFailure,
	obs::{self, FlowKind, FlowOutcome},
};

/// Span attached to one client flow.
///
/// Opens with `flow` and `stage`. The `method`, `url`, `status`, `rotated`, and `cause`
/// fields start empty and are filled in as the flow learns them. Without the `tracing`
/// feature every recorder is a no-op, but [`FlowSpan::run`] still reports metrics.
#[derive(Clone, Debug)]
pub struct FlowSpan {
	kind: FlowKind,
	#[cfg(feature = "tracing")]
	span: tracing::Span,
}
impl FlowSpan {
	/// Opens a span for `kind` at `stage`.
	pub fn new(kind: FlowKind, stage: &'static str) -> Self {
		#[cfg(feature = "tracing")]
		{
			use tracing::field::Empty;

			let span = tracing::info_span!(
				"unievents.flow",
				flow = kind.as_str(),
				stage,
				method = Empty,
				url = Empty,
				status = Empty,
				rotated = Empty,
				cause = Empty,
			);

			Self { kind, span }
		}
		#[cfg(not(feature = "tracing"))]
		{
			let _ = stage;

			Self { kind }
		}
	}

	/// Flow this span belongs to.
	pub fn kind(&self) -> FlowKind {
		self.kind
	}

	/// Records the outgoing method and URL.
	pub fn record_request(&self, method: &Method, url: &Url) {
		#[cfg(feature = "tracing")]
		{
			self.span.record("method", method.as_str());
			self.span.record("url", url.as_str());
		}
		#[cfg(not(feature = "tracing"))]
		{
			let _ = (method, url);
		}
	}

	/// Records the response status and counts it per flow.
	pub fn record_status(&self, status: u16) {
		obs::record_response_status(self.kind, status);

		#[cfg(feature = "tracing")]
		{
			self.span.record("status", status);
		}
	}

	/// Records whether a refresh rotated the access token.
	pub fn record_rotated(&self, rotated: bool) {
		#[cfg(feature = "tracing")]
		{
			self.span.record("rotated", rotated);
		}
		#[cfg(not(feature = "tracing"))]
		{
			let _ = rotated;
		}
	}

	/// Records why a refresh ended the session and counts the cause.
	pub fn record_cause(&self, cause: &RefreshFailure) {
		obs::record_refresh_failure(cause);

		#[cfg(feature = "tracing")]
		{
			self.span.record("cause", cause.label());
		}
	}

	/// Drives `fut` inside the span, counting the attempt and its outcome.
	pub async fn run<T, Fut>(self, fut: Fut) -> Result<T>
	where
		Fut: Future<Output = Result<T>>,
	{
		obs::record_flow_outcome(self.kind, FlowOutcome::Attempt);

		#[cfg(feature = "tracing")]
		let result = {
			use tracing::Instrument;

			fut.instrument(self.span.clone()).await
		};
		#[cfg(not(feature = "tracing"))]
		let result = fut.await;

		let outcome = if result.is_ok() { FlowOutcome::Success } else { FlowOutcome::Failure };

		obs::record_flow_outcome(self.kind, outcome);

		result
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[tokio::test]
	async fn run_passes_the_result_through() {
		let span = FlowSpan::new(FlowKind::Dispatch, "run_passes_the_result_through");
		let recorder = span.clone();
		let url = Url::parse("http://localhost:8000/users/me").expect("Fixture URL should parse.");
		let value = span
			.run(async {
				recorder.record_request(&Method::GET, &url);
				recorder.record_status(200);

				Ok("dispatched")
			})
			.await
			.expect("Successful flow should return its value.");

		assert_eq!(value, "dispatched");
	}

	#[tokio::test]
	async fn run_surfaces_refresh_failures() {
		let span = FlowSpan::new(FlowKind::Refresh, "run_surfaces_refresh_failures");
		let recorder = span.clone();

		assert_eq!(span.kind(), FlowKind::Refresh);

		let err = span
			.run(async {
				let cause = RefreshFailure::Rejected { status: 401 };

				recorder.record_cause(&cause);

				Err::<(), _>(Error::SessionExpired { cause })
			})
			.await
			.expect_err("Failed flow should return its error.");

		assert!(err.is_session_expired());
	}
}
