//! Credential refresh ahead of wrapped calls, serialized behind a singleflight guard.
//!
//! A wrapped call refreshes when the stored expiration is non-zero and the current time is
//! within the configured buffer of it. Only one refresh is in flight per client; callers that
//! queued behind it reuse its outcome. A failed refresh (rejected status, unreachable endpoint,
//! or malformed body) clears the stored credential and surfaces [`Error::SessionExpired`].
//! Nothing here retries.

mod metrics;

pub use metrics::RefreshMetrics;

// crates.io
use reqwest::{Method, header::HeaderMap};
// self
use crate::{
	_prelude::*,
	client::AuthClient,
	error::{RefreshFailure, TransportError},
	http,
	obs::{FlowKind, FlowSpan},
	session::{self, RefreshResponse},
};

impl AuthClient {
	/// Refreshes the credential if the stored expiration falls inside the safety buffer.
	///
	/// Returns `true` when a refresh happened, either issued by this call or by a concurrent
	/// call whose result this call adopted.
	pub async fn ensure_fresh(&self, caller_headers: &HeaderMap) -> Result<bool> {
		let observed = self.refresh_gate.observe();
		let expiration = self.session.expiration().await?;

		if !session::should_refresh(expiration, session::now_millis(), self.descriptor.refresh_buffer)
		{
			return Ok(false);
		}

		let mut ledger = self.refresh_gate.lock().await;

		if ledger.generation != observed {
			self.refresh_metrics.record_joined();

			return if ledger.last_succeeded {
				Ok(true)
			} else {
				Err(Error::SessionExpired { cause: RefreshFailure::Concurrent })
			};
		}

		let result = self.refresh_locked(caller_headers).await;

		self.refresh_gate.publish(&mut ledger, result.is_ok());

		result.map(|_| true)
	}

	/// Calls the refresh endpoint unconditionally and returns the new expiration (epoch ms).
	///
	/// Waits for any refresh already in flight first.
	pub async fn force_refresh(&self, caller_headers: &HeaderMap) -> Result<i64> {
		let mut ledger = self.refresh_gate.lock().await;
		let result = self.refresh_locked(caller_headers).await;

		self.refresh_gate.publish(&mut ledger, result.is_ok());

		result
	}

	async fn refresh_locked(&self, caller_headers: &HeaderMap) -> Result<i64> {
		let span = FlowSpan::new(FlowKind::Refresh, "refresh_access_token");

		span.clone()
			.run(async {
				self.refresh_metrics.record_attempt();
				span.record_request(&Method::POST, &self.descriptor.refresh_endpoint);

				match self.request_refresh(caller_headers, &span).await {
					Ok(response) => {
						let expires_at_ms = self
							.session
							.apply(&response, session::now_millis(), self.descriptor.default_lifetime)
							.await
							.inspect_err(|_| self.refresh_metrics.record_failure())?;

						self.refresh_metrics.record_success();
						span.record_rotated(response.access_token.is_some());

						Ok(expires_at_ms)
					},
					Err(cause) => {
						span.record_cause(&cause);

						#[cfg(feature = "tracing")]
						{
							tracing::warn!(error = %cause, "Refresh failed; clearing the stored session.");
						}

						self.refresh_metrics.record_failure();
						self.session.clear().await?;

						Err(Error::SessionExpired { cause })
					},
				}
			})
			.await
	}

	async fn request_refresh(
		&self,
		caller_headers: &HeaderMap,
		span: &FlowSpan,
	) -> Result<RefreshResponse, RefreshFailure> {
		let response = self
			.http_client
			.post(self.descriptor.refresh_endpoint.clone())
			.headers(http::refresh_headers(caller_headers))
			.send()
			.await
			.map_err(|e| RefreshFailure::Transport(TransportError::from(e)))?;
		let status = response.status();

		span.record_status(status.as_u16());

		if !status.is_success() {
			return Err(RefreshFailure::Rejected { status: status.as_u16() });
		}

		let bytes = response
			.bytes()
			.await
			.map_err(|e| RefreshFailure::Transport(TransportError::from(e)))?;
		let mut de = serde_json::Deserializer::from_slice(&bytes);

		serde_path_to_error::deserialize(&mut de).map_err(RefreshFailure::MalformedBody)
	}
}
