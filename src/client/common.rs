//! Shared helpers for client flows (refresh guard state, error bodies, JSON decoding).

// std
use std::sync::atomic::{AtomicU64, Ordering};
// crates.io
use reqwest::Response;
use serde::de::DeserializeOwned;
// self
use crate::{_prelude::*, error::TransportError};

/// Fallback detail used when an error body carries no `detail` field.
const GENERIC_DETAIL: &str = "Request failed";

/// Singleflight state for refresh calls.
///
/// `generation` increases after every completed refresh. A caller snapshots it before
/// reading the expiration; if it changed by the time the caller holds `ledger`, another
/// caller already refreshed and the recorded outcome is reused.
#[derive(Debug, Default)]
pub(crate) struct RefreshGate {
	generation: AtomicU64,
	ledger: AsyncMutex<RefreshLedger>,
}
impl RefreshGate {
	pub(crate) fn observe(&self) -> u64 {
		self.generation.load(Ordering::Acquire)
	}

	pub(crate) async fn lock(&self) -> async_lock::MutexGuard<'_, RefreshLedger> {
		self.ledger.lock().await
	}

	pub(crate) fn publish(&self, ledger: &mut RefreshLedger, succeeded: bool) {
		ledger.generation += 1;
		ledger.last_succeeded = succeeded;

		self.generation.store(ledger.generation, Ordering::Release);
	}
}

/// Outcome of the most recent refresh, guarded by [`RefreshGate`].
#[derive(Debug, Default)]
pub(crate) struct RefreshLedger {
	pub(crate) generation: u64,
	pub(crate) last_succeeded: bool,
}

#[derive(Deserialize)]
struct ErrorBody {
	#[serde(default)]
	detail: Option<serde_json::Value>,
	#[serde(default)]
	message: Option<serde_json::Value>,
}

/// Converts a non-success response into [`Error::Api`], using the JSON `detail` field
/// (or `message` when `detail` is absent).
pub(crate) async fn api_error(response: Response) -> Error {
	let status = response.status().as_u16();
	let detail = match response.bytes().await {
		Ok(bytes) => error_detail(&bytes),
		Err(_) => GENERIC_DETAIL.to_owned(),
	};

	Error::Api { status, detail }
}

/// Extracts a human-readable detail from an error body.
pub(crate) fn error_detail(bytes: &[u8]) -> String {
	let detail = serde_json::from_slice::<ErrorBody>(bytes).ok().and_then(|body| {
		body.detail.filter(|value| !value.is_null()).or(body.message)
	});

	match detail {
		Some(serde_json::Value::String(detail)) => detail,
		Some(serde_json::Value::Null) | None => GENERIC_DETAIL.to_owned(),
		Some(other) => other.to_string(),
	}
}

/// Reads a success body and decodes it with path-aware errors.
pub(crate) async fn decode_json<T>(response: Response) -> Result<T>
where
	T: DeserializeOwned,
{
	let bytes = response.bytes().await.map_err(TransportError::from)?;

	decode_slice(&bytes)
}

/// Decodes JSON bytes, mapping failures into [`Error::Decode`].
pub(crate) fn decode_slice<T>(bytes: &[u8]) -> Result<T>
where
	T: DeserializeOwned,
{
	let mut de = serde_json::Deserializer::from_slice(bytes);

	serde_path_to_error::deserialize(&mut de).map_err(|source| Error::Decode { source })
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn error_detail_prefers_server_message() {
		assert_eq!(
			error_detail(br#"{"detail":"E-mail already registered"}"#),
			"E-mail already registered"
		);
		assert_eq!(error_detail(b"<html>oops</html>"), GENERIC_DETAIL);
		assert_eq!(error_detail(br#"{"detail":null}"#), GENERIC_DETAIL);
		assert_eq!(error_detail(r#"{"message":"Email já cadastrado"}"#.as_bytes()), "Email já cadastrado");
		assert_eq!(
			error_detail(br#"{"detail":[{"loc":["body","cep"],"msg":"field required"}]}"#),
			r#"[{"loc":["body","cep"],"msg":"field required"}]"#
		);
	}

	#[test]
	fn decode_slice_reports_the_failing_path() {
		#[derive(Debug, Deserialize)]
		struct Wrapper {
			#[allow(dead_code)]
			items: Vec<u32>,
		}

		let err = decode_slice::<Wrapper>(br#"{"items":[1,"two"]}"#)
			.expect_err("Mismatched element type should fail to decode.");

		match err {
			Error::Decode { source } => assert_eq!(source.path().to_string(), "items[1]"),
			other => panic!("Unexpected error variant: {other:?}."),
		}
	}

	#[test]
	fn refresh_gate_publishes_generations() {
		let gate = RefreshGate::default();
		let mut ledger = RefreshLedger::default();

		assert_eq!(gate.observe(), 0);

		gate.publish(&mut ledger, false);

		assert_eq!(gate.observe(), 1);
		assert!(!ledger.last_succeeded);
	}
}
