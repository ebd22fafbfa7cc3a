//! Transport primitives for wrapped calls.
//!
//! [`ReqwestHttpClient`] owns the cookie-enabled reqwest client so ambient session cookies
//! (the long-lived refresh proof) ride along on every refresh and dispatch. [`RequestInit`]
//! describes the caller's half of a wrapped call: method, headers, and body.

// std
use std::ops::Deref;
// crates.io
use reqwest::{
	Method,
	header::{CONTENT_TYPE, HeaderMap, HeaderName, HeaderValue},
};
// self
use crate::{_prelude::*, error::ConfigError};

/// Thin wrapper around [`ReqwestClient`] so shared HTTP behavior lives in one place.
///
/// Clients built with [`ReqwestHttpClient::new`] keep a cookie store, which is how session
/// cookies set by the login endpoint are included on later refresh calls. Supply a custom
/// client through [`ReqwestHttpClient::with_client`] if cookies are managed elsewhere.
#[derive(Clone)]
pub struct ReqwestHttpClient(pub ReqwestClient);
impl ReqwestHttpClient {
	/// Builds a client with an in-memory cookie store.
	pub fn new() -> Result<Self, ConfigError> {
		let client = ReqwestClient::builder().cookie_store(true).build()?;

		Ok(Self(client))
	}

	/// Wraps an existing reqwest [`ReqwestClient`].
	pub fn with_client(client: ReqwestClient) -> Self {
		Self(client)
	}
}
impl AsRef<ReqwestClient> for ReqwestHttpClient {
	fn as_ref(&self) -> &ReqwestClient {
		&self.0
	}
}
impl Deref for ReqwestHttpClient {
	type Target = ReqwestClient;

	fn deref(&self) -> &Self::Target {
		&self.0
	}
}
impl Debug for ReqwestHttpClient {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str("ReqwestHttpClient(..)")
	}
}
impl From<ReqwestError> for ConfigError {
	fn from(e: ReqwestError) -> Self {
		Self::http_client_build(e)
	}
}

/// Caller-supplied configuration of a wrapped call.
///
/// Defaults to a bodiless `GET` with no headers.
#[derive(Clone, Debug, Default)]
pub struct RequestInit {
	/// HTTP method to dispatch with.
	pub method: Method,
	/// Caller headers; also merged into the refresh request.
	pub headers: HeaderMap,
	/// Raw request body.
	pub body: Option<Vec<u8>>,
}
impl RequestInit {
	/// Creates an empty `GET` configuration.
	pub fn new() -> Self {
		Self::default()
	}

	/// Creates an empty configuration for the given method.
	pub fn with_method(method: Method) -> Self {
		Self { method, ..Self::default() }
	}

	/// Overrides the method.
	pub fn method(mut self, method: Method) -> Self {
		self.method = method;

		self
	}

	/// Sets a typed header, replacing previous values for the same name.
	pub fn header(mut self, name: HeaderName, value: HeaderValue) -> Self {
		self.headers.insert(name, value);

		self
	}

	/// Sets a header from strings, validating both halves.
	pub fn try_header(self, name: &str, value: &str) -> Result<Self, ConfigError> {
		let invalid = || ConfigError::InvalidHeader { name: name.to_owned() };
		let name = HeaderName::from_bytes(name.as_bytes()).map_err(|_| invalid())?;
		let value = HeaderValue::from_str(value).map_err(|_| invalid())?;

		Ok(self.header(name, value))
	}

	/// Sets a raw body.
	pub fn body(mut self, body: impl Into<Vec<u8>>) -> Self {
		self.body = Some(body.into());

		self
	}

	/// Serializes `payload` as the JSON body and sets `Content-Type: application/json`.
	pub fn json<T>(self, payload: &T) -> Result<Self, ConfigError>
	where
		T: ?Sized + Serialize,
	{
		let bytes = serde_json::to_vec(payload).map_err(ConfigError::BodySerialize)?;

		Ok(self.header(CONTENT_TYPE, HeaderValue::from_static("application/json")).body(bytes))
	}
}

/// Headers sent to the refresh endpoint: JSON content type, overridden by caller headers.
pub(crate) fn refresh_headers(caller: &HeaderMap) -> HeaderMap {
	let mut headers = caller.clone();

	if !headers.contains_key(CONTENT_TYPE) {
		headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
	}

	headers
}

#[cfg(test)]
mod tests {
	// crates.io
	use reqwest::header::ACCEPT;
	// self
	use super::*;

	#[test]
	fn json_init_sets_body_and_content_type() {
		let init = RequestInit::with_method(Method::POST)
			.json(&serde_json::json!({ "cep": "01001000" }))
			.expect("JSON body should serialize.");

		assert_eq!(init.method, Method::POST);
		assert_eq!(
			init.headers.get(CONTENT_TYPE),
			Some(&HeaderValue::from_static("application/json"))
		);
		assert_eq!(init.body.as_deref(), Some(br#"{"cep":"01001000"}"#.as_slice()));
	}

	#[test]
	fn try_header_rejects_invalid_names() {
		let err = RequestInit::new()
			.try_header("bad header", "value")
			.expect_err("Header names with spaces should be rejected.");

		assert!(matches!(err, ConfigError::InvalidHeader { .. }));
	}

	#[test]
	fn refresh_headers_keep_caller_values_over_defaults() {
		let caller = RequestInit::new()
			.header(CONTENT_TYPE, HeaderValue::from_static("text/plain"))
			.header(ACCEPT, HeaderValue::from_static("application/json"))
			.headers;
		let merged = refresh_headers(&caller);

		assert_eq!(merged.get(CONTENT_TYPE), Some(&HeaderValue::from_static("text/plain")));
		assert_eq!(merged.get(ACCEPT), Some(&HeaderValue::from_static("application/json")));
		assert_eq!(
			refresh_headers(&HeaderMap::new()).get(CONTENT_TYPE),
			Some(&HeaderValue::from_static("application/json"))
		);
	}
}
