//! Session-aware HTTP client: the authenticated request wrapper and session lifecycle.
//!
//! [`AuthClient::fetch`] checks the stored expiration, refreshes through the configured
//! refresh endpoint when the credential is inside the safety buffer, attaches
//! `Authorization: Bearer <token>`, and dispatches the caller's request unchanged.
//! Concurrent callers that find the credential stale share a single refresh.

pub mod fetch;
pub mod lifecycle;
pub mod refresh;

pub(crate) mod common;

pub use refresh::*;

// self
use crate::{
	_prelude::*,
	client::common::RefreshGate,
	config::ClientDescriptor,
	error::ConfigError,
	http::ReqwestHttpClient,
	session::SessionContext,
	store::SessionStore,
};

/// Issues wrapped calls against one API using one session store.
///
/// Cloning is cheap; clones share the store, the cookie jar, the refresh guard, and the
/// metrics, so every clone observes the same session.
#[derive(Clone)]
pub struct AuthClient {
	/// HTTP client used for refresh, login, and dispatch.
	pub http_client: ReqwestHttpClient,
	/// Endpoints and refresh timing.
	pub descriptor: ClientDescriptor,
	/// Shared counters for refresh outcomes.
	pub refresh_metrics: Arc<RefreshMetrics>,
	session: SessionContext,
	refresh_gate: Arc<RefreshGate>,
}
impl AuthClient {
	/// Creates a client with a fresh cookie-enabled reqwest transport.
	pub fn new(descriptor: ClientDescriptor, store: Arc<dyn SessionStore>) -> Result<Self> {
		let http_client = ReqwestHttpClient::new().map_err(Error::from)?;

		Ok(Self::with_http_client(descriptor, store, http_client))
	}

	/// Creates a client that reuses the caller-provided transport.
	pub fn with_http_client(
		descriptor: ClientDescriptor,
		store: Arc<dyn SessionStore>,
		http_client: ReqwestHttpClient,
	) -> Self {
		let session = SessionContext::new(store, descriptor.storage_keys.clone());

		Self {
			http_client,
			descriptor,
			refresh_metrics: Default::default(),
			session,
			refresh_gate: Default::default(),
		}
	}

	/// Returns the session context backing this client.
	pub fn session(&self) -> &SessionContext {
		&self.session
	}

	fn resolve(&self, target: &str) -> Result<Url> {
		self.descriptor.resolve(target).map_err(|source| {
			ConfigError::InvalidTarget { target: target.to_owned(), source }.into()
		})
	}
}
impl Debug for AuthClient {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("AuthClient")
			.field("descriptor", &self.descriptor)
			.field("session", &self.session)
			.finish()
	}
}
