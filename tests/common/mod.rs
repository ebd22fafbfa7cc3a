//! Fixtures shared by the integration suites.

#![allow(dead_code)]

// crates.io
use httpmock::MockServer;
use unievents_client::{
	client::AuthClient,
	config::ClientDescriptor,
	session,
	store::{MemoryStore, SessionStore},
	url::Url,
};

pub const TOKEN_KEY: &str = "access_token";
pub const EXPIRATION_KEY: &str = "access_token_expiration";

/// Builds a client against the mock server, backed by a fresh memory store.
pub fn build_client(server: &MockServer) -> (AuthClient, MemoryStore) {
	let base = Url::parse(&server.base_url()).expect("Mock server base URL should parse.");
	let descriptor =
		ClientDescriptor::builder(base).build().expect("Client descriptor should build.");
	let store = MemoryStore::default();
	let client = AuthClient::new(descriptor, std::sync::Arc::new(store.clone()))
		.expect("Client should build against the mock server.");

	(client, store)
}

/// Seeds a token that expires `offset_ms` from now.
pub async fn seed_session(store: &MemoryStore, token: &str, offset_ms: i64) -> i64 {
	let expires_at_ms = session::now_millis() + offset_ms;

	store.set(TOKEN_KEY, token.to_owned()).await.expect("Token should seed.");
	store.set(EXPIRATION_KEY, expires_at_ms.to_string()).await.expect("Expiration should seed.");

	expires_at_ms
}

/// Reads the stored expiration back as milliseconds.
pub fn stored_expiration(store: &MemoryStore) -> Option<i64> {
	store.snapshot().get(EXPIRATION_KEY).map(|raw| {
		raw.parse().expect("Stored expiration should be a millisecond timestamp.")
	})
}
