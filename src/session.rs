//! Session credential model and the context object that reads and writes it.
//!
//! The access token and its expiration live in a [`SessionStore`] under two plain string
//! keys. [`SessionContext`] pairs a store with its [`StorageKeys`] so the client never
//! touches raw keys directly.

pub mod credential;
pub mod secret;

pub use credential::*;
pub use secret::*;

// self
use crate::{_prelude::*, store::SessionStore};

/// Key names under which the credential pair is persisted.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct StorageKeys {
	/// Key holding the bearer token.
	pub access_token: String,
	/// Key holding the expiration in epoch milliseconds, as a decimal string.
	pub expiration: String,
}
impl Default for StorageKeys {
	fn default() -> Self {
		Self { access_token: "access_token".into(), expiration: "access_token_expiration".into() }
	}
}

/// Explicit session state shared by every call issued through one client.
#[derive(Clone)]
pub struct SessionContext {
	store: Arc<dyn SessionStore>,
	keys: StorageKeys,
}
impl SessionContext {
	/// Binds a store to the given key names.
	pub fn new(store: Arc<dyn SessionStore>, keys: StorageKeys) -> Self {
		Self { store, keys }
	}

	/// Returns the backing store.
	pub fn store(&self) -> &Arc<dyn SessionStore> {
		&self.store
	}

	/// Returns the key names in use.
	pub fn keys(&self) -> &StorageKeys {
		&self.keys
	}

	/// Reads the stored expiration from its leading integer; absent values read as zero.
	pub async fn expiration(&self) -> Result<i64> {
		let raw = self.store.get(&self.keys.expiration).await?;
		let parsed = credential::parse_expiration(raw.as_deref());

		#[cfg(feature = "tracing")]
		{
			if raw.as_deref().is_some_and(|value| value.trim().parse::<i64>().is_err()) {
				tracing::warn!(
					key = %self.keys.expiration,
					value = parsed,
					"Stored expiration is not a plain millisecond timestamp; using its leading integer."
				);
			}
		}

		Ok(parsed)
	}

	/// Reads the stored access token, if any.
	pub async fn access_token(&self) -> Result<Option<TokenSecret>> {
		let raw = self.store.get(&self.keys.access_token).await?;

		Ok(raw.filter(|value| !value.is_empty()).map(TokenSecret::new))
	}

	/// Reads the full credential; `None` means unauthenticated.
	pub async fn credential(&self) -> Result<Option<Credential>> {
		let Some(access_token) = self.access_token().await? else {
			return Ok(None);
		};
		let expires_at_ms = Some(self.expiration().await?).filter(|ms| *ms != 0);

		Ok(Some(Credential { access_token, expires_at_ms }))
	}

	/// Persists the outcome of a refresh or login observed at `now_ms`.
	///
	/// The token is only replaced when the response carries one; the expiration is always
	/// rewritten.
	pub async fn apply(
		&self,
		response: &RefreshResponse,
		now_ms: i64,
		default_lifetime: Duration,
	) -> Result<i64> {
		if let Some(token) = response.access_token.as_deref() {
			self.store.set(&self.keys.access_token, token.to_owned()).await?;
		}

		let expires_at_ms =
			credential::next_expiration(now_ms, response.lifetime_or(default_lifetime));

		self.store.set(&self.keys.expiration, expires_at_ms.to_string()).await?;

		Ok(expires_at_ms)
	}

	/// Deletes both the token and its expiration.
	pub async fn clear(&self) -> Result<()> {
		self.store.remove(&self.keys.access_token).await?;
		self.store.remove(&self.keys.expiration).await?;

		Ok(())
	}
}
impl Debug for SessionContext {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("SessionContext").field("keys", &self.keys).finish()
	}
}
