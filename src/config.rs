//! Client descriptor: API endpoints and refresh timing, validated by a builder.

// self
use crate::{
	_prelude::*,
	session::{DEFAULT_REFRESH_BUFFER, DEFAULT_TOKEN_LIFETIME, StorageKeys},
};

/// Base URL of the local development API.
pub const DEFAULT_API_BASE: &str = "http://localhost:8000/";
/// Path of the refresh endpoint, relative to the API base.
pub const DEFAULT_REFRESH_PATH: &str = "auth/refresh-token";
/// Path of the login endpoint, relative to the API base.
pub const DEFAULT_LOGIN_PATH: &str = "auth/login";

/// Errors raised while constructing or validating descriptors.
#[derive(Debug, PartialEq, Eq, ThisError)]
pub enum ClientDescriptorError {
	/// Endpoint URLs must use HTTP(S).
	#[error("The {endpoint} endpoint must use http or https: {url}.")]
	UnsupportedScheme {
		/// Which endpoint failed validation.
		endpoint: &'static str,
		/// Endpoint URL that failed validation.
		url: String,
	},
	/// The API base cannot have relative paths joined onto it.
	#[error("The API base URL cannot be used as a base: {url}.")]
	CannotBeBase {
		/// Base URL that failed validation.
		url: String,
	},
	/// A relative endpoint path could not be joined onto the base.
	#[error("The {endpoint} endpoint path is invalid.")]
	InvalidPath {
		/// Which endpoint failed validation.
		endpoint: &'static str,
		/// Underlying parsing failure.
		source: url::ParseError,
	},
	/// The refresh buffer must not be negative.
	#[error("Refresh buffer must not be negative.")]
	NegativeRefreshBuffer,
	/// The default token lifetime must be positive.
	#[error("Default token lifetime must be positive.")]
	NonPositiveLifetime,
	/// Storage keys must be distinct, non-empty strings.
	#[error("Storage keys must be non-empty and distinct.")]
	InvalidStorageKeys,
}

/// Immutable client descriptor consumed by [`AuthClient`](crate::client::AuthClient).
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClientDescriptor {
	/// Base URL that relative request targets resolve against.
	pub api_base: Url,
	/// Refresh endpoint called before stale wrapped calls.
	pub refresh_endpoint: Url,
	/// Login endpoint used to establish a session.
	pub login_endpoint: Url,
	/// Window before expiry in which calls refresh first.
	pub refresh_buffer: Duration,
	/// Lifetime applied when the server omits `expires_in`.
	pub default_lifetime: Duration,
	/// Keys under which the credential pair is stored.
	pub storage_keys: StorageKeys,
}
impl ClientDescriptor {
	/// Creates a new builder rooted at the provided API base.
	pub fn builder(api_base: Url) -> ClientDescriptorBuilder {
		ClientDescriptorBuilder::new(api_base)
	}

	/// Resolves a request target: absolute URLs pass through, paths join onto the base.
	pub fn resolve(&self, target: &str) -> Result<Url, url::ParseError> {
		match Url::parse(target) {
			Ok(url) => Ok(url),
			Err(url::ParseError::RelativeUrlWithoutBase) =>
				self.api_base.join(target.trim_start_matches('/')),
			Err(e) => Err(e),
		}
	}

	fn validate(&self) -> Result<(), ClientDescriptorError> {
		if self.api_base.cannot_be_a_base() {
			return Err(ClientDescriptorError::CannotBeBase { url: self.api_base.to_string() });
		}

		validate_endpoint("api base", &self.api_base)?;
		validate_endpoint("refresh", &self.refresh_endpoint)?;
		validate_endpoint("login", &self.login_endpoint)?;

		if self.refresh_buffer.is_negative() {
			return Err(ClientDescriptorError::NegativeRefreshBuffer);
		}
		if !self.default_lifetime.is_positive() {
			return Err(ClientDescriptorError::NonPositiveLifetime);
		}

		let keys = &self.storage_keys;

		if keys.access_token.is_empty()
			|| keys.expiration.is_empty()
			|| keys.access_token == keys.expiration
		{
			return Err(ClientDescriptorError::InvalidStorageKeys);
		}

		Ok(())
	}

	/// Descriptor for the local development API at [`DEFAULT_API_BASE`].
	pub fn local_development() -> Result<Self, ClientDescriptorError> {
		let api_base = Url::parse(DEFAULT_API_BASE).map_err(|source| {
			ClientDescriptorError::InvalidPath { endpoint: "api base", source }
		})?;

		Self::builder(api_base).build()
	}
}

/// Builder for [`ClientDescriptor`] values.
#[derive(Debug)]
pub struct ClientDescriptorBuilder {
	/// Base URL for relative targets.
	pub api_base: Url,
	/// Absolute refresh endpoint override.
	pub refresh_endpoint: Option<Url>,
	/// Refresh path joined onto the base when no override is set.
	pub refresh_path: String,
	/// Absolute login endpoint override.
	pub login_endpoint: Option<Url>,
	/// Login path joined onto the base when no override is set.
	pub login_path: String,
	/// Window before expiry in which calls refresh first.
	pub refresh_buffer: Duration,
	/// Lifetime applied when the server omits `expires_in`.
	pub default_lifetime: Duration,
	/// Keys under which the credential pair is stored.
	pub storage_keys: StorageKeys,
}
impl ClientDescriptorBuilder {
	/// Creates a new builder seeded with defaults for everything but the base.
	pub fn new(mut api_base: Url) -> Self {
		if !api_base.path().ends_with('/') {
			let path = format!("{}/", api_base.path());

			api_base.set_path(&path);
		}

		Self {
			api_base,
			refresh_endpoint: None,
			refresh_path: DEFAULT_REFRESH_PATH.into(),
			login_endpoint: None,
			login_path: DEFAULT_LOGIN_PATH.into(),
			refresh_buffer: DEFAULT_REFRESH_BUFFER,
			default_lifetime: DEFAULT_TOKEN_LIFETIME,
			storage_keys: StorageKeys::default(),
		}
	}

	/// Uses an absolute refresh endpoint instead of a path under the base.
	pub fn refresh_endpoint(mut self, url: Url) -> Self {
		self.refresh_endpoint = Some(url);

		self
	}

	/// Sets the refresh path joined onto the base.
	pub fn refresh_path(mut self, path: impl Into<String>) -> Self {
		self.refresh_path = path.into();

		self
	}

	/// Uses an absolute login endpoint instead of a path under the base.
	pub fn login_endpoint(mut self, url: Url) -> Self {
		self.login_endpoint = Some(url);

		self
	}

	/// Overrides the refresh safety buffer (defaults to 10 seconds).
	pub fn refresh_buffer(mut self, buffer: Duration) -> Self {
		self.refresh_buffer = buffer;

		self
	}

	/// Overrides the fallback token lifetime (defaults to 120 seconds).
	pub fn default_lifetime(mut self, lifetime: Duration) -> Self {
		self.default_lifetime = lifetime;

		self
	}

	/// Overrides the storage key names.
	pub fn storage_keys(mut self, keys: StorageKeys) -> Self {
		self.storage_keys = keys;

		self
	}

	/// Consumes the builder and validates the resulting descriptor.
	pub fn build(self) -> Result<ClientDescriptor, ClientDescriptorError> {
		let refresh_endpoint = match self.refresh_endpoint {
			Some(url) => url,
			None => join("refresh", &self.api_base, &self.refresh_path)?,
		};
		let login_endpoint = match self.login_endpoint {
			Some(url) => url,
			None => join("login", &self.api_base, &self.login_path)?,
		};
		let descriptor = ClientDescriptor {
			api_base: self.api_base,
			refresh_endpoint,
			login_endpoint,
			refresh_buffer: self.refresh_buffer,
			default_lifetime: self.default_lifetime,
			storage_keys: self.storage_keys,
		};

		descriptor.validate()?;

		Ok(descriptor)
	}
}

fn join(endpoint: &'static str, base: &Url, path: &str) -> Result<Url, ClientDescriptorError> {
	base.join(path.trim_start_matches('/'))
		.map_err(|source| ClientDescriptorError::InvalidPath { endpoint, source })
}

fn validate_endpoint(name: &'static str, url: &Url) -> Result<(), ClientDescriptorError> {
	match url.scheme() {
		"http" | "https" => Ok(()),
		_ => Err(ClientDescriptorError::UnsupportedScheme { endpoint: name, url: url.to_string() }),
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	fn url(value: &str) -> Url {
		Url::parse(value).expect("Failed to parse descriptor test URL.")
	}

	#[test]
	fn default_descriptor_targets_local_api() {
		let descriptor =
			ClientDescriptor::local_development().expect("Local descriptor should build.");

		assert_eq!(
			descriptor.refresh_endpoint.as_str(),
			"http://localhost:8000/auth/refresh-token"
		);
		assert_eq!(descriptor.login_endpoint.as_str(), "http://localhost:8000/auth/login");
		assert_eq!(descriptor.refresh_buffer, Duration::seconds(10));
		assert_eq!(descriptor.default_lifetime, Duration::seconds(120));
	}

	#[test]
	fn builder_joins_paths_under_a_nested_base() {
		let descriptor = ClientDescriptor::builder(url("https://api.example.com/v1"))
			.refresh_path("/session/refresh")
			.build()
			.expect("Descriptor with nested base should build.");

		assert_eq!(
			descriptor.refresh_endpoint.as_str(),
			"https://api.example.com/v1/session/refresh"
		);
		assert_eq!(
			descriptor.resolve("/users/me").expect("Relative target should resolve.").as_str(),
			"https://api.example.com/v1/users/me"
		);
		assert_eq!(
			descriptor
				.resolve("https://other.example.com/x")
				.expect("Absolute target should pass through.")
				.as_str(),
			"https://other.example.com/x"
		);
	}

	#[test]
	fn builder_rejects_invalid_settings() {
		let err = ClientDescriptor::builder(url("http://localhost:8000"))
			.refresh_endpoint(url("ftp://localhost/refresh"))
			.build()
			.expect_err("Non-HTTP refresh endpoint should be rejected.");

		assert!(matches!(
			err,
			ClientDescriptorError::UnsupportedScheme { endpoint: "refresh", .. }
		));

		let err = ClientDescriptor::builder(url("http://localhost:8000"))
			.refresh_buffer(Duration::seconds(-1))
			.build()
			.expect_err("Negative buffer should be rejected.");

		assert_eq!(err, ClientDescriptorError::NegativeRefreshBuffer);

		let err = ClientDescriptor::builder(url("http://localhost:8000"))
			.default_lifetime(Duration::ZERO)
			.build()
			.expect_err("Zero lifetime should be rejected.");

		assert_eq!(err, ClientDescriptorError::NonPositiveLifetime);

		let err = ClientDescriptor::builder(url("http://localhost:8000"))
			.storage_keys(StorageKeys { access_token: "same".into(), expiration: "same".into() })
			.build()
			.expect_err("Colliding storage keys should be rejected.");

		assert_eq!(err, ClientDescriptorError::InvalidStorageKeys);
	}

	#[test]
	fn descriptor_persists_as_json() {
		let descriptor =
			ClientDescriptor::local_development().expect("Local descriptor should build.");
		let json = serde_json::to_value(&descriptor).expect("Descriptor should serialize.");

		assert_eq!(json["refresh_endpoint"], "http://localhost:8000/auth/refresh-token");
		assert_eq!(json["storage_keys"]["expiration"], "access_token_expiration");

		let restored: ClientDescriptor =
			serde_json::from_value(json).expect("Serialized descriptor should deserialize.");

		assert_eq!(restored, descriptor);
	}
}
