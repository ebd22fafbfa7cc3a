//! Client-level error types shared across the wrapper, session stores, and API helpers.

// self
use crate::_prelude::*;

/// Client-wide result type alias returning [`Error`] by default.
pub type Result<T, E = Error> = std::result::Result<T, E>;

type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// User-facing message attached to every session-expired failure.
pub const SESSION_EXPIRED_MESSAGE: &str = "Your session has expired. Please sign in again.";

/// Canonical client error exposed by public APIs.
#[derive(Debug, ThisError)]
pub enum Error {
	/// Session store failure.
	#[error("{0}")]
	Storage(
		#[from]
		#[source]
		crate::store::StoreError,
	),
	/// Local configuration problem.
	#[error(transparent)]
	Config(#[from] ConfigError),
	/// Transport failure (DNS, TCP, TLS) while dispatching a wrapped call.
	#[error(transparent)]
	Transport(#[from] TransportError),

	/// The refresh attempt failed; stored credentials were cleared.
	#[error("{}", SESSION_EXPIRED_MESSAGE)]
	SessionExpired {
		/// Why the refresh endpoint could not renew the credential.
		#[source]
		cause: RefreshFailure,
	},
	/// The API answered a typed helper with a non-success status.
	#[error("API request failed with status {status}: {detail}.")]
	Api {
		/// HTTP status code returned by the API.
		status: u16,
		/// Server-supplied `detail` message, or a generic fallback.
		detail: String,
	},
	/// The API returned a body that does not match the expected shape.
	#[error("API returned a malformed body.")]
	Decode {
		/// Structured parsing failure, including the JSON path.
		#[source]
		source: serde_path_to_error::Error<serde_json::Error>,
	},
}
impl Error {
	/// Returns `true` when the error means the caller must sign in again.
	pub fn is_session_expired(&self) -> bool {
		matches!(self, Self::SessionExpired { .. })
	}
}

/// Reasons a refresh attempt is treated as a session expiry.
#[derive(Debug, ThisError)]
pub enum RefreshFailure {
	/// The refresh endpoint answered with a non-success status.
	#[error("Refresh endpoint rejected the session with status {status}.")]
	Rejected {
		/// HTTP status code returned by the refresh endpoint.
		status: u16,
	},
	/// The refresh endpoint could not be reached.
	#[error("Network error occurred while calling the refresh endpoint.")]
	Transport(#[source] TransportError),
	/// The refresh endpoint answered 2xx with a body that is not a refresh response.
	#[error("Refresh endpoint returned malformed JSON.")]
	MalformedBody(#[source] serde_path_to_error::Error<serde_json::Error>),
	/// Another caller's refresh failed while this caller waited on it.
	#[error("A concurrent refresh attempt failed.")]
	Concurrent,
}
impl RefreshFailure {
	/// Returns `true` when the failure came from the network rather than the server's verdict.
	///
	/// Credentials are cleared either way; callers may use this to word their prompt.
	pub fn is_transient(&self) -> bool {
		matches!(self, Self::Transport(_))
	}

	/// Stable label for span fields and metric labels.
	pub const fn label(&self) -> &'static str {
		match self {
			Self::Rejected { .. } => "rejected",
			Self::Transport(_) => "transport",
			Self::MalformedBody(_) => "malformed_body",
			Self::Concurrent => "concurrent",
		}
	}
}

/// Configuration and validation failures raised by the client.
#[derive(Debug, ThisError)]
pub enum ConfigError {
	/// HTTP client could not be constructed.
	#[error("HTTP client could not be constructed.")]
	HttpClientBuild {
		/// Underlying transport builder failure.
		#[source]
		source: BoxError,
	},
	/// Request target cannot be resolved against the API base URL.
	#[error("Request target `{target}` is not a valid URL.")]
	InvalidTarget {
		/// Target supplied by the caller.
		target: String,
		/// Underlying parsing failure.
		#[source]
		source: url::ParseError,
	},
	/// Header name or value supplied by the caller is invalid.
	#[error("Header `{name}` is invalid.")]
	InvalidHeader {
		/// Header name supplied by the caller.
		name: String,
	},
	/// Request body could not be serialized.
	#[error("Request body could not be serialized.")]
	BodySerialize(#[source] serde_json::Error),
}
impl ConfigError {
	/// Wraps a transport's builder failure inside [`ConfigError`].
	pub fn http_client_build(src: impl 'static + Send + Sync + std::error::Error) -> Self {
		Self::HttpClientBuild { source: Box::new(src) }
	}
}

/// Transport-level failures (network, IO).
#[derive(Debug, ThisError)]
pub enum TransportError {
	/// Underlying HTTP client reported a network failure.
	#[error("Network error occurred while calling the API.")]
	Network {
		/// Transport-specific network error.
		#[source]
		source: BoxError,
	},
	/// Underlying IO failure surfaced during transport.
	#[error("I/O error occurred while calling the API.")]
	Io(#[from] std::io::Error),
}
impl TransportError {
	/// Wraps a transport-specific network error.
	pub fn network(src: impl 'static + Send + Sync + std::error::Error) -> Self {
		Self::Network { source: Box::new(src) }
	}
}
impl From<ReqwestError> for TransportError {
	fn from(e: ReqwestError) -> Self {
		Self::network(e)
	}
}
