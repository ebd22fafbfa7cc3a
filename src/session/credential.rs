//! Stored credential model and the expiry arithmetic used by the request wrapper.

// self
use crate::{_prelude::*, session::TokenSecret};

/// Lifetime applied when the server omits `expires_in`.
pub const DEFAULT_TOKEN_LIFETIME: Duration = Duration::seconds(120);
/// Window before expiry in which a wrapped call refreshes first.
pub const DEFAULT_REFRESH_BUFFER: Duration = Duration::seconds(10);

/// Access token plus its absolute expiration, as read from the session store.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Credential {
	/// Bearer token sent on wrapped calls.
	pub access_token: TokenSecret,
	/// Expiration in milliseconds since the Unix epoch, if one is stored.
	pub expires_at_ms: Option<i64>,
}
impl Credential {
	/// Returns `true` if the credential is due for refresh at `now_ms`.
	pub fn needs_refresh_at(&self, now_ms: i64, buffer: Duration) -> bool {
		should_refresh(self.expires_at_ms.unwrap_or(0), now_ms, buffer)
	}
}

/// Body returned by the refresh and login endpoints.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RefreshResponse {
	/// Replacement access token, if the server rotated it.
	#[serde(default)]
	pub access_token: Option<String>,
	/// Token lifetime in seconds; fractional values are truncated.
	#[serde(default, deserialize_with = "lifetime_seconds")]
	pub expires_in: Option<i64>,
}
impl RefreshResponse {
	/// Builds a response carrying a token and lifetime.
	pub fn new(access_token: impl Into<String>, expires_in: i64) -> Self {
		Self { access_token: Some(access_token.into()), expires_in: Some(expires_in) }
	}

	/// Lifetime to apply, falling back to `default` when absent or zero.
	pub fn lifetime_or(&self, default: Duration) -> Duration {
		self.expires_in.filter(|secs| *secs != 0).map(Duration::seconds).unwrap_or(default)
	}
}

/// Converts an instant into milliseconds since the Unix epoch.
pub fn epoch_millis(instant: OffsetDateTime) -> i64 {
	saturate(instant.unix_timestamp_nanos() / 1_000_000)
}

/// Current wall-clock time in epoch milliseconds.
pub fn now_millis() -> i64 {
	epoch_millis(OffsetDateTime::now_utc())
}

/// Decides whether a wrapped call must refresh before dispatch.
///
/// An expiration of zero means no credential is tracked and never triggers a refresh.
pub fn should_refresh(expires_at_ms: i64, now_ms: i64, buffer: Duration) -> bool {
	expires_at_ms != 0 && now_ms >= expires_at_ms.saturating_sub(saturate(buffer.whole_milliseconds()))
}

/// Computes the expiration to persist after a refresh or login at `now_ms`.
pub fn next_expiration(now_ms: i64, lifetime: Duration) -> i64 {
	now_ms.saturating_add(saturate(lifetime.whole_milliseconds()))
}

/// Parses a stored expiration from its leading integer, ignoring any trailing text.
///
/// Missing values and values without a leading integer read as zero.
pub fn parse_expiration(raw: Option<&str>) -> i64 {
	let Some(value) = raw.map(str::trim_start) else {
		return 0;
	};
	let (sign, digits) = match value.strip_prefix('-') {
		Some(rest) => (-1, rest),
		None => (1, value.strip_prefix('+').unwrap_or(value)),
	};
	let end = digits.find(|c: char| !c.is_ascii_digit()).unwrap_or(digits.len());

	digits[..end].parse::<i64>().map(|ms| sign * ms).unwrap_or(0)
}

fn saturate(value: i128) -> i64 {
	i64::try_from(value).unwrap_or(if value.is_negative() { i64::MIN } else { i64::MAX })
}

fn lifetime_seconds<'de, D>(deserializer: D) -> Result<Option<i64>, D::Error>
where
	D: serde::Deserializer<'de>,
{
	let Some(number) = Option::<serde_json::Number>::deserialize(deserializer)? else {
		return Ok(None);
	};
	let seconds = match number.as_i64() {
		Some(seconds) => seconds,
		// `as` saturates; NaN cannot appear in JSON.
		None => number.as_f64().map(|seconds| seconds.trunc() as i64).unwrap_or(i64::MAX),
	};

	Ok(Some(seconds))
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	const NOW: i64 = 1_700_000_000_000;

	#[test]
	fn missing_expiration_never_refreshes() {
		assert!(!should_refresh(0, NOW, DEFAULT_REFRESH_BUFFER));
		assert!(!should_refresh(parse_expiration(None), NOW, DEFAULT_REFRESH_BUFFER));
	}

	#[test]
	fn refresh_window_includes_the_buffer_boundary() {
		assert!(!should_refresh(NOW + 10_001, NOW, DEFAULT_REFRESH_BUFFER));
		assert!(should_refresh(NOW + 10_000, NOW, DEFAULT_REFRESH_BUFFER));
		assert!(should_refresh(NOW + 5_000, NOW, DEFAULT_REFRESH_BUFFER));
		assert!(should_refresh(NOW - 1_000, NOW, DEFAULT_REFRESH_BUFFER));
	}

	#[test]
	fn expiration_parses_the_leading_integer() {
		assert_eq!(parse_expiration(Some("not-a-number")), 0);
		assert_eq!(parse_expiration(Some("")), 0);
		assert_eq!(parse_expiration(Some(" 1700000000000 ")), NOW);
		assert_eq!(parse_expiration(Some("1700000000000abc")), NOW);
		assert_eq!(parse_expiration(Some("-5")), -5);
		assert_eq!(parse_expiration(Some("99999999999999999999")), 0);
	}

	#[test]
	fn fractional_and_huge_lifetimes_stay_in_range() {
		let fractional: RefreshResponse = serde_json::from_str(r#"{"expires_in":60.9}"#)
			.expect("Fractional lifetime should parse.");
		let huge: RefreshResponse = serde_json::from_str(r#"{"expires_in":9223372036854775807}"#)
			.expect("Huge lifetime should parse.");
		let null: RefreshResponse =
			serde_json::from_str(r#"{"expires_in":null}"#).expect("Null lifetime should parse.");

		assert_eq!(fractional.expires_in, Some(60));
		assert_eq!(null.expires_in, None);
		assert_eq!(
			next_expiration(NOW, huge.lifetime_or(DEFAULT_TOKEN_LIFETIME)),
			i64::MAX,
			"Overflowing lifetimes should saturate instead of wrapping."
		);
	}

	#[test]
	fn lifetime_defaults_when_missing_or_zero() {
		let missing = RefreshResponse::default();
		let zero = RefreshResponse { access_token: None, expires_in: Some(0) };
		let explicit = RefreshResponse::new("abc", 60);

		assert_eq!(missing.lifetime_or(DEFAULT_TOKEN_LIFETIME), Duration::seconds(120));
		assert_eq!(zero.lifetime_or(DEFAULT_TOKEN_LIFETIME), Duration::seconds(120));
		assert_eq!(explicit.lifetime_or(DEFAULT_TOKEN_LIFETIME), Duration::seconds(60));
		assert_eq!(next_expiration(NOW, Duration::seconds(60)), NOW + 60_000);
	}

	#[test]
	fn refresh_response_ignores_unknown_fields() {
		let parsed: RefreshResponse =
			serde_json::from_str(r#"{"access_token":"T","token_type":"bearer"}"#)
				.expect("Refresh body fixture should parse.");

		assert_eq!(parsed.access_token.as_deref(), Some("T"));
		assert_eq!(parsed.expires_in, None);
	}

	#[test]
	fn credential_checks_refresh_with_its_own_expiry() {
		let credential =
			Credential { access_token: TokenSecret::new("abc"), expires_at_ms: Some(NOW - 1) };
		let untracked = Credential { access_token: TokenSecret::new("abc"), expires_at_ms: None };

		assert!(credential.needs_refresh_at(NOW, DEFAULT_REFRESH_BUFFER));
		assert!(!untracked.needs_refresh_at(NOW, DEFAULT_REFRESH_BUFFER));
	}
}
