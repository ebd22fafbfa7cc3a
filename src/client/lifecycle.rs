//! Session establishment and teardown, plus the unauthenticated account endpoints.

// crates.io
use reqwest::{Method, Response};
// self
use crate::{
	_prelude::*,
	api::NewAccount,
	client::{AuthClient, common},
	error::TransportError,
	http::RequestInit,
	obs::{FlowKind, FlowSpan},
	session::{self, Credential, RefreshResponse},
};

#[derive(Serialize)]
struct LoginRequest<'a> {
	email: &'a str,
	senha: &'a str,
}

#[derive(Serialize)]
struct PasswordResetRequest<'a> {
	email: &'a str,
}

impl AuthClient {
	/// Persists a token response as the current session and returns its expiration (epoch ms).
	pub async fn establish_session(&self, response: &RefreshResponse) -> Result<i64> {
		self.session.apply(response, session::now_millis(), self.descriptor.default_lifetime).await
	}

	/// Signs in with e-mail and password.
	///
	/// Session cookies set by the login endpoint land in the client's cookie store. When the
	/// body also carries an `access_token`, it is stored together with its expiration. Returns
	/// the resulting credential, or `None` if the server relies on cookies alone.
	pub async fn login(&self, email: &str, password: &str) -> Result<Option<Credential>> {
		let span = FlowSpan::new(FlowKind::Login, "login");

		span.clone()
			.run(async {
				let response = self
					.post_unauthenticated(
						&span,
						self.descriptor.login_endpoint.clone(),
						&LoginRequest { email, senha: password },
					)
					.await?;
				let bytes = response.bytes().await.map_err(TransportError::from)?;
				let token = if bytes.iter().all(u8::is_ascii_whitespace) {
					RefreshResponse::default()
				} else {
					common::decode_slice::<RefreshResponse>(&bytes)?
				};

				span.record_rotated(token.access_token.is_some());

				if token.access_token.is_some() {
					self.establish_session(&token).await?;
				}

				self.session.credential().await
			})
			.await
	}

	/// Creates an account (`POST users/`). Does not sign in.
	pub async fn register(&self, account: &NewAccount) -> Result<()> {
		let span = FlowSpan::new(FlowKind::Register, "register");

		span.clone()
			.run(async {
				let url = self.resolve("users/")?;

				self.post_unauthenticated(&span, url, account).await.map(drop)
			})
			.await
	}

	/// Asks the API to e-mail a password-reset link to `email`.
	pub async fn request_password_reset(&self, email: &str) -> Result<()> {
		let span = FlowSpan::new(FlowKind::PasswordReset, "request_password_reset");

		span.clone()
			.run(async {
				let url = self.resolve("auth/request-password-reset")?;

				self.post_unauthenticated(&span, url, &PasswordResetRequest { email })
					.await
					.map(drop)
			})
			.await
	}

	/// Deletes the stored token and expiration.
	///
	/// Cookies held by the transport are left alone; the server owns their lifetime.
	pub async fn logout(&self) -> Result<()> {
		FlowSpan::new(FlowKind::Logout, "logout").run(self.session.clear()).await
	}

	/// Returns the stored credential, or `None` when unauthenticated.
	pub async fn credential(&self) -> Result<Option<Credential>> {
		self.session.credential().await
	}

	async fn post_unauthenticated<T>(
		&self,
		span: &FlowSpan,
		url: Url,
		payload: &T,
	) -> Result<Response>
	where
		T: ?Sized + Serialize,
	{
		let init = RequestInit::with_method(Method::POST).json(payload)?;

		span.record_request(&init.method, &url);

		let response = self
			.http_client
			.request(init.method, url)
			.headers(init.headers)
			.body(init.body.unwrap_or_default())
			.send()
			.await
			.map_err(TransportError::from)?;

		span.record_status(response.status().as_u16());

		if !response.status().is_success() {
			return Err(common::api_error(response).await);
		}

		Ok(response)
	}
}
