//! The authenticated request wrapper.

// crates.io
use reqwest::{
	Method, Response,
	header::{AUTHORIZATION, HeaderValue},
};
// self
use crate::{
	_prelude::*,
	client::AuthClient,
	error::{ConfigError, TransportError},
	http::RequestInit,
	obs::{FlowKind, FlowSpan},
};

impl AuthClient {
	/// Issues a wrapped call and returns the response exactly as the API sent it.
	///
	/// `target` is either an absolute URL or a path under the descriptor's API base. The
	/// credential is refreshed first when it is inside the safety buffer; a failed refresh
	/// aborts the call with [`Error::SessionExpired`] before anything is dispatched. The
	/// response status is not inspected.
	pub async fn fetch(&self, target: &str, init: RequestInit) -> Result<Response> {
		let span = FlowSpan::new(FlowKind::Dispatch, "fetch");

		span.clone()
			.run(async {
				let url = self.resolve(target)?;

				self.ensure_fresh(&init.headers).await?;

				let RequestInit { method, mut headers, body } = init;

				if let Some(token) = self.session.access_token().await? {
					let mut value = HeaderValue::from_str(&token.bearer()).map_err(|_| {
						ConfigError::InvalidHeader { name: AUTHORIZATION.to_string() }
					})?;

					value.set_sensitive(true);
					headers.insert(AUTHORIZATION, value);
				}

				span.record_request(&method, &url);

				let mut request = self.http_client.request(method, url).headers(headers);

				if let Some(body) = body {
					request = request.body(body);
				}

				let response = request.send().await.map_err(TransportError::from)?;

				span.record_status(response.status().as_u16());

				Ok(response)
			})
			.await
	}

	/// Wrapped `GET` with no extra headers.
	pub async fn get(&self, target: &str) -> Result<Response> {
		self.fetch(target, RequestInit::new()).await
	}

	/// Wrapped `DELETE` with no extra headers.
	pub async fn delete(&self, target: &str) -> Result<Response> {
		self.fetch(target, RequestInit::with_method(Method::DELETE)).await
	}
}
