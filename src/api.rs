//! Typed wrappers over the profile, address, and locality endpoints.
//!
//! Every call goes through [`AuthClient::fetch`], so the credential is refreshed and attached
//! the same way as for raw calls. Non-success statuses become [`Error::Api`] with the server's
//! `detail` message.

pub mod format;
pub mod models;

pub use models::*;

// crates.io
use reqwest::{Method, Response};
use serde::de::DeserializeOwned;
// self
use crate::{
	_prelude::*,
	client::{AuthClient, common},
	http::RequestInit,
};

/// Typed UniEvents API bound to one [`AuthClient`].
#[derive(Clone, Debug)]
pub struct UniEventsApi {
	client: AuthClient,
}
impl UniEventsApi {
	/// Wraps an existing client.
	pub fn new(client: AuthClient) -> Self {
		Self { client }
	}

	/// Returns the underlying client.
	pub fn client(&self) -> &AuthClient {
		&self.client
	}

	/// Fetches the signed-in user's profile.
	pub async fn me(&self) -> Result<UserProfile> {
		self.get_json("users/me").await
	}

	/// Lists saved addresses; an absent list reads as empty.
	pub async fn addresses(&self) -> Result<Vec<Address>> {
		let list: AddressList = self.get_json("users/enderecos").await?;

		Ok(list.addresses)
	}

	/// Saves a new address.
	pub async fn create_address(&self, address: &NewAddress) -> Result<()> {
		let init = RequestInit::with_method(Method::POST).json(address)?;

		self.send("users/create-endereco", init).await.map(drop)
	}

	/// Updates name, e-mail, phone, and optionally the password.
	pub async fn update_profile(&self, update: &ProfileUpdate) -> Result<()> {
		let init = RequestInit::with_method(Method::PUT).json(update)?;

		self.send("users/update", init).await.map(drop)
	}

	/// Deletes a saved address.
	pub async fn delete_address(&self, id: i64) -> Result<()> {
		self.send(&format!("endereco/delete/{id}"), RequestInit::with_method(Method::DELETE))
			.await
			.map(drop)
	}

	/// Lists countries.
	pub async fn countries(&self) -> Result<Vec<Country>> {
		self.get_json("localidades/paises").await
	}

	/// Lists the states of a country.
	pub async fn states(&self, country_id: i64) -> Result<Vec<State>> {
		self.get_json(&format!("localidades/estados?pais_id={country_id}")).await
	}

	/// Lists the cities of a state.
	pub async fn cities(&self, state_id: i64) -> Result<Vec<City>> {
		self.get_json(&format!("localidades/cidades?estado_id={state_id}")).await
	}

	async fn get_json<T>(&self, target: &str) -> Result<T>
	where
		T: DeserializeOwned,
	{
		let response = self.send(target, RequestInit::new()).await?;

		common::decode_json(response).await
	}

	async fn send(&self, target: &str, init: RequestInit) -> Result<Response> {
		let response = self.client.fetch(target, init).await?;

		if !response.status().is_success() {
			return Err(common::api_error(response).await);
		}

		Ok(response)
	}
}
