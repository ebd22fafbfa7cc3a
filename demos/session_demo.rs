//! Signs in against a running UniEvents API, prints the profile, and signs out.
//!
//! ```sh
//! UNIEVENTS_EMAIL=ana@example.com UNIEVENTS_PASSWORD=secret \
//! 	cargo run --example session_demo -- http://localhost:8000/
//! ```

// std
use std::{env, sync::Arc};
// crates.io
use color_eyre::eyre::{Result, WrapErr};
use unievents_client::{
	api::UniEventsApi,
	client::AuthClient,
	config::ClientDescriptor,
	store::FileStore,
	url::Url,
};

#[tokio::main]
async fn main() -> Result<()> {
	color_eyre::install()?;

	let descriptor = match env::args().nth(1) {
		Some(base) => ClientDescriptor::builder(Url::parse(&base)?).build()?,
		None => ClientDescriptor::local_development()?,
	};
	let store = FileStore::open(env::temp_dir().join("unievents-demo-session.json"))?;
	let client = AuthClient::new(descriptor, Arc::new(store))?;
	let email = env::var("UNIEVENTS_EMAIL").wrap_err("UNIEVENTS_EMAIL must be set.")?;
	let password = env::var("UNIEVENTS_PASSWORD").wrap_err("UNIEVENTS_PASSWORD must be set.")?;

	match client.login(&email, &password).await? {
		Some(credential) => println!("Signed in; token expires at {:?}.", credential.expires_at_ms),
		None => println!("Signed in with cookies only."),
	}

	let api = UniEventsApi::new(client.clone());
	let profile = api.me().await?;

	println!("{} <{}>", profile.name, profile.email);

	for address in api.addresses().await? {
		println!("- {} {}, {} ({})", address.street, address.number, address.city, address.state);
	}

	client.logout().await?;

	Ok(())
}
