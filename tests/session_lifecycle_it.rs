mod common;

// crates.io
use httpmock::prelude::*;
use serde_json::json;
use unievents_client::{
	api::NewAccount,
	error::Error,
	session::RefreshResponse,
	store::{FileStore, SessionStore},
};
// self
use common::*;

#[tokio::test]
async fn login_stores_the_returned_credential() {
	let server = MockServer::start_async().await;
	let (client, store) = build_client(&server);
	let login = server
		.mock_async(|when, then| {
			when.method(POST)
				.path("/auth/login")
				.json_body(json!({ "email": "ana@example.com", "senha": "hunter2" }));
			then.status(200)
				.header("set-cookie", "refresh_token=r1; Path=/; HttpOnly")
				.json_body(json!({ "access_token": "abc", "expires_in": 900 }));
		})
		.await;
	let credential = client
		.login("ana@example.com", "hunter2")
		.await
		.expect("Login should succeed.")
		.expect("Login should yield a credential.");

	login.assert_calls_async(1).await;

	assert_eq!(credential.access_token.expose(), "abc");
	assert_eq!(credential.expires_at_ms, stored_expiration(&store));
	assert_eq!(store.snapshot().get(TOKEN_KEY).map(String::as_str), Some("abc"));
}

#[tokio::test]
async fn cookie_only_login_leaves_the_store_empty() {
	let server = MockServer::start_async().await;
	let (client, store) = build_client(&server);

	server
		.mock_async(|when, then| {
			when.method(POST).path("/auth/login");
			then.status(204);
		})
		.await;

	let credential =
		client.login("ana@example.com", "hunter2").await.expect("Cookie-only login should succeed.");

	assert!(credential.is_none());
	assert!(store.snapshot().is_empty());
}

#[tokio::test]
async fn failed_login_surfaces_server_detail() {
	let server = MockServer::start_async().await;
	let (client, store) = build_client(&server);

	server
		.mock_async(|when, then| {
			when.method(POST).path("/auth/login");
			then.status(401).json_body(json!({ "detail": "Credenciais inválidas" }));
		})
		.await;

	let err = client.login("ana@example.com", "wrong").await.expect_err("Login should fail.");

	assert!(matches!(err, Error::Api { status: 401, ref detail } if detail == "Credenciais inválidas"));
	assert!(store.snapshot().is_empty());
}

#[tokio::test]
async fn logout_clears_token_and_expiration() {
	let server = MockServer::start_async().await;
	let (client, store) = build_client(&server);

	seed_session(&store, "abc", 60_000).await;
	store.set("theme", "dark".into()).await.expect("Unrelated key should seed.");

	client.logout().await.expect("Logout should succeed.");

	assert!(client.credential().await.expect("Credential lookup should succeed.").is_none());
	assert_eq!(store.snapshot().len(), 1);
	assert_eq!(store.snapshot().get("theme").map(String::as_str), Some("dark"));
}

#[tokio::test]
async fn file_store_session_survives_a_new_client() {
	let server = MockServer::start_async().await;
	let path = std::env::temp_dir()
		.join(format!("unievents-session-{}-{}.json", std::process::id(), line!()));
	let base =
		unievents_client::url::Url::parse(&server.base_url()).expect("Base URL should parse.");
	let descriptor = unievents_client::config::ClientDescriptor::builder(base)
		.build()
		.expect("Descriptor should build.");
	let open = || {
		let store = FileStore::open(path.clone()).expect("File store should open.");

		unievents_client::client::AuthClient::new(descriptor.clone(), std::sync::Arc::new(store))
			.expect("Client should build.")
	};
	let expires_at_ms = open()
		.establish_session(&RefreshResponse::new("persisted", 600))
		.await
		.expect("Session should persist.");
	let credential = open()
		.credential()
		.await
		.expect("Credential lookup should succeed.")
		.expect("Reopened store should hold the credential.");

	assert_eq!(credential.access_token.expose(), "persisted");
	assert_eq!(credential.expires_at_ms, Some(expires_at_ms));

	std::fs::remove_file(&path).unwrap_or_else(|e| {
		panic!("Failed to remove session file {}: {e}.", path.display());
	});
}

#[tokio::test]
async fn registration_sends_normalized_account() {
	let server = MockServer::start_async().await;
	let (client, store) = build_client(&server);
	let register = server
		.mock_async(|when, then| {
			when.method(POST).path("/users/").header_missing("authorization").json_body(json!({
				"pessoa": {
					"nome_completo": "Ana Souza",
					"fantasia": "",
					"cpf_cnpj": "12345678909",
					"email": "ana@example.com",
					"telefone_celular": "11987654321",
					"data_nascimento": "1990-05-17",
					"regime": "",
					"tipo_pessoa": "fisica"
				},
				"usuario": { "email": "ana@example.com", "senha": "hunter2" }
			}));
			then.status(201).json_body(json!({ "id": 9 }));
		})
		.await;
	let account = NewAccount {
		name: "Ana Souza".into(),
		trade_name: String::new(),
		document: "123.456.789-09".into(),
		email: "ana@example.com".into(),
		phone: "(11) 98765-4321".into(),
		birth_date: time_date(),
		regime: String::new(),
		password: "hunter2".into(),
	};

	client.register(&account).await.expect("Registration should succeed.");

	register.assert_calls_async(1).await;

	assert!(store.snapshot().is_empty());
}

#[tokio::test]
async fn duplicate_registration_surfaces_server_detail() {
	let server = MockServer::start_async().await;
	let (client, _store) = build_client(&server);

	server
		.mock_async(|when, then| {
			when.method(POST).path("/users/");
			then.status(400).json_body(json!({ "detail": "Email já cadastrado" }));
		})
		.await;

	let account = NewAccount {
		name: "Ana Souza".into(),
		trade_name: String::new(),
		document: "12345678909".into(),
		email: "ana@example.com".into(),
		phone: "11987654321".into(),
		birth_date: time_date(),
		regime: String::new(),
		password: "hunter2".into(),
	};
	let err = client.register(&account).await.expect_err("Duplicate registration should fail.");

	assert!(matches!(err, Error::Api { status: 400, ref detail } if detail == "Email já cadastrado"));
}

#[tokio::test]
async fn password_reset_request_posts_the_email() {
	let server = MockServer::start_async().await;
	let (client, _store) = build_client(&server);
	let reset = server
		.mock_async(|when, then| {
			when.method(POST)
				.path("/auth/request-password-reset")
				.json_body(json!({ "email": "ana@example.com" }));
			then.status(200).json_body(json!({ "message": "ok" }));
		})
		.await;

	client.request_password_reset("ana@example.com").await.expect("Reset request should succeed.");

	reset.assert_calls_async(1).await;

	server
		.mock_async(|when, then| {
			when.method(POST)
				.path("/auth/request-password-reset")
				.json_body(json!({ "email": "ghost@example.com" }));
			then.status(404).json_body(json!({ "detail": "Usuário não encontrado" }));
		})
		.await;

	let err = client
		.request_password_reset("ghost@example.com")
		.await
		.expect_err("Unknown e-mail should fail.");

	assert!(matches!(err, Error::Api { status: 404, ref detail } if detail == "Usuário não encontrado"));
}

fn time_date() -> unievents_client::time::Date {
	unievents_client::time::Date::from_calendar_date(1990, unievents_client::time::Month::May, 17)
		.expect("Fixture birth date should be valid.")
}
