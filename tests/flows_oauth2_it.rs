#![cfg(feature = "reqwest")]

// std
use std::sync::Arc;
// crates.io
use httpmock::prelude::*;
// self
use oauth_handshake::{
	auth::{Credentials, OAuth2Token, ProviderKey, TokenLifetime, TokenSecret},
	error::Error,
	flows::OAuth2Flow,
	http::{HttpMethod, ReqwestHttpClient},
	provider::{AuthorizationMethod, ProviderConfig, ResponseFormat},
	store::{MemoryStore, TokenStore},
	url::Url,
};

fn build_config(server: &MockServer, format: ResponseFormat) -> ProviderConfig {
	let key = ProviderKey::new("mock-oauth2")
		.expect("Provider key should be valid for the OAuth2 test.");
	let parse = |path: &str| {
		Url::parse(&server.url(path)).expect("Mock endpoint URL should parse successfully.")
	};

	ProviderConfig::builder(key)
		.authorization_endpoint(parse("/oauth2/authorize"))
		.access_token_endpoint(parse("/oauth2/token"))
		.authorization_method(AuthorizationMethod::HeaderBearer)
		.response_format(format)
		.build()
		.expect("Provider configuration should build successfully.")
}

fn build_flow(
	server: &MockServer,
	format: ResponseFormat,
) -> (OAuth2Flow, Arc<MemoryStore>) {
	let store_backend = Arc::new(MemoryStore::default());
	let store: Arc<dyn TokenStore> = store_backend.clone();
	let credentials = Credentials::new(
		"client-it",
		"secret-it",
		Url::parse("https://app.example.com/callback")
			.expect("Callback URI should parse successfully."),
	);
	let flow = OAuth2Flow::new(
		credentials,
		build_config(server, format),
		Arc::new(ReqwestHttpClient::default()),
		store,
	);

	(flow, store_backend)
}

#[test]
fn code_exchange_and_bearer_request_end_to_end() {
	let server = MockServer::start();
	let (flow, store) = build_flow(&server, ResponseFormat::Json);
	let flow = flow.with_scopes(["r_basicprofile"]);
	let authorize_url = flow
		.authorization_url(Some("state-it"), &[])
		.expect("Authorization URL should build successfully.");
	let pairs: Vec<(String, String)> = authorize_url.query_pairs().into_owned().collect();

	assert!(pairs.iter().any(|(key, value)| key == "response_type" && value == "code"));
	assert!(pairs.iter().any(|(key, value)| key == "client_id" && value == "client-it"));
	assert!(pairs.iter().any(|(key, value)| key == "scope" && value == "r_basicprofile"));
	assert!(pairs.iter().any(|(key, value)| key == "state" && value == "state-it"));

	let token_mock = server.mock(|when, then| {
		when.method(POST)
			.path("/oauth2/token")
			.header("content-type", "application/x-www-form-urlencoded");
		then.status(200).header("content-type", "application/json").body(
			"{\"access_token\":\"access-success\",\"refresh_token\":\"refresh-success\",\"token_type\":\"bearer\",\"expires_in\":3600}",
		);
	});
	let token = flow
		.request_access_token("valid-code", Some("state-it"))
		.expect("Authorization code exchange should succeed.");

	token_mock.assert();

	assert_eq!(token.access_token.expose(), "access-success");
	assert_eq!(
		token.refresh_token.as_ref().map(TokenSecret::expose),
		Some("refresh-success")
	);
	assert!(matches!(token.lifetime, TokenLifetime::ExpiresAt(_)));

	let stored = store
		.fetch(&flow.config().key)
		.expect("Store fetch should succeed.")
		.expect("Token should be persisted after the exchange.");

	assert_eq!(
		stored.as_oauth2().map(|stored| stored.access_token.expose()),
		Some("access-success")
	);

	let api_mock = server.mock(|when, then| {
		when.method(GET)
			.path("/v2/me")
			.header("authorization", "Bearer access-success");
		then.status(200).header("content-type", "application/json").body("{\"id\":\"me\"}");
	});
	let body = flow
		.signed_request(
			HttpMethod::Get,
			Url::parse(&server.url("/v2/me")).expect("API URL should parse successfully."),
			&token,
			None,
			&[],
		)
		.expect("Bearer-decorated request should succeed.");

	api_mock.assert();

	assert_eq!(body, "{\"id\":\"me\"}");
}

#[test]
fn refresh_end_to_end_carries_the_old_refresh_secret_forward() {
	let server = MockServer::start();
	let (flow, store) = build_flow(&server, ResponseFormat::Json);
	let mock = server.mock(|when, then| {
		when.method(POST).path("/oauth2/token");
		then.status(200)
			.header("content-type", "application/json")
			.body("{\"access_token\":\"rotated\",\"expires_in\":1800}");
	});
	let current = OAuth2Token::new(
		"stale",
		TokenLifetime::Unknown,
		Some("long-lived-refresh".into()),
		Vec::new(),
	);
	let refreshed = flow.refresh_access_token(&current).expect("Refresh should succeed.");

	mock.assert();

	assert_eq!(refreshed.access_token.expose(), "rotated");
	assert_eq!(
		refreshed.refresh_token.as_ref().map(TokenSecret::expose),
		Some("long-lived-refresh")
	);

	let stored = store
		.fetch(&flow.config().key)
		.expect("Store fetch should succeed.")
		.expect("Refreshed token should be persisted.");

	assert_eq!(stored.as_oauth2().map(|token| token.access_token.expose()), Some("rotated"));
}

#[test]
fn provider_error_payloads_fail_the_exchange() {
	let server = MockServer::start();
	let (flow, store) = build_flow(&server, ResponseFormat::FormEncoded);
	let mock = server.mock(|when, then| {
		when.method(POST).path("/oauth2/token");
		then.status(400).body("error=some_error");
	});
	let err = flow
		.request_access_token("stale-code", None)
		.expect_err("Provider-reported errors should fail the exchange.");

	mock.assert();

	assert!(matches!(err, Error::TokenRequest(_)));
	assert!(
		!store.has(&flow.config().key).expect("Store check should succeed."),
		"Store must not retain tokens when the exchange fails."
	);
}

#[test]
fn non_numeric_expires_in_produces_an_unknown_lifetime() {
	let server = MockServer::start();
	let (flow, _) = build_flow(&server, ResponseFormat::Json);
	let mock = server.mock(|when, then| {
		when.method(POST).path("/oauth2/token");
		then.status(200)
			.header("content-type", "application/json")
			.body("{\"access_token\":\"foo\",\"expires_in\":\"bar\"}");
	});
	let token = flow
		.request_access_token("valid-code", None)
		.expect("Exchange should tolerate non-numeric expires_in values.");

	mock.assert();

	assert_eq!(token.access_token.expose(), "foo");
	assert_eq!(token.lifetime, TokenLifetime::Unknown);
}
