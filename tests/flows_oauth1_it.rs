#![cfg(feature = "reqwest")]

// std
use std::sync::Arc;
// crates.io
use httpmock::prelude::*;
// self
use oauth_handshake::{
	auth::{Credentials, ProviderKey, TokenSecret},
	error::Error,
	flows::OAuth1Flow,
	http::{HttpMethod, ReqwestHttpClient},
	provider::ProviderConfig,
	signature::{SignatureMethod, Signer},
	store::{MemoryStore, TokenStore},
	url::Url,
};

fn build_config(server: &MockServer) -> ProviderConfig {
	let key = ProviderKey::new("mock-oauth1")
		.expect("Provider key should be valid for the OAuth1 test.");
	let parse = |path: &str| {
		Url::parse(&server.url(path)).expect("Mock endpoint URL should parse successfully.")
	};

	ProviderConfig::builder(key)
		.request_token_endpoint(parse("/oauth/request_token"))
		.authorization_endpoint(parse("/oauth/authorize"))
		.access_token_endpoint(parse("/oauth/access_token"))
		.build()
		.expect("Provider configuration should build successfully.")
}

fn build_flow(server: &MockServer) -> (OAuth1Flow, Arc<MemoryStore>) {
	let store_backend = Arc::new(MemoryStore::default());
	let store: Arc<dyn TokenStore> = store_backend.clone();
	let credentials = Credentials::new(
		"consumer-it",
		"secret-it",
		Url::parse("https://app.example.com/callback")
			.expect("Callback URI should parse successfully."),
	);
	let flow = OAuth1Flow::new(
		credentials,
		build_config(server),
		Arc::new(ReqwestHttpClient::default()),
		store,
		Signer::new(SignatureMethod::HmacSha1),
	);

	(flow, store_backend)
}

#[test]
fn three_legged_handshake_end_to_end() {
	let server = MockServer::start();
	let (flow, store) = build_flow(&server);
	let request_token_mock = server.mock(|when, then| {
		when.method(POST).path("/oauth/request_token");
		then.status(200)
			.header("content-type", "application/x-www-form-urlencoded")
			.body("oauth_callback_confirmed=true&oauth_token=req-it&oauth_token_secret=req-secret-it");
	});
	let request_token =
		flow.request_request_token().expect("Request-token leg should succeed.");

	request_token_mock.assert();

	assert_eq!(request_token.request_token.as_deref(), Some("req-it"));
	assert_eq!(
		request_token.request_token_secret.as_ref().map(TokenSecret::expose),
		Some("req-secret-it")
	);

	let authorize_url = flow.authorization_url("req-it");

	assert!(authorize_url.as_str().starts_with(&server.url("/oauth/authorize")));
	assert!(authorize_url.query_pairs().any(|(key, value)| key == "oauth_token" && value == "req-it"));

	let access_token_mock = server.mock(|when, then| {
		when.method(POST).path("/oauth/access_token");
		then.status(200)
			.header("content-type", "application/x-www-form-urlencoded")
			.body("oauth_token=acc-it&oauth_token_secret=acc-secret-it&screen_name=tester");
	});
	let access_token = flow
		.request_access_token("req-it", "verifier-it", None)
		.expect("Access-token leg should recover the stored request-token secret.");

	access_token_mock.assert();

	assert_eq!(access_token.access_token.expose(), "acc-it");
	assert_eq!(access_token.access_token_secret.expose(), "acc-secret-it");
	assert_eq!(access_token.extra, vec![("screen_name".to_owned(), "tester".to_owned())]);

	let stored = store
		.fetch(&flow.config().key)
		.expect("Store fetch should succeed.")
		.expect("Access token should be persisted after the exchange.");

	assert_eq!(stored.as_oauth1().map(|token| token.access_token.expose()), Some("acc-it"));

	let api_mock = server.mock(|when, then| {
		when.method(GET).path("/1.1/account/verify_credentials.json");
		then.status(200).header("content-type", "application/json").body("{\"id\":42}");
	});
	let body = flow
		.signed_request(
			HttpMethod::Get,
			Url::parse(&server.url("/1.1/account/verify_credentials.json"))
				.expect("API URL should parse successfully."),
			&access_token,
			None,
			&[],
		)
		.expect("Signed API request should succeed.");

	api_mock.assert();

	assert_eq!(body, "{\"id\":42}");
}

#[test]
fn provider_error_bodies_fail_the_access_token_leg() {
	let server = MockServer::start();
	let (flow, store) = build_flow(&server);
	let mock = server.mock(|when, then| {
		when.method(POST).path("/oauth/access_token");
		then.status(200).body("error=bar");
	});
	let err = flow
		.request_access_token("req-it", "verifier-it", Some("req-secret-it"))
		.expect_err("Provider-reported errors should fail the exchange.");

	mock.assert();

	assert!(matches!(err, Error::TokenRequest(_)));
	assert!(
		!store.has(&flow.config().key).expect("Store check should succeed."),
		"Store must not retain tokens when the exchange fails."
	);
}

#[test]
fn unconfirmed_callbacks_fail_the_request_token_leg() {
	let server = MockServer::start();
	let (flow, _) = build_flow(&server);
	let mock = server.mock(|when, then| {
		when.method(POST).path("/oauth/request_token");
		then.status(200).body("oauth_callback_confirmed=false");
	});
	let err = flow
		.request_request_token()
		.expect_err("Unconfirmed callbacks should fail the request-token leg.");

	mock.assert();

	assert!(matches!(err, Error::TokenRequest(_)));
}
