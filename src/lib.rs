//! Provider-agnostic OAuth 1.0a/2.0 handshake engine: request signing, token exchange flows,
//! and pluggable transport/storage collaborators.

#![deny(clippy::all, missing_docs, unused_crate_dependencies)]

pub mod auth;
pub mod error;
pub mod flows;
pub mod http;
pub mod obs;
pub mod provider;
pub mod signature;
pub mod store;
#[cfg(all(any(test, feature = "test"), feature = "reqwest"))]
pub mod _preludet {
	//! Convenience re-exports and helpers for integration tests; enabled via `cfg(test)` or the
	//! `test` crate feature.

	pub use crate::_prelude::*;

	// self
	use crate::{
		auth::{Credentials, ProviderKey},
		flows::{OAuth1Flow, OAuth2Flow},
		http::ReqwestHttpClient,
		provider::{AuthorizationMethod, ProviderConfig, ResponseFormat},
		signature::{SignatureMethod, Signer},
		store::{MemoryStore, TokenStore},
	};

	/// Consumer credentials shared by the integration-test fixtures.
	pub fn test_credentials() -> Credentials {
		Credentials::new(
			"consumer-it",
			"secret-it",
			Url::parse("https://app.example.com/callback")
				.expect("Callback fixture URL should parse successfully."),
		)
	}

	/// Builds a provider configuration pointing every endpoint at a mock server base URL.
	pub fn test_provider_config(base: &str, format: ResponseFormat) -> ProviderConfig {
		let key = ProviderKey::new("mock-provider")
			.expect("Provider key fixture should be considered valid.");
		let parse =
			|path: &str| Url::parse(&format!("{base}{path}")).expect("Mock endpoint URL should parse.");

		ProviderConfig::builder(key)
			.request_token_endpoint(parse("/request_token"))
			.authorization_endpoint(parse("/authorize"))
			.access_token_endpoint(parse("/access_token"))
			.authorization_method(AuthorizationMethod::HeaderBearer)
			.response_format(format)
			.build()
			.expect("Provider configuration fixture should build successfully.")
	}

	/// Constructs an [`OAuth1Flow`] backed by an in-memory store and the crate's reqwest
	/// transport, returning the store handle for assertions.
	pub fn build_oauth1_test_flow(config: ProviderConfig) -> (OAuth1Flow, Arc<MemoryStore>) {
		let store_backend = Arc::new(MemoryStore::default());
		let store: Arc<dyn TokenStore> = store_backend.clone();
		let flow = OAuth1Flow::new(
			test_credentials(),
			config,
			Arc::new(ReqwestHttpClient::default()),
			store,
			Signer::new(SignatureMethod::HmacSha1),
		);

		(flow, store_backend)
	}

	/// Constructs an [`OAuth2Flow`] backed by an in-memory store and the crate's reqwest
	/// transport, returning the store handle for assertions.
	pub fn build_oauth2_test_flow(config: ProviderConfig) -> (OAuth2Flow, Arc<MemoryStore>) {
		let store_backend = Arc::new(MemoryStore::default());
		let store: Arc<dyn TokenStore> = store_backend.clone();
		let flow = OAuth2Flow::new(
			test_credentials(),
			config,
			Arc::new(ReqwestHttpClient::default()),
			store,
		);

		(flow, store_backend)
	}
}

mod _prelude {
	pub use std::{
		collections::{BTreeMap, HashMap},
		error::Error as StdError,
		fmt::{Debug, Display, Formatter, Result as FmtResult},
		str::FromStr,
		sync::Arc,
	};

	pub use parking_lot::RwLock;
	#[cfg(feature = "reqwest")]
	pub use reqwest::blocking::Client as ReqwestClient;
	pub use serde::{Deserialize, Serialize};
	pub use thiserror::Error as ThisError;
	pub use time::{Duration, OffsetDateTime};
	pub use url::Url;

	pub use crate::error::{Error, Result};
}

#[cfg(feature = "reqwest")] pub use reqwest;
pub use url;
#[cfg(test)] use httpmock as _;
