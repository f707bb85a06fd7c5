//! Immutable consumer credentials injected into flows at construction.

// self
use crate::{_prelude::*, auth::token::TokenSecret};

/// Consumer (client) credentials registered with a provider.
///
/// The struct is immutable and shared read-only between a flow and the
/// signature engine. For RSA-SHA1 providers the consumer-secret slot carries
/// the PEM-encoded private key material instead of a shared secret.
#[derive(Clone)]
pub struct Credentials {
	consumer_key: String,
	consumer_secret: TokenSecret,
	callback_uri: Url,
}
impl Credentials {
	/// Creates a new credential set.
	pub fn new(
		consumer_key: impl Into<String>,
		consumer_secret: impl Into<String>,
		callback_uri: Url,
	) -> Self {
		Self {
			consumer_key: consumer_key.into(),
			consumer_secret: TokenSecret::new(consumer_secret),
			callback_uri,
		}
	}

	/// Consumer key (OAuth1 `oauth_consumer_key`, OAuth2 `client_id`).
	pub fn consumer_key(&self) -> &str {
		&self.consumer_key
	}

	/// Consumer secret (OAuth2 `client_secret`); key material for RSA-SHA1.
	pub fn consumer_secret(&self) -> &str {
		self.consumer_secret.expose()
	}

	/// Redirect/callback URI registered with the provider.
	pub fn callback_uri(&self) -> &Url {
		&self.callback_uri
	}
}
impl Debug for Credentials {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("Credentials")
			.field("consumer_key", &self.consumer_key)
			.field("consumer_secret", &self.consumer_secret)
			.field("callback_uri", &self.callback_uri)
			.finish()
	}
}
