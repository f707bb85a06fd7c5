//! Immutable token value objects with expiry semantics.
//!
//! Tokens are never mutated after construction; refreshing an OAuth2 token
//! produces a new [`OAuth2Token`] instance. The store collaborator, not the
//! flow, owns the canonical "current" token per provider.

// self
use crate::_prelude::*;

/// Redacted token secret wrapper keeping sensitive material out of logs.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenSecret(String);
impl TokenSecret {
	/// Wraps a new secret string.
	pub fn new(value: impl Into<String>) -> Self {
		Self(value.into())
	}

	/// Returns the inner token value. Callers must avoid logging this string.
	pub fn expose(&self) -> &str {
		&self.0
	}
}
impl AsRef<str> for TokenSecret {
	fn as_ref(&self) -> &str {
		self.expose()
	}
}
impl Debug for TokenSecret {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_tuple("TokenSecret").field(&"<redacted>").finish()
	}
}
impl Display for TokenSecret {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str("<redacted>")
	}
}

/// Expiry semantics attached to an OAuth2 access token.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum TokenLifetime {
	/// Provider issued no `expires_in`; the token does not expire.
	NeverExpires,
	/// Token is valid until the contained instant.
	ExpiresAt(OffsetDateTime),
	/// Provider sent a non-numeric `expires_in`; the lifetime is unknowable.
	Unknown,
}
impl TokenLifetime {
	/// Returns the expiry instant for tokens that carry one.
	pub fn expires_at(&self) -> Option<OffsetDateTime> {
		match self {
			TokenLifetime::ExpiresAt(instant) => Some(*instant),
			_ => None,
		}
	}

	/// Returns `true` when the lifetime has elapsed at the provided instant.
	///
	/// `NeverExpires` and `Unknown` lifetimes never report as elapsed; callers
	/// that need stricter handling of unknown lifetimes must refresh eagerly.
	pub fn is_expired_at(&self, instant: OffsetDateTime) -> bool {
		matches!(self, TokenLifetime::ExpiresAt(expiry) if instant >= *expiry)
	}

	/// Convenience helper that checks expiry against the current UTC instant.
	pub fn is_expired(&self) -> bool {
		self.is_expired_at(OffsetDateTime::now_utc())
	}
}

/// Token issued by an OAuth 1.0a provider.
///
/// During the three-legged handshake the same shape carries the intermediate
/// request token (with `request_token`/`request_token_secret` populated); the
/// request token is discarded once the final access token is issued.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OAuth1Token {
	/// Access token value (`oauth_token`).
	pub access_token: TokenSecret,
	/// Access token secret (`oauth_token_secret`) used for request signing.
	pub access_token_secret: TokenSecret,
	/// Request token from the first handshake leg, if this is one.
	pub request_token: Option<String>,
	/// Request token secret matching [`request_token`](Self::request_token).
	pub request_token_secret: Option<TokenSecret>,
	/// Additional provider-supplied response parameters, in response order.
	pub extra: Vec<(String, String)>,
}
impl OAuth1Token {
	/// Creates an access token with no request-token leg attached.
	pub fn new(
		access_token: impl Into<String>,
		access_token_secret: impl Into<String>,
		extra: Vec<(String, String)>,
	) -> Self {
		Self {
			access_token: TokenSecret::new(access_token),
			access_token_secret: TokenSecret::new(access_token_secret),
			request_token: None,
			request_token_secret: None,
			extra,
		}
	}

	/// Attaches the request-token pair obtained from the first handshake leg.
	pub fn with_request_token(
		mut self,
		request_token: impl Into<String>,
		request_token_secret: impl Into<String>,
	) -> Self {
		self.request_token = Some(request_token.into());
		self.request_token_secret = Some(TokenSecret::new(request_token_secret));

		self
	}
}
impl Debug for OAuth1Token {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("OAuth1Token")
			.field("access_token", &"<redacted>")
			.field("access_token_secret", &"<redacted>")
			.field("request_token", &self.request_token)
			.field("request_token_secret", &self.request_token_secret.as_ref().map(|_| "<redacted>"))
			.field("extra", &self.extra)
			.finish()
	}
}

/// Token issued by an OAuth 2.0 provider.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OAuth2Token {
	/// Bearer access token value.
	pub access_token: TokenSecret,
	/// Expiry semantics derived from the provider's `expires_in`.
	pub lifetime: TokenLifetime,
	/// Refresh token, if the provider issued one.
	pub refresh_token: Option<TokenSecret>,
	/// Additional provider-supplied response parameters, in response order.
	pub extra: Vec<(String, String)>,
}
impl OAuth2Token {
	/// Creates a new access token.
	pub fn new(
		access_token: impl Into<String>,
		lifetime: TokenLifetime,
		refresh_token: Option<String>,
		extra: Vec<(String, String)>,
	) -> Self {
		Self {
			access_token: TokenSecret::new(access_token),
			lifetime,
			refresh_token: refresh_token.map(TokenSecret::new),
			extra,
		}
	}

	/// Returns `true` when the token's lifetime has elapsed at the provided instant.
	pub fn is_expired_at(&self, instant: OffsetDateTime) -> bool {
		self.lifetime.is_expired_at(instant)
	}

	/// Convenience helper that checks expiry against the current UTC instant.
	pub fn is_expired(&self) -> bool {
		self.lifetime.is_expired()
	}
}
impl Debug for OAuth2Token {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("OAuth2Token")
			.field("access_token", &"<redacted>")
			.field("lifetime", &self.lifetime)
			.field("refresh_token", &self.refresh_token.as_ref().map(|_| "<redacted>"))
			.field("extra", &self.extra)
			.finish()
	}
}

/// Protocol-agnostic token container persisted by [`TokenStore`] backends.
///
/// [`TokenStore`]: crate::store::TokenStore
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Token {
	/// OAuth 1.0a token pair.
	OAuth1(OAuth1Token),
	/// OAuth 2.0 bearer token.
	OAuth2(OAuth2Token),
}
impl Token {
	/// Returns the OAuth1 token, if this is one.
	pub fn as_oauth1(&self) -> Option<&OAuth1Token> {
		match self {
			Token::OAuth1(token) => Some(token),
			Token::OAuth2(_) => None,
		}
	}

	/// Returns the OAuth2 token, if this is one.
	pub fn as_oauth2(&self) -> Option<&OAuth2Token> {
		match self {
			Token::OAuth1(_) => None,
			Token::OAuth2(token) => Some(token),
		}
	}
}
impl From<OAuth1Token> for Token {
	fn from(token: OAuth1Token) -> Self {
		Token::OAuth1(token)
	}
}
impl From<OAuth2Token> for Token {
	fn from(token: OAuth2Token) -> Self {
		Token::OAuth2(token)
	}
}

#[cfg(test)]
mod tests {
	// crates.io
	use time::macros;
	// self
	use super::*;

	#[test]
	fn secret_formatters_redact() {
		let secret = TokenSecret::new("super-secret");

		assert_eq!(format!("{secret:?}"), "TokenSecret(\"<redacted>\")");
		assert_eq!(format!("{secret}"), "<redacted>");
	}

	#[test]
	fn lifetime_expiry_covers_all_variants() {
		let expiry = macros::datetime!(2025-06-01 12:00 UTC);
		let lifetime = TokenLifetime::ExpiresAt(expiry);

		assert!(!lifetime.is_expired_at(macros::datetime!(2025-06-01 11:59 UTC)));
		assert!(lifetime.is_expired_at(expiry));
		assert!(lifetime.is_expired_at(macros::datetime!(2025-06-01 12:01 UTC)));
		assert_eq!(lifetime.expires_at(), Some(expiry));

		assert!(!TokenLifetime::NeverExpires.is_expired_at(OffsetDateTime::now_utc()));
		assert!(!TokenLifetime::Unknown.is_expired_at(OffsetDateTime::now_utc()));
		assert_eq!(TokenLifetime::NeverExpires.expires_at(), None);
	}

	#[test]
	fn oauth1_token_carries_request_leg() {
		let token = OAuth1Token::new("foo", "bar", Vec::new()).with_request_token("foo", "bar");

		assert_eq!(token.access_token.expose(), "foo");
		assert_eq!(token.request_token.as_deref(), Some("foo"));
		assert_eq!(token.request_token_secret.as_ref().map(TokenSecret::expose), Some("bar"));
	}

	#[test]
	fn token_enum_serde_round_trips_field_for_field() {
		let token = Token::from(OAuth2Token::new(
			"access",
			TokenLifetime::ExpiresAt(macros::datetime!(2025-06-01 12:00 UTC)),
			Some("refresh".into()),
			vec![("token_type".into(), "bearer".into())],
		));
		let payload = serde_json::to_string(&token).expect("Token should serialize to JSON.");
		let round_trip: Token =
			serde_json::from_str(&payload).expect("Serialized token should deserialize.");

		assert_eq!(round_trip, token);
	}
}
