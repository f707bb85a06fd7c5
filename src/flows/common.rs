//! Shared helpers for flow implementations: pure token-response parsers,
//! protocol parameter generation, and form encoding.
//!
//! The parsers are directly callable functions rather than private methods so
//! provider hooks and tests exercise exactly the code the flows run.

// crates.io
use rand::{Rng, distr::Alphanumeric};
use serde_json::Value;
// self
use crate::{
	_prelude::*,
	auth::{OAuth1Token, OAuth2Token, TokenLifetime},
	error::TokenRequestError,
	provider::ResponseFormat,
};

const NONCE_LEN: usize = 32;

/// Decodes a form-encoded response body into ordered key/value pairs.
///
/// Fails with [`TokenRequestError::EmptyResponse`] for empty bodies and
/// [`TokenRequestError::Malformed`] for bodies that contain no `key=value`
/// structure at all.
pub fn parse_form_pairs(raw: &str) -> Result<Vec<(String, String)>, TokenRequestError> {
	if raw.is_empty() {
		return Err(TokenRequestError::EmptyResponse);
	}
	if !raw.contains('=') {
		return Err(TokenRequestError::malformed(raw));
	}

	Ok(url::form_urlencoded::parse(raw.as_bytes())
		.map(|(key, value)| (key.into_owned(), value.into_owned()))
		.collect())
}

/// Parses an OAuth1 access-token response body.
pub fn parse_oauth1_access_token(raw: &str) -> Result<OAuth1Token, TokenRequestError> {
	let pairs = parse_form_pairs(raw)?;

	if let Some((_, error)) = pairs.iter().find(|(key, _)| key == "error") {
		return Err(TokenRequestError::ProviderRejection {
			error: error.clone(),
			description: None,
		});
	}

	let token = lookup(&pairs, "oauth_token")
		.ok_or(TokenRequestError::MissingField { field: "oauth_token" })?;
	let secret = lookup(&pairs, "oauth_token_secret")
		.ok_or(TokenRequestError::MissingField { field: "oauth_token_secret" })?;
	let extra = pairs
		.iter()
		.filter(|(key, _)| key != "oauth_token" && key != "oauth_token_secret")
		.cloned()
		.collect();

	Ok(OAuth1Token::new(token, secret, extra))
}

/// Parses an OAuth1 request-token response body.
///
/// When `require_confirmation` is set (the protocol default) the body must
/// carry `oauth_callback_confirmed=true`; anything else fails before token
/// fields are even considered.
pub fn parse_oauth1_request_token(
	raw: &str,
	require_confirmation: bool,
) -> Result<OAuth1Token, TokenRequestError> {
	if require_confirmation {
		let pairs = parse_form_pairs(raw)?;
		let confirmed = lookup(&pairs, "oauth_callback_confirmed");

		if confirmed.as_deref() != Some("true") {
			return Err(TokenRequestError::CallbackNotConfirmed);
		}
	}

	let token = parse_oauth1_access_token(raw)?;
	let request_token = token.access_token.expose().to_owned();
	let request_token_secret = token.access_token_secret.expose().to_owned();

	Ok(token.with_request_token(request_token, request_token_secret))
}

/// Parses an OAuth2 token endpoint response using the current UTC clock for
/// lifetime computation.
pub fn parse_oauth2_token(
	raw: &str,
	format: ResponseFormat,
) -> Result<OAuth2Token, TokenRequestError> {
	parse_oauth2_token_at(raw, format, OffsetDateTime::now_utc())
}

/// Parses an OAuth2 token endpoint response against an explicit clock instant.
///
/// Lifetime semantics: no `expires_in` → the token never expires; a numeric
/// `expires_in` → expiry at `now + seconds`; a non-numeric `expires_in` →
/// unknown lifetime.
pub fn parse_oauth2_token_at(
	raw: &str,
	format: ResponseFormat,
	now: OffsetDateTime,
) -> Result<OAuth2Token, TokenRequestError> {
	if raw.is_empty() {
		return Err(TokenRequestError::EmptyResponse);
	}

	let pairs = match format {
		ResponseFormat::Json => parse_json_pairs(raw)?,
		ResponseFormat::FormEncoded => parse_form_pairs(raw)?,
	};

	if let Some(error) = lookup(&pairs, "error") {
		return Err(TokenRequestError::ProviderRejection {
			error,
			description: lookup(&pairs, "error_description"),
		});
	}
	if let Some(description) = lookup(&pairs, "error_description") {
		return Err(TokenRequestError::ProviderRejection { error: description, description: None });
	}

	let access_token = lookup(&pairs, "access_token")
		.ok_or(TokenRequestError::MissingField { field: "access_token" })?;
	let lifetime = match lookup(&pairs, "expires_in") {
		None => TokenLifetime::NeverExpires,
		Some(value) => match value.parse::<i64>() {
			Ok(seconds) => TokenLifetime::ExpiresAt(now + Duration::seconds(seconds)),
			Err(_) => TokenLifetime::Unknown,
		},
	};
	let refresh_token = lookup(&pairs, "refresh_token");
	let extra = pairs
		.iter()
		.filter(|(key, _)| {
			key != "access_token" && key != "expires_in" && key != "refresh_token"
		})
		.cloned()
		.collect();

	Ok(OAuth2Token::new(access_token, lifetime, refresh_token, extra))
}

fn parse_json_pairs(raw: &str) -> Result<Vec<(String, String)>, TokenRequestError> {
	let de = &mut serde_json::Deserializer::from_str(raw);
	let object: serde_json::Map<String, Value> = serde_path_to_error::deserialize(de)
		.map_err(|source| TokenRequestError::Json { source })?;

	Ok(object.into_iter().map(|(key, value)| (key, stringify(value))).collect())
}

fn stringify(value: Value) -> String {
	match value {
		Value::String(inner) => inner,
		other => other.to_string(),
	}
}

fn lookup(pairs: &[(String, String)], name: &str) -> Option<String> {
	pairs.iter().find(|(key, _)| key == name).map(|(_, value)| value.clone())
}

/// Joins scopes with the provider's delimiter when building authorization URLs.
pub(crate) fn format_scopes(scopes: &[String], delimiter: char) -> Option<String> {
	if scopes.is_empty() {
		return None;
	}

	let mut buf = String::new();

	for (idx, value) in scopes.iter().enumerate() {
		if idx > 0 {
			buf.push(delimiter);
		}

		buf.push_str(value);
	}

	Some(buf)
}

/// Fresh cryptographically random nonce, unique per signing call.
pub(crate) fn nonce() -> String {
	rand::rng().sample_iter(Alphanumeric).take(NONCE_LEN).map(char::from).collect()
}

/// Current UNIX timestamp as the protocol's decimal string.
pub(crate) fn timestamp() -> String {
	OffsetDateTime::now_utc().unix_timestamp().to_string()
}

/// Serializes pairs into an `application/x-www-form-urlencoded` body.
pub(crate) fn form_encode(pairs: &[(String, String)]) -> String {
	url::form_urlencoded::Serializer::new(String::new()).extend_pairs(pairs).finish()
}
