//! Provider capability hooks that customize response parsing and
//! authorization-request decoration.
//!
//! The default implementations cover standards-following providers; adapters
//! override only the hook their provider deviates on, keeping the "mostly
//! shared, occasionally overridden" shape without an inheritance hierarchy.

// self
use crate::{
	auth::{OAuth1Token, OAuth2Token},
	error::TokenRequestError,
	flows::common,
	provider::ResponseFormat,
};

/// Hook points a provider adapter may override.
///
/// The hooks intentionally use crate-owned data types so implementations never
/// depend on any particular HTTP client.
pub trait ProviderHooks: Send + Sync {
	/// Parses an OAuth1 token endpoint response body.
	///
	/// The default accepts standard `oauth_token`/`oauth_token_secret`
	/// form-encoded responses; override for providers that rename fields.
	fn parse_oauth1_token_response(&self, raw: &str) -> Result<OAuth1Token, TokenRequestError> {
		common::parse_oauth1_access_token(raw)
	}

	/// Parses an OAuth2 token endpoint response body in the declared format.
	fn parse_oauth2_token_response(
		&self,
		raw: &str,
		format: ResponseFormat,
	) -> Result<OAuth2Token, TokenRequestError> {
		common::parse_oauth2_token(raw, format)
	}

	/// Gives providers a chance to add authorization-URL query parameters.
	///
	/// The default implementation does nothing, which is enough for most
	/// providers. Override when a provider requires extra fields (display
	/// hints, forced re-approval, etc.).
	fn augment_authorization_params(&self, _params: &mut Vec<(String, String)>) {}
}

/// Default hook set for standards-following providers.
#[derive(Clone, Copy, Debug, Default)]
pub struct DefaultProviderHooks;
impl ProviderHooks for DefaultProviderHooks {}

#[cfg(test)]
mod tests {
	// self
	use super::*;
	use crate::auth::TokenLifetime;

	struct RenamingHooks;
	impl ProviderHooks for RenamingHooks {
		fn parse_oauth2_token_response(
			&self,
			raw: &str,
			_format: ResponseFormat,
		) -> Result<OAuth2Token, TokenRequestError> {
			// Stand-in for a provider that returns a bare token string.
			Ok(OAuth2Token::new(raw.trim(), TokenLifetime::NeverExpires, None, Vec::new()))
		}
	}

	#[test]
	fn default_hooks_delegate_to_the_shared_parsers() {
		let hooks = DefaultProviderHooks;
		let token = hooks
			.parse_oauth1_token_response("oauth_token=foo&oauth_token_secret=bar")
			.expect("Default OAuth1 parser should accept a standard response.");

		assert_eq!(token.access_token.expose(), "foo");

		let token = hooks
			.parse_oauth2_token_response("{\"access_token\":\"foo\"}", ResponseFormat::Json)
			.expect("Default OAuth2 parser should accept a standard response.");

		assert_eq!(token.access_token.expose(), "foo");
	}

	#[test]
	fn overridden_hooks_replace_only_their_own_behavior() {
		let hooks = RenamingHooks;
		let token = hooks
			.parse_oauth2_token_response("raw-token-value", ResponseFormat::Json)
			.expect("Overridden parser should accept the quirky body.");

		assert_eq!(token.access_token.expose(), "raw-token-value");

		// The untouched OAuth1 hook still runs the shared parser.
		assert!(hooks.parse_oauth1_token_response("hoho").is_err());
	}
}
