//! Engine-level error types shared across flows, signing, providers, and stores.

// self
use crate::_prelude::*;

/// Engine-wide result type alias returning [`Error`] by default.
pub type Result<T, E = Error> = std::result::Result<T, E>;

type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Canonical engine error exposed by public APIs.
///
/// Every flow operation either returns a fully populated token or exactly one of
/// these kinds; nothing is retried internally and no partial state is persisted
/// on failure.
#[derive(Debug, ThisError)]
pub enum Error {
	/// Token endpoint returned a malformed, empty, or provider-rejected response.
	#[error(transparent)]
	TokenRequest(#[from] TokenRequestError),
	/// Signature could not be produced for the selected method.
	#[error(transparent)]
	Signing(#[from] SigningError),
	/// Access token lifetime elapsed at use time.
	#[error(transparent)]
	Expired(#[from] ExpiredTokenError),
	/// Provider configuration is missing or invalid.
	#[error(transparent)]
	Config(#[from] ConfigurationError),
	/// Opaque transport failure surfaced from the HTTP collaborator.
	#[error(transparent)]
	Transport(#[from] TransportError),
	/// Storage-layer failure.
	#[error("{0}")]
	Storage(
		#[from]
		#[source]
		crate::store::StoreError,
	),
}

/// Failures raised while parsing or validating token endpoint responses.
#[derive(Debug, ThisError)]
pub enum TokenRequestError {
	/// Transport produced no body at all.
	#[error("Token endpoint returned an empty response.")]
	EmptyResponse,
	/// Body could not be interpreted as form-encoded key/value pairs.
	#[error("Token endpoint response is not form-encoded: {preview}.")]
	Malformed {
		/// Truncated copy of the offending body.
		preview: String,
	},
	/// Body could not be decoded as JSON.
	#[error("Token endpoint returned malformed JSON.")]
	Json {
		/// Structured parsing failure.
		#[source]
		source: serde_path_to_error::Error<serde_json::Error>,
	},
	/// Provider reported an error instead of issuing a token.
	#[error("Token endpoint rejected the request: {error}.")]
	ProviderRejection {
		/// Provider-supplied `error` (or `error_description`) value.
		error: String,
		/// Provider-supplied `error_description`, when both fields are present.
		description: Option<String>,
	},
	/// OAuth1 request-token response did not confirm the callback.
	#[error("Request token endpoint did not confirm the callback.")]
	CallbackNotConfirmed,
	/// Response omitted a field the protocol requires.
	#[error("Token endpoint response is missing the `{field}` field.")]
	MissingField {
		/// Name of the absent field.
		field: &'static str,
	},
	/// Returned authorization state did not match the stored value.
	#[error("Authorization state mismatch.")]
	StateMismatch,
}
impl TokenRequestError {
	const PREVIEW_LIMIT: usize = 256;

	/// Builds a [`Malformed`](Self::Malformed) error with a bounded body preview.
	pub fn malformed(body: &str) -> Self {
		Self::Malformed { preview: body.chars().take(Self::PREVIEW_LIMIT).collect() }
	}
}

/// Failures producing a signature for the selected [`SignatureMethod`].
///
/// [`SignatureMethod`]: crate::signature::SignatureMethod
#[derive(Debug, ThisError)]
pub enum SigningError {
	/// RSA-SHA1 was selected but no key material is present.
	#[error("No private key material is available for RSA-SHA1 signing.")]
	MissingKeyMaterial,
	/// Supplied key material could not be parsed or used.
	#[error("Private key material is invalid.")]
	InvalidKeyMaterial {
		/// Underlying key parsing or signing failure.
		#[source]
		source: BoxError,
	},
}
impl SigningError {
	/// Wraps a key parsing or signing failure.
	pub fn invalid_key_material(src: impl 'static + Send + Sync + StdError) -> Self {
		Self::InvalidKeyMaterial { source: Box::new(src) }
	}
}

/// Raised when an access token's lifetime has elapsed at use time.
///
/// Refreshing is the caller's explicit responsibility; the engine never
/// refreshes implicitly.
#[derive(Clone, Copy, Debug, ThisError)]
#[error("Access token expired at {expired_at}.")]
pub struct ExpiredTokenError {
	/// Instant the token stopped being valid.
	pub expired_at: OffsetDateTime,
}

/// Configuration and validation failures raised by provider adapters and flows.
#[derive(Clone, Debug, PartialEq, Eq, ThisError)]
pub enum ConfigurationError {
	/// Authorization endpoint is mandatory for both flows.
	#[error("Missing authorization endpoint.")]
	MissingAuthorizationEndpoint,
	/// Access-token endpoint is mandatory for both flows.
	#[error("Missing access token endpoint.")]
	MissingAccessTokenEndpoint,
	/// OAuth1 operations need a request-token endpoint.
	#[error("Provider `{provider}` does not declare a request token endpoint.")]
	MissingRequestTokenEndpoint {
		/// Provider identifier string.
		provider: String,
	},
	/// Runtime authorization-endpoint selection named an unregistered alternate.
	#[error("Unknown authorization endpoint `{name}`.")]
	UnknownAuthorizationEndpoint {
		/// Rejected endpoint name.
		name: String,
	},
	/// Scope delimiters must be printable.
	#[error("Scope delimiter must be a printable character.")]
	InvalidScopeDelimiter {
		/// Invalid delimiter that was supplied.
		delimiter: char,
	},
	/// Refresh was requested for a token that carries no refresh secret.
	#[error("Token is missing a refresh token.")]
	MissingRefreshToken,
}

/// Transport-level failures (network, IO) from the HTTP collaborator.
#[derive(Debug, ThisError)]
pub enum TransportError {
	/// Underlying HTTP client reported a network failure.
	#[error("Network error occurred while calling the provider.")]
	Network {
		/// Transport-specific network error.
		#[source]
		source: BoxError,
	},
	/// Underlying IO failure surfaced during transport.
	#[error("I/O error occurred while calling the provider.")]
	Io(#[from] std::io::Error),
}
impl TransportError {
	/// Wraps a transport-specific network error.
	pub fn network(src: impl 'static + Send + Sync + StdError) -> Self {
		Self::Network { source: Box::new(src) }
	}
}
