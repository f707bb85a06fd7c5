//! Provider configuration data structures and the validating builder.

// self
use crate::{_prelude::*, auth::ProviderKey, error::ConfigurationError};

/// Governs how a flow attaches an access token to outgoing requests.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AuthorizationMethod {
	#[default]
	/// `Authorization: Bearer <token>` header (OAuth2 default).
	HeaderBearer,
	/// `Authorization: OAuth ...` header (OAuth1, and OAuth2 providers that kept the older style).
	HeaderOauth,
	/// Token appended to the request URI as a query parameter.
	QueryString,
}

/// Wire format a provider uses for token endpoint responses.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResponseFormat {
	#[default]
	/// JSON object body.
	Json,
	/// `application/x-www-form-urlencoded` body.
	FormEncoded,
}

/// Endpoint set declared by a provider configuration.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProviderEndpoints {
	/// OAuth1 request-token endpoint; absent for OAuth2-only providers.
	pub request_token: Option<Url>,
	/// User authorization endpoint.
	pub authorization: Url,
	/// Access-token (and refresh) endpoint.
	pub access_token: Url,
}

/// Provider-specific quirks that influence how flows behave.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProviderQuirks {
	/// Character used to join scopes when constructing `scope` parameters.
	pub scope_delimiter: char,
	/// Whether OAuth1 request-token responses must carry a truthy
	/// `oauth_callback_confirmed` field.
	pub require_callback_confirmation: bool,
}
impl Default for ProviderQuirks {
	fn default() -> Self {
		Self { scope_delimiter: ' ', require_callback_confirmation: true }
	}
}

/// Immutable-by-convention provider configuration consumed by flows.
///
/// Endpoint values are owned per instance rather than process-wide constants,
/// so multiple differently configured clients for the same provider can
/// coexist in one process. The only sanctioned mutation is
/// [`select_authorization_endpoint`](Self::select_authorization_endpoint),
/// which swaps in a named alternate registered at build time.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProviderConfig {
	/// Provider identifier; partitions token storage.
	pub key: ProviderKey,
	/// Endpoint definitions exposed by the provider.
	pub endpoints: ProviderEndpoints,
	/// How access tokens decorate outgoing requests.
	pub authorization_method: AuthorizationMethod,
	/// Wire format of token endpoint responses.
	pub response_format: ResponseFormat,
	/// Provider-specific quirks.
	pub quirks: ProviderQuirks,
	alternate_authorization_endpoints: BTreeMap<String, Url>,
}
impl ProviderConfig {
	/// Creates a new builder for the provided key.
	pub fn builder(key: ProviderKey) -> ProviderConfigBuilder {
		ProviderConfigBuilder::new(key)
	}

	/// Swaps the active authorization endpoint for a registered alternate.
	///
	/// Some providers expose two equivalent user-facing endpoints (e.g. an
	/// "authorize" and an "authenticate" variant); the accepted names are the
	/// ones registered via
	/// [`alternate_authorization_endpoint`](ProviderConfigBuilder::alternate_authorization_endpoint).
	pub fn select_authorization_endpoint(&mut self, name: &str) -> Result<(), ConfigurationError> {
		match self.alternate_authorization_endpoints.get(name) {
			Some(url) => {
				self.endpoints.authorization = url.clone();

				Ok(())
			},
			None =>
				Err(ConfigurationError::UnknownAuthorizationEndpoint { name: name.to_owned() }),
		}
	}

	/// Names of the registered alternate authorization endpoints.
	pub fn authorization_endpoint_names(&self) -> impl Iterator<Item = &str> {
		self.alternate_authorization_endpoints.keys().map(String::as_str)
	}

	/// Returns the request-token endpoint or the configuration error OAuth1
	/// operations surface when it is absent.
	pub fn request_token_endpoint(&self) -> Result<&Url, ConfigurationError> {
		self.endpoints.request_token.as_ref().ok_or_else(|| {
			ConfigurationError::MissingRequestTokenEndpoint { provider: self.key.to_string() }
		})
	}
}

/// Builder for [`ProviderConfig`] values.
#[derive(Debug)]
pub struct ProviderConfigBuilder {
	key: ProviderKey,
	request_token_endpoint: Option<Url>,
	authorization_endpoint: Option<Url>,
	access_token_endpoint: Option<Url>,
	alternate_authorization_endpoints: BTreeMap<String, Url>,
	authorization_method: AuthorizationMethod,
	response_format: ResponseFormat,
	quirks: ProviderQuirks,
}
impl ProviderConfigBuilder {
	/// Creates a new builder seeded with the provided key.
	pub fn new(key: ProviderKey) -> Self {
		Self {
			key,
			request_token_endpoint: None,
			authorization_endpoint: None,
			access_token_endpoint: None,
			alternate_authorization_endpoints: BTreeMap::new(),
			authorization_method: AuthorizationMethod::default(),
			response_format: ResponseFormat::default(),
			quirks: ProviderQuirks::default(),
		}
	}

	/// Sets the OAuth1 request-token endpoint.
	pub fn request_token_endpoint(mut self, url: Url) -> Self {
		self.request_token_endpoint = Some(url);

		self
	}

	/// Sets the authorization endpoint.
	pub fn authorization_endpoint(mut self, url: Url) -> Self {
		self.authorization_endpoint = Some(url);

		self
	}

	/// Sets the access-token endpoint.
	pub fn access_token_endpoint(mut self, url: Url) -> Self {
		self.access_token_endpoint = Some(url);

		self
	}

	/// Registers a named alternate authorization endpoint selectable at runtime.
	pub fn alternate_authorization_endpoint(mut self, name: impl Into<String>, url: Url) -> Self {
		self.alternate_authorization_endpoints.insert(name.into(), url);

		self
	}

	/// Overrides how tokens decorate outgoing requests.
	pub fn authorization_method(mut self, method: AuthorizationMethod) -> Self {
		self.authorization_method = method;

		self
	}

	/// Overrides the token endpoint response format.
	pub fn response_format(mut self, format: ResponseFormat) -> Self {
		self.response_format = format;

		self
	}

	/// Overrides the provider quirks.
	pub fn quirks(mut self, quirks: ProviderQuirks) -> Self {
		self.quirks = quirks;

		self
	}

	/// Consumes the builder and validates the resulting configuration.
	pub fn build(self) -> Result<ProviderConfig, ConfigurationError> {
		let authorization = self
			.authorization_endpoint
			.ok_or(ConfigurationError::MissingAuthorizationEndpoint)?;
		let access_token =
			self.access_token_endpoint.ok_or(ConfigurationError::MissingAccessTokenEndpoint)?;

		if self.quirks.scope_delimiter.is_control() {
			return Err(ConfigurationError::InvalidScopeDelimiter {
				delimiter: self.quirks.scope_delimiter,
			});
		}

		Ok(ProviderConfig {
			key: self.key,
			endpoints: ProviderEndpoints {
				request_token: self.request_token_endpoint,
				authorization,
				access_token,
			},
			authorization_method: self.authorization_method,
			response_format: self.response_format,
			quirks: self.quirks,
			alternate_authorization_endpoints: self.alternate_authorization_endpoints,
		})
	}
}
