//! Two-legged OAuth 2.0 flow: authorization URL, code exchange, refresh, and
//! bearer-token request decoration.

// self
use crate::{
	_prelude::*,
	auth::{Credentials, OAuth2Token, Token, TokenLifetime},
	error::{ConfigurationError, ExpiredTokenError, TokenRequestError},
	flows::common,
	http::{HttpMethod, HttpTransport, TransportRequest},
	obs::{self, FlowKind, FlowOutcome, FlowSpan},
	provider::{AuthorizationMethod, DefaultProviderHooks, ProviderConfig, ProviderHooks},
	store::TokenStore,
};

const FORM_CONTENT_TYPE: &str = "application/x-www-form-urlencoded";

/// Orchestrates the two-legged OAuth 2.0 handshake against one provider.
///
/// Two states only, Unauthenticated → AccessTokenObtained, with no intermediate
/// request-token step. Refreshing is always the caller's explicit move; an
/// expired token fails a request rather than refreshing behind the caller's
/// back.
#[derive(Clone)]
pub struct OAuth2Flow {
	credentials: Credentials,
	config: ProviderConfig,
	hooks: Arc<dyn ProviderHooks>,
	transport: Arc<dyn HttpTransport>,
	store: Arc<dyn TokenStore>,
	scopes: Vec<String>,
}
impl OAuth2Flow {
	/// Creates a flow with the default provider hooks and no scopes.
	pub fn new(
		credentials: Credentials,
		config: ProviderConfig,
		transport: Arc<dyn HttpTransport>,
		store: Arc<dyn TokenStore>,
	) -> Self {
		Self {
			credentials,
			config,
			hooks: Arc::new(DefaultProviderHooks),
			transport,
			store,
			scopes: Vec::new(),
		}
	}

	/// Sets the scopes requested during authorization.
	pub fn with_scopes<I, S>(mut self, scopes: I) -> Self
	where
		I: IntoIterator<Item = S>,
		S: Into<String>,
	{
		self.scopes = scopes.into_iter().map(Into::into).collect();

		self
	}

	/// Replaces the provider hooks.
	pub fn with_hooks(mut self, hooks: Arc<dyn ProviderHooks>) -> Self {
		self.hooks = hooks;

		self
	}

	/// Provider configuration backing this flow.
	pub fn config(&self) -> &ProviderConfig {
		&self.config
	}

	/// Mutable access for runtime reconfiguration (endpoint selection).
	pub fn config_mut(&mut self) -> &mut ProviderConfig {
		&mut self.config
	}

	/// Composes the user authorization URL; no network call.
	///
	/// A supplied `state` is persisted through the store collaborator so
	/// [`request_access_token`](Self::request_access_token) can validate the
	/// value the provider echoes back.
	pub fn authorization_url(
		&self,
		state: Option<&str>,
		extra_params: &[(String, String)],
	) -> Result<Url> {
		let mut url = self.config.endpoints.authorization.clone();
		let mut params = vec![
			("response_type".to_owned(), "code".to_owned()),
			("client_id".to_owned(), self.credentials.consumer_key().to_owned()),
			("redirect_uri".to_owned(), self.credentials.callback_uri().to_string()),
		];

		if let Some(scope) =
			common::format_scopes(&self.scopes, self.config.quirks.scope_delimiter)
		{
			params.push(("scope".to_owned(), scope));
		}
		if let Some(state) = state {
			self.store.save_state(&self.config.key, state)?;
			params.push(("state".to_owned(), state.to_owned()));
		}

		params.extend_from_slice(extra_params);
		self.hooks.augment_authorization_params(&mut params);

		{
			let mut pairs = url.query_pairs_mut();

			for (key, value) in &params {
				pairs.append_pair(key, value);
			}
		}

		Ok(url)
	}

	/// Exchanges an authorization code for an access token.
	///
	/// When `state` is supplied it must match the value stored by
	/// [`authorization_url`](Self::authorization_url); a successful match
	/// consumes the stored state. On success the token is persisted and
	/// returned; on failure the store is left untouched.
	pub fn request_access_token(&self, code: &str, state: Option<&str>) -> Result<OAuth2Token> {
		const KIND: FlowKind = FlowKind::AccessToken;

		let _span = FlowSpan::new(KIND, "request_access_token").entered();

		obs::record_flow_outcome(KIND, FlowOutcome::Attempt);

		let result = self.request_access_token_inner(code, state);

		match &result {
			Ok(_) => obs::record_flow_outcome(KIND, FlowOutcome::Success),
			Err(_) => obs::record_flow_outcome(KIND, FlowOutcome::Failure),
		}

		result
	}

	fn request_access_token_inner(&self, code: &str, state: Option<&str>) -> Result<OAuth2Token> {
		if let Some(state) = state {
			self.validate_state(state)?;
		}

		let body = vec![
			("grant_type".to_owned(), "authorization_code".to_owned()),
			("code".to_owned(), code.to_owned()),
			("client_id".to_owned(), self.credentials.consumer_key().to_owned()),
			("client_secret".to_owned(), self.credentials.consumer_secret().to_owned()),
			("redirect_uri".to_owned(), self.credentials.callback_uri().to_string()),
		];
		let token = self.exchange(&body)?;

		self.store.save(&self.config.key, Token::OAuth2(token.clone()))?;

		Ok(token)
	}

	/// Exchanges a refresh token for a fresh access token.
	///
	/// Refreshing never happens implicitly; the caller decides when. The
	/// returned token is a new instance; when the provider rotates no new
	/// refresh secret, the old one is carried forward so the caller can keep
	/// refreshing.
	pub fn refresh_access_token(&self, token: &OAuth2Token) -> Result<OAuth2Token> {
		const KIND: FlowKind = FlowKind::Refresh;

		let _span = FlowSpan::new(KIND, "refresh_access_token").entered();

		obs::record_flow_outcome(KIND, FlowOutcome::Attempt);

		let result = self.refresh_access_token_inner(token);

		match &result {
			Ok(_) => obs::record_flow_outcome(KIND, FlowOutcome::Success),
			Err(_) => obs::record_flow_outcome(KIND, FlowOutcome::Failure),
		}

		result
	}

	fn refresh_access_token_inner(&self, token: &OAuth2Token) -> Result<OAuth2Token> {
		let refresh = token
			.refresh_token
			.as_ref()
			.ok_or(ConfigurationError::MissingRefreshToken)?
			.expose()
			.to_owned();
		let body = vec![
			("grant_type".to_owned(), "refresh_token".to_owned()),
			("refresh_token".to_owned(), refresh.clone()),
			("client_id".to_owned(), self.credentials.consumer_key().to_owned()),
			("client_secret".to_owned(), self.credentials.consumer_secret().to_owned()),
		];
		let parsed = self.exchange(&body)?;
		let refreshed = if parsed.refresh_token.is_none() {
			OAuth2Token { refresh_token: Some(crate::auth::TokenSecret::new(refresh)), ..parsed }
		} else {
			parsed
		};

		self.store.save(&self.config.key, Token::OAuth2(refreshed.clone()))?;

		Ok(refreshed)
	}

	/// Issues a token-decorated API request and returns the raw response body.
	///
	/// Expired tokens fail with [`ExpiredTokenError`] before any network
	/// activity. Decoration follows the provider's
	/// [`AuthorizationMethod`]; exactly one authorization header is attached,
	/// replacing any caller-supplied one.
	pub fn signed_request(
		&self,
		method: HttpMethod,
		url: Url,
		token: &OAuth2Token,
		body: Option<String>,
		extra_headers: &[(String, String)],
	) -> Result<String> {
		const KIND: FlowKind = FlowKind::SignedRequest;

		let _span = FlowSpan::new(KIND, "signed_request").entered();

		obs::record_flow_outcome(KIND, FlowOutcome::Attempt);

		let result = self.signed_request_inner(method, url, token, body, extra_headers);

		match &result {
			Ok(_) => obs::record_flow_outcome(KIND, FlowOutcome::Success),
			Err(_) => obs::record_flow_outcome(KIND, FlowOutcome::Failure),
		}

		result
	}

	fn signed_request_inner(
		&self,
		method: HttpMethod,
		mut url: Url,
		token: &OAuth2Token,
		body: Option<String>,
		extra_headers: &[(String, String)],
	) -> Result<String> {
		if let TokenLifetime::ExpiresAt(expiry) = token.lifetime {
			if OffsetDateTime::now_utc() >= expiry {
				return Err(ExpiredTokenError { expired_at: expiry }.into());
			}
		}

		let mut headers: Vec<(String, String)> = extra_headers
			.iter()
			.filter(|(name, _)| !name.eq_ignore_ascii_case("authorization"))
			.cloned()
			.collect();

		match self.config.authorization_method {
			AuthorizationMethod::HeaderBearer => headers.push((
				"Authorization".into(),
				format!("Bearer {}", token.access_token.expose()),
			)),
			AuthorizationMethod::HeaderOauth => headers.push((
				"Authorization".into(),
				format!("OAuth {}", token.access_token.expose()),
			)),
			AuthorizationMethod::QueryString => {
				url.query_pairs_mut().append_pair("access_token", token.access_token.expose());
			},
		}

		let mut request = TransportRequest::new(method, url);

		request.headers = headers;
		request.body = body;

		Ok(self.transport.retrieve_response(&request)?)
	}

	/// POSTs a form body to the access-token endpoint and parses the response
	/// through the provider hooks.
	fn exchange(&self, body: &[(String, String)]) -> Result<OAuth2Token> {
		let mut request =
			TransportRequest::new(HttpMethod::Post, self.config.endpoints.access_token.clone());

		request.headers.push(("Content-Type".into(), FORM_CONTENT_TYPE.into()));
		request.body = Some(common::form_encode(body));

		let raw = self.transport.retrieve_response(&request)?;
		let token = self.hooks.parse_oauth2_token_response(&raw, self.config.response_format)?;

		Ok(token)
	}

	fn validate_state(&self, state: &str) -> Result<()> {
		let stored = self.store.fetch_state(&self.config.key)?;

		if stored.as_deref() != Some(state) {
			return Err(TokenRequestError::StateMismatch.into());
		}

		self.store.clear_state(&self.config.key)?;

		Ok(())
	}
}
impl Debug for OAuth2Flow {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("OAuth2Flow")
			.field("provider", &self.config.key)
			.field("scopes", &self.scopes)
			.finish()
	}
}
