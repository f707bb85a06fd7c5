//! Three-legged OAuth 1.0a flow: request token, user authorization, access
//! token, and signed API requests.

// self
use crate::{
	_prelude::*,
	auth::{Credentials, OAuth1Token, Token},
	error::TokenRequestError,
	flows::common,
	http::{HttpMethod, HttpTransport, TransportRequest},
	obs::{self, FlowKind, FlowOutcome, FlowSpan},
	provider::{AuthorizationMethod, DefaultProviderHooks, ProviderConfig, ProviderHooks},
	signature::{Signer, percent_encode},
	store::TokenStore,
};

const FORM_CONTENT_TYPE: &str = "application/x-www-form-urlencoded";

/// Orchestrates the three-legged OAuth 1.0a handshake against one provider.
///
/// The flow walks Unauthenticated → RequestTokenObtained →
/// AccessTokenObtained, but keeps none of that state in memory: the request
/// token is persisted through the store collaborator and recovered for the
/// access-token exchange, so the flow survives process restarts.
#[derive(Clone)]
pub struct OAuth1Flow {
	credentials: Credentials,
	config: ProviderConfig,
	hooks: Arc<dyn ProviderHooks>,
	transport: Arc<dyn HttpTransport>,
	store: Arc<dyn TokenStore>,
	signer: Signer,
}
impl OAuth1Flow {
	/// Creates a flow with the default provider hooks.
	pub fn new(
		credentials: Credentials,
		config: ProviderConfig,
		transport: Arc<dyn HttpTransport>,
		store: Arc<dyn TokenStore>,
		signer: Signer,
	) -> Self {
		Self {
			credentials,
			config,
			hooks: Arc::new(DefaultProviderHooks),
			transport,
			store,
			signer,
		}
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

	/// Obtains a request token: the first leg of the handshake.
	///
	/// POSTs freshly generated protocol parameters (nonce, timestamp,
	/// callback) plus their signature to the request-token endpoint. The
	/// returned token carries the request-token pair and is persisted so the
	/// later access-token exchange can recover the secret.
	pub fn request_request_token(&self) -> Result<OAuth1Token> {
		const KIND: FlowKind = FlowKind::RequestToken;

		let _span = FlowSpan::new(KIND, "request_request_token").entered();

		obs::record_flow_outcome(KIND, FlowOutcome::Attempt);

		let result = self.request_request_token_inner();

		match &result {
			Ok(_) => obs::record_flow_outcome(KIND, FlowOutcome::Success),
			Err(_) => obs::record_flow_outcome(KIND, FlowOutcome::Failure),
		}

		result
	}

	fn request_request_token_inner(&self) -> Result<OAuth1Token> {
		let endpoint = self.config.request_token_endpoint()?.clone();
		let mut params = self.protocol_params();

		params.push(("oauth_callback".into(), self.credentials.callback_uri().to_string()));

		let signature = self.signer.sign(
			HttpMethod::Post,
			&endpoint,
			&params,
			self.credentials.consumer_secret(),
			None,
		)?;

		params.push(("oauth_signature".into(), signature));

		let raw = self.dispatch_token_request(endpoint, &params)?;
		let token = common::parse_oauth1_request_token(
			&raw,
			self.config.quirks.require_callback_confirmation,
		)?;

		self.store.save(&self.config.key, Token::OAuth1(token.clone()))?;

		Ok(token)
	}

	/// Composes the user authorization URL for a request token; no network call.
	pub fn authorization_url(&self, request_token: &str) -> Url {
		let mut url = self.config.endpoints.authorization.clone();
		let mut params = vec![("oauth_token".to_owned(), request_token.to_owned())];

		self.hooks.augment_authorization_params(&mut params);

		{
			let mut pairs = url.query_pairs_mut();

			for (key, value) in &params {
				pairs.append_pair(key, value);
			}
		}

		url
	}

	/// Exchanges an authorized request token plus verifier for an access token.
	///
	/// The request-token secret is taken from the argument when supplied,
	/// otherwise recovered from the store entry written by
	/// [`request_request_token`](Self::request_request_token). On success the
	/// access token replaces the request token in the store.
	pub fn request_access_token(
		&self,
		request_token: &str,
		verifier: &str,
		request_token_secret: Option<&str>,
	) -> Result<OAuth1Token> {
		const KIND: FlowKind = FlowKind::AccessToken;

		let _span = FlowSpan::new(KIND, "request_access_token").entered();

		obs::record_flow_outcome(KIND, FlowOutcome::Attempt);

		let result = self.request_access_token_inner(request_token, verifier, request_token_secret);

		match &result {
			Ok(_) => obs::record_flow_outcome(KIND, FlowOutcome::Success),
			Err(_) => obs::record_flow_outcome(KIND, FlowOutcome::Failure),
		}

		result
	}

	fn request_access_token_inner(
		&self,
		request_token: &str,
		verifier: &str,
		request_token_secret: Option<&str>,
	) -> Result<OAuth1Token> {
		let secret = match request_token_secret {
			Some(secret) => secret.to_owned(),
			None => self.stored_request_token_secret()?,
		};
		let endpoint = self.config.endpoints.access_token.clone();
		let mut params = self.protocol_params();

		params.push(("oauth_token".into(), request_token.to_owned()));
		params.push(("oauth_verifier".into(), verifier.to_owned()));

		let signature = self.signer.sign(
			HttpMethod::Post,
			&endpoint,
			&params,
			self.credentials.consumer_secret(),
			Some(&secret),
		)?;

		params.push(("oauth_signature".into(), signature));

		let raw = self.dispatch_token_request(endpoint, &params)?;
		let token = self.hooks.parse_oauth1_token_response(&raw)?;

		self.store.save(&self.config.key, Token::OAuth1(token.clone()))?;

		Ok(token)
	}

	/// Issues a signed API request and returns the raw response body.
	///
	/// Protocol parameters (nonce, timestamp) are rebuilt per call; the
	/// signature covers them plus the body pairs and any query parameters on
	/// `url`. Transport failures surface unmodified; nothing is retried.
	pub fn signed_request(
		&self,
		method: HttpMethod,
		url: Url,
		token: &OAuth1Token,
		body: Option<&[(String, String)]>,
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
		token: &OAuth1Token,
		body: Option<&[(String, String)]>,
		extra_headers: &[(String, String)],
	) -> Result<String> {
		let mut oauth_params = self.protocol_params();

		oauth_params.push(("oauth_token".into(), token.access_token.expose().to_owned()));

		let mut signed_over = oauth_params.clone();

		if let Some(pairs) = body {
			signed_over.extend_from_slice(pairs);
		}

		let signature = self.signer.sign(
			method,
			&url,
			&signed_over,
			self.credentials.consumer_secret(),
			Some(token.access_token_secret.expose()),
		)?;

		oauth_params.push(("oauth_signature".into(), signature));

		let mut headers = strip_authorization(extra_headers);

		match self.config.authorization_method {
			AuthorizationMethod::QueryString => {
				let mut pairs = url.query_pairs_mut();

				for (key, value) in &oauth_params {
					pairs.append_pair(key, value);
				}
			},
			_ => headers.push(("Authorization".into(), oauth_header(&oauth_params))),
		}

		let mut request = TransportRequest::new(method, url);

		request.headers = headers;

		if let Some(pairs) = body {
			request.headers.push(("Content-Type".into(), FORM_CONTENT_TYPE.into()));
			request.body = Some(common::form_encode(pairs));
		}

		Ok(self.transport.retrieve_response(&request)?)
	}

	/// Fresh OAuth1 protocol parameters: new nonce and timestamp per call.
	fn protocol_params(&self) -> Vec<(String, String)> {
		vec![
			("oauth_consumer_key".into(), self.credentials.consumer_key().to_owned()),
			("oauth_nonce".into(), common::nonce()),
			("oauth_signature_method".into(), self.signer.method().as_str().to_owned()),
			("oauth_timestamp".into(), common::timestamp()),
			("oauth_version".into(), "1.0".into()),
		]
	}

	fn stored_request_token_secret(&self) -> Result<String> {
		let stored = self.store.fetch(&self.config.key)?;
		let secret = stored
			.as_ref()
			.and_then(Token::as_oauth1)
			.and_then(|token| token.request_token_secret.as_ref())
			.map(|secret| secret.expose().to_owned());

		secret.ok_or_else(|| {
			crate::store::StoreError::Missing { provider: self.config.key.to_string() }.into()
		})
	}

	/// Token-leg requests always authenticate via the `Authorization: OAuth` header.
	fn dispatch_token_request(&self, endpoint: Url, params: &[(String, String)]) -> Result<String> {
		let mut request = TransportRequest::new(HttpMethod::Post, endpoint);

		request.headers.push(("Authorization".into(), oauth_header(params)));

		let raw = self.transport.retrieve_response(&request)?;

		if raw.is_empty() {
			return Err(TokenRequestError::EmptyResponse.into());
		}

		Ok(raw)
	}
}
impl Debug for OAuth1Flow {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("OAuth1Flow")
			.field("provider", &self.config.key)
			.field("signature_method", &self.signer.method())
			.finish()
	}
}

/// Assembles an `Authorization: OAuth ...` header with percent-encoded,
/// comma-separated `key="value"` pairs in parameter order.
pub fn oauth_header(params: &[(String, String)]) -> String {
	let rendered = params
		.iter()
		.map(|(key, value)| format!("{}=\"{}\"", percent_encode(key), percent_encode(value)))
		.collect::<Vec<_>>()
		.join(", ");

	format!("OAuth {rendered}")
}

/// Strips caller-supplied authorization headers so flows attach exactly one.
fn strip_authorization(headers: &[(String, String)]) -> Vec<(String, String)> {
	headers
		.iter()
		.filter(|(name, _)| !name.eq_ignore_ascii_case("authorization"))
		.cloned()
		.collect()
}
