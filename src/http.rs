//! Transport primitives for token exchanges and signed API requests.
//!
//! The [`HttpTransport`] trait is the engine's only dependency on an HTTP
//! stack: each flow operation hands a fully assembled [`TransportRequest`] to
//! the collaborator and receives the raw response body back. Status handling
//! is intentionally absent; providers report failures inside the body
//! (`error`/`error_description` fields), and the flows detect them there, so
//! implementations should return the body for non-2xx responses too.

// self
use crate::{_prelude::*, error::TransportError};

/// HTTP methods the engine issues.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum HttpMethod {
	/// GET request.
	Get,
	/// POST request.
	Post,
	/// PUT request.
	Put,
	/// DELETE request.
	Delete,
	/// HEAD request.
	Head,
}
impl HttpMethod {
	/// Returns the uppercase wire representation.
	pub const fn as_str(self) -> &'static str {
		match self {
			HttpMethod::Get => "GET",
			HttpMethod::Post => "POST",
			HttpMethod::Put => "PUT",
			HttpMethod::Delete => "DELETE",
			HttpMethod::Head => "HEAD",
		}
	}
}
impl Display for HttpMethod {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}

/// Fully assembled outbound request handed to the transport collaborator.
#[derive(Clone, Debug)]
pub struct TransportRequest {
	/// Target URL, including any query parameters the flow appended.
	pub url: Url,
	/// HTTP method.
	pub method: HttpMethod,
	/// Headers in insertion order; at most one `Authorization` entry.
	pub headers: Vec<(String, String)>,
	/// Request body, already encoded by the flow.
	pub body: Option<String>,
}
impl TransportRequest {
	/// Creates a request with no headers or body.
	pub fn new(method: HttpMethod, url: Url) -> Self {
		Self { url, method, headers: Vec::new(), body: None }
	}

	/// Returns the value of a header, matching names case-insensitively.
	pub fn header(&self, name: &str) -> Option<&str> {
		self.headers
			.iter()
			.find(|(candidate, _)| candidate.eq_ignore_ascii_case(name))
			.map(|(_, value)| value.as_str())
	}
}

/// Blocking HTTP transport collaborator.
///
/// Each flow operation performs at most one call and surfaces
/// [`TransportError`] unmodified; retries, timeouts, and cancellation belong
/// to the implementation, not the engine.
pub trait HttpTransport
where
	Self: Send + Sync,
{
	/// Executes the request and returns the raw response body.
	fn retrieve_response(&self, request: &TransportRequest) -> Result<String, TransportError>;
}

/// Thin wrapper around a blocking [`ReqwestClient`] so shared HTTP behavior lives
/// in one place. Token endpoints return results directly instead of delegating
/// to another URI, so custom clients should disable redirect following.
#[cfg(feature = "reqwest")]
#[derive(Clone, Default)]
pub struct ReqwestHttpClient(pub ReqwestClient);
#[cfg(feature = "reqwest")]
impl ReqwestHttpClient {
	/// Wraps an existing blocking [`ReqwestClient`].
	pub fn with_client(client: ReqwestClient) -> Self {
		Self(client)
	}
}
#[cfg(feature = "reqwest")]
impl AsRef<ReqwestClient> for ReqwestHttpClient {
	fn as_ref(&self) -> &ReqwestClient {
		&self.0
	}
}
#[cfg(feature = "reqwest")]
impl std::ops::Deref for ReqwestHttpClient {
	type Target = ReqwestClient;

	fn deref(&self) -> &Self::Target {
		&self.0
	}
}
#[cfg(feature = "reqwest")]
impl From<HttpMethod> for reqwest::Method {
	fn from(method: HttpMethod) -> Self {
		match method {
			HttpMethod::Get => reqwest::Method::GET,
			HttpMethod::Post => reqwest::Method::POST,
			HttpMethod::Put => reqwest::Method::PUT,
			HttpMethod::Delete => reqwest::Method::DELETE,
			HttpMethod::Head => reqwest::Method::HEAD,
		}
	}
}
#[cfg(feature = "reqwest")]
impl HttpTransport for ReqwestHttpClient {
	fn retrieve_response(&self, request: &TransportRequest) -> Result<String, TransportError> {
		let mut builder = self.0.request(request.method.into(), request.url.clone());

		for (name, value) in &request.headers {
			builder = builder.header(name.as_str(), value.as_str());
		}
		if let Some(body) = &request.body {
			builder = builder.body(body.clone());
		}

		let response = builder.send().map_err(TransportError::network)?;

		response.text().map_err(TransportError::network)
	}
}
