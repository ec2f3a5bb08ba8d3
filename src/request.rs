//! Framework-neutral view of the inbound HTTP request the relying party derives its context from.
//!
//! Servers either build an [`InboundRequest`] field by field or convert their
//! [`http::Request`] with [`InboundRequest::from_http`]. Only the pieces the protocol reads are
//! kept: method, raw request target, headers, the TLS flag, and (for POST) the raw form body.

// crates.io
use http::{HeaderMap, HeaderName, HeaderValue, Method, Uri, request::Parts};

/// Inbound request consumed by [`AuthContext::derive`](crate::context::AuthContext::derive).
#[derive(Clone, Debug)]
pub struct InboundRequest {
	method: Method,
	uri: String,
	authority: Option<String>,
	headers: HeaderMap,
	secure: bool,
	form: Option<Vec<(String, String)>>,
}
impl InboundRequest {
	/// Creates a request for `method` targeting the raw request URI `uri` (path plus query).
	pub fn new(method: Method, uri: impl Into<String>) -> Self {
		Self {
			method,
			uri: uri.into(),
			authority: None,
			headers: HeaderMap::new(),
			secure: false,
			form: None,
		}
	}

	/// Shorthand for a `GET` request.
	pub fn get(uri: impl Into<String>) -> Self {
		Self::new(Method::GET, uri)
	}

	/// Shorthand for a `POST` request; attach the body with [`Self::with_form_body`].
	pub fn post(uri: impl Into<String>) -> Self {
		Self::new(Method::POST, uri)
	}

	/// Converts request parts produced by an `http`-based server.
	///
	/// The raw request target is rebuilt from the path and query; the URI authority (present for
	/// absolute-form and HTTP/2 requests) backs up a missing `Host` header.
	pub fn from_parts(parts: &Parts, secure: bool) -> Self {
		Self::from_components(&parts.method, &parts.uri, &parts.headers, secure)
	}

	/// Converts an [`http::Request`]; the body is ignored, pass POST bodies through
	/// [`Self::with_form_body`].
	pub fn from_http<B>(request: &http::Request<B>, secure: bool) -> Self {
		Self::from_components(request.method(), request.uri(), request.headers(), secure)
	}

	fn from_components(method: &Method, uri: &Uri, headers: &HeaderMap, secure: bool) -> Self {
		Self {
			method: method.clone(),
			uri: uri.path_and_query().map_or("/", |pq| pq.as_str()).to_owned(),
			authority: uri.authority().map(|authority| authority.as_str().to_owned()),
			headers: headers.clone(),
			secure,
			form: None,
		}
	}

	/// Appends a header value.
	pub fn with_header(mut self, name: HeaderName, value: HeaderValue) -> Self {
		self.headers.append(name, value);

		self
	}

	/// Replaces all headers.
	pub fn with_headers(mut self, headers: HeaderMap) -> Self {
		self.headers = headers;

		self
	}

	/// Marks the underlying connection as TLS-secured.
	pub fn with_tls(mut self, secure: bool) -> Self {
		self.secure = secure;

		self
	}

	/// Parses an `application/x-www-form-urlencoded` body.
	pub fn with_form_body(mut self, body: impl AsRef<[u8]>) -> Self {
		self.form = Some(url::form_urlencoded::parse(body.as_ref()).into_owned().collect());

		self
	}

	/// Request method.
	pub fn method(&self) -> &Method {
		&self.method
	}

	/// Raw request target (path plus query) exactly as received.
	pub fn uri(&self) -> &str {
		&self.uri
	}

	/// Request headers.
	pub fn headers(&self) -> &HeaderMap {
		&self.headers
	}

	/// Whether the connection itself is TLS-secured.
	pub fn is_secure(&self) -> bool {
		self.secure
	}

	/// Parsed form body, when one was attached.
	pub fn form(&self) -> Option<&[(String, String)]> {
		self.form.as_deref()
	}

	/// First value of `name` as UTF-8, when present.
	pub fn header_str(&self, name: &HeaderName) -> Option<&str> {
		self.headers.get(name).and_then(|value| value.to_str().ok())
	}

	/// Host the client addressed: the `Host` header, falling back to the URI authority.
	pub fn host(&self) -> Option<&str> {
		self.header_str(&http::header::HOST).or(self.authority.as_deref())
	}

	/// Query string of the raw request target, without the leading `?`.
	pub fn query(&self) -> Option<&str> {
		self.uri.split_once('?').map(|(_, query)| query)
	}
}
