//! Per-request relying-party context: realm, return endpoint, and protocol parameters.
//!
//! [`AuthContext::derive`] is pure. The same request shape always yields the same
//! `return_endpoint`, which is what lets the callback handler recompute the value the provider
//! echoes back and compare it byte for byte.

// crates.io
use http::{HeaderName, Method};
// self
use crate::{_prelude::*, request::InboundRequest};

/// `openid.mode` parameter.
pub const PARAM_MODE: &str = "openid.mode";
/// `openid.ns` parameter.
pub const PARAM_NS: &str = "openid.ns";
/// `openid.claimed_id` parameter.
pub const PARAM_CLAIMED_ID: &str = "openid.claimed_id";
/// `openid.identity` parameter.
pub const PARAM_IDENTITY: &str = "openid.identity";
/// `openid.realm` parameter.
pub const PARAM_REALM: &str = "openid.realm";
/// `openid.return_to` parameter.
pub const PARAM_RETURN_TO: &str = "openid.return_to";
/// `openid.assoc_handle` parameter.
pub const PARAM_ASSOC_HANDLE: &str = "openid.assoc_handle";
/// `openid.signed` parameter.
pub const PARAM_SIGNED: &str = "openid.signed";
/// `openid.sig` parameter.
pub const PARAM_SIG: &str = "openid.sig";

/// Mode sent with the login redirect.
pub const MODE_CHECKID_SETUP: &str = "checkid_setup";
/// Mode of a positive assertion callback.
pub const MODE_ID_RES: &str = "id_res";
/// Mode of a cancelled login.
pub const MODE_CANCEL: &str = "cancel";
/// Mode requesting direct verification from the provider.
pub const MODE_CHECK_AUTHENTICATION: &str = "check_authentication";

/// Reverse-proxy header declaring the client-facing scheme.
pub static X_FORWARDED_PROTO: HeaderName = HeaderName::from_static("x-forwarded-proto");
/// Reverse-proxy header declaring the client-facing host.
pub static X_FORWARDED_HOST: HeaderName = HeaderName::from_static("x-forwarded-host");

const PROTOCOL_MARKER: &str = "openid";

/// Where a request sits in the login state machine, classified from `openid.mode`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum CallbackState {
	/// No mode: the user has not been sent to the provider yet.
	Initiated,
	/// The user cancelled at the provider.
	Cancelled,
	/// Positive assertion awaiting verification.
	CallbackReceived,
	/// Any other mode; validation rejects it.
	Unexpected(String),
}

/// Relying-party context derived from one inbound request.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AuthContext {
	/// Scheme + host asserted to the provider as the trust root.
	pub realm: String,
	/// URL the provider must redirect back to; recomputed identically on callback.
	pub return_endpoint: String,
	/// Protocol parameters from the query string (GET) or form body (POST).
	pub parameters: BTreeMap<String, String>,
}
impl AuthContext {
	/// Derives the context for `request`.
	///
	/// - Scheme is `https` when `X-Forwarded-Proto: https` is set or the connection is TLS.
	/// - Host is `X-Forwarded-Host` when set and non-empty, otherwise the request's own host.
	/// - The return endpoint drops everything from the character preceding the first `openid`
	///   occurrence in the raw request URI.
	/// - Methods other than GET and POST yield empty parameters.
	pub fn derive(request: &InboundRequest) -> Self {
		let realm = format!("{}://{}", scheme(request), host(request));
		let return_endpoint = format!("{realm}{}", strip_protocol_segment(request.uri()));
		let parameters = match *request.method() {
			Method::POST => request
				.form()
				.map(|pairs| first_wins(pairs.iter().map(|(k, v)| (k.as_str(), v.as_str()))))
				.unwrap_or_default(),
			Method::GET => request
				.query()
				.map(|query| first_wins(url::form_urlencoded::parse(query.as_bytes())))
				.unwrap_or_default(),
			_ => BTreeMap::new(),
		};

		Self { realm, return_endpoint, parameters }
	}

	/// Value of `key`, or the empty string when absent.
	pub fn param(&self, key: &str) -> &str {
		self.parameters.get(key).map_or("", String::as_str)
	}

	/// Current `openid.mode`, verbatim (empty when absent).
	pub fn mode(&self) -> &str {
		self.param(PARAM_MODE)
	}

	/// Classifies [`Self::mode`] for caller-side branching.
	pub fn state(&self) -> CallbackState {
		match self.mode() {
			"" => CallbackState::Initiated,
			MODE_CANCEL => CallbackState::Cancelled,
			MODE_ID_RES => CallbackState::CallbackReceived,
			other => CallbackState::Unexpected(other.to_owned()),
		}
	}
}

fn scheme(request: &InboundRequest) -> &'static str {
	if request.header_str(&X_FORWARDED_PROTO) == Some("https") || request.is_secure() {
		"https"
	} else {
		"http"
	}
}

fn host(request: &InboundRequest) -> &str {
	// Proxies append to the list; the first entry is the host the client addressed.
	let forwarded = request
		.header_str(&X_FORWARDED_HOST)
		.and_then(|value| value.split(',').next())
		.map(str::trim)
		.filter(|value| !value.is_empty());

	forwarded.or_else(|| request.host()).unwrap_or_default()
}

fn strip_protocol_segment(uri: &str) -> &str {
	let Some(idx) = uri.find(PROTOCOL_MARKER) else {
		return uri;
	};
	let head = &uri[..idx];

	head.char_indices().next_back().map_or(head, |(last, _)| &head[..last])
}

fn first_wins<K, V>(pairs: impl IntoIterator<Item = (K, V)>) -> BTreeMap<String, String>
where
	K: Into<String>,
	V: Into<String>,
{
	let mut parameters = BTreeMap::new();

	for (key, value) in pairs {
		parameters.entry(key.into()).or_insert_with(|| value.into());
	}

	parameters
}

#[cfg(test)]
mod tests {
	// crates.io
	use http::{HeaderValue, header::HOST};
	// self
	use super::*;

	fn get(uri: &str) -> InboundRequest {
		InboundRequest::get(uri).with_header(HOST, HeaderValue::from_static("app.example.com"))
	}

	#[test]
	fn plain_request_uses_own_scheme_and_host() {
		let ctx = AuthContext::derive(&get("/login"));

		assert_eq!(ctx.realm, "http://app.example.com");
		assert_eq!(ctx.return_endpoint, "http://app.example.com/login");
		assert!(ctx.parameters.is_empty());
		assert_eq!(ctx.state(), CallbackState::Initiated);
	}

	#[test]
	fn tls_or_forwarded_proto_selects_https() {
		let tls = AuthContext::derive(&get("/login").with_tls(true));
		let proxied = AuthContext::derive(
			&get("/login").with_header(X_FORWARDED_PROTO.clone(), HeaderValue::from_static("https")),
		);
		let plain_proxy = AuthContext::derive(
			&get("/login").with_header(X_FORWARDED_PROTO.clone(), HeaderValue::from_static("http")),
		);

		assert_eq!(tls.realm, "https://app.example.com");
		assert_eq!(proxied.realm, "https://app.example.com");
		assert_eq!(plain_proxy.realm, "http://app.example.com");
	}

	#[test]
	fn forwarded_host_replaces_own_host_when_present() {
		let proxied = get("/login")
			.with_header(X_FORWARDED_HOST.clone(), HeaderValue::from_static("public.example.com"));
		let chained = get("/login").with_header(
			X_FORWARDED_HOST.clone(),
			HeaderValue::from_static("edge.example.com, internal.example.com"),
		);
		let empty =
			get("/login").with_header(X_FORWARDED_HOST.clone(), HeaderValue::from_static(""));

		assert_eq!(AuthContext::derive(&proxied).realm, "http://public.example.com");
		assert_eq!(AuthContext::derive(&chained).realm, "http://edge.example.com");
		assert_eq!(AuthContext::derive(&empty).realm, "http://app.example.com");
	}

	#[test]
	fn return_endpoint_drops_protocol_query_segment() {
		let ctx = AuthContext::derive(&get(
			"/auth/steam?openid.ns=http%3A%2F%2Fspecs.openid.net%2Fauth%2F2.0&openid.mode=id_res",
		));

		assert_eq!(ctx.return_endpoint, "http://app.example.com/auth/steam");
		assert_eq!(ctx.mode(), MODE_ID_RES);
		assert_eq!(ctx.param(PARAM_NS), "http://specs.openid.net/auth/2.0");
		assert_eq!(ctx.state(), CallbackState::CallbackReceived);
	}

	#[test]
	fn return_endpoint_keeps_unrelated_query() {
		let ctx = AuthContext::derive(&get("/login?next=%2Fhome&openid.mode=cancel"));

		assert_eq!(ctx.return_endpoint, "http://app.example.com/login?next=%2Fhome");
		assert_eq!(ctx.state(), CallbackState::Cancelled);
	}

	#[test]
	fn marker_at_start_truncates_to_empty_path() {
		assert_eq!(strip_protocol_segment("openid.mode=x"), "");
		assert_eq!(strip_protocol_segment("/login"), "/login");
		assert_eq!(strip_protocol_segment("/?openid.mode=x"), "/");
	}

	#[test]
	fn return_endpoint_is_independent_of_parameters() {
		let first = AuthContext::derive(&get("/login?openid.mode=id_res&openid.sig=a"));
		let second = AuthContext::derive(&get("/login?openid.mode=cancel"));

		assert_eq!(first.return_endpoint, second.return_endpoint);
		assert_ne!(first.parameters, second.parameters);
	}

	#[test]
	fn post_reads_form_body_and_first_value_wins() {
		let request = InboundRequest::post("/login")
			.with_header(HOST, HeaderValue::from_static("app.example.com"))
			.with_form_body("openid.mode=id_res&openid.mode=cancel&openid.sig=abc");
		let ctx = AuthContext::derive(&request);

		assert_eq!(ctx.mode(), MODE_ID_RES);
		assert_eq!(ctx.param(PARAM_SIG), "abc");
	}

	#[test]
	fn unsupported_methods_yield_empty_parameters() {
		let request = InboundRequest::new(Method::PUT, "/login?openid.mode=id_res")
			.with_header(HOST, HeaderValue::from_static("app.example.com"));
		let ctx = AuthContext::derive(&request);

		assert!(ctx.parameters.is_empty());
		assert_eq!(ctx.mode(), "");
		assert_eq!(ctx.return_endpoint, "http://app.example.com/login");
	}

	#[test]
	fn unknown_modes_are_classified_as_unexpected() {
		let ctx = AuthContext::derive(&get("/login?openid.mode=setup_needed"));

		assert_eq!(ctx.state(), CallbackState::Unexpected("setup_needed".into()));
	}
}
