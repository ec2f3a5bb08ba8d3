//! Transport primitives for the verification round-trip.
//!
//! The module exposes [`VerificationHttpClient`], the authenticator's only dependency on an HTTP
//! stack, along with [`VerificationRequest`] and [`VerificationResponse`]. Implementations submit
//! exactly one form-encoded POST per call, honour the request's timeout, and never retry; the
//! protocol is a one-shot challenge/response.

// std
#[cfg(feature = "reqwest")] use std::ops::Deref;
// self
use crate::{_prelude::*, error::TransportError};
#[cfg(feature = "reqwest")]
use crate::{error::ConfigError, provider::ProviderConfig};

/// Future returned by [`VerificationHttpClient::post_form`].
pub type VerificationFuture<'a> =
	Pin<Box<dyn Future<Output = Result<VerificationResponse, TransportError>> + 'a + Send>>;

/// Abstraction over HTTP transports capable of executing the verification round-trip.
///
/// Implementations must be `Send + Sync + 'static` so one client can be shared by every
/// request-handling task, and the futures they return must be `Send`.
pub trait VerificationHttpClient
where
	Self: 'static + Send + Sync,
{
	/// Submits `request.form` as `application/x-www-form-urlencoded` to `request.endpoint`.
	///
	/// Network failures, an elapsed timeout, and unreadable bodies all surface as
	/// [`TransportError`]. Non-success statuses are returned as responses; the caller decides
	/// from the body.
	fn post_form<'a>(&'a self, request: VerificationRequest<'a>) -> VerificationFuture<'a>;
}

/// One verification round-trip.
#[derive(Clone, Copy, Debug)]
pub struct VerificationRequest<'a> {
	/// Provider endpoint receiving the POST.
	pub endpoint: &'a Url,
	/// Form parameters in submission order.
	pub form: &'a [(String, String)],
	/// Upper bound for the whole exchange.
	pub timeout: StdDuration,
}

/// Raw provider answer to a verification request.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct VerificationResponse {
	/// HTTP status code.
	pub status: u16,
	/// Response body decoded as text.
	pub body: String,
}

/// Thin wrapper around [`ReqwestClient`] so shared HTTP behavior lives in one place.
///
/// The verification endpoint answers directly, so clients built by [`Self::for_config`] do not
/// follow redirects.
#[cfg(feature = "reqwest")]
#[derive(Clone, Debug, Default)]
pub struct ReqwestHttpClient(pub ReqwestClient);
#[cfg(feature = "reqwest")]
impl ReqwestHttpClient {
	/// Wraps an existing reqwest [`ReqwestClient`].
	pub fn with_client(client: ReqwestClient) -> Self {
		Self(client)
	}

	/// Builds a client whose overall timeout matches the provider configuration.
	pub fn for_config(config: &ProviderConfig) -> Result<Self, ConfigError> {
		let client = ReqwestClient::builder()
			.timeout(config.verification_timeout())
			.redirect(reqwest::redirect::Policy::none())
			.build()?;

		Ok(Self(client))
	}
}
#[cfg(feature = "reqwest")]
impl AsRef<ReqwestClient> for ReqwestHttpClient {
	fn as_ref(&self) -> &ReqwestClient {
		&self.0
	}
}
#[cfg(feature = "reqwest")]
impl Deref for ReqwestHttpClient {
	type Target = ReqwestClient;

	fn deref(&self) -> &Self::Target {
		&self.0
	}
}
#[cfg(feature = "reqwest")]
impl VerificationHttpClient for ReqwestHttpClient {
	fn post_form<'a>(&'a self, request: VerificationRequest<'a>) -> VerificationFuture<'a> {
		Box::pin(async move {
			let response = self
				.0
				.post(request.endpoint.clone())
				.timeout(request.timeout)
				.form(request.form)
				.send()
				.await?;
			let status = response.status().as_u16();
			let body = response.text().await.map_err(|e| {
				if e.is_timeout() { TransportError::Timeout } else { TransportError::body(e) }
			})?;

			Ok(VerificationResponse { status, body })
		})
	}
}
