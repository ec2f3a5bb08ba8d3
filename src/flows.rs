//! Relying-party flows driven by the [`Authenticator`].
//!
//! A request handler derives an [`AuthContext`] per request, branches on
//! [`AuthContext::state`], and then either sends the user to [`Authenticator::redirect_url`] or
//! validates the callback with [`Authenticator::validate`].

pub mod callback;
pub mod redirect;
pub mod verification;

pub use verification::*;

// self
use crate::{
	_prelude::*, context::AuthContext, provider::ProviderConfig, request::InboundRequest,
	transport::VerificationHttpClient,
};
#[cfg(feature = "reqwest")]
use crate::{error::ConfigError, transport::ReqwestHttpClient};

#[cfg(feature = "reqwest")]
/// Authenticator specialized for the crate's default reqwest transport.
pub type ReqwestAuthenticator = Authenticator<ReqwestHttpClient>;

/// OpenID 2.0 relying party bound to a single provider configuration.
///
/// The authenticator holds only immutable configuration and a shared transport, so one instance
/// can serve every request-handling task concurrently; all per-attempt state lives in the
/// [`AuthContext`] each request derives.
#[derive(Clone)]
pub struct Authenticator<C>
where
	C: ?Sized + VerificationHttpClient,
{
	/// Provider configuration shared by redirect construction and validation.
	pub config: Arc<ProviderConfig>,
	/// HTTP client used for the verification round-trip.
	pub http_client: Arc<C>,
}
impl<C> Authenticator<C>
where
	C: ?Sized + VerificationHttpClient,
{
	/// Creates an authenticator that reuses the caller-provided transport.
	pub fn with_http_client(
		config: impl Into<Arc<ProviderConfig>>,
		http_client: impl Into<Arc<C>>,
	) -> Self {
		Self { config: config.into(), http_client: http_client.into() }
	}

	/// Provider configuration in use.
	pub fn config(&self) -> &ProviderConfig {
		&self.config
	}

	/// Derives the per-request context; see [`AuthContext::derive`].
	pub fn derive_context(&self, request: &InboundRequest) -> AuthContext {
		AuthContext::derive(request)
	}
}
#[cfg(feature = "reqwest")]
impl Authenticator<ReqwestHttpClient> {
	/// Creates an authenticator with its own reqwest transport, bounded by the configured
	/// verification timeout.
	pub fn new(config: ProviderConfig) -> Result<Self> {
		let http_client = ReqwestHttpClient::for_config(&config)?;

		Ok(Self::with_http_client(config, http_client))
	}

	/// Creates an authenticator for the production Steam provider.
	pub fn steam() -> Result<Self> {
		let config = ProviderConfig::steam().map_err(ConfigError::from)?;

		Self::new(config)
	}
}
impl<C> Debug for Authenticator<C>
where
	C: ?Sized + VerificationHttpClient,
{
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("Authenticator").field("config", &self.config).finish()
	}
}
