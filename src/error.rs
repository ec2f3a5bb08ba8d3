//! Relying-party error types shared across context derivation, validation, and profile lookups.

// self
use crate::_prelude::*;

/// Crate-wide result type alias returning [`Error`] by default.
pub type Result<T, E = Error> = std::result::Result<T, E>;

type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Canonical error exposed by public APIs.
///
/// Every variant is terminal for the current authentication attempt; nothing is retried.
#[derive(Debug, ThisError)]
pub enum Error {
	/// Local configuration problem.
	#[error(transparent)]
	Config(#[from] ConfigError),
	/// Verification round-trip failed at the network or HTTP layer.
	#[error(transparent)]
	Transport(#[from] TransportError),
	/// Downstream profile lookup failed after a successful validation.
	#[error(transparent)]
	Profile(#[from] crate::profile::ProfileError),

	/// Validation was invoked outside the `id_res` mode.
	#[error("Mode must equal \"id_res\", got {mode:?}.")]
	ModeMismatch {
		/// Mode value carried by the callback (empty when absent).
		mode: String,
	},
	/// Echoed `openid.return_to` differs from the return endpoint of the current request.
	#[error("The return_to URL {received:?} does not match the current request URL {expected:?}.")]
	ReturnUrlMismatch {
		/// Return endpoint recomputed from the callback request.
		expected: String,
		/// Value echoed back by the provider.
		received: String,
	},
	/// Verification response did not open with the expected namespace declaration.
	#[error("Verification response declared an unexpected namespace: {received:?}.")]
	NamespaceMismatch {
		/// First line of the verification response.
		received: String,
	},
	/// Provider declined to confirm the callback signature.
	#[error("Provider rejected the assertion.")]
	ProviderRejected,
	/// Claimed identifier does not follow the provider's identifier URL pattern.
	#[error("Claimed identifier {claimed_id:?} does not match the provider identifier pattern.")]
	MalformedIdentifier {
		/// Claimed identifier carried by the callback.
		claimed_id: String,
	},
}

/// Configuration failures raised while wiring the relying party.
#[derive(Debug, ThisError)]
pub enum ConfigError {
	/// HTTP client could not be constructed.
	#[error("HTTP client could not be constructed.")]
	HttpClientBuild {
		/// Underlying transport builder failure.
		#[source]
		source: BoxError,
	},
	/// Provider configuration failed validation.
	#[error(transparent)]
	Provider(#[from] crate::provider::ProviderConfigError),
}
impl ConfigError {
	/// Wraps a transport's builder failure inside [`ConfigError`].
	pub fn http_client_build(src: impl 'static + Send + Sync + std::error::Error) -> Self {
		Self::HttpClientBuild { source: Box::new(src) }
	}
}
#[cfg(feature = "reqwest")]
impl From<ReqwestError> for ConfigError {
	fn from(e: ReqwestError) -> Self {
		Self::http_client_build(e)
	}
}

/// Transport-level failures (network, timeout, body).
#[derive(Debug, ThisError)]
pub enum TransportError {
	/// Underlying HTTP client reported a network failure.
	#[error("Network error occurred while calling the provider.")]
	Network {
		/// Transport-specific network error.
		#[source]
		source: BoxError,
	},
	/// The provider did not answer within the configured timeout.
	#[error("Provider did not respond within the configured timeout.")]
	Timeout,
	/// Response body could not be read.
	#[error("Provider response body could not be read.")]
	Body {
		/// Transport-specific read failure.
		#[source]
		source: BoxError,
	},
}
impl TransportError {
	/// Wraps a transport-specific network error.
	pub fn network(src: impl 'static + Send + Sync + std::error::Error) -> Self {
		Self::Network { source: Box::new(src) }
	}

	/// Wraps a transport-specific body read error.
	pub fn body(src: impl 'static + Send + Sync + std::error::Error) -> Self {
		Self::Body { source: Box::new(src) }
	}
}
#[cfg(feature = "reqwest")]
impl From<ReqwestError> for TransportError {
	fn from(e: ReqwestError) -> Self {
		if e.is_timeout() {
			Self::Timeout
		} else if e.is_body() || e.is_decode() {
			Self::body(e)
		} else {
			Self::network(e)
		}
	}
}
