// crates.io
use regex::Regex;
// self
use crate::{
	_prelude::*,
	provider::{
		DEFAULT_VERIFICATION_TIMEOUT, IDENTIFIER_SELECT, OPENID_NAMESPACE, ProviderConfig,
		STEAM_IDENTITY_HOST, STEAM_LOGIN_ENDPOINT,
	},
};

/// Errors raised while constructing or validating provider configurations.
#[derive(Debug, ThisError)]
pub enum ProviderConfigError {
	/// Login endpoint failed to parse.
	#[error("Login endpoint is not a valid URL.")]
	InvalidLoginEndpoint {
		/// Underlying parsing failure.
		#[source]
		source: url::ParseError,
	},
	/// Login endpoint must be reachable over HTTP(S).
	#[error("The login endpoint must use http or https: {url}.")]
	UnsupportedScheme {
		/// Endpoint URL that failed validation.
		url: String,
	},
	/// Namespace must not be empty.
	#[error("Protocol namespace cannot be empty.")]
	EmptyNamespace,
	/// Identity host must be a bare authority.
	#[error("Identity host {host:?} must be a non-empty host without path or whitespace.")]
	InvalidIdentityHost {
		/// Host that failed validation.
		host: String,
	},
	/// Verification timeout must be positive.
	#[error("Verification timeout must be greater than zero.")]
	ZeroTimeout,
	/// Claimed-identifier pattern could not be compiled.
	#[error("Claimed identifier pattern could not be compiled.")]
	InvalidIdentityPattern {
		/// Underlying regex failure.
		#[source]
		source: regex::Error,
	},
}

/// Builder for [`ProviderConfig`] values, seeded with the Steam defaults.
#[derive(Debug)]
pub struct ProviderConfigBuilder {
	/// Login endpoint override.
	pub login_endpoint: Option<Url>,
	/// Protocol namespace.
	pub namespace: String,
	/// Identifier-select sentinel.
	pub identifier_select: String,
	/// Host that issues claimed identifiers.
	pub identity_host: String,
	/// Upper bound for the verification round-trip.
	pub verification_timeout: StdDuration,
}
impl ProviderConfigBuilder {
	/// Creates a builder seeded with the Steam defaults.
	pub fn new() -> Self {
		Self {
			login_endpoint: None,
			namespace: OPENID_NAMESPACE.into(),
			identifier_select: IDENTIFIER_SELECT.into(),
			identity_host: STEAM_IDENTITY_HOST.into(),
			verification_timeout: DEFAULT_VERIFICATION_TIMEOUT,
		}
	}

	/// Overrides the login endpoint (used for both the redirect and verification).
	pub fn login_endpoint(mut self, url: Url) -> Self {
		self.login_endpoint = Some(url);

		self
	}

	/// Overrides the protocol namespace.
	pub fn namespace(mut self, namespace: impl Into<String>) -> Self {
		self.namespace = namespace.into();

		self
	}

	/// Overrides the identifier-select sentinel.
	pub fn identifier_select(mut self, sentinel: impl Into<String>) -> Self {
		self.identifier_select = sentinel.into();

		self
	}

	/// Overrides the host expected inside claimed identifiers.
	pub fn identity_host(mut self, host: impl Into<String>) -> Self {
		self.identity_host = host.into();

		self
	}

	/// Overrides the verification timeout.
	pub fn verification_timeout(mut self, timeout: StdDuration) -> Self {
		self.verification_timeout = timeout;

		self
	}

	/// Consumes the builder and validates the resulting configuration.
	pub fn build(self) -> Result<ProviderConfig, ProviderConfigError> {
		let login_endpoint = match self.login_endpoint {
			Some(url) => url,
			None => Url::parse(STEAM_LOGIN_ENDPOINT)
				.map_err(|source| ProviderConfigError::InvalidLoginEndpoint { source })?,
		};

		validate_endpoint(&login_endpoint)?;

		if self.namespace.is_empty() {
			return Err(ProviderConfigError::EmptyNamespace);
		}

		validate_identity_host(&self.identity_host)?;

		if self.verification_timeout.is_zero() {
			return Err(ProviderConfigError::ZeroTimeout);
		}

		let identifier_pattern = compile_identifier_pattern(&self.identity_host)?;

		Ok(ProviderConfig {
			login_endpoint,
			namespace: self.namespace,
			identifier_select: self.identifier_select,
			identity_host: self.identity_host,
			verification_timeout: self.verification_timeout,
			identifier_pattern,
		})
	}
}
impl Default for ProviderConfigBuilder {
	fn default() -> Self {
		Self::new()
	}
}

fn validate_endpoint(url: &Url) -> Result<(), ProviderConfigError> {
	match url.scheme() {
		"http" | "https" => Ok(()),
		_ => Err(ProviderConfigError::UnsupportedScheme { url: url.to_string() }),
	}
}

fn validate_identity_host(host: &str) -> Result<(), ProviderConfigError> {
	if host.is_empty() || host.contains('/') || host.chars().any(char::is_whitespace) {
		Err(ProviderConfigError::InvalidIdentityHost { host: host.to_owned() })
	} else {
		Ok(())
	}
}

fn compile_identifier_pattern(host: &str) -> Result<Regex, ProviderConfigError> {
	let pattern = format!(r"^(?:http|https)://{}/openid/id/([0-9]{{15,25}})$", regex::escape(host));

	Regex::new(&pattern).map_err(|source| ProviderConfigError::InvalidIdentityPattern { source })
}
