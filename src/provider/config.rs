// crates.io
use regex::Regex;
// self
use crate::{_prelude::*, provider::ProviderConfigBuilder};

/// Steam's OpenID 2.0 login endpoint; serves both the redirect and the verification round-trip.
pub const STEAM_LOGIN_ENDPOINT: &str = "https://steamcommunity.com/openid/login";
/// Host that issues Steam claimed identifiers.
pub const STEAM_IDENTITY_HOST: &str = "steamcommunity.com";
/// OpenID 2.0 protocol namespace.
pub const OPENID_NAMESPACE: &str = "http://specs.openid.net/auth/2.0";
/// Sentinel asking the provider to let the end user pick their identity interactively.
pub const IDENTIFIER_SELECT: &str = "http://specs.openid.net/auth/2.0/identifier_select";
/// Default upper bound for the verification round-trip.
pub const DEFAULT_VERIFICATION_TIMEOUT: StdDuration = StdDuration::from_secs(10);

/// Immutable provider configuration injected into the authenticator.
///
/// Values are validated by [`ProviderConfigBuilder::build`]; the claimed-identifier pattern is
/// compiled once from the identity host so validation never re-parses it.
#[derive(Clone, Debug)]
pub struct ProviderConfig {
	pub(super) login_endpoint: Url,
	pub(super) namespace: String,
	pub(super) identifier_select: String,
	pub(super) identity_host: String,
	pub(super) verification_timeout: StdDuration,
	pub(super) identifier_pattern: Regex,
}
impl ProviderConfig {
	/// Creates a builder seeded with the Steam defaults.
	pub fn builder() -> ProviderConfigBuilder {
		ProviderConfigBuilder::new()
	}

	/// Production configuration for Steam.
	pub fn steam() -> Result<Self, crate::provider::ProviderConfigError> {
		Self::builder().build()
	}

	/// Login endpoint shared by the redirect and the verification round-trip.
	pub fn login_endpoint(&self) -> &Url {
		&self.login_endpoint
	}

	/// Protocol namespace sent as `openid.ns` and expected back from verification.
	pub fn namespace(&self) -> &str {
		&self.namespace
	}

	/// Identifier-select sentinel sent as `openid.claimed_id` and `openid.identity`.
	pub fn identifier_select(&self) -> &str {
		&self.identifier_select
	}

	/// Host that must appear in claimed identifiers.
	pub fn identity_host(&self) -> &str {
		&self.identity_host
	}

	/// Upper bound applied to the verification round-trip.
	pub fn verification_timeout(&self) -> StdDuration {
		self.verification_timeout
	}

	/// Expected first line of a verification response.
	pub fn namespace_declaration(&self) -> String {
		format!("ns:{}", self.namespace)
	}

	/// Extracts the account digits from a claimed identifier, or `None` when the identifier does
	/// not follow `(http|https)://<identity host>/openid/id/<15..=25 digits>`.
	pub fn extract_account_digits<'a>(&self, claimed_id: &'a str) -> Option<&'a str> {
		self.identifier_pattern
			.captures(claimed_id)
			.and_then(|captures| captures.get(1))
			.map(|digits| digits.as_str())
	}
}
