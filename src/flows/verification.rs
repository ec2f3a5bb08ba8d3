//! Verification round-trip helpers: request form assembly and response parsing.

// self
use crate::{
	_prelude::*,
	auth::SteamId,
	context::{
		AuthContext, MODE_CHECK_AUTHENTICATION, MODE_ID_RES, PARAM_ASSOC_HANDLE, PARAM_MODE,
		PARAM_NS, PARAM_RETURN_TO, PARAM_SIG, PARAM_SIGNED,
	},
	obs,
	provider::ProviderConfig,
};

const PARAM_PREFIX: &str = "openid.";

/// Provider answer to a `check_authentication` request, split into its two meaningful lines.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ProviderVerificationResult<'a> {
	/// Line 0; must read `ns:<namespace>`.
	pub namespace_line: &'a str,
	/// Line 1 (`is_valid:true|false`), when the body has one.
	pub validity_line: Option<&'a str>,
}
impl<'a> ProviderVerificationResult<'a> {
	/// Splits a response body on `\n`.
	pub fn parse(body: &'a str) -> Self {
		let mut lines = body.split('\n');

		Self { namespace_line: lines.next().unwrap_or_default(), validity_line: lines.next() }
	}

	/// Checks the namespace declaration, then the validity line.
	///
	/// The validity line is rejected when missing or when it ends with `false`.
	pub fn ensure_valid(&self, config: &ProviderConfig) -> Result<()> {
		let expected = config.namespace_declaration();

		if self.namespace_line != expected {
			obs::log_rejection("namespace_mismatch", &expected, self.namespace_line);

			return Err(Error::NamespaceMismatch { received: self.namespace_line.to_owned() });
		}

		match self.validity_line {
			Some(line) if !line.ends_with("false") => Ok(()),
			line => {
				obs::log_rejection("provider_rejected", "is_valid:true", line.unwrap_or_default());

				Err(Error::ProviderRejected)
			},
		}
	}
}

/// Rejects any callback whose mode is not exactly `id_res`.
pub fn ensure_id_res(ctx: &AuthContext) -> Result<()> {
	if ctx.mode() == MODE_ID_RES {
		Ok(())
	} else {
		Err(Error::ModeMismatch { mode: ctx.mode().to_owned() })
	}
}

/// Compares the echoed `openid.return_to` with the return endpoint recomputed for this request.
pub fn ensure_return_endpoint(ctx: &AuthContext) -> Result<()> {
	let received = ctx.param(PARAM_RETURN_TO);

	if received == ctx.return_endpoint {
		Ok(())
	} else {
		obs::log_rejection("return_to_mismatch", &ctx.return_endpoint, received);

		Err(Error::ReturnUrlMismatch {
			expected: ctx.return_endpoint.clone(),
			received: received.to_owned(),
		})
	}
}

/// Builds the `check_authentication` form for a callback.
///
/// `openid.assoc_handle`, `openid.signed`, `openid.sig`, and `openid.ns` are copied verbatim
/// (empty when absent), every field named in `openid.signed` is copied from the callback, and
/// `openid.mode` is forced to `check_authentication`.
pub fn verification_form(ctx: &AuthContext) -> Vec<(String, String)> {
	let mut form = BTreeMap::new();

	for key in [PARAM_ASSOC_HANDLE, PARAM_SIGNED, PARAM_SIG, PARAM_NS] {
		form.insert(key.to_owned(), ctx.param(key).to_owned());
	}
	for name in ctx.param(PARAM_SIGNED).split(',').filter(|name| !name.is_empty()) {
		let key = format!("{PARAM_PREFIX}{name}");
		let value = ctx.param(&key).to_owned();

		form.insert(key, value);
	}

	form.insert(PARAM_MODE.to_owned(), MODE_CHECK_AUTHENTICATION.to_owned());

	form.into_iter().collect()
}

/// Extracts the canonical Steam ID from a claimed identifier.
pub fn extract_steam_id(config: &ProviderConfig, claimed_id: &str) -> Result<SteamId> {
	let malformed = || Error::MalformedIdentifier { claimed_id: claimed_id.to_owned() };
	let Some(digits) = config.extract_account_digits(claimed_id) else {
		obs::log_rejection("malformed_identifier", config.identity_host(), claimed_id);

		return Err(malformed());
	};

	SteamId::new(digits).map_err(|_| malformed())
}
