//! Login redirect construction.

// self
use crate::{
	_prelude::*,
	context::{
		AuthContext, MODE_CHECKID_SETUP, PARAM_CLAIMED_ID, PARAM_IDENTITY, PARAM_MODE, PARAM_NS,
		PARAM_REALM, PARAM_RETURN_TO,
	},
	flows::Authenticator,
	obs::{self, FlowKind, FlowOutcome, FlowSpan},
	provider::ProviderConfig,
	transport::VerificationHttpClient,
};

impl<C> Authenticator<C>
where
	C: ?Sized + VerificationHttpClient,
{
	/// Builds the provider login URL the caller should redirect the user to.
	///
	/// The URL carries exactly `openid.claimed_id`, `openid.identity`, `openid.mode`,
	/// `openid.ns`, `openid.realm`, and `openid.return_to`, in that order, with every value
	/// percent-encoded.
	pub fn redirect_url(&self, ctx: &AuthContext) -> Url {
		const KIND: FlowKind = FlowKind::Redirect;

		let _span = FlowSpan::new(KIND, "redirect_url").entered();

		obs::record_flow_outcome(KIND, FlowOutcome::Attempt);

		let url = build_redirect_url(&self.config, ctx);

		obs::record_flow_outcome(KIND, FlowOutcome::Success);

		url
	}
}

/// Builds the provider login URL for `ctx` against `config`.
pub fn build_redirect_url(config: &ProviderConfig, ctx: &AuthContext) -> Url {
	let mut url = config.login_endpoint().clone();
	let mut pairs = url.query_pairs_mut();

	pairs.append_pair(PARAM_CLAIMED_ID, config.identifier_select());
	pairs.append_pair(PARAM_IDENTITY, config.identifier_select());
	pairs.append_pair(PARAM_MODE, MODE_CHECKID_SETUP);
	pairs.append_pair(PARAM_NS, config.namespace());
	pairs.append_pair(PARAM_REALM, &ctx.realm);
	pairs.append_pair(PARAM_RETURN_TO, &ctx.return_endpoint);

	drop(pairs);

	url
}
