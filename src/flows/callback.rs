//! Callback validation: the `id_res` → verification → Steam ID pipeline.
//!
//! [`Authenticator::validate`] gates on the mode, re-checks the echoed return endpoint, performs
//! exactly one `check_authentication` round-trip, and only then trusts the claimed identifier.
//! Nothing is retried; every failure is terminal for the attempt.

// self
use crate::{
	_prelude::*,
	auth::SteamId,
	context::{AuthContext, PARAM_CLAIMED_ID},
	flows::{
		Authenticator, ProviderVerificationResult, ensure_id_res, ensure_return_endpoint,
		extract_steam_id, verification_form,
	},
	obs::{self, FlowKind, FlowOutcome, FlowSpan},
	profile::{PlayerSummary, ProfileLookup},
	transport::{VerificationHttpClient, VerificationRequest},
};

impl<C> Authenticator<C>
where
	C: ?Sized + VerificationHttpClient,
{
	/// Validates a provider callback and returns the canonical Steam ID.
	///
	/// `ctx` must be derived from the callback request itself so its return endpoint is
	/// recomputed independently of the value the provider echoes back.
	///
	/// # Errors
	///
	/// - [`Error::ModeMismatch`] when the mode is not `id_res` (no network call).
	/// - [`Error::ReturnUrlMismatch`] when `openid.return_to` differs (no network call).
	/// - [`Error::Transport`] when the verification round-trip fails or times out.
	/// - [`Error::NamespaceMismatch`] / [`Error::ProviderRejected`] for negative provider answers.
	/// - [`Error::MalformedIdentifier`] when `openid.claimed_id` is not a provider identifier.
	pub async fn validate(&self, ctx: &AuthContext) -> Result<SteamId> {
		const KIND: FlowKind = FlowKind::Validation;

		let span = FlowSpan::new(KIND, "validate");

		obs::record_flow_outcome(KIND, FlowOutcome::Attempt);

		let result = span.instrument(self.validate_callback(ctx)).await;

		obs::record_flow_result(KIND, &result);

		result
	}

	/// Validates the callback, then looks up the player's profile with `lookup`.
	pub async fn validate_and_fetch_profile<P>(
		&self,
		ctx: &AuthContext,
		lookup: &P,
	) -> Result<PlayerSummary>
	where
		P: ?Sized + ProfileLookup,
	{
		const KIND: FlowKind = FlowKind::ProfileLookup;

		let steam_id = self.validate(ctx).await?;
		let span = FlowSpan::new(KIND, "validate_and_fetch_profile");

		obs::record_flow_outcome(KIND, FlowOutcome::Attempt);

		let result = span.instrument(lookup.fetch_profile(&steam_id)).await.map_err(Error::from);

		obs::record_flow_result(KIND, &result);

		result
	}

	async fn validate_callback(&self, ctx: &AuthContext) -> Result<SteamId> {
		ensure_id_res(ctx)?;
		ensure_return_endpoint(ctx)?;

		let form = verification_form(ctx);
		let response = self
			.http_client
			.post_form(VerificationRequest {
				endpoint: self.config.login_endpoint(),
				form: &form,
				timeout: self.config.verification_timeout(),
			})
			.await?;

		ProviderVerificationResult::parse(&response.body).ensure_valid(&self.config)?;

		extract_steam_id(&self.config, ctx.param(PARAM_CLAIMED_ID))
	}
}

#[cfg(test)]
mod tests {
	// std
	use std::sync::atomic::{AtomicUsize, Ordering};
	// self
	use super::*;
	use crate::{
		context::{MODE_ID_RES, PARAM_MODE, PARAM_RETURN_TO, PARAM_SIGNED},
		error::TransportError,
		provider::ProviderConfig,
		transport::{VerificationFuture, VerificationResponse},
	};

	enum Reply {
		Body(&'static str),
		Timeout,
	}

	struct ScriptedClient {
		reply: Reply,
		calls: AtomicUsize,
	}
	impl ScriptedClient {
		fn new(reply: Reply) -> Self {
			Self { reply, calls: AtomicUsize::new(0) }
		}
	}
	impl VerificationHttpClient for ScriptedClient {
		fn post_form<'a>(&'a self, _request: VerificationRequest<'a>) -> VerificationFuture<'a> {
			self.calls.fetch_add(1, Ordering::SeqCst);

			let result = match self.reply {
				Reply::Body(body) => Ok(VerificationResponse { status: 200, body: body.to_owned() }),
				Reply::Timeout => Err(TransportError::Timeout),
			};

			Box::pin(async move { result })
		}
	}

	fn authenticator(reply: Reply) -> Authenticator<ScriptedClient> {
		let config = ProviderConfig::steam().expect("Steam defaults should validate.");

		Authenticator::with_http_client(config, ScriptedClient::new(reply))
	}

	fn callback(mode: &str) -> AuthContext {
		AuthContext {
			realm: "https://app.example.com".into(),
			return_endpoint: "https://app.example.com/login".into(),
			parameters: [
				(PARAM_MODE, mode),
				(PARAM_RETURN_TO, "https://app.example.com/login"),
				(PARAM_SIGNED, "claimed_id"),
				(PARAM_CLAIMED_ID, "https://steamcommunity.com/openid/id/76561198000000000"),
			]
			.into_iter()
			.map(|(k, v)| (k.to_owned(), v.to_owned()))
			.collect(),
		}
	}

	#[tokio::test]
	async fn positive_assertion_yields_steam_id() {
		let auth =
			authenticator(Reply::Body("ns:http://specs.openid.net/auth/2.0\nis_valid:true\n"));
		let id = auth
			.validate(&callback(MODE_ID_RES))
			.await
			.expect("Positive assertions should validate.");

		assert_eq!(id.as_ref(), "76561198000000000");
		assert_eq!(auth.http_client.calls.load(Ordering::SeqCst), 1);
	}

	#[tokio::test]
	async fn cancelled_callback_never_reaches_the_provider() {
		let auth =
			authenticator(Reply::Body("ns:http://specs.openid.net/auth/2.0\nis_valid:true"));
		let err = auth
			.validate(&callback("cancel"))
			.await
			.expect_err("Cancelled callbacks must not validate.");

		assert!(matches!(err, Error::ModeMismatch { .. }));
		assert_eq!(auth.http_client.calls.load(Ordering::SeqCst), 0);
	}

	#[tokio::test]
	async fn timeout_surfaces_as_transport_error() {
		let auth = authenticator(Reply::Timeout);
		let err = auth
			.validate(&callback(MODE_ID_RES))
			.await
			.expect_err("Timeouts must fail the attempt.");

		assert!(matches!(err, Error::Transport(TransportError::Timeout)));
		assert_eq!(auth.http_client.calls.load(Ordering::SeqCst), 1);
	}
}
