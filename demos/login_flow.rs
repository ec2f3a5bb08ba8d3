//! Walks a login through the three states a handler sees: the first visit, a cancelled login, and
//! a provider callback.
//!
//! Pass the callback's raw request target (for example `/login?openid.ns=...`) as the first
//! argument to verify a real Steam assertion.

// std
use std::env;
// crates.io
use color_eyre::Result;
use http::{HeaderValue, header::HOST};
// self
use steam_openid::{context::CallbackState, flows::ReqwestAuthenticator, request::InboundRequest};

#[tokio::main]
async fn main() -> Result<()> {
	color_eyre::install()?;

	let authenticator = ReqwestAuthenticator::steam()?;
	let callback = env::args().nth(1);
	let requests =
		[Some("/login".to_owned()), Some("/login?openid.mode=cancel".to_owned()), callback];

	for uri in requests.into_iter().flatten() {
		let request =
			InboundRequest::get(uri).with_header(HOST, HeaderValue::from_static("localhost:8080"));
		let ctx = authenticator.derive_context(&request);

		match ctx.state() {
			CallbackState::Initiated => {
				println!("Send your user to {}.", authenticator.redirect_url(&ctx));
			},
			CallbackState::Cancelled => println!("The user cancelled the login."),
			CallbackState::CallbackReceived => match authenticator.validate(&ctx).await {
				Ok(steam_id) => println!("Signed in as Steam ID {steam_id}."),
				Err(e) => eprintln!("Callback rejected: {e}."),
			},
			CallbackState::Unexpected(mode) => eprintln!("Unexpected mode `{mode}`."),
		}
	}

	Ok(())
}
