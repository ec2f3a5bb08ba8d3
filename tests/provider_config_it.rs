// std
use std::time::Duration;
// self
use steam_openid::{
	context::AuthContext,
	error::Error,
	flows::{extract_steam_id, redirect::build_redirect_url},
	provider::{ProviderConfig, ProviderConfigError},
	request::InboundRequest,
	url::Url,
};

fn url(value: &str) -> Url {
	Url::parse(value).expect("Failed to parse provider URL fixture.")
}

#[test]
fn custom_identity_host_drives_identifier_extraction() {
	let config = ProviderConfig::builder()
		.login_endpoint(url("https://id.example.org/openid/login"))
		.identity_host("id.example.org")
		.build()
		.expect("Custom provider configuration should build successfully.");
	let steam_id = extract_steam_id(&config, "https://id.example.org/openid/id/123456789012345678")
		.expect("Identifiers on the configured host should be accepted.");

	assert_eq!(steam_id.as_ref(), "123456789012345678");

	let err = extract_steam_id(&config, "https://steamcommunity.com/openid/id/76561198000000000")
		.expect_err("Identifiers from other hosts must be rejected.");

	assert!(matches!(err, Error::MalformedIdentifier { .. }));

	let err = extract_steam_id(&config, "https://idXexample.org/openid/id/123456789012345678")
		.expect_err("Host dots must match literally.");

	assert!(matches!(err, Error::MalformedIdentifier { .. }));
}

#[test]
fn redirect_targets_the_configured_login_endpoint() {
	let config = ProviderConfig::builder()
		.login_endpoint(url("http://127.0.0.1:8080/openid/login"))
		.build()
		.expect("Local provider configuration should build successfully.");
	let ctx = AuthContext::derive(&InboundRequest::get("/login").with_tls(true));
	let redirect = build_redirect_url(&config, &ctx);

	assert_eq!(redirect.host_str(), Some("127.0.0.1"));
	assert_eq!(redirect.port(), Some(8080));
	assert_eq!(redirect.path(), "/openid/login");
}

#[test]
fn builder_rejects_invalid_settings() {
	let err = ProviderConfig::builder()
		.login_endpoint(url("ftp://steamcommunity.com/openid/login"))
		.build()
		.expect_err("Non-HTTP login endpoints must be rejected.");

	assert!(matches!(err, ProviderConfigError::UnsupportedScheme { .. }));

	let err = ProviderConfig::builder()
		.namespace("")
		.build()
		.expect_err("Empty namespaces must be rejected.");

	assert!(matches!(err, ProviderConfigError::EmptyNamespace));

	let err = ProviderConfig::builder()
		.identity_host("steamcommunity.com/openid")
		.build()
		.expect_err("Identity hosts with paths must be rejected.");

	assert!(matches!(err, ProviderConfigError::InvalidIdentityHost { .. }));

	let err = ProviderConfig::builder()
		.verification_timeout(Duration::ZERO)
		.build()
		.expect_err("Zero timeouts must be rejected.");

	assert!(matches!(err, ProviderConfigError::ZeroTimeout));
}
