//! Provider-facing configuration (data) for the single OpenID provider this crate speaks to.
//!
//! `config` exposes the immutable [`ProviderConfig`] consumed by the authenticator: the login
//! endpoint used for both the redirect and the verification round-trip, the protocol namespace,
//! the identifier-select sentinel, and the compiled claimed-identifier pattern. `builder`
//! assembles and validates configurations so tests can point the relying party at a mock
//! provider.

/// Builder API for assembling provider configurations.
pub mod builder;
/// Immutable provider configuration and Steam defaults.
pub mod config;

pub use builder::*;
pub use config::*;
