//! Canonical account identifier produced by a successful validation.

// std
use std::{borrow::Borrow, ops::Deref};
// self
use crate::_prelude::*;

/// Error returned when Steam ID validation fails.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, ThisError)]
pub enum SteamIdError {
	/// The identifier was empty.
	#[error("Steam ID cannot be empty.")]
	Empty,
	/// The identifier contains something other than ASCII digits.
	#[error("Steam ID must contain only decimal digits: {value:?}.")]
	NonDigit {
		/// Rejected input.
		value: String,
	},
}

/// Canonical numeric account identifier extracted from a claimed identifier.
///
/// Digits are kept exactly as the provider issued them, including leading zeros.
#[derive(Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct SteamId(String);
impl SteamId {
	/// Creates a new identifier after validation.
	pub fn new(value: impl AsRef<str>) -> Result<Self, SteamIdError> {
		let view = value.as_ref();

		validate_view(view)?;

		Ok(Self(view.to_owned()))
	}

	/// Returns the identifier as a 64-bit integer when it fits.
	pub fn to_u64(&self) -> Option<u64> {
		self.0.parse().ok()
	}
}
impl Deref for SteamId {
	type Target = str;

	fn deref(&self) -> &Self::Target {
		&self.0
	}
}
impl AsRef<str> for SteamId {
	fn as_ref(&self) -> &str {
		&self.0
	}
}
impl Borrow<str> for SteamId {
	fn borrow(&self) -> &str {
		&self.0
	}
}
impl From<SteamId> for String {
	fn from(value: SteamId) -> Self {
		value.0
	}
}
impl TryFrom<String> for SteamId {
	type Error = SteamIdError;

	fn try_from(value: String) -> Result<Self, Self::Error> {
		validate_view(&value)?;

		Ok(Self(value))
	}
}
impl Debug for SteamId {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		write!(f, "SteamId({})", self.0)
	}
}
impl Display for SteamId {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(&self.0)
	}
}
impl FromStr for SteamId {
	type Err = SteamIdError;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		Self::new(s)
	}
}

fn validate_view(view: &str) -> Result<(), SteamIdError> {
	if view.is_empty() {
		return Err(SteamIdError::Empty);
	}
	if !view.bytes().all(|b| b.is_ascii_digit()) {
		return Err(SteamIdError::NonDigit { value: view.to_owned() });
	}

	Ok(())
}
