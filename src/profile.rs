//! Player profile lookups performed after a successful validation.
//!
//! [`ProfileLookup`] is the seam [`Authenticator::validate_and_fetch_profile`] calls with the
//! freshly validated [`SteamId`]. [`WebApiProfileLookup`] implements it against the Steam Web API
//! `GetPlayerSummaries` endpoint.
//!
//! [`Authenticator::validate_and_fetch_profile`]: crate::flows::Authenticator::validate_and_fetch_profile

// self
use crate::{_prelude::*, auth::SteamId, error::TransportError};
#[cfg(feature = "reqwest")] use crate::auth::ApiKey;

/// Production `GetPlayerSummaries` endpoint.
pub const PLAYER_SUMMARIES_ENDPOINT: &str =
	"https://api.steampowered.com/ISteamUser/GetPlayerSummaries/v0002/";

/// Future returned by [`ProfileLookup::fetch_profile`].
pub type ProfileFuture<'a> =
	Pin<Box<dyn Future<Output = Result<PlayerSummary, ProfileError>> + 'a + Send>>;

/// Source of player profiles keyed by Steam ID.
pub trait ProfileLookup
where
	Self: Send + Sync,
{
	/// Fetches the public profile of `steam_id`.
	fn fetch_profile<'a>(&'a self, steam_id: &'a SteamId) -> ProfileFuture<'a>;
}

/// Profile lookup failures.
#[derive(Debug, ThisError)]
pub enum ProfileError {
	/// Request never produced a readable response.
	#[error(transparent)]
	Transport(#[from] TransportError),
	/// Web API answered with a non-success status.
	#[error("Profile endpoint returned HTTP status {status}.")]
	Status {
		/// HTTP status code.
		status: u16,
	},
	/// Response body was not a player summaries document.
	#[error("Profile endpoint returned malformed JSON.")]
	Parse {
		/// Structured parsing failure, including the offending path.
		#[source]
		source: serde_path_to_error::Error<serde_json::Error>,
	},
	/// Web API returned no player for the requested Steam ID.
	#[error("No profile found for Steam ID {steam_id}.")]
	NotFound {
		/// Steam ID that was looked up.
		steam_id: String,
	},
	/// Profile endpoint URL could not be parsed.
	#[error("Profile endpoint URL is invalid.")]
	InvalidEndpoint {
		/// Underlying parse failure.
		#[source]
		source: url::ParseError,
	},
}

/// Public summary of a Steam account as returned by `GetPlayerSummaries`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerSummary {
	/// 64-bit Steam ID.
	#[serde(rename = "steamid")]
	pub steam_id: SteamId,
	/// Display name.
	#[serde(rename = "personaname", default)]
	pub persona_name: String,
	/// Community profile URL.
	#[serde(rename = "profileurl", default)]
	pub profile_url: String,
	/// 32x32 avatar URL.
	#[serde(default)]
	pub avatar: String,
	/// 64x64 avatar URL.
	#[serde(rename = "avatarmedium", default)]
	pub avatar_medium: String,
	/// 184x184 avatar URL.
	#[serde(rename = "avatarfull", default)]
	pub avatar_full: String,
	/// Online state; `0` means offline or private.
	#[serde(rename = "personastate", default)]
	pub persona_state: u8,
	/// `1` for private or friends-only profiles, `3` for public ones.
	#[serde(rename = "communityvisibilitystate", default)]
	pub community_visibility_state: u8,
	/// `1` once the community profile has been configured.
	#[serde(rename = "profilestate", default, skip_serializing_if = "Option::is_none")]
	pub profile_state: Option<u8>,
	/// Unix time of the last logoff.
	#[serde(rename = "lastlogoff", default, skip_serializing_if = "Option::is_none")]
	pub last_logoff: Option<u64>,
	/// Whether the profile accepts comments.
	#[serde(rename = "commentpermission", default, skip_serializing_if = "Option::is_none")]
	pub comment_permission: Option<u8>,
	/// Real name, when public.
	#[serde(rename = "realname", default, skip_serializing_if = "Option::is_none")]
	pub real_name: Option<String>,
	/// Primary group ID, when public.
	#[serde(rename = "primaryclanid", default, skip_serializing_if = "Option::is_none")]
	pub primary_clan_id: Option<String>,
	/// Unix time of account creation, when public.
	#[serde(rename = "timecreated", default, skip_serializing_if = "Option::is_none")]
	pub time_created: Option<u64>,
	/// App ID of the game being played.
	#[serde(rename = "gameid", default, skip_serializing_if = "Option::is_none")]
	pub game_id: Option<String>,
	/// Address of the game server being played on.
	#[serde(rename = "gameserverip", default, skip_serializing_if = "Option::is_none")]
	pub game_server_ip: Option<String>,
	/// Name of the game being played.
	#[serde(rename = "gameextrainfo", default, skip_serializing_if = "Option::is_none")]
	pub game_extra_info: Option<String>,
	/// ISO 3166 country code.
	#[serde(rename = "loccountrycode", default, skip_serializing_if = "Option::is_none")]
	pub loc_country_code: Option<String>,
	/// State or province code.
	#[serde(rename = "locstatecode", default, skip_serializing_if = "Option::is_none")]
	pub loc_state_code: Option<String>,
	/// Internal city ID.
	#[serde(rename = "loccityid", default, skip_serializing_if = "Option::is_none")]
	pub loc_city_id: Option<u32>,
}

#[derive(Debug, Deserialize)]
struct PlayerSummaries {
	response: PlayerList,
}

#[derive(Debug, Deserialize)]
struct PlayerList {
	#[serde(default)]
	players: Vec<PlayerSummary>,
}

/// Decodes a `GetPlayerSummaries` body into its player list.
pub fn parse_player_summaries(body: &[u8]) -> Result<Vec<PlayerSummary>, ProfileError> {
	let mut deserializer = serde_json::Deserializer::from_slice(body);
	let summaries: PlayerSummaries = serde_path_to_error::deserialize(&mut deserializer)
		.map_err(|source| ProfileError::Parse { source })?;

	Ok(summaries.response.players)
}

/// Picks the summary for `steam_id` out of a decoded player list.
pub fn select_player(
	steam_id: &SteamId,
	players: Vec<PlayerSummary>,
) -> Result<PlayerSummary, ProfileError> {
	players
		.into_iter()
		.next()
		.ok_or_else(|| ProfileError::NotFound { steam_id: steam_id.to_string() })
}

/// [`ProfileLookup`] backed by the Steam Web API.
#[cfg(feature = "reqwest")]
#[derive(Clone, Debug)]
pub struct WebApiProfileLookup {
	api_key: ApiKey,
	endpoint: Url,
	http_client: ReqwestClient,
}
#[cfg(feature = "reqwest")]
impl WebApiProfileLookup {
	/// Creates a lookup against the production endpoint.
	pub fn steam(api_key: ApiKey, http_client: ReqwestClient) -> Result<Self, ProfileError> {
		let endpoint = Url::parse(PLAYER_SUMMARIES_ENDPOINT)
			.map_err(|source| ProfileError::InvalidEndpoint { source })?;

		Ok(Self::with_endpoint(api_key, endpoint, http_client))
	}

	/// Creates a lookup against a custom `GetPlayerSummaries` endpoint.
	pub fn with_endpoint(api_key: ApiKey, endpoint: Url, http_client: ReqwestClient) -> Self {
		Self { api_key, endpoint, http_client }
	}

	/// Endpoint queried by this lookup.
	pub fn endpoint(&self) -> &Url {
		&self.endpoint
	}

	fn request_url(&self, steam_id: &SteamId) -> Url {
		let mut url = self.endpoint.clone();

		url.query_pairs_mut()
			.append_pair("key", self.api_key.expose())
			.append_pair("steamids", steam_id.as_ref());

		url
	}
}
#[cfg(feature = "reqwest")]
impl ProfileLookup for WebApiProfileLookup {
	fn fetch_profile<'a>(&'a self, steam_id: &'a SteamId) -> ProfileFuture<'a> {
		Box::pin(async move {
			let response = self
				.http_client
				.get(self.request_url(steam_id))
				.send()
				.await
				.map_err(TransportError::from)?;
			let status = response.status();

			if !status.is_success() {
				return Err(ProfileError::Status { status: status.as_u16() });
			}

			let body = response.bytes().await.map_err(TransportError::from)?;

			select_player(steam_id, parse_player_summaries(&body)?)
		})
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	const SUMMARIES: &str = r#"{
		"response": {
			"players": [
				{
					"steamid": "76561198000000000",
					"communityvisibilitystate": 3,
					"profilestate": 1,
					"personaname": "gaben",
					"profileurl": "https://steamcommunity.com/id/gaben/",
					"avatar": "https://avatars.example.com/a.jpg",
					"avatarmedium": "https://avatars.example.com/a_medium.jpg",
					"avatarfull": "https://avatars.example.com/a_full.jpg",
					"personastate": 1,
					"timecreated": 1063407589,
					"loccountrycode": "US"
				}
			]
		}
	}"#;

	fn steam_id() -> SteamId {
		SteamId::new("76561198000000000").expect("Fixture Steam ID should be valid.")
	}

	#[test]
	fn summaries_decode_into_typed_players() {
		let players = parse_player_summaries(SUMMARIES.as_bytes())
			.expect("Fixture summaries should decode successfully.");
		let player = select_player(&steam_id(), players).expect("Fixture should contain a player.");

		assert_eq!(player.steam_id, steam_id());
		assert_eq!(player.persona_name, "gaben");
		assert_eq!(player.community_visibility_state, 3);
		assert_eq!(player.time_created, Some(1_063_407_589));
		assert_eq!(player.loc_country_code.as_deref(), Some("US"));
		assert_eq!(player.real_name, None);
	}

	#[test]
	fn parse_errors_report_the_offending_path() {
		let err = parse_player_summaries(br#"{"response":{"players":[{"steamid":42}]}}"#)
			.expect_err("Numeric Steam IDs must be rejected.");
		let source = match err {
			ProfileError::Parse { source } => source,
			other => panic!("Expected a parse error, got {other:?}."),
		};

		assert_eq!(source.path().to_string(), "response.players[0].steamid");
	}

	#[test]
	fn empty_player_list_is_not_found() {
		let players = parse_player_summaries(br#"{"response":{"players":[]}}"#)
			.expect("Empty player lists should decode.");
		let err = select_player(&steam_id(), players).expect_err("Empty lists must not match.");

		assert!(matches!(err, ProfileError::NotFound { ref steam_id } if steam_id == "76561198000000000"));
	}

	#[cfg(feature = "reqwest")]
	#[test]
	fn request_url_carries_key_and_steam_id() {
		let lookup = WebApiProfileLookup::steam(ApiKey::new("KEY"), ReqwestClient::new())
			.expect("Production endpoint should parse.");
		let url = lookup.request_url(&steam_id());

		assert_eq!(
			url.as_str(),
			"https://api.steampowered.com/ISteamUser/GetPlayerSummaries/v0002/?key=KEY&steamids=76561198000000000"
		);
		assert!(!format!("{lookup:?}").contains("KEY"));
	}
}
