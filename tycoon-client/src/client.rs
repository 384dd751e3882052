//! High-level Tycoon API client
//!
//! [`TycoonClient`] owns the request pipeline and exposes every read-only
//! endpoint as a typed method. User-scoped endpoints transparently resolve
//! Discord snowflakes to native user ids; server-scoped endpoints validate
//! the requested server index before anything touches the network.

use crate::charges::ChargeTracker;
use crate::http::{HttpClient, PUBLIC_KEY_HEADER};
use crate::response_types::{
    ActiveAirline, Business, Chest, CoastGuard, EconomyRecord, Faction, OwnedVehicles, PigsHeist,
    PlayerPositions, PlayerWidget, Players, RacingMap, RacingTrack, ResolvedUser, Streak, Top10,
    UserData, UserRace, Weather, parse_economy,
};
use crate::server::ServerPool;
use crate::snowflake::is_snowflake;
use crate::{Error, Result};
use reqwest::Client;
use std::time::Duration;
use tracing::debug;

/// Default request timeout in seconds
const DEFAULT_TIMEOUT_SECS: u64 = 10;

/// Default number of rotation replays before a call is abandoned
const DEFAULT_MAX_RETRIES: u32 = 3;

/// Stat names accepted by the `/top10` endpoint
pub const STAT_NAMES: &[&str] = &[
    "firefighter_streak_record",
    "omni_void_leaderboard",
    "ems_streak_record",
    "houses_crafted",
    "toll_paid",
    "drops_collected",
    "quarry_excavate",
    "quarry_coop",
    "quarry_deliver",
    "quarry_solo",
];

/// Client for the Transport Tycoon statistics API.
///
/// Cheap to clone; clones share the rotation cursor, retry state, and charge
/// tracking.
///
/// # Example
///
/// ```no_run
/// use tycoon_client::TycoonClient;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let client = TycoonClient::builder()
///     .api_key("your-key")
///     .track_charges(true)
///     .build()?;
///
/// let charges = client.setup_charges().await?;
/// println!("remaining charges: {charges:?}");
///
/// let players = client.players(0).await?;
/// println!("{} players online", players.players.len());
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct TycoonClient {
    http: HttpClient,
}

impl TycoonClient {
    /// Create a client with default configuration and no API key
    pub fn new() -> Result<Self> {
        Self::builder().build()
    }

    /// Create a client with an API key and default configuration
    pub fn with_key(api_key: impl Into<String>) -> Result<Self> {
        Self::builder().api_key(api_key).build()
    }

    /// Create a builder for configuring the client
    pub fn builder() -> TycoonClientBuilder {
        TycoonClientBuilder::new()
    }

    /// Charge tracking state for this client
    pub fn charges(&self) -> &ChargeTracker {
        self.http.charges()
    }

    /// The server pool this client rotates through
    pub fn servers(&self) -> &ServerPool {
        self.http.pool()
    }

    fn server_host(&self, server: usize) -> Result<&str> {
        self.http
            .pool()
            .host(server)
            .ok_or_else(|| Error::invalid_server_index(server, self.http.pool().len()))
    }

    /// Resolve a user identifier to a native user id.
    ///
    /// Identifiers shaped like Discord snowflakes go through the
    /// `/snowflake2user` lookup; everything else passes through unchanged. A
    /// failed lookup propagates; a call can never proceed with an
    /// unresolved id.
    pub async fn resolve_user_id(&self, id: &str) -> Result<String> {
        if !is_snowflake(id) {
            return Ok(id.to_string());
        }
        debug!("Resolving Discord snowflake {}", id);
        let resolved = self.user_from_discord(id).await?;
        Ok(resolved.user_id.to_string())
    }

    /// Load the remaining charge count from the API.
    ///
    /// Only meaningful when charge tracking is enabled and a key is
    /// configured; returns `Ok(None)` otherwise. A returned count of zero is
    /// treated as an invalid-key signal, not a legitimate empty quota.
    pub async fn setup_charges(&self) -> Result<Option<u64>> {
        if !self.http.charges().checking() || !self.http.has_key() {
            return Ok(None);
        }
        let response = self.http.get("/charges.json").await?;
        let counts: Vec<u64> = response.json().await?;
        match counts.first().copied() {
            None | Some(0) => Err(Error::NoCharges),
            Some(count) => {
                self.http.charges().store(count);
                Ok(Some(count))
            }
        }
    }

    // Server-scoped endpoints. These address one caller-chosen origin
    // directly rather than the rotating one.

    /// Active airline routes on one server (consumes a charge)
    pub async fn active_airline_routes(&self, server: usize) -> Result<ActiveAirline> {
        let host = self.server_host(server)?;
        let url = format!("http://{host}/status/airline.json");
        self.http.charges().optimistic_decrement();
        Ok(self.http.get_absolute(url).await?.json().await?)
    }

    /// Live player positions on one server (consumes a charge)
    pub async fn player_positions(&self, server: usize) -> Result<PlayerPositions> {
        let host = self.server_host(server)?;
        let url = format!("http://{host}/status/map/positions.json");
        self.http.charges().optimistic_decrement();
        Ok(self.http.get_absolute(url).await?.json().await?)
    }

    /// Connected players on one server (consumes a charge)
    pub async fn players(&self, server: usize) -> Result<Players> {
        let host = self.server_host(server)?;
        let url = format!("http://{host}/status/players.json");
        self.http.charges().optimistic_decrement();
        Ok(self.http.get_absolute(url).await?.json().await?)
    }

    /// Player widget payload for one server
    pub async fn players_widget(&self, server: usize) -> Result<PlayerWidget> {
        let host = self.server_host(server)?;
        let url = format!("http://{host}/status/widget/players.json");
        Ok(self.http.get_absolute(url).await?.json().await?)
    }

    /// Advanced user list for one server, as raw JSON
    pub async fn advanced_userlist(&self, server: usize) -> Result<serde_json::Value> {
        let host = self.server_host(server)?;
        let url = format!("http://{host}/status/advanced/");
        Ok(self.http.get_absolute(url).await?.json().await?)
    }

    /// Current weather on one server
    pub async fn weather(&self, server: usize) -> Result<Weather> {
        let host = self.server_host(server)?;
        let url = format!("http://{host}/status/weather.json");
        Ok(self.http.get_absolute(url).await?.json().await?)
    }

    /// Coast guard callout state on one server
    pub async fn coastguard(&self, server: usize) -> Result<CoastGuard> {
        let host = self.server_host(server)?;
        let url = format!("http://{host}/status/coastguard.json");
        Ok(self.http.get_absolute(url).await?.json().await?)
    }

    /// PIGS heist state on one server
    pub async fn pigs_heist(&self, server: usize) -> Result<PigsHeist> {
        let host = self.server_host(server)?;
        let url = format!("http://{host}/status/pigs.json");
        Ok(self.http.get_absolute(url).await?.json().await?)
    }

    // Key-scoped endpoints. These use the rotating pool origin.

    /// Translate a Discord snowflake to a native user id (consumes a charge)
    pub async fn user_from_discord(&self, discord_id: &str) -> Result<ResolvedUser> {
        self.http.charges().optimistic_decrement();
        let response = self.http.get(format!("/snowflake2user/{discord_id}")).await?;
        Ok(response.json().await?)
    }

    /// Core data for a user (consumes a charge)
    pub async fn user_data(&self, user_id: &str) -> Result<UserData> {
        let user_id = self.resolve_user_id(user_id).await?;
        self.http.charges().optimistic_decrement();
        Ok(self.http.get(format!("/data/{user_id}")).await?.json().await?)
    }

    /// Extended data for a user (consumes a charge)
    pub async fn user_data_advanced(&self, user_id: &str) -> Result<UserData> {
        let user_id = self.resolve_user_id(user_id).await?;
        self.http.charges().optimistic_decrement();
        Ok(self
            .http
            .get(format!("/dataadv/{user_id}"))
            .await?
            .json()
            .await?)
    }

    /// Businesses owned by a user (consumes a charge)
    pub async fn user_businesses(&self, user_id: &str) -> Result<Business> {
        let user_id = self.resolve_user_id(user_id).await?;
        self.http.charges().optimistic_decrement();
        Ok(self
            .http
            .get(format!("/getuserbiz/{user_id}"))
            .await?
            .json()
            .await?)
    }

    /// Faction membership for a user (consumes a charge)
    pub async fn user_faction(&self, user_id: &str) -> Result<Faction> {
        let user_id = self.resolve_user_id(user_id).await?;
        self.http.charges().optimistic_decrement();
        Ok(self
            .http
            .get(format!("/getuserfaq/{user_id}"))
            .await?
            .json()
            .await?)
    }

    /// Rendered inventory for a user, as HTML (consumes a charge)
    pub async fn user_inventory_html(&self, user_id: &str) -> Result<String> {
        let user_id = self.resolve_user_id(user_id).await?;
        self.http.charges().optimistic_decrement();
        Ok(self
            .http
            .get(format!("/inventory/{user_id}"))
            .await?
            .text()
            .await?)
    }

    /// Rendered skill list for a user, as HTML
    pub async fn user_skills_html(&self, user_id: &str) -> Result<String> {
        let user_id = self.resolve_user_id(user_id).await?;
        Ok(self
            .http
            .get(format!("/skills/{user_id}"))
            .await?
            .text()
            .await?)
    }

    /// Vehicles owned by a user
    pub async fn user_owned_vehicles(&self, user_id: &str) -> Result<OwnedVehicles> {
        let user_id = self.resolve_user_id(user_id).await?;
        Ok(self
            .http
            .get(format!("/ownedvehicles/{user_id}"))
            .await?
            .json()
            .await?)
    }

    /// Finished races for a user
    pub async fn user_races(&self, user_id: &str) -> Result<Vec<UserRace>> {
        let user_id = self.resolve_user_id(user_id).await?;
        Ok(self
            .http
            .get(format!("/racing/races/{user_id}"))
            .await?
            .json()
            .await?)
    }

    /// Daily play streak for a user
    pub async fn user_streak(&self, user_id: &str) -> Result<Streak> {
        let user_id = self.resolve_user_id(user_id).await?;
        Ok(self
            .http
            .get(format!("/streak/{user_id}"))
            .await?
            .json()
            .await?)
    }

    /// All racing tracks with their current world records
    pub async fn racing_tracks(&self) -> Result<Vec<RacingTrack>> {
        Ok(self.http.get("/racing/tracks").await?.json().await?)
    }

    /// Checkpoint layout of one racing track
    pub async fn racing_map(&self, track_id: &str) -> Result<RacingMap> {
        Ok(self
            .http
            .get(format!("/racing/map/{track_id}"))
            .await?
            .json()
            .await?)
    }

    /// Contents of a storage chest (consumes a charge)
    pub async fn chest(&self, search_id: &str) -> Result<Chest> {
        self.http.charges().optimistic_decrement();
        Ok(self
            .http
            .get(format!("/chest/{search_id}"))
            .await?
            .json()
            .await?)
    }

    /// Extended contents of a storage chest
    pub async fn chest_advanced(&self, search_id: &str) -> Result<Chest> {
        Ok(self
            .http
            .get(format!("/chestadv/{search_id}"))
            .await?
            .json()
            .await?)
    }

    /// Leaderboard for one stat (consumes a charge).
    ///
    /// The stat name is validated against [`STAT_NAMES`] before anything is
    /// dispatched.
    pub async fn top10(&self, stat: &str) -> Result<Top10> {
        if !STAT_NAMES.contains(&stat) {
            return Err(Error::invalid_stat_name(stat));
        }
        self.http.charges().optimistic_decrement();
        Ok(self.http.get(format!("/top10/{stat}")).await?.json().await?)
    }

    /// Configuration of a server resource, as raw JSON
    pub async fn resource_config(&self, resource_name: &str) -> Result<serde_json::Value> {
        Ok(self
            .http
            .get(format!("/config/{resource_name}"))
            .await?
            .json()
            .await?)
    }

    /// Server economy history, parsed from the semicolon-separated feed
    pub async fn economy(&self) -> Result<Vec<EconomyRecord>> {
        let text = self.http.get("/economy.csv").await?.text().await?;
        parse_economy(&text)
    }

    /// Deadliest catch event state, as raw JSON.
    ///
    /// Accepts an optional caller-supplied public key sent in place of the
    /// account key header.
    pub async fn deadliest_catch(&self, public_key: Option<&str>) -> Result<serde_json::Value> {
        let mut descriptor = crate::http::RequestDescriptor::relative("/deadliest_catch.json");
        if let Some(key) = public_key {
            descriptor = descriptor.header(PUBLIC_KEY_HEADER, key);
        }
        Ok(self.http.execute(descriptor).await?.json().await?)
    }
}

/// Builder for configuring a [`TycoonClient`].
///
/// All settings are fixed once `build()` returns.
#[derive(Debug, Clone)]
pub struct TycoonClientBuilder {
    api_key: Option<String>,
    track_charges: bool,
    timeout_secs: u64,
    max_retries: u32,
    disable_retry: bool,
    servers: Option<Vec<String>>,
}

impl TycoonClientBuilder {
    /// Create a new builder with default values
    pub fn new() -> Self {
        Self {
            api_key: None,
            track_charges: false,
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            max_retries: DEFAULT_MAX_RETRIES,
            disable_retry: false,
            servers: None,
        }
    }

    /// Set the account API key, sent on every request
    pub fn api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = Some(api_key.into());
        self
    }

    /// Enable local charge tracking, synchronized from response headers
    pub fn track_charges(mut self, track: bool) -> Self {
        self.track_charges = track;
        self
    }

    /// Set the request timeout in seconds
    pub fn timeout_secs(mut self, secs: u64) -> Self {
        self.timeout_secs = secs;
        self
    }

    /// Set how many rotation replays a call may consume before failing
    pub fn max_retries(mut self, retries: u32) -> Self {
        self.max_retries = retries;
        self
    }

    /// Disable rotation and replay entirely; failures surface immediately
    pub fn disable_retry(mut self, disable: bool) -> Self {
        self.disable_retry = disable;
        self
    }

    /// Replace the production server pool with a custom origin list
    pub fn servers(mut self, hosts: impl IntoIterator<Item = impl Into<String>>) -> Self {
        self.servers = Some(hosts.into_iter().map(Into::into).collect());
        self
    }

    /// Build the client
    pub fn build(self) -> Result<TycoonClient> {
        let pool = match self.servers {
            Some(hosts) => ServerPool::new(hosts)?,
            None => ServerPool::default_pool(),
        };
        let client = Client::builder()
            .timeout(Duration::from_secs(self.timeout_secs))
            .build()?;
        let charges = ChargeTracker::new(self.track_charges);

        Ok(TycoonClient {
            http: HttpClient::new(
                client,
                pool,
                charges,
                self.api_key,
                self.max_retries,
                self.disable_retry,
            ),
        })
    }
}

impl Default for TycoonClientBuilder {
    fn default() -> Self {
        Self::new()
    }
}
