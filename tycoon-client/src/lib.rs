//! Async client for the Transport Tycoon (FiveM) statistics API
//!
//! The API is served by a pool of interchangeable game servers, any of which
//! may be down at a given moment. Every call in this crate goes through a
//! shared request pipeline that handles that reality:
//!
//! - Multi-origin failover: transient failures (timeouts, reset connections,
//!   502 responses) rotate to the next origin in the pool, probe its liveness
//!   endpoint, and replay the original request
//! - Bounded retry: replays are capped by a configurable budget, after which
//!   the triggering error surfaces
//! - Charge tracking: the remaining API-call allowance is mirrored locally
//!   and synchronized from response headers
//! - Identifier normalization: user-scoped endpoints accept Discord
//!   snowflakes and resolve them to native user ids transparently
//!
//! Permanent failures (missing or invalid keys, exhausted charges, unknown
//! routes) are never retried and surface immediately with a stable wire
//! code.
//!
//! # Example
//!
//! ```no_run
//! use tycoon_client::TycoonClient;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let client = TycoonClient::with_key("your-key")?;
//!
//! // Server-scoped call, addressed to server 0
//! let players = client.players(0).await?;
//! println!("{} players online", players.players.len());
//!
//! // User-scoped call; Discord snowflakes resolve transparently
//! let data = client.user_data("123456789012345678").await?;
//! println!("user {} is {:?}", data.user_id, data.name);
//! # Ok(())
//! # }
//! ```

mod charges;
mod client;
mod error;
mod http;
mod response_types;
mod server;
mod snowflake;

pub use charges::{CHARGES_HEADER, ChargeTracker};
pub use client::{STAT_NAMES, TycoonClient, TycoonClientBuilder};
pub use error::{Error, Result};
pub use http::{API_KEY_HEADER, PUBLIC_KEY_HEADER};
pub use response_types::{
    ActiveAirline, Business, Checkpoint, Chest, CoastGuard, CoastGuardPlayer, CoastGuardProgress,
    EconomyRecord, Faction, ItemStack, OwnedVehicles, PigsHeist, PigsPlayer, PlayerEntry,
    PlayerPosition, PlayerPositions, PlayerWidget, Players, RacingMap, RacingTrack, ResolvedUser,
    Streak, Top10, Top10Entry, UserData, UserRace, Vector3, Weather, WeatherKind, WorldRecord,
    parse_economy,
};
pub use server::{DEFAULT_SERVERS, ServerPool};
pub use snowflake::is_snowflake;
