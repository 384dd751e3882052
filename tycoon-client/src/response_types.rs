//! Response types for the Tycoon API endpoints
//!
//! JSON payloads deserialize through serde. Fields the upstream game updates
//! freely (inventories, business details, heist callouts) stay as
//! `serde_json::Value` so a server-side addition never breaks deserialization.
//! The economy feed is not JSON at all but a semicolon-separated line format,
//! parsed by [`parse_economy`].

use crate::{Error, Result};
use serde::Deserialize;
use std::collections::HashMap;

/// 3D world position
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
pub struct Vector3 {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

/// One connected player: name, server source id, user id
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct PlayerEntry(pub String, pub u32, pub u64);

/// Payload of `/status/players.json`
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Players {
    pub players: Vec<PlayerEntry>,
}

/// One positioned player: name, server source id, user id, world position
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct PlayerPosition(pub String, pub u32, pub u64, pub Vector3);

/// Payload of `/status/map/positions.json`
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct PlayerPositions {
    pub players: Vec<PlayerPosition>,
}

/// Payload of `/status/widget/players.json`.
///
/// The widget payload carries presentation metadata alongside the player list;
/// only the list is stable across server versions.
#[derive(Debug, Clone, Deserialize)]
pub struct PlayerWidget {
    #[serde(default)]
    pub players: Vec<PlayerEntry>,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

/// Payload of `/status/airline.json`, an opaque route table
#[derive(Debug, Clone, Deserialize)]
#[serde(transparent)]
pub struct ActiveAirline(pub serde_json::Value);

/// Result of a `/snowflake2user` lookup
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct ResolvedUser {
    /// Native Tycoon user id the snowflake maps to
    pub user_id: u64,
}

/// Payload of `/data/{id}` and `/dataadv/{id}`
#[derive(Debug, Clone, Deserialize)]
pub struct UserData {
    pub user_id: u64,
    pub name: Option<String>,
    /// Free-form game state blob, shaped by the live server version
    #[serde(default)]
    pub data: serde_json::Value,
}

/// Payload of `/getuserbiz/{id}`: business name to details
#[derive(Debug, Clone, Deserialize)]
pub struct Business {
    #[serde(default)]
    pub businesses: HashMap<String, serde_json::Value>,
}

/// Payload of `/getuserfaq/{id}`
#[derive(Debug, Clone, Deserialize)]
pub struct Faction {
    pub faction_id: Option<u64>,
    pub name: Option<String>,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

/// Payload of `/ownedvehicles/{id}`: vehicle model to details
#[derive(Debug, Clone, Deserialize)]
#[serde(transparent)]
pub struct OwnedVehicles(pub HashMap<String, serde_json::Value>);

/// One finished race from `/racing/races/{id}`
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct UserRace {
    /// Track identifier
    pub id: String,
    /// Finish time in milliseconds
    pub time: u64,
    pub vehicle: String,
    /// Unix timestamp of the run
    pub date: u64,
}

/// Payload of `/streak/{id}`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct Streak {
    /// Current consecutive-day streak
    pub days: u32,
    /// Longest streak on record
    pub record: u32,
}

/// One item stack inside a chest or inventory
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct ItemStack {
    pub amount: u64,
}

/// Payload of `/chest/{id}` and `/chestadv/{id}`: item name to stack
#[derive(Debug, Clone, Deserialize)]
#[serde(transparent)]
pub struct Chest(pub HashMap<String, ItemStack>);

/// One leaderboard row
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Top10Entry {
    pub amount: i64,
    pub user_id: u64,
    pub username: String,
}

/// Payload of `/top10/{stat}`
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Top10 {
    #[serde(default)]
    pub stat: String,
    #[serde(default)]
    pub top: Vec<Top10Entry>,
}

/// In-game weather conditions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WeatherKind {
    #[serde(rename = "extra sunny")]
    ExtraSunny,
    Clear,
    Neutral,
    Smoggy,
    Foggy,
    Overcast,
    Cloudy,
    Drizzling,
    Rainy,
    Stormy,
    Snowy,
    Blizzardy,
    #[serde(rename = "drizzling snow")]
    DrizzlingSnow,
    Cold,
    Spooky,
}

/// Payload of `/status/weather.json`
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
pub struct Weather {
    pub hour: u8,
    pub minute: u8,
    /// Seconds until the next weather change
    pub time_remaining: i64,
    pub current_weather: WeatherKind,
}

/// Track world record holder
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct WorldRecord {
    pub name: String,
    pub date: u64,
    pub time: u64,
    pub vehicle: String,
}

/// One track from `/racing/tracks`
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct RacingTrack {
    #[serde(rename = "type")]
    pub kind: String,
    pub name: String,
    pub length: f64,
    pub wr: WorldRecord,
    pub class: String,
    pub id: String,
}

/// Race checkpoint: a world position plus heading and map blip
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Checkpoint {
    #[serde(flatten)]
    pub position: Vector3,
    pub h: f64,
    pub blip: i64,
}

/// Payload of `/racing/map/{id}`
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct RacingMap {
    pub finish: Checkpoint,
    pub checkpoints: Vec<Checkpoint>,
}

/// A player in a coast guard party
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct CoastGuardPlayer {
    pub source: u32,
    pub name: String,
    pub user_id: u64,
}

/// Per-player progress in a coast guard callout
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct CoastGuardProgress {
    pub tasks: u32,
    pub pickups: u32,
    #[serde(rename = "gotZone")]
    pub got_zone: bool,
    pub targets_found: u32,
    pub deliveries: u32,
    #[serde(rename = "gotVehicle")]
    pub got_vehicle: bool,
    pub points: u32,
    pub vehicle: String,
}

/// Payload of `/status/coastguard.json`
#[derive(Debug, Clone, Deserialize)]
pub struct CoastGuard {
    /// Active callout description, shaped by the live server version
    #[serde(default)]
    pub callout: serde_json::Value,
    #[serde(default)]
    pub party: Vec<CoastGuardPlayer>,
    #[serde(default)]
    pub players: HashMap<String, CoastGuardProgress>,
}

/// A participant in a PIGS heist
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
pub struct PigsPlayer {
    pub source: u32,
    pub ready: bool,
    /// Share of the take, as a fraction
    pub cut: f64,
}

/// Payload of `/status/pigs.json`
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct PigsHeist {
    pub master: PigsPlayer,
    pub take: i64,
    #[serde(rename = "slaves")]
    pub crew: Vec<PigsPlayer>,
    pub kills: u32,
    pub limit: u32,
}

/// One sample of the server economy feed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EconomyRecord {
    /// Unix timestamp of the sample
    pub timestamp: u64,
    /// Total outstanding debt
    pub debt: i64,
    /// Total money in circulation
    pub money: i64,
    /// Number of players in debt
    pub debt_count: u32,
    pub millionaires: u32,
    pub billionaires: u32,
}

fn parse_field<T: std::str::FromStr>(line: usize, field: &str, value: &str) -> Result<T> {
    value
        .parse()
        .map_err(|_| Error::invalid_economy_record(line, format!("invalid {field}: {value}")))
}

/// Parse the `/economy.csv` feed into typed records.
///
/// Each line is `timestamp;debt;money;debt_count;millionaires;billionaires`.
/// The feed ends with a trailing newline, so empty lines are skipped rather
/// than rejected.
pub fn parse_economy(content: &str) -> Result<Vec<EconomyRecord>> {
    let mut records = Vec::new();

    for (index, line) in content.lines().enumerate() {
        if line.is_empty() {
            continue;
        }
        let line_no = index + 1;
        let fields: Vec<&str> = line.split(';').collect();
        if fields.len() != 6 {
            return Err(Error::invalid_economy_record(
                line_no,
                format!("expected 6 fields, got {}", fields.len()),
            ));
        }

        records.push(EconomyRecord {
            timestamp: parse_field(line_no, "timestamp", fields[0])?,
            debt: parse_field(line_no, "debt", fields[1])?,
            money: parse_field(line_no, "money", fields[2])?,
            debt_count: parse_field(line_no, "debt_count", fields[3])?,
            millionaires: parse_field(line_no, "millionaires", fields[4])?,
            billionaires: parse_field(line_no, "billionaires", fields[5])?,
        });
    }

    Ok(records)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_economy() {
        let content = "1700000000;-5000000;983000000;121;64;3\n1700000600;-4800000;984200000;119;64;3\n";

        let records = parse_economy(content).unwrap();
        assert_eq!(records.len(), 2);

        let first = &records[0];
        assert_eq!(first.timestamp, 1_700_000_000);
        assert_eq!(first.debt, -5_000_000);
        assert_eq!(first.money, 983_000_000);
        assert_eq!(first.debt_count, 121);
        assert_eq!(first.millionaires, 64);
        assert_eq!(first.billionaires, 3);
    }

    #[test]
    fn test_parse_economy_trailing_newline_only() {
        assert!(parse_economy("\n").unwrap().is_empty());
        assert!(parse_economy("").unwrap().is_empty());
    }

    #[test]
    fn test_parse_economy_wrong_field_count() {
        let err = parse_economy("1700000000;1;2;3;4\n").unwrap_err();
        assert_eq!(
            err.to_string(),
            "Invalid economy record at line 1: expected 6 fields, got 5"
        );
    }

    #[test]
    fn test_parse_economy_bad_number() {
        let err = parse_economy("1700000000;1;2;3;4;soon\n").unwrap_err();
        match err {
            Error::InvalidEconomyRecord { line, reason } => {
                assert_eq!(line, 1);
                assert_eq!(reason, "invalid billionaires: soon");
            }
            e => panic!("expected InvalidEconomyRecord, got: {e:?}"),
        }
    }

    #[test]
    fn test_weather_kind_deserializes_spaced_variants() {
        let weather: Weather = serde_json::from_str(
            r#"{"hour":23,"minute":14,"time_remaining":600,"current_weather":"extra sunny"}"#,
        )
        .unwrap();
        assert_eq!(weather.current_weather, WeatherKind::ExtraSunny);
        assert_eq!(weather.hour, 23);
    }

    #[test]
    fn test_player_positions_tuple_entries() {
        let positions: PlayerPositions = serde_json::from_str(
            r#"{"players":[["Dealer",3,732,{"x":128.5,"y":-1024.25,"z":29.0}]]}"#,
        )
        .unwrap();
        assert_eq!(positions.players.len(), 1);
        assert_eq!(positions.players[0].0, "Dealer");
        assert_eq!(positions.players[0].2, 732);
        assert!((positions.players[0].3.x - 128.5).abs() < f64::EPSILON);
    }

    #[test]
    fn test_chest_item_map() {
        let chest: Chest =
            serde_json::from_str(r#"{"scrap_metal":{"amount":420},"fuel":{"amount":61}}"#).unwrap();
        assert_eq!(chest.0["scrap_metal"].amount, 420);
        assert_eq!(chest.0["fuel"].amount, 61);
    }

    #[test]
    fn test_racing_map_checkpoint_flatten() {
        let map: RacingMap = serde_json::from_str(
            r#"{
                "finish": {"x":1.0,"y":2.0,"z":3.0,"h":90.0,"blip":5},
                "checkpoints": [{"x":4.0,"y":5.0,"z":6.0,"h":180.0,"blip":6}]
            }"#,
        )
        .unwrap();
        assert!((map.finish.position.y - 2.0).abs() < f64::EPSILON);
        assert_eq!(map.checkpoints[0].blip, 6);
    }
}
