pub mod requests;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Profile fields extracted from an MMR lookup.
#[derive(Debug, Clone, PartialEq, Default, Deserialize, Serialize)]
pub struct ProfileData {
    pub valorant_rank: Option<String>,
    pub profile_photo_url: Option<String>,
    pub lifetime_wins: u64,
    pub lifetime_games_played: u64,
}

/// Envelope returned by the MMR endpoint. The payload shape varies between
/// API revisions, so `data` stays loosely typed and is read defensively.
#[derive(Debug, Clone, Deserialize)]
pub struct MmrResponse {
    pub data: Option<Value>,
}

impl ProfileData {
    pub fn from_mmr(data: &Value) -> Self {
        let (lifetime_wins, lifetime_games_played) = lifetime_stats(data);
        ProfileData {
            valorant_rank: extract_rank(data),
            profile_photo_url: extract_profile_image_url(data),
            lifetime_wins,
            lifetime_games_played,
        }
    }
}

pub fn extract_rank(data: &Value) -> Option<String> {
    data.pointer("/current_data/currenttierpatched")
        .and_then(Value::as_str)
        .or_else(|| data.get("currenttierpatched").and_then(Value::as_str))
        .filter(|rank| !rank.is_empty())
        .map(str::to_string)
}

pub fn extract_profile_image_url(data: &Value) -> Option<String> {
    const IMAGE_PATHS: [&str; 6] = [
        "/card/small",
        "/card/large",
        "/current_data/images/small",
        "/current_data/images/large",
        "/images/small",
        "/images/large",
    ];

    IMAGE_PATHS
        .iter()
        .filter_map(|path| data.pointer(path).and_then(Value::as_str))
        .find(|url| url.starts_with("http"))
        .map(str::to_string)
}

/// Format check for a Riot ID before it is linked: names are 3..=16
/// letters, digits or spaces, tags 3..=5 letters or digits.
pub fn validate_riot_id(name: &str, tag: &str) -> Result<(), String> {
    if name.trim().is_empty() {
        return Err("Valorant Name is required".to_string());
    }
    if tag.trim().is_empty() {
        return Err("Valorant Tag is required".to_string());
    }
    if !(3..=16).contains(&name.chars().count()) {
        return Err("Valorant Name must be between 3-16 characters".to_string());
    }
    if !(3..=5).contains(&tag.chars().count()) {
        return Err("Valorant Tag must be between 3-5 characters".to_string());
    }
    if !name.chars().all(|c| c.is_ascii_alphanumeric() || c == ' ') {
        return Err("Valorant Name can only contain letters, numbers, and spaces".to_string());
    }
    if !tag.chars().all(|c| c.is_ascii_alphanumeric()) {
        return Err("Valorant Tag can only contain letters and numbers".to_string());
    }
    Ok(())
}

/// Sums `wins` and `number_of_games` across every season bucket.
pub fn lifetime_stats(data: &Value) -> (u64, u64) {
    let Some(seasons) = data.get("by_season").and_then(Value::as_object) else {
        return (0, 0);
    };

    seasons
        .values()
        .filter_map(Value::as_object)
        .fold((0, 0), |(wins, games), season| {
            (
                wins.saturating_add(count_field(season, "wins")),
                games.saturating_add(count_field(season, "number_of_games")),
            )
        })
}

fn count_field(season: &Map<String, Value>, field: &str) -> u64 {
    match season.get(field) {
        Some(Value::Number(n)) => n
            .as_u64()
            .or_else(|| n.as_f64().filter(|f| *f >= 0.0).map(|f| f.trunc() as u64))
            .unwrap_or(0),
        Some(Value::String(s)) => leading_integer(s),
        _ => 0,
    }
}

// Numeric prefix of a string ("12 games" -> 12), 0 when there is none.
fn leading_integer(s: &str) -> u64 {
    let digits: String = s
        .trim_start()
        .chars()
        .take_while(|c| c.is_ascii_digit())
        .collect();
    digits.parse().unwrap_or(0)
}
