pub mod requests;
pub mod responses;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

pub const USERNAME_MIN_LEN: usize = 3;
pub const USERNAME_MAX_LEN: usize = 20;

/// Status a player declares for themselves. Stored with the display labels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize, Serialize)]
pub enum PlayerStatus {
    #[serde(rename = "Looking to Queue")]
    LookingToQueue,
    #[serde(rename = "Available for 5v5")]
    AvailableFor5v5,
    #[serde(rename = "Offline")]
    Offline,
}

impl PlayerStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            PlayerStatus::LookingToQueue => "Looking to Queue",
            PlayerStatus::AvailableFor5v5 => "Available for 5v5",
            PlayerStatus::Offline => "Offline",
        }
    }
}

impl fmt::Display for PlayerStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PlayerStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Looking to Queue" => Ok(PlayerStatus::LookingToQueue),
            "Available for 5v5" => Ok(PlayerStatus::AvailableFor5v5),
            "Offline" => Ok(PlayerStatus::Offline),
            other => Err(format!("Unknown player status: {}", other)),
        }
    }
}

/// Cached view of a player's Valorant account.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct ValorantProfile {
    pub valorant_name: String,
    pub valorant_tag: String,
    pub valorant_rank: Option<String>,
    pub profile_photo_url: Option<String>,
    pub lifetime_wins: u64,
    pub lifetime_games_played: u64,
    pub last_profile_update: DateTime<Utc>,
}

impl ValorantProfile {
    /// Lifetime win rate as a rounded percentage, 0 without games.
    pub fn win_rate(&self) -> u32 {
        win_rate(self.lifetime_wins, self.lifetime_games_played)
    }

    pub fn riot_id(&self) -> String {
        format!("{}#{}", self.valorant_name, self.valorant_tag)
    }
}

pub fn win_rate(wins: u64, games: u64) -> u32 {
    if games == 0 {
        return 0;
    }
    ((wins as f64 / games as f64) * 100.0).round() as u32
}

#[derive(Debug, Clone, PartialEq, Default, Deserialize, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum LinkedProfile {
    #[default]
    Unlinked,
    Linked(ValorantProfile),
}

impl LinkedProfile {
    pub fn as_linked(&self) -> Option<&ValorantProfile> {
        match self {
            LinkedProfile::Linked(profile) => Some(profile),
            LinkedProfile::Unlinked => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct Player {
    pub user_id: String,
    pub username: String,
    pub status: PlayerStatus,
    pub last_active: Option<DateTime<Utc>>,
    pub last_updated: DateTime<Utc>,
    #[serde(default)]
    pub profile: LinkedProfile,
}

impl Player {
    /// New players start Offline with no heartbeat.
    pub fn new(user_id: &str, username: Option<&str>) -> Self {
        Player {
            user_id: user_id.to_string(),
            username: username
                .map(str::to_string)
                .unwrap_or_else(|| fallback_username(user_id)),
            status: PlayerStatus::Offline,
            last_active: None,
            last_updated: Utc::now(),
            profile: LinkedProfile::Unlinked,
        }
    }

    pub fn rank_label(&self) -> Option<&str> {
        self.profile
            .as_linked()
            .and_then(|profile| profile.valorant_rank.as_deref())
    }
}

/// Display name used until a player picks one: `Player_` plus the last six
/// characters of the user id.
pub fn fallback_username(user_id: &str) -> String {
    let chars: Vec<char> = user_id.chars().collect();
    let start = chars.len().saturating_sub(6);
    let suffix: String = chars[start..].iter().collect();
    format!("Player_{}", suffix)
}

pub fn validate_username(name: &str) -> Result<(), String> {
    let len = name.chars().count();
    if len < USERNAME_MIN_LEN {
        return Err(format!(
            "Username must be at least {} characters.",
            USERNAME_MIN_LEN
        ));
    }
    if len > USERNAME_MAX_LEN {
        return Err(format!(
            "Username must be at most {} characters.",
            USERNAME_MAX_LEN
        ));
    }
    if !name.chars().all(|c| c.is_ascii_alphanumeric() || c == '_') {
        return Err("Username can only contain letters, numbers, and underscores.".to_string());
    }
    Ok(())
}
