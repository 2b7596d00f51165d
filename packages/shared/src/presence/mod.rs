//! Derives the status other players see from the declared status and the
//! last heartbeat.

pub mod heartbeat;

use crate::models::player::{Player, PlayerStatus};
use chrono::{DateTime, Utc};
use std::time::Duration;

/// A player without a heartbeat for this long is shown as offline.
pub const OFFLINE_THRESHOLD: Duration = Duration::from_secs(60);

/// The declared status while the heartbeat is fresh, `Offline` otherwise.
/// Heartbeats stamped in the future count as fresh.
pub fn effective_status(
    last_active: Option<DateTime<Utc>>,
    declared: PlayerStatus,
    now: DateTime<Utc>,
    threshold: Duration,
) -> PlayerStatus {
    let Some(last_active) = last_active else {
        return PlayerStatus::Offline;
    };
    let age = (now - last_active).to_std().unwrap_or(Duration::ZERO);
    if age >= threshold {
        PlayerStatus::Offline
    } else {
        declared
    }
}

pub fn player_effective_status(player: &Player, now: DateTime<Utc>) -> PlayerStatus {
    effective_status(player.last_active, player.status, now, OFFLINE_THRESHOLD)
}

pub fn is_online(player: &Player, now: DateTime<Utc>) -> bool {
    player_effective_status(player, now) != PlayerStatus::Offline
}
