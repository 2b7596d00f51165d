use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{LinkedProfile, Player, PlayerStatus};
use crate::rank::rank_tier;

/// A player as shown in the online list, with presence and rank derived at
/// read time.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct PlayerView {
    pub user_id: String,
    pub username: String,
    pub status: PlayerStatus,
    pub effective_status: PlayerStatus,
    pub last_active: Option<DateTime<Utc>>,
    pub profile: LinkedProfile,
    pub rank_tier: u8,
    pub win_rate: u32,
}

impl PlayerView {
    pub fn from_player(player: Player, effective_status: PlayerStatus) -> Self {
        let rank_tier = player.rank_label().map(rank_tier).unwrap_or(0);
        let win_rate = player
            .profile
            .as_linked()
            .map(|profile| profile.win_rate())
            .unwrap_or(0);

        PlayerView {
            user_id: player.user_id,
            username: player.username,
            status: player.status,
            effective_status,
            last_active: player.last_active,
            profile: player.profile,
            rank_tier,
            win_rate,
        }
    }
}
