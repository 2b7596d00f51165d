use serde::{Deserialize, Serialize};

use super::PlayerStatus;

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SetStatusRequest {
    pub status: PlayerStatus,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SetUsernameRequest {
    pub username: String,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct OnlinePlayersQuery {
    pub rank: Option<String>,
}
