use std::sync::Arc;

use chrono::{DateTime, Utc};
use tracing::info;

use crate::models::player::responses::PlayerView;
use crate::models::player::{validate_username, Player, PlayerStatus};
use crate::presence::player_effective_status;
use crate::rank::RankFilter;
use crate::repositories::errors::player_repository_errors::PlayerRepositoryError;
use crate::repositories::player_repository::PlayerRepository;
use crate::services::errors::player_service_errors::PlayerServiceError;

pub struct PlayerService {
    repository: Arc<dyn PlayerRepository + Send + Sync>,
}

impl PlayerService {
    pub fn new(repository: Arc<dyn PlayerRepository + Send + Sync>) -> Self {
        PlayerService { repository }
    }

    fn map_error(e: PlayerRepositoryError) -> PlayerServiceError {
        match e {
            PlayerRepositoryError::NotFound => PlayerServiceError::PlayerNotFound,
            _ => PlayerServiceError::RepositoryError(e.to_string()),
        }
    }

    fn require_id(user_id: &str) -> Result<(), PlayerServiceError> {
        if user_id.is_empty() {
            return Err(PlayerServiceError::ValidationError(
                "User ID cannot be empty".to_string(),
            ));
        }
        Ok(())
    }

    pub async fn get_player(&self, user_id: &str) -> Result<Player, PlayerServiceError> {
        Self::require_id(user_id)?;
        self.repository
            .get_player(user_id)
            .await
            .map_err(Self::map_error)
    }

    /// Creates the player document unless it already exists and returns the
    /// stored player either way.
    pub async fn ensure_player(
        &self,
        user_id: &str,
        username: Option<&str>,
    ) -> Result<Player, PlayerServiceError> {
        Self::require_id(user_id)?;
        // Names that would fail a later rename fall back to the generated one.
        let username = username
            .map(str::trim)
            .filter(|name| validate_username(name).is_ok());
        let player = Player::new(user_id, username);
        let created = self
            .repository
            .create_player_if_absent(&player)
            .await
            .map_err(Self::map_error)?;
        if created {
            info!("Created player {} as {}", user_id, player.username);
            return Ok(player);
        }
        self.get_player(user_id).await
    }

    pub async fn set_status(
        &self,
        user_id: &str,
        status: PlayerStatus,
    ) -> Result<Player, PlayerServiceError> {
        Self::require_id(user_id)?;
        let now = Utc::now();
        match self.repository.update_status(user_id, status, now).await {
            Ok(()) => {}
            Err(PlayerRepositoryError::NotFound) => {
                let mut player = Player::new(user_id, None);
                player.status = status;
                player.last_active = Some(now);
                player.last_updated = now;
                let created = self
                    .repository
                    .create_player_if_absent(&player)
                    .await
                    .map_err(Self::map_error)?;
                if created {
                    return Ok(player);
                }
                // Created concurrently by someone else; apply the status on top.
                self.repository
                    .update_status(user_id, status, now)
                    .await
                    .map_err(Self::map_error)?;
            }
            Err(e) => return Err(Self::map_error(e)),
        }
        self.get_player(user_id).await
    }

    pub async fn set_username(
        &self,
        user_id: &str,
        username: &str,
    ) -> Result<Player, PlayerServiceError> {
        Self::require_id(user_id)?;
        let username = username.trim();
        validate_username(username).map_err(PlayerServiceError::ValidationError)?;

        match self.repository.update_username(user_id, username).await {
            Ok(()) => self.get_player(user_id).await,
            Err(PlayerRepositoryError::NotFound) => {
                let player = Player::new(user_id, Some(username));
                let created = self
                    .repository
                    .create_player_if_absent(&player)
                    .await
                    .map_err(Self::map_error)?;
                if created {
                    Ok(player)
                } else {
                    self.repository
                        .update_username(user_id, username)
                        .await
                        .map_err(Self::map_error)?;
                    self.get_player(user_id).await
                }
            }
            Err(e) => Err(Self::map_error(e)),
        }
    }

    pub async fn heartbeat(&self, user_id: &str) -> Result<(), PlayerServiceError> {
        Self::require_id(user_id)?;
        self.repository
            .touch_heartbeat(user_id, Utc::now())
            .await
            .map_err(Self::map_error)
    }

    pub async fn go_offline(&self, user_id: &str) -> Result<(), PlayerServiceError> {
        Self::require_id(user_id)?;
        self.repository
            .mark_offline(user_id, Utc::now())
            .await
            .map_err(Self::map_error)
    }

    /// Players that are online at `now` and fall in the rank bucket, highest
    /// rank first, then best win rate, then name.
    pub async fn list_online_players(
        &self,
        filter: RankFilter,
        now: DateTime<Utc>,
    ) -> Result<Vec<PlayerView>, PlayerServiceError> {
        let players = self
            .repository
            .list_players()
            .await
            .map_err(Self::map_error)?;

        let mut views: Vec<PlayerView> = players
            .into_iter()
            .filter(|player| filter.matches(player.rank_label()))
            .filter_map(|player| {
                let effective = player_effective_status(&player, now);
                (effective != PlayerStatus::Offline)
                    .then(|| PlayerView::from_player(player, effective))
            })
            .collect();

        views.sort_by(|a, b| {
            b.rank_tier
                .cmp(&a.rank_tier)
                .then_with(|| b.win_rate.cmp(&a.win_rate))
                .then_with(|| a.username.to_lowercase().cmp(&b.username.to_lowercase()))
        });
        Ok(views)
    }
}
