use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use tracing::{debug, info};

use crate::clients::valorant_client::ValorantApi;
use crate::models::player::{LinkedProfile, Player, ValorantProfile};
use crate::models::profile::{validate_riot_id, ProfileData};
use crate::repositories::errors::player_repository_errors::PlayerRepositoryError;
use crate::repositories::player_repository::PlayerRepository;
use crate::retry::RetryPolicy;
use crate::services::errors::profile_service_errors::ProfileServiceError;

/// Linked profiles older than this are fetched again by the refresh job.
pub const PROFILE_REFRESH_INTERVAL: Duration = Duration::from_secs(5 * 60);

pub struct ProfileService {
    api: Arc<dyn ValorantApi + Send + Sync>,
    player_repository: Arc<dyn PlayerRepository + Send + Sync>,
}

impl ProfileService {
    pub fn new(
        api: Arc<dyn ValorantApi + Send + Sync>,
        player_repository: Arc<dyn PlayerRepository + Send + Sync>,
    ) -> Self {
        ProfileService {
            api,
            player_repository,
        }
    }

    fn map_repository_error(e: PlayerRepositoryError) -> ProfileServiceError {
        match e {
            PlayerRepositoryError::NotFound => ProfileServiceError::PlayerNotFound,
            PlayerRepositoryError::ProfileChanged => ProfileServiceError::ProfileChanged,
            _ => ProfileServiceError::RepositoryError(e.to_string()),
        }
    }

    /// Looks the Riot ID up upstream and extracts rank, card image and
    /// lifetime stats.
    pub async fn validate_profile(
        &self,
        valorant_name: &str,
        valorant_tag: &str,
    ) -> Result<ProfileData, ProfileServiceError> {
        let name = valorant_name.trim();
        let tag = valorant_tag.trim();
        if name.is_empty() || tag.is_empty() {
            return Err(ProfileServiceError::ValidationError(
                "Missing valorant_name or valorant_tag".to_string(),
            ));
        }
        let data = self.api.fetch_mmr(name, tag).await?;
        let profile = ProfileData::from_mmr(&data);
        debug!(
            "Validated {}#{}: rank {:?}, {} games",
            name, tag, profile.valorant_rank, profile.lifetime_games_played
        );
        Ok(profile)
    }

    /// Validates the Riot ID and stores the resulting profile on the player.
    pub async fn link_profile(
        &self,
        user_id: &str,
        valorant_name: &str,
        valorant_tag: &str,
    ) -> Result<ValorantProfile, ProfileServiceError> {
        let name = valorant_name.trim();
        let tag = valorant_tag.trim();
        validate_riot_id(name, tag).map_err(ProfileServiceError::ValidationError)?;

        let data = self.validate_profile(name, tag).await?;
        let profile = ValorantProfile {
            valorant_name: name.to_string(),
            valorant_tag: tag.to_string(),
            valorant_rank: data.valorant_rank,
            profile_photo_url: data.profile_photo_url,
            lifetime_wins: data.lifetime_wins,
            lifetime_games_played: data.lifetime_games_played,
            last_profile_update: Utc::now(),
        };
        self.player_repository
            .update_profile(user_id, &LinkedProfile::Linked(profile.clone()))
            .await
            .map_err(Self::map_repository_error)?;
        info!("Linked {} to {}", user_id, profile.riot_id());
        Ok(profile)
    }

    /// Linked players whose profile is at least `max_age` old at `now`.
    pub async fn refresh_candidates(
        &self,
        now: DateTime<Utc>,
        max_age: Duration,
    ) -> Result<Vec<Player>, ProfileServiceError> {
        let players = self
            .player_repository
            .list_players()
            .await
            .map_err(Self::map_repository_error)?;
        Ok(players
            .into_iter()
            .filter(|player| {
                player.profile.as_linked().is_some_and(|profile| {
                    (now - profile.last_profile_update)
                        .to_std()
                        .map(|age| age >= max_age)
                        .unwrap_or(false)
                })
            })
            .collect())
    }

    /// Fetches the player's linked profile again, retrying transient upstream
    /// failures according to `policy`, and stores it unless the player has
    /// linked a different Riot ID in the meantime.
    pub async fn refresh_profile(
        &self,
        player: &Player,
        policy: &RetryPolicy,
    ) -> Result<ValorantProfile, ProfileServiceError> {
        let current = player
            .profile
            .as_linked()
            .ok_or(ProfileServiceError::NotLinked)?;

        let data = policy
            .run(
                || self.api.fetch_mmr(&current.valorant_name, &current.valorant_tag),
                |e| e.is_transient(),
            )
            .await?;
        let fresh = ProfileData::from_mmr(&data);

        let profile = ValorantProfile {
            valorant_rank: fresh.valorant_rank,
            profile_photo_url: fresh.profile_photo_url,
            lifetime_wins: fresh.lifetime_wins,
            lifetime_games_played: fresh.lifetime_games_played,
            last_profile_update: Utc::now(),
            ..current.clone()
        };
        self.player_repository
            .refresh_linked_profile(&player.user_id, &profile)
            .await
            .map_err(Self::map_repository_error)?;
        Ok(profile)
    }
}
