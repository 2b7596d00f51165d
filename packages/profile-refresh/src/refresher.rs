use chrono::{DateTime, Utc};
use lambda_runtime::Error;
use serde::Serialize;
use shared::retry::RetryPolicy;
use shared::services::profile_service::ProfileService;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, warn};

#[derive(Debug, Default, Clone, PartialEq, Serialize)]
pub struct RefreshSummary {
    pub candidates: usize,
    pub refreshed: usize,
    pub skipped: usize,
}

#[derive(Clone)]
pub struct ProfileRefresher {
    profile_service: Arc<ProfileService>,
    policy: RetryPolicy,
    max_age: Duration,
}

impl ProfileRefresher {
    pub fn new(profile_service: Arc<ProfileService>, policy: RetryPolicy, max_age: Duration) -> Self {
        Self {
            profile_service,
            policy,
            max_age,
        }
    }

    /// Refreshes every stale linked profile one at a time so a run never
    /// bursts the upstream rate limit. Players that still fail after the
    /// retries are left for the next run.
    pub async fn run(&self, now: DateTime<Utc>) -> Result<RefreshSummary, Error> {
        let candidates = self
            .profile_service
            .refresh_candidates(now, self.max_age)
            .await?;
        let mut summary = RefreshSummary {
            candidates: candidates.len(),
            ..RefreshSummary::default()
        };
        debug!("{} profiles due for refresh", summary.candidates);

        for player in &candidates {
            match self
                .profile_service
                .refresh_profile(player, &self.policy)
                .await
            {
                Ok(profile) => {
                    summary.refreshed += 1;
                    debug!(
                        "Refreshed {} ({}): {:?}",
                        player.user_id,
                        profile.riot_id(),
                        profile.valorant_rank
                    );
                }
                Err(e) => {
                    summary.skipped += 1;
                    warn!("Skipping profile refresh for {}: {}", player.user_id, e);
                }
            }
        }

        info!(
            "Profile refresh finished: {} refreshed, {} skipped",
            summary.refreshed, summary.skipped
        );
        Ok(summary)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use chrono::TimeDelta;
    use serde_json::{json, Value};
    use shared::clients::errors::valorant_client_errors::ValorantClientError;
    use shared::clients::valorant_client::ValorantApi;
    use shared::models::player::{LinkedProfile, Player, PlayerStatus, ValorantProfile};
    use shared::repositories::errors::player_repository_errors::PlayerRepositoryError;
    use shared::repositories::player_repository::PlayerRepository;
    use std::collections::HashMap;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use tokio::sync::RwLock;

    struct InMemoryPlayers {
        players: RwLock<HashMap<String, Player>>,
    }

    #[async_trait]
    impl PlayerRepository for InMemoryPlayers {
        async fn create_player_if_absent(&self, player: &Player) -> Result<bool, PlayerRepositoryError> {
            let mut players = self.players.write().await;
            if players.contains_key(&player.user_id) {
                return Ok(false);
            }
            players.insert(player.user_id.clone(), player.clone());
            Ok(true)
        }

        async fn get_player(&self, user_id: &str) -> Result<Player, PlayerRepositoryError> {
            self.players
                .read()
                .await
                .get(user_id)
                .cloned()
                .ok_or(PlayerRepositoryError::NotFound)
        }

        async fn list_players(&self) -> Result<Vec<Player>, PlayerRepositoryError> {
            Ok(self.players.read().await.values().cloned().collect())
        }

        async fn update_status(&self, _: &str, _: PlayerStatus, _: DateTime<Utc>) -> Result<(), PlayerRepositoryError> {
            Ok(())
        }

        async fn touch_heartbeat(&self, _: &str, _: DateTime<Utc>) -> Result<(), PlayerRepositoryError> {
            Ok(())
        }

        async fn mark_offline(&self, _: &str, _: DateTime<Utc>) -> Result<(), PlayerRepositoryError> {
            Ok(())
        }

        async fn update_username(&self, _: &str, _: &str) -> Result<(), PlayerRepositoryError> {
            Ok(())
        }

        async fn update_profile(&self, user_id: &str, profile: &LinkedProfile) -> Result<(), PlayerRepositoryError> {
            let mut players = self.players.write().await;
            let player = players.get_mut(user_id).ok_or(PlayerRepositoryError::NotFound)?;
            player.profile = profile.clone();
            Ok(())
        }

        async fn refresh_linked_profile(&self, user_id: &str, profile: &ValorantProfile) -> Result<(), PlayerRepositoryError> {
            let mut players = self.players.write().await;
            let player = players.get_mut(user_id).ok_or(PlayerRepositoryError::NotFound)?;
            let same_account = player.profile.as_linked().is_some_and(|current| {
                current.valorant_name == profile.valorant_name
                    && current.valorant_tag == profile.valorant_tag
            });
            if !same_account {
                return Err(PlayerRepositoryError::ProfileChanged);
            }
            player.profile = LinkedProfile::Linked(profile.clone());
            Ok(())
        }
    }

    /// Answers by Riot name: "busy" is always rate limited, "flaky" fails
    /// once, anything else returns a Diamond 1 profile.
    struct ScriptedApi {
        calls: AtomicUsize,
        flaky_failures: AtomicUsize,
    }

    #[async_trait]
    impl ValorantApi for ScriptedApi {
        async fn fetch_mmr(&self, name: &str, _tag: &str) -> Result<Value, ValorantClientError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            match name {
                "busy" => Err(ValorantClientError::RateLimited),
                "flaky" if self.flaky_failures.fetch_add(1, Ordering::SeqCst) == 0 => {
                    Err(ValorantClientError::Upstream(502))
                }
                _ => Ok(json!({
                    "current_data": { "currenttierpatched": "Diamond 1" },
                    "by_season": { "e7a1": { "wins": 6, "number_of_games": 10 } }
                })),
            }
        }
    }

    /// Relinks the player to another Riot ID while the lookup is in flight.
    struct RelinkingApi {
        players: Arc<InMemoryPlayers>,
    }

    #[async_trait]
    impl ValorantApi for RelinkingApi {
        async fn fetch_mmr(&self, _name: &str, _tag: &str) -> Result<Value, ValorantClientError> {
            let relinked = linked("racer", "newname", Utc::now());
            self.players
                .update_profile("racer", &relinked.profile)
                .await
                .map_err(|e| ValorantClientError::Network(e.to_string()))?;
            Ok(json!({ "current_data": { "currenttierpatched": "Radiant" } }))
        }
    }

    fn linked(user_id: &str, name: &str, updated: DateTime<Utc>) -> Player {
        let mut player = Player::new(user_id, None);
        player.profile = LinkedProfile::Linked(ValorantProfile {
            valorant_name: name.to_string(),
            valorant_tag: "0001".to_string(),
            valorant_rank: Some("Iron 1".to_string()),
            profile_photo_url: None,
            lifetime_wins: 0,
            lifetime_games_played: 0,
            last_profile_update: updated,
        });
        player
    }

    #[tokio::test(start_paused = true)]
    async fn test_run_refreshes_stale_profiles_and_skips_failures() {
        let now = Utc::now();
        let players = Arc::new(InMemoryPlayers {
            players: RwLock::new(HashMap::new()),
        });
        for player in [
            linked("fresh", "fresh", now - TimeDelta::minutes(2)),
            linked("stale", "stale", now - TimeDelta::minutes(10)),
            linked("flaky", "flaky", now - TimeDelta::minutes(10)),
            linked("busy", "busy", now - TimeDelta::hours(3)),
            Player::new("unlinked", None),
        ] {
            players.create_player_if_absent(&player).await.unwrap();
        }
        let api = Arc::new(ScriptedApi {
            calls: AtomicUsize::new(0),
            flaky_failures: AtomicUsize::new(0),
        });
        let service = Arc::new(ProfileService::new(api.clone(), players.clone()));
        let refresher = ProfileRefresher::new(
            service,
            RetryPolicy::default().without_jitter(),
            Duration::from_secs(300),
        );

        let summary = refresher.run(now).await.unwrap();

        assert_eq!(
            summary,
            RefreshSummary {
                candidates: 3,
                refreshed: 2,
                skipped: 1,
            }
        );
        // stale: 1, flaky: 2, busy: 1 + 2 retries
        assert_eq!(api.calls.load(Ordering::SeqCst), 6);

        let stale = players.get_player("stale").await.unwrap();
        assert_eq!(stale.rank_label(), Some("Diamond 1"));
        let busy = players.get_player("busy").await.unwrap();
        assert_eq!(busy.rank_label(), Some("Iron 1"));
        let fresh = players.get_player("fresh").await.unwrap();
        assert_eq!(fresh.rank_label(), Some("Iron 1"));
    }

    #[tokio::test]
    async fn test_run_keeps_profile_relinked_during_refresh() {
        let now = Utc::now();
        let players = Arc::new(InMemoryPlayers {
            players: RwLock::new(HashMap::new()),
        });
        players
            .create_player_if_absent(&linked("racer", "oldname", now - TimeDelta::hours(1)))
            .await
            .unwrap();
        let api = Arc::new(RelinkingApi {
            players: players.clone(),
        });
        let service = Arc::new(ProfileService::new(api, players.clone()));
        let refresher = ProfileRefresher::new(
            service,
            RetryPolicy::default().without_jitter(),
            Duration::from_secs(300),
        );

        let summary = refresher.run(now).await.unwrap();

        assert_eq!(summary.refreshed, 0);
        assert_eq!(summary.skipped, 1);
        let racer = players.get_player("racer").await.unwrap();
        let profile = racer.profile.as_linked().unwrap();
        assert_eq!(profile.valorant_name, "newname");
        assert_eq!(profile.valorant_rank.as_deref(), Some("Iron 1"));
    }
}
