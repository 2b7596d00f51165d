use lambda_runtime::{run, service_fn, Error, LambdaEvent};
use serde::Deserialize;
use serde_json::Value;
use std::sync::Arc;
use tracing::info;

use shared::config::{dynamodb_client, required_env};
use shared::repositories::player_repository::DynamoDbPlayerRepository;
use shared::services::player_service::PlayerService;

#[derive(Deserialize)]
struct CognitoEvent {
    request: Request,
}

#[derive(Deserialize)]
struct Request {
    #[serde(rename = "userAttributes")]
    user_attributes: UserAttributes,
}

#[derive(Deserialize)]
struct UserAttributes {
    sub: String,
    preferred_username: Option<String>,
}

#[tokio::main]
async fn main() -> Result<(), Error> {
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::INFO)
        .with_target(false)
        .without_time()
        .init();

    let players_table = required_env("PLAYERS_TABLE")?;
    let client = dynamodb_client().await;
    let player_service = Arc::new(PlayerService::new(Arc::new(
        DynamoDbPlayerRepository::new(client, players_table),
    )));

    run(service_fn(move |event: LambdaEvent<Value>| {
        let player_service = player_service.clone();
        async move { user_signup_handler(&player_service, event.payload).await }
    }))
    .await
}

/// Creates the player document for a newly confirmed account. The trigger
/// must hand the event back unchanged.
async fn user_signup_handler(player_service: &PlayerService, event: Value) -> Result<Value, Error> {
    let parsed: CognitoEvent = serde_json::from_value(event.clone())?;
    let attributes = parsed.request.user_attributes;

    let player = player_service
        .ensure_player(&attributes.sub, attributes.preferred_username.as_deref())
        .await
        .map_err(|e| Error::from(format!("Failed to create player {}: {}", attributes.sub, e)))?;

    info!("Player ready: {} ({})", player.user_id, player.username);
    Ok(event)
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use chrono::{DateTime, Utc};
    use serde_json::json;
    use shared::models::player::{LinkedProfile, Player, PlayerStatus, ValorantProfile};
    use shared::repositories::errors::player_repository_errors::PlayerRepositoryError;
    use shared::repositories::player_repository::PlayerRepository;
    use std::collections::HashMap;
    use tokio::sync::RwLock;

    #[derive(Default)]
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

        async fn update_profile(&self, _: &str, _: &LinkedProfile) -> Result<(), PlayerRepositoryError> {
            Ok(())
        }

        async fn refresh_linked_profile(&self, _: &str, _: &ValorantProfile) -> Result<(), PlayerRepositoryError> {
            Ok(())
        }
    }

    fn signup_event(sub: &str, preferred_username: Option<&str>) -> Value {
        let mut attributes = json!({ "sub": sub, "email": "player@example.com" });
        if let Some(name) = preferred_username {
            attributes["preferred_username"] = json!(name);
        }
        json!({
            "version": "1",
            "triggerSource": "PostConfirmation_ConfirmSignUp",
            "request": { "userAttributes": attributes },
            "response": {}
        })
    }

    #[tokio::test]
    async fn test_signup_creates_offline_player_and_echoes_event() {
        let repository = Arc::new(InMemoryPlayers::default());
        let service = PlayerService::new(repository.clone());
        let event = signup_event("0f9c2a7e-1234-4bcd-9e11-a1b2c3d4e5f6", None);

        let response = user_signup_handler(&service, event.clone()).await.unwrap();

        assert_eq!(response, event);
        let player = repository
            .get_player("0f9c2a7e-1234-4bcd-9e11-a1b2c3d4e5f6")
            .await
            .unwrap();
        assert_eq!(player.username, "Player_d4e5f6");
        assert_eq!(player.status, PlayerStatus::Offline);
    }

    #[tokio::test]
    async fn test_signup_keeps_existing_player() {
        let repository = Arc::new(InMemoryPlayers::default());
        let service = PlayerService::new(repository.clone());

        user_signup_handler(&service, signup_event("u-1", Some("viper_main")))
            .await
            .unwrap();
        user_signup_handler(&service, signup_event("u-1", Some("other_name")))
            .await
            .unwrap();

        let player = repository.get_player("u-1").await.unwrap();
        assert_eq!(player.username, "viper_main");
    }

    #[tokio::test]
    async fn test_signup_with_invalid_preferred_username_uses_fallback() {
        let repository = Arc::new(InMemoryPlayers::default());
        let service = PlayerService::new(repository.clone());

        user_signup_handler(&service, signup_event("sub-000042", Some("x y!")))
            .await
            .unwrap();

        let player = repository.get_player("sub-000042").await.unwrap();
        assert_eq!(player.username, "Player_000042");
    }

    #[tokio::test]
    async fn test_signup_without_sub_fails() {
        let service = PlayerService::new(Arc::new(InMemoryPlayers::default()));
        let event = json!({ "request": { "userAttributes": {} } });

        assert!(user_signup_handler(&service, event).await.is_err());
    }
}
