use crate::models::player::{LinkedProfile, Player, PlayerStatus, ValorantProfile};
use crate::repositories::errors::player_repository_errors::PlayerRepositoryError;
use async_trait::async_trait;
use aws_sdk_dynamodb::types::AttributeValue;
use aws_sdk_dynamodb::Client;
use chrono::{DateTime, Utc};
use serde_dynamo::aws_sdk_dynamodb_1::{from_item, to_attribute_value, to_item};

#[cfg(test)]
use mockall::automock;

pub struct DynamoDbPlayerRepository {
    pub client: Client,
    pub table_name: String,
}

impl DynamoDbPlayerRepository {
    pub fn new(client: Client, table_name: String) -> Self {
        Self { client, table_name }
    }

    fn key(user_id: &str) -> AttributeValue {
        AttributeValue::S(user_id.to_string())
    }

    fn attribute<T: serde::Serialize>(value: T) -> Result<AttributeValue, PlayerRepositoryError> {
        to_attribute_value(value).map_err(|e| PlayerRepositoryError::Serialization(e.to_string()))
    }

    /// Runs `SET <expression>` on an existing player; a missing player is
    /// reported as `NotFound` instead of creating a partial item.
    async fn update_existing(
        &self,
        user_id: &str,
        set_expression: &str,
        names: &[(&str, &str)],
        values: Vec<(&str, AttributeValue)>,
    ) -> Result<(), PlayerRepositoryError> {
        let mut request = self
            .client
            .update_item()
            .table_name(&self.table_name)
            .key("user_id", Self::key(user_id))
            .update_expression(format!("SET {}", set_expression))
            .condition_expression("attribute_exists(user_id)");
        for (placeholder, name) in names {
            request = request.expression_attribute_names(*placeholder, *name);
        }
        for (placeholder, value) in values {
            request = request.expression_attribute_values(placeholder, value);
        }

        match request.send().await {
            Ok(_) => Ok(()),
            Err(e) => {
                let conditional_failed = e
                    .as_service_error()
                    .map(|se| se.is_conditional_check_failed_exception())
                    .unwrap_or(false);
                if conditional_failed {
                    Err(PlayerRepositoryError::NotFound)
                } else {
                    Err(PlayerRepositoryError::DynamoDb(e.to_string()))
                }
            }
        }
    }
}

#[cfg_attr(test, automock)]
#[async_trait]
pub trait PlayerRepository: Send + Sync {
    /// Stores the player unless one already exists. Returns whether it was created.
    async fn create_player_if_absent(&self, player: &Player) -> Result<bool, PlayerRepositoryError>;
    async fn get_player(&self, user_id: &str) -> Result<Player, PlayerRepositoryError>;
    async fn list_players(&self) -> Result<Vec<Player>, PlayerRepositoryError>;
    async fn update_status(
        &self,
        user_id: &str,
        status: PlayerStatus,
        at: DateTime<Utc>,
    ) -> Result<(), PlayerRepositoryError>;
    async fn touch_heartbeat(
        &self,
        user_id: &str,
        at: DateTime<Utc>,
    ) -> Result<(), PlayerRepositoryError>;
    async fn mark_offline(&self, user_id: &str, at: DateTime<Utc>)
        -> Result<(), PlayerRepositoryError>;
    async fn update_username(
        &self,
        user_id: &str,
        username: &str,
    ) -> Result<(), PlayerRepositoryError>;
    async fn update_profile(
        &self,
        user_id: &str,
        profile: &LinkedProfile,
    ) -> Result<(), PlayerRepositoryError>;
    /// Overwrites the linked profile only while the player is still linked to
    /// the same Riot ID; otherwise `ProfileChanged`.
    async fn refresh_linked_profile(
        &self,
        user_id: &str,
        profile: &ValorantProfile,
    ) -> Result<(), PlayerRepositoryError>;
}

#[async_trait]
impl PlayerRepository for DynamoDbPlayerRepository {
    async fn create_player_if_absent(&self, player: &Player) -> Result<bool, PlayerRepositoryError> {
        let item =
            to_item(player).map_err(|e| PlayerRepositoryError::Serialization(e.to_string()))?;
        let result = self
            .client
            .put_item()
            .table_name(&self.table_name)
            .set_item(Some(item))
            .condition_expression("attribute_not_exists(user_id)")
            .send()
            .await;
        match result {
            Ok(_) => Ok(true),
            Err(e) => {
                let conditional_failed = e
                    .as_service_error()
                    .map(|se| se.is_conditional_check_failed_exception())
                    .unwrap_or(false);
                if conditional_failed {
                    Ok(false)
                } else {
                    Err(PlayerRepositoryError::DynamoDb(e.to_string()))
                }
            }
        }
    }

    async fn get_player(&self, user_id: &str) -> Result<Player, PlayerRepositoryError> {
        let output = self
            .client
            .get_item()
            .table_name(&self.table_name)
            .key("user_id", Self::key(user_id))
            .send()
            .await
            .map_err(|e| PlayerRepositoryError::DynamoDb(e.to_string()))?;
        if let Some(item) = output.item {
            let player: Player =
                from_item(item).map_err(|e| PlayerRepositoryError::Serialization(e.to_string()))?;
            Ok(player)
        } else {
            Err(PlayerRepositoryError::NotFound)
        }
    }

    async fn list_players(&self) -> Result<Vec<Player>, PlayerRepositoryError> {
        let mut players = Vec::new();
        let mut start_key = None;
        loop {
            let output = self
                .client
                .scan()
                .table_name(&self.table_name)
                .set_exclusive_start_key(start_key)
                .send()
                .await
                .map_err(|e| PlayerRepositoryError::DynamoDb(e.to_string()))?;

            for item in output.items.unwrap_or_default() {
                let player: Player = from_item(item)
                    .map_err(|e| PlayerRepositoryError::Serialization(e.to_string()))?;
                players.push(player);
            }

            match output.last_evaluated_key {
                Some(key) if !key.is_empty() => start_key = Some(key),
                _ => break,
            }
        }
        Ok(players)
    }

    async fn update_status(
        &self,
        user_id: &str,
        status: PlayerStatus,
        at: DateTime<Utc>,
    ) -> Result<(), PlayerRepositoryError> {
        self.update_existing(
            user_id,
            "#status = :status, last_updated = :at, last_active = :at",
            &[("#status", "status")],
            vec![
                (":status", Self::attribute(status)?),
                (":at", Self::attribute(at)?),
            ],
        )
        .await
    }

    async fn touch_heartbeat(
        &self,
        user_id: &str,
        at: DateTime<Utc>,
    ) -> Result<(), PlayerRepositoryError> {
        self.update_existing(
            user_id,
            "last_active = :at",
            &[],
            vec![(":at", Self::attribute(at)?)],
        )
        .await
    }

    async fn mark_offline(
        &self,
        user_id: &str,
        at: DateTime<Utc>,
    ) -> Result<(), PlayerRepositoryError> {
        self.update_existing(
            user_id,
            "#status = :status, last_active = :at",
            &[("#status", "status")],
            vec![
                (":status", Self::attribute(PlayerStatus::Offline)?),
                (":at", Self::attribute(at)?),
            ],
        )
        .await
    }

    async fn update_username(
        &self,
        user_id: &str,
        username: &str,
    ) -> Result<(), PlayerRepositoryError> {
        self.update_existing(
            user_id,
            "username = :username",
            &[],
            vec![(":username", Self::attribute(username)?)],
        )
        .await
    }

    async fn update_profile(
        &self,
        user_id: &str,
        profile: &LinkedProfile,
    ) -> Result<(), PlayerRepositoryError> {
        self.update_existing(
            user_id,
            "profile = :profile",
            &[],
            vec![(":profile", Self::attribute(profile)?)],
        )
        .await
    }

    async fn refresh_linked_profile(
        &self,
        user_id: &str,
        profile: &ValorantProfile,
    ) -> Result<(), PlayerRepositoryError> {
        let linked = LinkedProfile::Linked(profile.clone());
        let result = self
            .client
            .update_item()
            .table_name(&self.table_name)
            .key("user_id", Self::key(user_id))
            .update_expression("SET #profile = :profile")
            .condition_expression(
                "#profile.#kind = :linked AND #profile.valorant_name = :name \
                 AND #profile.valorant_tag = :tag",
            )
            .expression_attribute_names("#profile", "profile")
            .expression_attribute_names("#kind", "kind")
            .expression_attribute_values(":profile", Self::attribute(&linked)?)
            .expression_attribute_values(":linked", AttributeValue::S("linked".to_string()))
            .expression_attribute_values(":name", Self::attribute(&profile.valorant_name)?)
            .expression_attribute_values(":tag", Self::attribute(&profile.valorant_tag)?)
            .send()
            .await;
        match result {
            Ok(_) => Ok(()),
            Err(e) => {
                let conditional_failed = e
                    .as_service_error()
                    .map(|se| se.is_conditional_check_failed_exception())
                    .unwrap_or(false);
                if conditional_failed {
                    Err(PlayerRepositoryError::ProfileChanged)
                } else {
                    Err(PlayerRepositoryError::DynamoDb(e.to_string()))
                }
            }
        }
    }
}
