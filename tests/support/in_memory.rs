//! In-memory stand-ins for the DynamoDB repositories, with the same
//! conditional-write behaviour.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use shared::models::chat::message::Message;
use shared::models::chat::{Chat, ChatStatus};
use shared::models::player::{LinkedProfile, Player, PlayerStatus, ValorantProfile};
use shared::repositories::chat_repository::ChatRepository;
use shared::repositories::errors::chat_repository_errors::ChatRepositoryError;
use shared::repositories::errors::message_repository_errors::MessageRepositoryError;
use shared::repositories::errors::player_repository_errors::PlayerRepositoryError;
use shared::repositories::message_repository::MessageRepository;
use shared::repositories::player_repository::PlayerRepository;
use std::collections::HashMap;
use tokio::sync::RwLock;

#[derive(Default)]
pub struct InMemoryPlayerRepository {
    players: RwLock<HashMap<String, Player>>,
}

impl InMemoryPlayerRepository {
    pub async fn insert(&self, player: Player) {
        self.players
            .write()
            .await
            .insert(player.user_id.clone(), player);
    }

    /// Rewinds a player's heartbeat, as if the client went quiet.
    pub async fn set_last_active(&self, user_id: &str, at: Option<DateTime<Utc>>) {
        if let Some(player) = self.players.write().await.get_mut(user_id) {
            player.last_active = at;
        }
    }

    pub async fn stored(&self, user_id: &str) -> Option<Player> {
        self.players.read().await.get(user_id).cloned()
    }

    async fn modify<F>(&self, user_id: &str, change: F) -> Result<(), PlayerRepositoryError>
    where
        F: FnOnce(&mut Player) + Send,
    {
        let mut players = self.players.write().await;
        let player = players
            .get_mut(user_id)
            .ok_or(PlayerRepositoryError::NotFound)?;
        change(player);
        Ok(())
    }
}

#[async_trait]
impl PlayerRepository for InMemoryPlayerRepository {
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

    async fn update_status(
        &self,
        user_id: &str,
        status: PlayerStatus,
        at: DateTime<Utc>,
    ) -> Result<(), PlayerRepositoryError> {
        self.modify(user_id, |player| {
            player.status = status;
            player.last_updated = at;
            player.last_active = Some(at);
        })
        .await
    }

    async fn touch_heartbeat(
        &self,
        user_id: &str,
        at: DateTime<Utc>,
    ) -> Result<(), PlayerRepositoryError> {
        self.modify(user_id, |player| player.last_active = Some(at))
            .await
    }

    async fn mark_offline(
        &self,
        user_id: &str,
        at: DateTime<Utc>,
    ) -> Result<(), PlayerRepositoryError> {
        self.modify(user_id, |player| {
            player.status = PlayerStatus::Offline;
            player.last_active = Some(at);
        })
        .await
    }

    async fn update_username(
        &self,
        user_id: &str,
        username: &str,
    ) -> Result<(), PlayerRepositoryError> {
        let username = username.to_string();
        self.modify(user_id, move |player| player.username = username)
            .await
    }

    async fn update_profile(
        &self,
        user_id: &str,
        profile: &LinkedProfile,
    ) -> Result<(), PlayerRepositoryError> {
        let profile = profile.clone();
        self.modify(user_id, move |player| player.profile = profile)
            .await
    }

    async fn refresh_linked_profile(
        &self,
        user_id: &str,
        profile: &ValorantProfile,
    ) -> Result<(), PlayerRepositoryError> {
        let mut players = self.players.write().await;
        let player = players
            .get_mut(user_id)
            .ok_or(PlayerRepositoryError::ProfileChanged)?;
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

#[derive(Default)]
pub struct InMemoryChatRepository {
    chats: RwLock<HashMap<String, Chat>>,
}

impl InMemoryChatRepository {
    pub async fn stored(&self, chat_id: &str) -> Option<Chat> {
        self.chats.read().await.get(chat_id).cloned()
    }
}

#[async_trait]
impl ChatRepository for InMemoryChatRepository {
    async fn create_request(&self, chat: &Chat) -> Result<(), ChatRepositoryError> {
        let mut chats = self.chats.write().await;
        if let Some(existing) = chats.get(&chat.chat_id) {
            if existing.status != ChatStatus::Declined {
                return Err(ChatRepositoryError::AlreadyExists);
            }
        }
        chats.insert(chat.chat_id.clone(), chat.clone());
        Ok(())
    }

    async fn get_chat(&self, chat_id: &str) -> Result<Chat, ChatRepositoryError> {
        self.chats
            .read()
            .await
            .get(chat_id)
            .cloned()
            .ok_or(ChatRepositoryError::NotFound)
    }

    async fn list_chats_for_user(&self, user_id: &str) -> Result<Vec<Chat>, ChatRepositoryError> {
        Ok(self
            .chats
            .read()
            .await
            .values()
            .filter(|chat| chat.has_participant(user_id))
            .cloned()
            .collect())
    }

    async fn update_status(
        &self,
        chat_id: &str,
        from: ChatStatus,
        to: ChatStatus,
        at: DateTime<Utc>,
    ) -> Result<(), ChatRepositoryError> {
        let mut chats = self.chats.write().await;
        let chat = chats
            .get_mut(chat_id)
            .ok_or(ChatRepositoryError::StatusConflict(from))?;
        if chat.status != from {
            return Err(ChatRepositoryError::StatusConflict(from));
        }
        chat.status = to;
        chat.updated_at = at;
        Ok(())
    }

    async fn record_message(&self, message: &Message) -> Result<(), ChatRepositoryError> {
        let mut chats = self.chats.write().await;
        let chat = chats
            .get_mut(&message.chat_id)
            .ok_or(ChatRepositoryError::NotFound)?;
        chat.last_message = Some(message.text.clone());
        chat.last_message_by = Some(message.sender_id.clone());
        chat.last_message_at = Some(message.created_at);
        chat.updated_at = message.created_at;
        chat.last_read
            .insert(message.sender_id.clone(), message.created_at);
        Ok(())
    }

    async fn mark_read(
        &self,
        chat_id: &str,
        user_id: &str,
        at: DateTime<Utc>,
    ) -> Result<(), ChatRepositoryError> {
        let mut chats = self.chats.write().await;
        let chat = chats.get_mut(chat_id).ok_or(ChatRepositoryError::NotFound)?;
        chat.last_read.insert(user_id.to_string(), at);
        Ok(())
    }
}

#[derive(Default)]
pub struct InMemoryMessageRepository {
    messages: RwLock<HashMap<String, Vec<Message>>>,
}

#[async_trait]
impl MessageRepository for InMemoryMessageRepository {
    async fn put_message(&self, message: &Message) -> Result<(), MessageRepositoryError> {
        let mut messages = self.messages.write().await;
        let chat_messages = messages.entry(message.chat_id.clone()).or_default();
        if chat_messages
            .iter()
            .any(|m| m.message_id == message.message_id)
        {
            return Err(MessageRepositoryError::DynamoDb(
                "ConditionalCheckFailed".to_string(),
            ));
        }
        chat_messages.push(message.clone());
        chat_messages.sort_by(|a, b| a.message_id.cmp(&b.message_id));
        Ok(())
    }

    async fn list_messages(&self, chat_id: &str) -> Result<Vec<Message>, MessageRepositoryError> {
        Ok(self
            .messages
            .read()
            .await
            .get(chat_id)
            .cloned()
            .unwrap_or_default())
    }
}
