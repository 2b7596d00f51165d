use std::sync::Arc;

use chrono::Utc;
use tracing::{debug, info};

use crate::models::chat::message::{Message, MAX_MESSAGE_LEN};
use crate::models::chat::responses::ChatSummary;
use crate::models::chat::{Chat, ChatAction, ChatStatus, ChatTransitionError};
use crate::models::player::fallback_username;
use crate::repositories::chat_repository::ChatRepository;
use crate::repositories::errors::chat_repository_errors::ChatRepositoryError;
use crate::repositories::errors::player_repository_errors::PlayerRepositoryError;
use crate::repositories::message_repository::MessageRepository;
use crate::repositories::player_repository::PlayerRepository;
use crate::services::errors::chat_service_errors::ChatServiceError;

pub struct ChatService {
    chat_repository: Arc<dyn ChatRepository + Send + Sync>,
    message_repository: Arc<dyn MessageRepository + Send + Sync>,
    player_repository: Arc<dyn PlayerRepository + Send + Sync>,
}

impl ChatService {
    pub fn new(
        chat_repository: Arc<dyn ChatRepository + Send + Sync>,
        message_repository: Arc<dyn MessageRepository + Send + Sync>,
        player_repository: Arc<dyn PlayerRepository + Send + Sync>,
    ) -> Self {
        ChatService {
            chat_repository,
            message_repository,
            player_repository,
        }
    }

    fn map_chat_error(e: ChatRepositoryError) -> ChatServiceError {
        match e {
            ChatRepositoryError::NotFound => ChatServiceError::ChatNotFound,
            ChatRepositoryError::AlreadyExists => ChatServiceError::DuplicateRequest,
            _ => ChatServiceError::RepositoryError(e.to_string()),
        }
    }

    /// Loads a chat and checks that `user_id` takes part in it.
    async fn participant_chat(
        &self,
        chat_id: &str,
        user_id: &str,
    ) -> Result<Chat, ChatServiceError> {
        if chat_id.is_empty() {
            return Err(ChatServiceError::ValidationError(
                "Chat ID cannot be empty".to_string(),
            ));
        }
        let chat = self
            .chat_repository
            .get_chat(chat_id)
            .await
            .map_err(Self::map_chat_error)?;
        if !chat.has_participant(user_id) {
            return Err(ChatServiceError::NotParticipant);
        }
        Ok(chat)
    }

    pub async fn request_chat(
        &self,
        requester_id: &str,
        receiver_id: &str,
    ) -> Result<Chat, ChatServiceError> {
        if requester_id.is_empty() || receiver_id.is_empty() {
            return Err(ChatServiceError::ValidationError(
                "Requester and receiver IDs cannot be empty".to_string(),
            ));
        }
        if requester_id == receiver_id {
            return Err(ChatServiceError::ValidationError(
                "You cannot send a chat request to yourself".to_string(),
            ));
        }
        self.player_repository
            .get_player(receiver_id)
            .await
            .map_err(|e| match e {
                PlayerRepositoryError::NotFound => ChatServiceError::PlayerNotFound,
                _ => ChatServiceError::RepositoryError(e.to_string()),
            })?;

        let chat = Chat::new_request(requester_id, receiver_id);
        self.chat_repository
            .create_request(&chat)
            .await
            .map_err(Self::map_chat_error)?;
        info!(
            "Chat request {} sent by {} to {}",
            chat.chat_id, requester_id, receiver_id
        );
        Ok(chat)
    }

    /// Pending requests waiting on `user_id`, newest first.
    pub async fn incoming_requests(&self, user_id: &str) -> Result<Vec<Chat>, ChatServiceError> {
        let mut requests: Vec<Chat> = self
            .chat_repository
            .list_chats_for_user(user_id)
            .await
            .map_err(Self::map_chat_error)?
            .into_iter()
            .filter(|chat| chat.status == ChatStatus::Pending && chat.requester_id != user_id)
            .collect();
        requests.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(requests)
    }

    pub async fn respond(
        &self,
        chat_id: &str,
        user_id: &str,
        action: ChatAction,
    ) -> Result<Chat, ChatServiceError> {
        let mut chat = self.participant_chat(chat_id, user_id).await?;
        let next = chat.status.apply(action, user_id, &chat)?;
        let now = Utc::now();

        match self
            .chat_repository
            .update_status(chat_id, chat.status, next, now)
            .await
        {
            Ok(()) => {}
            Err(ChatRepositoryError::StatusConflict(_)) => {
                // Answered by someone else between the read and the conditional write.
                let current = self
                    .chat_repository
                    .get_chat(chat_id)
                    .await
                    .map_err(Self::map_chat_error)?;
                return Err(ChatServiceError::Transition(
                    ChatTransitionError::InvalidTransition {
                        from: current.status,
                        action,
                    },
                ));
            }
            Err(e) => return Err(Self::map_chat_error(e)),
        }

        info!("Chat {} moved from {} to {} by {}", chat_id, chat.status, next, user_id);
        chat.status = next;
        chat.updated_at = now;
        Ok(chat)
    }

    pub async fn accept(&self, chat_id: &str, user_id: &str) -> Result<Chat, ChatServiceError> {
        self.respond(chat_id, user_id, ChatAction::Accept).await
    }

    pub async fn decline(&self, chat_id: &str, user_id: &str) -> Result<Chat, ChatServiceError> {
        self.respond(chat_id, user_id, ChatAction::Decline).await
    }

    /// Pending and active chats of `user_id`, most recent activity first.
    pub async fn list_chats(&self, user_id: &str) -> Result<Vec<ChatSummary>, ChatServiceError> {
        let mut chats: Vec<Chat> = self
            .chat_repository
            .list_chats_for_user(user_id)
            .await
            .map_err(Self::map_chat_error)?
            .into_iter()
            .filter(|chat| chat.status != ChatStatus::Declined)
            .collect();
        chats.sort_by(|a, b| b.last_activity().cmp(&a.last_activity()));
        Ok(chats
            .into_iter()
            .map(|chat| ChatSummary::for_user(chat, user_id))
            .collect())
    }

    pub async fn list_messages(
        &self,
        chat_id: &str,
        user_id: &str,
    ) -> Result<Vec<Message>, ChatServiceError> {
        self.participant_chat(chat_id, user_id).await?;
        self.message_repository
            .list_messages(chat_id)
            .await
            .map_err(|e| ChatServiceError::RepositoryError(e.to_string()))
    }

    pub async fn send_message(
        &self,
        chat_id: &str,
        sender_id: &str,
        text: &str,
    ) -> Result<Message, ChatServiceError> {
        let text = text.trim();
        if text.is_empty() {
            return Err(ChatServiceError::ValidationError(
                "Message cannot be empty".to_string(),
            ));
        }
        if text.chars().count() > MAX_MESSAGE_LEN {
            return Err(ChatServiceError::ValidationError(format!(
                "Message must be at most {} characters",
                MAX_MESSAGE_LEN
            )));
        }

        let chat = self.participant_chat(chat_id, sender_id).await?;
        if chat.status != ChatStatus::Active {
            return Err(ChatServiceError::ChatNotActive);
        }

        let sender_username = match self.player_repository.get_player(sender_id).await {
            Ok(player) => player.username,
            Err(PlayerRepositoryError::NotFound) => fallback_username(sender_id),
            Err(e) => return Err(ChatServiceError::RepositoryError(e.to_string())),
        };

        let message = Message::new(chat_id, sender_id, &sender_username, text);
        self.message_repository
            .put_message(&message)
            .await
            .map_err(|e| ChatServiceError::RepositoryError(e.to_string()))?;
        self.chat_repository
            .record_message(&message)
            .await
            .map_err(Self::map_chat_error)?;
        debug!("Message {} stored in chat {}", message.message_id, chat_id);
        Ok(message)
    }

    pub async fn mark_read(&self, chat_id: &str, user_id: &str) -> Result<(), ChatServiceError> {
        self.participant_chat(chat_id, user_id).await?;
        self.chat_repository
            .mark_read(chat_id, user_id, Utc::now())
            .await
            .map_err(Self::map_chat_error)
    }
}
