use crate::models::chat::message::Message;
use crate::models::chat::{Chat, ChatStatus};
use crate::repositories::errors::chat_repository_errors::ChatRepositoryError;
use async_trait::async_trait;
use aws_sdk_dynamodb::types::AttributeValue;
use aws_sdk_dynamodb::Client;
use chrono::{DateTime, Utc};
use serde_dynamo::aws_sdk_dynamodb_1::{from_item, to_attribute_value, to_item};

#[cfg(test)]
use mockall::automock;

pub struct DynamoDbChatRepository {
    pub client: Client,
    pub table_name: String,
}

impl DynamoDbChatRepository {
    pub fn new(client: Client, table_name: String) -> Self {
        Self { client, table_name }
    }

    fn key(chat_id: &str) -> AttributeValue {
        AttributeValue::S(chat_id.to_string())
    }

    fn attribute<T: serde::Serialize>(value: T) -> Result<AttributeValue, ChatRepositoryError> {
        to_attribute_value(value).map_err(|e| ChatRepositoryError::Serialization(e.to_string()))
    }
}

#[cfg_attr(test, automock)]
#[async_trait]
pub trait ChatRepository: Send + Sync {
    /// Stores a new pending chat. Fails with `AlreadyExists` if the pair has
    /// a chat that is not declined; a declined one is replaced.
    async fn create_request(&self, chat: &Chat) -> Result<(), ChatRepositoryError>;
    async fn get_chat(&self, chat_id: &str) -> Result<Chat, ChatRepositoryError>;
    async fn list_chats_for_user(&self, user_id: &str) -> Result<Vec<Chat>, ChatRepositoryError>;
    /// Moves the chat from `from` to `to`; `StatusConflict` if it is no longer `from`.
    async fn update_status(
        &self,
        chat_id: &str,
        from: ChatStatus,
        to: ChatStatus,
        at: DateTime<Utc>,
    ) -> Result<(), ChatRepositoryError>;
    /// Denormalises the latest message onto the chat and marks it read for the sender.
    async fn record_message(&self, message: &Message) -> Result<(), ChatRepositoryError>;
    async fn mark_read(
        &self,
        chat_id: &str,
        user_id: &str,
        at: DateTime<Utc>,
    ) -> Result<(), ChatRepositoryError>;
}

#[async_trait]
impl ChatRepository for DynamoDbChatRepository {
    async fn create_request(&self, chat: &Chat) -> Result<(), ChatRepositoryError> {
        let item = to_item(chat).map_err(|e| ChatRepositoryError::Serialization(e.to_string()))?;
        let result = self
            .client
            .put_item()
            .table_name(&self.table_name)
            .set_item(Some(item))
            .condition_expression("attribute_not_exists(chat_id) OR #status = :declined")
            .expression_attribute_names("#status", "status")
            .expression_attribute_values(":declined", Self::attribute(ChatStatus::Declined)?)
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
                    Err(ChatRepositoryError::AlreadyExists)
                } else {
                    Err(ChatRepositoryError::DynamoDb(e.to_string()))
                }
            }
        }
    }

    async fn get_chat(&self, chat_id: &str) -> Result<Chat, ChatRepositoryError> {
        let output = self
            .client
            .get_item()
            .table_name(&self.table_name)
            .key("chat_id", Self::key(chat_id))
            .send()
            .await
            .map_err(|e| ChatRepositoryError::DynamoDb(e.to_string()))?;
        match output.item {
            Some(item) => {
                from_item(item).map_err(|e| ChatRepositoryError::Serialization(e.to_string()))
            }
            None => Err(ChatRepositoryError::NotFound),
        }
    }

    async fn list_chats_for_user(&self, user_id: &str) -> Result<Vec<Chat>, ChatRepositoryError> {
        let mut chats = Vec::new();
        let mut start_key = None;
        loop {
            let output = self
                .client
                .scan()
                .table_name(&self.table_name)
                .filter_expression("contains(participants, :user_id)")
                .expression_attribute_values(":user_id", Self::key(user_id))
                .set_exclusive_start_key(start_key)
                .send()
                .await
                .map_err(|e| ChatRepositoryError::DynamoDb(e.to_string()))?;

            for item in output.items.unwrap_or_default() {
                let chat: Chat = from_item(item)
                    .map_err(|e| ChatRepositoryError::Serialization(e.to_string()))?;
                chats.push(chat);
            }

            match output.last_evaluated_key {
                Some(key) if !key.is_empty() => start_key = Some(key),
                _ => break,
            }
        }
        Ok(chats)
    }

    async fn update_status(
        &self,
        chat_id: &str,
        from: ChatStatus,
        to: ChatStatus,
        at: DateTime<Utc>,
    ) -> Result<(), ChatRepositoryError> {
        let result = self
            .client
            .update_item()
            .table_name(&self.table_name)
            .key("chat_id", Self::key(chat_id))
            .update_expression("SET #status = :to, updated_at = :at")
            .condition_expression("#status = :from")
            .expression_attribute_names("#status", "status")
            .expression_attribute_values(":to", Self::attribute(to)?)
            .expression_attribute_values(":from", Self::attribute(from)?)
            .expression_attribute_values(":at", Self::attribute(at)?)
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
                    Err(ChatRepositoryError::StatusConflict(from))
                } else {
                    Err(ChatRepositoryError::DynamoDb(e.to_string()))
                }
            }
        }
    }

    async fn record_message(&self, message: &Message) -> Result<(), ChatRepositoryError> {
        let at = Self::attribute(message.created_at)?;
        self.client
            .update_item()
            .table_name(&self.table_name)
            .key("chat_id", Self::key(&message.chat_id))
            .update_expression(
                "SET last_message = :text, last_message_by = :sender, \
                 last_message_at = :at, updated_at = :at, last_read.#sender = :at",
            )
            .condition_expression("attribute_exists(chat_id)")
            .expression_attribute_names("#sender", &message.sender_id)
            .expression_attribute_values(":text", Self::attribute(&message.text)?)
            .expression_attribute_values(":sender", Self::key(&message.sender_id))
            .expression_attribute_values(":at", at)
            .send()
            .await
            .map_err(|e| ChatRepositoryError::DynamoDb(e.to_string()))?;
        Ok(())
    }

    async fn mark_read(
        &self,
        chat_id: &str,
        user_id: &str,
        at: DateTime<Utc>,
    ) -> Result<(), ChatRepositoryError> {
        self.client
            .update_item()
            .table_name(&self.table_name)
            .key("chat_id", Self::key(chat_id))
            .update_expression("SET last_read.#user = :at")
            .condition_expression("attribute_exists(chat_id)")
            .expression_attribute_names("#user", user_id)
            .expression_attribute_values(":at", Self::attribute(at)?)
            .send()
            .await
            .map_err(|e| ChatRepositoryError::DynamoDb(e.to_string()))?;
        Ok(())
    }
}
