use crate::models::chat::message::Message;
use crate::repositories::errors::message_repository_errors::MessageRepositoryError;
use async_trait::async_trait;
use aws_sdk_dynamodb::types::AttributeValue;
use aws_sdk_dynamodb::Client;
use serde_dynamo::aws_sdk_dynamodb_1::{from_item, to_item};

#[cfg(test)]
use mockall::automock;

/// Messages keyed by `chat_id` (partition) and `message_id` (sort).
pub struct DynamoDbMessageRepository {
    pub client: Client,
    pub table_name: String,
}

impl DynamoDbMessageRepository {
    pub fn new(client: Client, table_name: String) -> Self {
        Self { client, table_name }
    }
}

#[cfg_attr(test, automock)]
#[async_trait]
pub trait MessageRepository: Send + Sync {
    async fn put_message(&self, message: &Message) -> Result<(), MessageRepositoryError>;
    /// All messages of a chat, oldest first.
    async fn list_messages(&self, chat_id: &str) -> Result<Vec<Message>, MessageRepositoryError>;
}

#[async_trait]
impl MessageRepository for DynamoDbMessageRepository {
    async fn put_message(&self, message: &Message) -> Result<(), MessageRepositoryError> {
        let item =
            to_item(message).map_err(|e| MessageRepositoryError::Serialization(e.to_string()))?;
        self.client
            .put_item()
            .table_name(&self.table_name)
            .set_item(Some(item))
            .condition_expression("attribute_not_exists(message_id)")
            .send()
            .await
            .map_err(|e| MessageRepositoryError::DynamoDb(e.to_string()))?;
        Ok(())
    }

    async fn list_messages(&self, chat_id: &str) -> Result<Vec<Message>, MessageRepositoryError> {
        let mut messages = Vec::new();
        let mut start_key = None;
        loop {
            let output = self
                .client
                .query()
                .table_name(&self.table_name)
                .key_condition_expression("chat_id = :chat_id")
                .expression_attribute_values(":chat_id", AttributeValue::S(chat_id.to_string()))
                .scan_index_forward(true)
                .set_exclusive_start_key(start_key)
                .send()
                .await
                .map_err(|e| MessageRepositoryError::DynamoDb(e.to_string()))?;

            for item in output.items.unwrap_or_default() {
                let message: Message = from_item(item)
                    .map_err(|e| MessageRepositoryError::Serialization(e.to_string()))?;
                messages.push(message);
            }

            match output.last_evaluated_key {
                Some(key) if !key.is_empty() => start_key = Some(key),
                _ => break,
            }
        }
        Ok(messages)
    }
}
