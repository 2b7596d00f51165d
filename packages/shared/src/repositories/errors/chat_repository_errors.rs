use crate::models::chat::ChatStatus;

#[derive(Debug)]
pub enum ChatRepositoryError {
    NotFound,
    /// A pending or active chat already exists for the pair.
    AlreadyExists,
    /// The stored status no longer matches the expected one.
    StatusConflict(ChatStatus),
    Serialization(String),
    DynamoDb(String),
}

impl std::fmt::Display for ChatRepositoryError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ChatRepositoryError::NotFound => write!(f, "Chat not found"),
            ChatRepositoryError::AlreadyExists => write!(f, "Chat already exists"),
            ChatRepositoryError::StatusConflict(expected) => {
                write!(f, "Chat is no longer {}", expected)
            }
            ChatRepositoryError::Serialization(msg) => write!(f, "Serialization error: {}", msg),
            ChatRepositoryError::DynamoDb(msg) => write!(f, "DynamoDB error: {}", msg),
        }
    }
}

impl std::error::Error for ChatRepositoryError {}
