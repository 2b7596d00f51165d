use crate::models::chat::ChatTransitionError;
use std::fmt;

#[derive(Debug, PartialEq)]
pub enum ChatServiceError {
    ValidationError(String),
    ChatNotFound,
    PlayerNotFound,
    /// A pending or active chat already exists between the two players.
    DuplicateRequest,
    NotParticipant,
    ChatNotActive,
    Transition(ChatTransitionError),
    RepositoryError(String),
}

impl fmt::Display for ChatServiceError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            ChatServiceError::ValidationError(msg) => write!(f, "Validation error: {}", msg),
            ChatServiceError::ChatNotFound => write!(f, "Chat not found"),
            ChatServiceError::PlayerNotFound => write!(f, "Player not found"),
            ChatServiceError::DuplicateRequest => write!(f, "Chat request already sent or received"),
            ChatServiceError::NotParticipant => {
                write!(f, "You are not a participant in this chat")
            }
            ChatServiceError::ChatNotActive => {
                write!(f, "Messages can only be sent in an accepted chat")
            }
            ChatServiceError::Transition(err) => write!(f, "{}", err),
            ChatServiceError::RepositoryError(msg) => write!(f, "Repository error: {}", msg),
        }
    }
}

impl std::error::Error for ChatServiceError {}

impl From<ChatTransitionError> for ChatServiceError {
    fn from(err: ChatTransitionError) -> Self {
        match err {
            ChatTransitionError::NotParticipant => ChatServiceError::NotParticipant,
            other => ChatServiceError::Transition(other),
        }
    }
}
