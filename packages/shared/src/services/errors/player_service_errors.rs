use std::fmt;

#[derive(Debug, PartialEq)]
pub enum PlayerServiceError {
    PlayerNotFound,
    ValidationError(String),
    RepositoryError(String),
}

impl fmt::Display for PlayerServiceError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            PlayerServiceError::PlayerNotFound => write!(f, "Player not found"),
            PlayerServiceError::ValidationError(msg) => write!(f, "Validation error: {}", msg),
            PlayerServiceError::RepositoryError(msg) => write!(f, "Repository error: {}", msg),
        }
    }
}

impl std::error::Error for PlayerServiceError {}
