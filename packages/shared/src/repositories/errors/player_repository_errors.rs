#[derive(Debug)]
pub enum PlayerRepositoryError {
    NotFound,
    /// The player is no longer linked to the Riot ID the write expected.
    ProfileChanged,
    Serialization(String),
    DynamoDb(String),
}

impl std::fmt::Display for PlayerRepositoryError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PlayerRepositoryError::NotFound => write!(f, "Player not found"),
            PlayerRepositoryError::ProfileChanged => {
                write!(f, "Linked profile changed since it was read")
            }
            PlayerRepositoryError::Serialization(msg) => write!(f, "Serialization error: {}", msg),
            PlayerRepositoryError::DynamoDb(msg) => write!(f, "DynamoDB error: {}", msg),
        }
    }
}

impl std::error::Error for PlayerRepositoryError {}
