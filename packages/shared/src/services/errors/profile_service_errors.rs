use crate::clients::errors::valorant_client_errors::ValorantClientError;
use std::fmt;

#[derive(Debug, PartialEq)]
pub enum ProfileServiceError {
    ValidationError(String),
    Upstream(ValorantClientError),
    PlayerNotFound,
    NotLinked,
    /// The player linked another Riot ID while a refresh was in flight.
    ProfileChanged,
    RepositoryError(String),
}

impl fmt::Display for ProfileServiceError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            ProfileServiceError::ValidationError(msg) => write!(f, "Validation error: {}", msg),
            ProfileServiceError::Upstream(err) => write!(f, "{}", err),
            ProfileServiceError::PlayerNotFound => write!(f, "Player not found"),
            ProfileServiceError::NotLinked => write!(f, "No Valorant account is linked"),
            ProfileServiceError::ProfileChanged => {
                write!(f, "Linked Valorant account changed during refresh")
            }
            ProfileServiceError::RepositoryError(msg) => write!(f, "Repository error: {}", msg),
        }
    }
}

impl std::error::Error for ProfileServiceError {}

impl From<ValorantClientError> for ProfileServiceError {
    fn from(err: ValorantClientError) -> Self {
        ProfileServiceError::Upstream(err)
    }
}
