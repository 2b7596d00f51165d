use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use shared::clients::errors::valorant_client_errors::ValorantClientError;
use shared::models::chat::ChatTransitionError;
use shared::services::errors::{
    auth_service_errors::AuthServiceError, chat_service_errors::ChatServiceError,
    player_service_errors::PlayerServiceError, profile_service_errors::ProfileServiceError,
};
use tracing::error;

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct ErrorResponse {
    pub success: bool,
    pub error: String,
}

#[derive(Debug)]
pub enum ApiError {
    PlayerService(PlayerServiceError),
    ChatService(ChatServiceError),
    ProfileService(ProfileServiceError),
    AuthService(AuthServiceError),
    BadRequest(String),
}

impl From<PlayerServiceError> for ApiError {
    fn from(error: PlayerServiceError) -> Self {
        ApiError::PlayerService(error)
    }
}

impl From<ChatServiceError> for ApiError {
    fn from(error: ChatServiceError) -> Self {
        ApiError::ChatService(error)
    }
}

impl From<ProfileServiceError> for ApiError {
    fn from(error: ProfileServiceError) -> Self {
        ApiError::ProfileService(error)
    }
}

impl From<AuthServiceError> for ApiError {
    fn from(error: AuthServiceError) -> Self {
        ApiError::AuthService(error)
    }
}

const INTERNAL_ERROR: &str = "Internal server error";
const CONFIGURATION_ERROR: &str = "API configuration error";

fn upstream_status(error: &ValorantClientError) -> StatusCode {
    match error {
        ValorantClientError::MissingApiKey | ValorantClientError::InvalidBaseUrl(_) => {
            StatusCode::INTERNAL_SERVER_ERROR
        }
        ValorantClientError::PlayerNotFound => StatusCode::NOT_FOUND,
        ValorantClientError::RateLimited => StatusCode::TOO_MANY_REQUESTS,
        ValorantClientError::Upstream(status) => {
            StatusCode::from_u16(*status).unwrap_or(StatusCode::BAD_GATEWAY)
        }
        ValorantClientError::Network(_) | ValorantClientError::InvalidResponse(_) => {
            StatusCode::BAD_GATEWAY
        }
    }
}

impl ApiError {
    fn status_and_message(&self) -> (StatusCode, String) {
        match self {
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg.clone()),

            ApiError::PlayerService(e) => match e {
                PlayerServiceError::PlayerNotFound => (StatusCode::NOT_FOUND, e.to_string()),
                PlayerServiceError::ValidationError(msg) => (StatusCode::BAD_REQUEST, msg.clone()),
                PlayerServiceError::RepositoryError(_) => {
                    (StatusCode::INTERNAL_SERVER_ERROR, INTERNAL_ERROR.to_string())
                }
            },

            ApiError::ChatService(e) => {
                let status = match e {
                    ChatServiceError::ValidationError(_) => StatusCode::BAD_REQUEST,
                    ChatServiceError::ChatNotFound | ChatServiceError::PlayerNotFound => {
                        StatusCode::NOT_FOUND
                    }
                    ChatServiceError::NotParticipant
                    | ChatServiceError::Transition(ChatTransitionError::NotParticipant)
                    | ChatServiceError::Transition(ChatTransitionError::RequesterCannotRespond) => {
                        StatusCode::FORBIDDEN
                    }
                    ChatServiceError::DuplicateRequest
                    | ChatServiceError::ChatNotActive
                    | ChatServiceError::Transition(ChatTransitionError::InvalidTransition {
                        ..
                    }) => StatusCode::CONFLICT,
                    ChatServiceError::RepositoryError(_) => {
                        return (StatusCode::INTERNAL_SERVER_ERROR, INTERNAL_ERROR.to_string())
                    }
                };
                let message = match e {
                    ChatServiceError::ValidationError(msg) => msg.clone(),
                    other => other.to_string(),
                };
                (status, message)
            }

            ApiError::ProfileService(e) => match e {
                ProfileServiceError::ValidationError(msg) => (StatusCode::BAD_REQUEST, msg.clone()),
                ProfileServiceError::Upstream(
                    ValorantClientError::MissingApiKey | ValorantClientError::InvalidBaseUrl(_),
                ) => (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    CONFIGURATION_ERROR.to_string(),
                ),
                ProfileServiceError::Upstream(upstream) => {
                    (upstream_status(upstream), upstream.to_string())
                }
                ProfileServiceError::PlayerNotFound => (StatusCode::NOT_FOUND, e.to_string()),
                ProfileServiceError::NotLinked => (StatusCode::BAD_REQUEST, e.to_string()),
                ProfileServiceError::ProfileChanged => (StatusCode::CONFLICT, e.to_string()),
                ProfileServiceError::RepositoryError(_) => {
                    (StatusCode::INTERNAL_SERVER_ERROR, INTERNAL_ERROR.to_string())
                }
            },

            ApiError::AuthService(e) => (StatusCode::UNAUTHORIZED, e.to_string()),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = self.status_and_message();
        if status.is_server_error() {
            error!("Request failed with {}: {:?}", status, self);
        }
        (
            status,
            Json(ErrorResponse {
                success: false,
                error: message,
            }),
        )
            .into_response()
    }
}
