use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use tracing::{debug, error};

use crate::{
    error::ApiError, extract::ApiJson, middleware::auth::AuthenticatedUser, state::AppState,
};
use shared::models::chat::message::Message;
use shared::models::chat::requests::{ChatRequestPayload, SendMessageRequest};
use shared::models::chat::responses::ChatSummary;
use shared::models::chat::{Chat, ChatAction};

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/chats", get(list_chats))
        .route("/chats/requests", post(request_chat).get(incoming_requests))
        .route("/chats/{chat_id}/accept", post(accept_request))
        .route("/chats/{chat_id}/decline", post(decline_request))
        .route(
            "/chats/{chat_id}/messages",
            get(list_messages).post(send_message),
        )
        .route("/chats/{chat_id}/read", post(mark_read))
}

async fn request_chat(
    State(state): State<AppState>,
    authenticated_user: AuthenticatedUser,
    ApiJson(payload): ApiJson<ChatRequestPayload>,
) -> Result<(StatusCode, Json<Chat>), ApiError> {
    let chat = state
        .chat_service
        .request_chat(&authenticated_user.user_id, &payload.receiver_id)
        .await
        .map_err(|e| {
            error!(
                "Failed to send chat request from {} to {}: {}",
                authenticated_user.user_id, payload.receiver_id, e
            );
            ApiError::from(e)
        })?;
    Ok((StatusCode::CREATED, Json(chat)))
}

async fn incoming_requests(
    State(state): State<AppState>,
    authenticated_user: AuthenticatedUser,
) -> Result<Json<Vec<Chat>>, ApiError> {
    state
        .chat_service
        .incoming_requests(&authenticated_user.user_id)
        .await
        .map(Json)
        .map_err(|e| {
            error!(
                "Failed to list chat requests for {}: {}",
                authenticated_user.user_id, e
            );
            ApiError::from(e)
        })
}

async fn respond(
    state: &AppState,
    user_id: &str,
    chat_id: &str,
    action: ChatAction,
) -> Result<Json<Chat>, ApiError> {
    let chat = state
        .chat_service
        .respond(chat_id, user_id, action)
        .await
        .map_err(|e| {
            error!("Failed to {} chat {} for {}: {}", action, chat_id, user_id, e);
            ApiError::from(e)
        })?;
    debug!("Chat {} is now {}", chat_id, chat.status);
    Ok(Json(chat))
}

async fn accept_request(
    State(state): State<AppState>,
    authenticated_user: AuthenticatedUser,
    Path(chat_id): Path<String>,
) -> Result<Json<Chat>, ApiError> {
    respond(
        &state,
        &authenticated_user.user_id,
        &chat_id,
        ChatAction::Accept,
    )
    .await
}

async fn decline_request(
    State(state): State<AppState>,
    authenticated_user: AuthenticatedUser,
    Path(chat_id): Path<String>,
) -> Result<Json<Chat>, ApiError> {
    respond(
        &state,
        &authenticated_user.user_id,
        &chat_id,
        ChatAction::Decline,
    )
    .await
}

async fn list_chats(
    State(state): State<AppState>,
    authenticated_user: AuthenticatedUser,
) -> Result<Json<Vec<ChatSummary>>, ApiError> {
    state
        .chat_service
        .list_chats(&authenticated_user.user_id)
        .await
        .map(Json)
        .map_err(|e| {
            error!(
                "Failed to list chats for {}: {}",
                authenticated_user.user_id, e
            );
            ApiError::from(e)
        })
}

async fn list_messages(
    State(state): State<AppState>,
    authenticated_user: AuthenticatedUser,
    Path(chat_id): Path<String>,
) -> Result<Json<Vec<Message>>, ApiError> {
    state
        .chat_service
        .list_messages(&chat_id, &authenticated_user.user_id)
        .await
        .map(Json)
        .map_err(|e| {
            error!("Failed to list messages of chat {}: {}", chat_id, e);
            ApiError::from(e)
        })
}

async fn send_message(
    State(state): State<AppState>,
    authenticated_user: AuthenticatedUser,
    Path(chat_id): Path<String>,
    ApiJson(payload): ApiJson<SendMessageRequest>,
) -> Result<(StatusCode, Json<Message>), ApiError> {
    let message = state
        .chat_service
        .send_message(&chat_id, &authenticated_user.user_id, &payload.text)
        .await
        .map_err(|e| {
            error!(
                "Failed to send message in chat {} as {}: {}",
                chat_id, authenticated_user.user_id, e
            );
            ApiError::from(e)
        })?;
    Ok((StatusCode::CREATED, Json(message)))
}

async fn mark_read(
    State(state): State<AppState>,
    authenticated_user: AuthenticatedUser,
    Path(chat_id): Path<String>,
) -> Result<StatusCode, ApiError> {
    state
        .chat_service
        .mark_read(&chat_id, &authenticated_user.user_id)
        .await
        .map_err(|e| {
            error!(
                "Failed to mark chat {} read for {}: {}",
                chat_id, authenticated_user.user_id, e
            );
            ApiError::from(e)
        })?;
    Ok(StatusCode::NO_CONTENT)
}
