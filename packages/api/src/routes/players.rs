use axum::{
    extract::{Query, State},
    http::StatusCode,
    routing::{get, post, put},
    Json, Router,
};
use chrono::Utc;
use tracing::{debug, error};

use crate::{
    error::ApiError, extract::ApiJson, middleware::auth::AuthenticatedUser, state::AppState,
};
use shared::models::player::requests::{OnlinePlayersQuery, SetStatusRequest, SetUsernameRequest};
use shared::models::player::responses::PlayerView;
use shared::models::player::Player;
use shared::rank::RankFilter;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/player", get(get_player))
        .route("/player/username", put(set_username))
        .route("/player/status", put(set_status))
        .route("/player/heartbeat", post(heartbeat))
        .route("/player/offline", post(go_offline))
        .route("/players", get(list_online_players))
}

async fn get_player(
    State(state): State<AppState>,
    authenticated_user: AuthenticatedUser,
) -> Result<Json<Player>, ApiError> {
    state
        .player_service
        .get_player(&authenticated_user.user_id)
        .await
        .map(Json)
        .map_err(|e| {
            error!(
                "Failed to retrieve player {}: {}",
                authenticated_user.user_id, e
            );
            ApiError::from(e)
        })
}

async fn set_username(
    State(state): State<AppState>,
    authenticated_user: AuthenticatedUser,
    ApiJson(payload): ApiJson<SetUsernameRequest>,
) -> Result<Json<Player>, ApiError> {
    let player = state
        .player_service
        .set_username(&authenticated_user.user_id, &payload.username)
        .await
        .map_err(|e| {
            error!(
                "Failed to set username for {}: {}",
                authenticated_user.user_id, e
            );
            ApiError::from(e)
        })?;
    debug!(
        "Player {} is now called {}",
        authenticated_user.user_id, player.username
    );
    Ok(Json(player))
}

async fn set_status(
    State(state): State<AppState>,
    authenticated_user: AuthenticatedUser,
    ApiJson(payload): ApiJson<SetStatusRequest>,
) -> Result<Json<Player>, ApiError> {
    let player = state
        .player_service
        .set_status(&authenticated_user.user_id, payload.status)
        .await
        .map_err(|e| {
            error!(
                "Failed to set status for {}: {}",
                authenticated_user.user_id, e
            );
            ApiError::from(e)
        })?;
    debug!(
        "Player {} declared {}",
        authenticated_user.user_id, payload.status
    );
    Ok(Json(player))
}

async fn heartbeat(
    State(state): State<AppState>,
    authenticated_user: AuthenticatedUser,
) -> Result<StatusCode, ApiError> {
    state
        .player_service
        .heartbeat(&authenticated_user.user_id)
        .await
        .map_err(|e| {
            error!("Heartbeat failed for {}: {}", authenticated_user.user_id, e);
            ApiError::from(e)
        })?;
    Ok(StatusCode::NO_CONTENT)
}

async fn go_offline(
    State(state): State<AppState>,
    authenticated_user: AuthenticatedUser,
) -> Result<StatusCode, ApiError> {
    state
        .player_service
        .go_offline(&authenticated_user.user_id)
        .await
        .map_err(|e| {
            error!(
                "Failed to mark {} offline: {}",
                authenticated_user.user_id, e
            );
            ApiError::from(e)
        })?;
    debug!("Player {} went offline", authenticated_user.user_id);
    Ok(StatusCode::NO_CONTENT)
}

async fn list_online_players(
    State(state): State<AppState>,
    _authenticated_user: AuthenticatedUser,
    Query(query): Query<OnlinePlayersQuery>,
) -> Result<Json<Vec<PlayerView>>, ApiError> {
    let filter: RankFilter = query
        .rank
        .as_deref()
        .unwrap_or_default()
        .parse()
        .map_err(ApiError::BadRequest)?;

    state
        .player_service
        .list_online_players(filter, Utc::now())
        .await
        .map(Json)
        .map_err(|e| {
            error!("Failed to list online players: {}", e);
            ApiError::from(e)
        })
}
