use axum::{extract::State, routing::post, Json, Router};
use tracing::{debug, error, warn};

use crate::{
    error::ApiError, extract::ApiJson, middleware::auth::AuthenticatedUser, state::AppState,
};
use shared::models::player::ValorantProfile;
use shared::models::profile::requests::{ValidateProfileRequest, ValidateProfileResponse};

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/valorant/validate-profile", post(validate_profile))
        .route("/player/profile", post(link_profile))
}

/// Unauthenticated proxy to the Valorant API so the key never reaches clients.
async fn validate_profile(
    State(state): State<AppState>,
    ApiJson(payload): ApiJson<ValidateProfileRequest>,
) -> Result<Json<ValidateProfileResponse>, ApiError> {
    let data = state
        .profile_service
        .validate_profile(&payload.valorant_name, &payload.valorant_tag)
        .await
        .map_err(|e| {
            warn!(
                "Profile validation failed for {}#{}: {}",
                payload.valorant_name, payload.valorant_tag, e
            );
            ApiError::from(e)
        })?;
    Ok(Json(ValidateProfileResponse {
        success: true,
        data,
    }))
}

async fn link_profile(
    State(state): State<AppState>,
    authenticated_user: AuthenticatedUser,
    ApiJson(payload): ApiJson<ValidateProfileRequest>,
) -> Result<Json<ValorantProfile>, ApiError> {
    let profile = state
        .profile_service
        .link_profile(
            &authenticated_user.user_id,
            &payload.valorant_name,
            &payload.valorant_tag,
        )
        .await
        .map_err(|e| {
            error!(
                "Failed to link profile for {}: {}",
                authenticated_user.user_id, e
            );
            ApiError::from(e)
        })?;
    debug!(
        "Player {} linked {}",
        authenticated_user.user_id,
        profile.riot_id()
    );
    Ok(Json(profile))
}
