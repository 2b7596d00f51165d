use std::sync::Arc;

use shared::services::auth_service::AuthService;
use shared::services::chat_service::ChatService;
use shared::services::player_service::PlayerService;
use shared::services::profile_service::ProfileService;

#[derive(Clone)]
pub struct AppState {
    pub auth_service: Arc<AuthService>,
    pub player_service: Arc<PlayerService>,
    pub chat_service: Arc<ChatService>,
    pub profile_service: Arc<ProfileService>,
}
