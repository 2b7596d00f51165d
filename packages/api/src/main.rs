use lambda_http::{run, tracing, Error};
use std::env::set_var;
use std::sync::Arc;

use api::{app, state::AppState};
use shared::clients::valorant_client::HenrikDevClient;
use shared::config::{dynamodb_client, AppConfig};
use shared::repositories::chat_repository::DynamoDbChatRepository;
use shared::repositories::message_repository::DynamoDbMessageRepository;
use shared::repositories::player_repository::DynamoDbPlayerRepository;
use shared::services::auth_service::AuthService;
use shared::services::chat_service::ChatService;
use shared::services::player_service::PlayerService;
use shared::services::profile_service::ProfileService;

#[tokio::main]
async fn main() -> Result<(), Error> {
    set_var("AWS_LAMBDA_HTTP_IGNORE_STAGE_IN_PATH", "true");

    // required to enable CloudWatch error logging by the runtime
    tracing::init_default_subscriber();

    let config = AppConfig::from_env()?;
    let client = dynamodb_client().await;

    let player_repository = Arc::new(DynamoDbPlayerRepository::new(
        client.clone(),
        config.players_table.clone(),
    ));
    let chat_repository = Arc::new(DynamoDbChatRepository::new(
        client.clone(),
        config.chats_table.clone(),
    ));
    let message_repository = Arc::new(DynamoDbMessageRepository::new(
        client,
        config.messages_table.clone(),
    ));
    let valorant_api = Arc::new(HenrikDevClient::from_config(&config.valorant));
    if config.valorant.api_key.is_none() {
        tracing::warn!("VALORANT_API_KEY is not set; profile validation will fail");
    }

    let app_state = AppState {
        auth_service: Arc::new(AuthService::with_jwt_secret(config.jwt_secret.clone())),
        player_service: Arc::new(PlayerService::new(player_repository.clone())),
        chat_service: Arc::new(ChatService::new(
            chat_repository,
            message_repository,
            player_repository.clone(),
        )),
        profile_service: Arc::new(ProfileService::new(valorant_api, player_repository)),
    };

    run(app(app_state)).await
}
