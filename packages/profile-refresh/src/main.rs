use lambda_runtime::{run, service_fn, Error, LambdaEvent};
use serde_json::Value;
use std::sync::Arc;

mod refresher;
use refresher::ProfileRefresher;
use shared::clients::valorant_client::HenrikDevClient;
use shared::config::{dynamodb_client, required_env, ValorantApiConfig};
use shared::repositories::player_repository::DynamoDbPlayerRepository;
use shared::retry::RetryPolicy;
use shared::services::profile_service::{ProfileService, PROFILE_REFRESH_INTERVAL};

#[tokio::main]
async fn main() -> Result<(), Error> {
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::INFO)
        .with_target(false)
        .without_time()
        .init();

    let players_table = required_env("PLAYERS_TABLE")?;
    let client = dynamodb_client().await;

    let player_repository = Arc::new(DynamoDbPlayerRepository::new(client, players_table));
    let valorant_api = Arc::new(HenrikDevClient::from_config(&ValorantApiConfig::from_env()));
    let profile_service = Arc::new(ProfileService::new(valorant_api, player_repository));

    let refresher = ProfileRefresher::new(
        profile_service,
        RetryPolicy::default(),
        PROFILE_REFRESH_INTERVAL,
    );

    // Invoked on a schedule; the event body carries nothing we need.
    run(service_fn(move |_event: LambdaEvent<Value>| {
        let refresher = refresher.clone();
        async move { refresher.run(chrono::Utc::now()).await }
    }))
    .await
}
