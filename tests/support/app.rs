use api::{app, state::AppState};
use axum::{
    body::{to_bytes, Body},
    http::{header, Method, Request, StatusCode},
    Router,
};
use chrono::{Duration, Utc};
use jsonwebtoken::{encode, EncodingKey, Header};
use serde_json::Value;
use shared::clients::valorant_client::HenrikDevClient;
use shared::models::auth::responses::TokenClaims;
use shared::services::auth_service::AuthService;
use shared::services::chat_service::ChatService;
use shared::services::player_service::PlayerService;
use shared::services::profile_service::ProfileService;
use std::sync::Arc;
use tower::ServiceExt;

use super::in_memory::{InMemoryChatRepository, InMemoryMessageRepository, InMemoryPlayerRepository};

pub const JWT_SECRET: &str = "integration-test-secret";

/// The API router wired to in-memory storage. The Valorant client points at
/// `valorant_base_url`, usually a wiremock server.
pub struct TestApp {
    pub router: Router,
    pub players: Arc<InMemoryPlayerRepository>,
    pub chats: Arc<InMemoryChatRepository>,
}

pub struct TestResponse {
    pub status: StatusCode,
    pub body: Value,
}

impl TestApp {
    pub fn new() -> Self {
        Self::with_valorant("http://127.0.0.1:9", Some("test-key"))
    }

    pub fn with_valorant(valorant_base_url: &str, api_key: Option<&str>) -> Self {
        let players = Arc::new(InMemoryPlayerRepository::default());
        let chats = Arc::new(InMemoryChatRepository::default());
        let messages = Arc::new(InMemoryMessageRepository::default());
        let valorant = Arc::new(HenrikDevClient::new(
            valorant_base_url.to_string(),
            "eu".to_string(),
            api_key.map(str::to_string),
        ));

        let state = AppState {
            auth_service: Arc::new(AuthService::with_jwt_secret(JWT_SECRET.to_string())),
            player_service: Arc::new(PlayerService::new(players.clone())),
            chat_service: Arc::new(ChatService::new(
                chats.clone(),
                messages,
                players.clone(),
            )),
            profile_service: Arc::new(ProfileService::new(valorant, players.clone())),
        };

        TestApp {
            router: app(state),
            players,
            chats,
        }
    }

    pub fn token_for(user_id: &str) -> String {
        let now = Utc::now();
        let claims = TokenClaims {
            sub: user_id.to_string(),
            iat: now.timestamp() as usize,
            exp: (now + Duration::hours(1)).timestamp() as usize,
        };
        encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(JWT_SECRET.as_bytes()),
        )
        .expect("failed to sign test token")
    }

    pub async fn request(
        &self,
        method: Method,
        uri: &str,
        user_id: Option<&str>,
        body: Option<Value>,
    ) -> TestResponse {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(user_id) = user_id {
            builder = builder.header(
                header::AUTHORIZATION,
                format!("Bearer {}", Self::token_for(user_id)),
            );
        }
        let request = match body {
            Some(body) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string())),
            None => builder.body(Body::empty()),
        }
        .expect("failed to build request");

        self.send(request).await
    }

    pub async fn send(&self, request: Request<Body>) -> TestResponse {
        let response = self
            .router
            .clone()
            .oneshot(request)
            .await
            .expect("router failed");
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("failed to read body");
        let body = serde_json::from_slice(&bytes)
            .unwrap_or_else(|_| Value::String(String::from_utf8_lossy(&bytes).into_owned()));

        TestResponse { status, body }
    }

    pub async fn get(&self, uri: &str, user_id: Option<&str>) -> TestResponse {
        self.request(Method::GET, uri, user_id, None).await
    }

    pub async fn post(&self, uri: &str, user_id: Option<&str>, body: Option<Value>) -> TestResponse {
        self.request(Method::POST, uri, user_id, body).await
    }

    pub async fn put(&self, uri: &str, user_id: Option<&str>, body: Value) -> TestResponse {
        self.request(Method::PUT, uri, user_id, Some(body)).await
    }
}
