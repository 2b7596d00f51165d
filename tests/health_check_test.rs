mod support;

use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use serde_json::Value;
use support::TestApp;

#[tokio::test]
async fn test_health_endpoint() {
    let app = TestApp::new();

    let resp = app.get("/health", None).await;

    assert_eq!(resp.status, StatusCode::OK);
    assert_eq!(resp.body, Value::String("Healthy!".to_string()));
}

#[tokio::test]
async fn test_protected_route_requires_token() {
    let app = TestApp::new();

    let resp = app.get("/player", None).await;

    assert_eq!(resp.status, StatusCode::UNAUTHORIZED);
    assert_eq!(resp.body["success"], false);
}

#[tokio::test]
async fn test_token_signed_with_other_secret_is_rejected() {
    let app = TestApp::new();
    let now = chrono::Utc::now().timestamp() as usize;
    let claims = shared::models::auth::responses::TokenClaims {
        sub: "intruder".to_string(),
        iat: now,
        exp: now + 3600,
    };
    let token = jsonwebtoken::encode(
        &jsonwebtoken::Header::default(),
        &claims,
        &jsonwebtoken::EncodingKey::from_secret(b"not-the-secret"),
    )
    .unwrap();
    let request = Request::builder()
        .uri("/player")
        .header(header::AUTHORIZATION, format!("Bearer {}", token))
        .body(Body::empty())
        .unwrap();

    let resp = app.send(request).await;

    assert_eq!(resp.status, StatusCode::UNAUTHORIZED);
    assert_eq!(resp.body["error"], "Invalid JWT token");
}
