use axum::{routing::get, Router};
use tower_http::cors::{Any, CorsLayer};

pub mod error;
pub mod extract;
pub mod middleware;
pub mod routes;
pub mod state;

use state::AppState;

pub fn app(app_state: AppState) -> Router {
    // TODO: restrict origins once the web client has a fixed domain
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/health", get(routes::health::health_check))
        .merge(routes::players::routes())
        .merge(routes::chats::routes())
        .merge(routes::profile::routes())
        .layer(cors)
        .with_state(app_state)
}
