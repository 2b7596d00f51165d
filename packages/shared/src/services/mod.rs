pub mod auth_service;
pub mod chat_service;
pub mod errors;
pub mod player_service;
pub mod profile_service;
