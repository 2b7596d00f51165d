pub mod auth_service_errors;
pub mod chat_service_errors;
pub mod player_service_errors;
pub mod profile_service_errors;
