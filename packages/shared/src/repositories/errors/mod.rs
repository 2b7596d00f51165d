pub mod chat_repository_errors;
pub mod message_repository_errors;
pub mod player_repository_errors;
