pub mod chat_repository;
pub mod errors;
pub mod message_repository;
pub mod player_repository;
