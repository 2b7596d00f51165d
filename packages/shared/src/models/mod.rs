pub mod auth;
pub mod chat;
pub mod player;
pub mod profile;
