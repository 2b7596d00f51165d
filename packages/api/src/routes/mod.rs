pub mod chats;
pub mod health;
pub mod players;
pub mod profile;
