pub mod clients;
pub mod config;
pub mod models;
pub mod presence;
pub mod rank;
pub mod repositories;
pub mod retry;
pub mod services;
