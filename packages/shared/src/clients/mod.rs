pub mod errors;
pub mod valorant_client;
