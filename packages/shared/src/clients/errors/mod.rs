pub mod valorant_client_errors;
