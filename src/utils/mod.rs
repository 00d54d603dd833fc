pub mod config;
pub mod http_client;
pub mod validators;
