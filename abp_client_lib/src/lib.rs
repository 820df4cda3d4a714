pub mod client;
pub mod client_state;
pub mod config;
