pub mod server;
pub mod server_state;
pub mod config;
pub mod file_sandbox;
pub mod file_io;
