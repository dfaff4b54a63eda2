pub mod client;
pub mod config;
pub mod parsing;
pub mod request;
