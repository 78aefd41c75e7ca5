//! HTTP API module serving the chat service over REST

pub mod error;
pub mod extract;
pub mod handlers;
pub mod routes;
pub mod server;
pub mod types;

pub use server::serve_api;
