pub mod api;
pub mod auth;
pub mod cli;
pub mod config;
pub mod database;
pub mod embeddings;
pub mod errors;
pub mod llm;
pub mod logging;
pub mod models;
pub mod rag;
pub mod vector_store;

pub use config::AppConfig;
pub use errors::*;
