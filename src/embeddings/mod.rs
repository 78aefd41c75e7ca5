//! Embeddings generation module
//!
//! Turns text into vectors through an OpenAI-compatible embeddings API,
//! with input truncation and rate-limit-aware retries.
//!
//! # Examples
//!
//! ```rust,no_run
//! use ragchat::config::AppConfig;
//! use ragchat::embeddings::EmbeddingClient;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = AppConfig::load()?;
//!     let client = EmbeddingClient::new(&config.embeddings)?;
//!
//!     let vectors = client.embed(&["Hello, world!".to_string()]).await?;
//!     println!("Generated {} vectors", vectors.len());
//!
//!     Ok(())
//! }
//! ```

pub mod client;
pub mod retry;

pub use client::EmbeddingClient;
pub use retry::RetryPolicy;
