//! CLI command handlers module
//!
//! This module is organized by functional domains:
//! - init: Database schema and vector collection setup
//! - serve: API server
//! - info: Information display (config)

pub mod info;
pub mod init;
pub mod serve;

// Re-export all public handlers
pub use info::*;
pub use init::*;
pub use serve::*;
