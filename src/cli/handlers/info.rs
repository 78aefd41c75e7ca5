//! Information display handlers (config)

use crate::cli::output::print_config;
use crate::AppConfig;
use crate::Result;

/// Handle config command
pub async fn handle_config_command(config: &AppConfig) -> Result<()> {
    print_config(config);
    Ok(())
}
