//! Serve command handler

use anyhow::Result;

use super::ServeCommands;
use crate::config::Config;

/// Handle the serve command
pub async fn handle_serve_command(args: ServeCommands, mut config: Config) -> Result<()> {
    if let Some(bind) = args.bind {
        log::debug!("Overriding bind address {} with {}", config.bind, bind);
        config.bind = bind;
    }

    crate::server::serve(config).await
}
