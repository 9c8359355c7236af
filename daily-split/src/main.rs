mod cli;
mod config;
mod server;
mod split;

use anyhow::Result;
use clap::Parser;

use cli::commands::{preview, serve, split as split_cmd};
use cli::{Cli, Commands};
use config::Config;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    env_logger::Builder::new()
        .filter_level(cli.log_level())
        .parse_default_env()
        .init();

    let config = Config::load(cli.config.as_deref())?;
    log::debug!("Loaded config: {:?}", config);

    match cli.command {
        Commands::Split(args) => split_cmd::handle_split_command(args, &config),
        Commands::Preview(args) => preview::handle_preview_command(args, &config),
        Commands::Serve(args) => serve::handle_serve_command(args, config).await,
    }
}
