//! `serve`: upload form over HTTP

mod handler;

use std::net::SocketAddr;

use clap::Args;

pub use handler::handle_serve_command;

#[derive(Args, Debug)]
pub struct ServeCommands {
    /// Address to listen on (overrides `bind` from the config file)
    #[arg(long)]
    pub bind: Option<SocketAddr>,
}
