//! CLI module for Knowledge Proxy

pub mod serve;

use clap::{Parser, Subcommand};

/// Knowledge Proxy - Knowledge base relay with retrieval-augmented chat
#[derive(Parser)]
#[command(name = "knowledge-proxy")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Subcommand)]
pub enum Command {
    /// Run the relay server (default)
    Serve(serve::ServeArgs),
}

impl Default for Command {
    fn default() -> Self {
        Self::Serve(serve::ServeArgs::default())
    }
}
