use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Server address, overriding the config file.
    #[arg(short, long)]
    pub server: Option<String>,
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Upload LOCAL, storing it under REMOTE (defaults to LOCAL).
    Write {
        local: String,
        remote: Option<String>,
    },
    /// Download REMOTE, saving as LOCAL (defaults to REMOTE).
    Get {
        remote: String,
        local: Option<String>,
    },
    /// Remove REMOTE from the server.
    Rm { remote: String },
    /// Print the stored version of REMOTE.
    Ls { remote: String },
}
