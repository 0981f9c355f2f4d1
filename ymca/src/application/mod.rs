pub mod handlers;

use crate::presentation::cli::{Cli, Commands};
use clap::Parser;
use std::process::ExitCode;
use ymca_core::error::Result;

pub fn run() -> Result<ExitCode> {
    let cli = Cli::parse();
    match cli.command {
        Commands::Read {
            archives,
            username,
            contact,
            utc,
            format,
        } => handlers::handle_read(archives, username, contact, utc, format),
        Commands::Verify { archive, footers } => handlers::handle_verify(archive, footers),
        Commands::Info {
            archive,
            username,
            utc,
            format,
        } => handlers::handle_info(archive, username, utc, format),
    }
}
