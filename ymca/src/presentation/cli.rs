use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

#[derive(Parser)]
#[command(author, version, about = "Yahoo Messenger chat archive reader", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// `HH:MM:SS sender content`, one line per message
    Text,
    /// JSON array of messages per archive
    Json,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Decode one or more archives and print their messages
    Read {
        #[arg(required = true)]
        archives: Vec<PathBuf>,

        /// Archive owner's username (the decryption key)
        #[arg(long = "user", env = "YMCA_USER")]
        username: String,

        /// Label for received messages. Defaults to the archive's parent directory name
        #[arg(long)]
        contact: Option<String>,

        /// Print timestamps in UTC instead of local time
        #[arg(long)]
        utc: bool,

        #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
        format: OutputFormat,
    },

    /// Check record framing and padding without decrypting
    Verify {
        archive: PathBuf,

        /// Dump each record's trailing 4 bytes as hex
        #[arg(long)]
        footers: bool,
    },

    /// Message counts and time span of one archive
    Info {
        archive: PathBuf,

        #[arg(long = "user", env = "YMCA_USER")]
        username: String,

        #[arg(long)]
        utc: bool,

        #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
        format: OutputFormat,
    },
}
