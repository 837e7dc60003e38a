//! SubResource Integrity (SRI) tool
//!
//! Calculates the digest of a file and generates an SRI string.
//!
//! ```text
//! sritool generate <file> [--dgst sha256] [--url-safe]
//! sritool verify <file> <sri> [--url-safe]
//! sritool decode <sri>
//! ```
//!
//! `verify` exits with 1 on a digest mismatch; usage errors exit with 2.

use std::process::ExitCode;

use anyhow::Result;
use clap::Parser;
use piperci_cli::commands::{SriCommands, handle_sri_command};

#[derive(Parser, Debug)]
#[command(name = "sritool")]
#[command(
    about = "SubResource Integrity (SRI) Tool",
    long_about = "Calculates the digest of a file and generates an SRI string"
)]
struct Cli {
    /// Assume a URL safe base64 encoded SRI: decodes to an SRI of format sha256-myhash
    #[arg(long, global = true)]
    url_safe: bool,

    #[command(subcommand)]
    command: SriCommands,
}

fn main() -> Result<ExitCode> {
    piperci_cli::init_logging(piperci_cli::SRITOOL_LOG_DIRECTIVE);

    let cli = Cli::parse();
    handle_sri_command(cli.command, cli.url_safe)
}
