//! SRI command handlers
//!
//! Shared by `sritool` and `piperci sri`.

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Subcommand;
use piperci_sri::{Digest, DigestAlgorithm, hash_file};

/// SRI subcommands
#[derive(Subcommand, Debug)]
pub enum SriCommands {
    /// Print the SRI of a file
    Generate {
        file: PathBuf,

        /// Digest algorithm (md5, sha1, sha224, sha256, sha384, sha512)
        #[arg(long, default_value = "sha256")]
        dgst: DigestAlgorithm,
    },
    /// Check a file against an SRI; exits 1 on mismatch
    Verify { file: PathBuf, sri: String },
    /// Decode a URL-safe SRI back to `<algorithm>-<base64>`
    Decode { sri: String },
}

/// Outcome of `verify`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Verification {
    /// Digest of the file, computed with the claimed algorithm
    pub real: Digest,
    pub claimed: Digest,
}

impl Verification {
    pub fn is_match(&self) -> bool {
        self.real.matches(&self.claimed)
    }

    /// Report printed to stdout whatever the outcome
    pub fn report(&self) -> String {
        format!("{}\nurlsafeb64: {}", self.real, self.real.to_url_safe())
    }
}

/// Handle SRI commands
///
/// # Arguments
/// * `command` - The SRI command to execute
/// * `url_safe` - Print and accept the URL-safe form
///
/// # Returns
/// `ExitCode::FAILURE` when `verify` finds a mismatch
pub fn handle_sri_command(command: SriCommands, url_safe: bool) -> Result<ExitCode> {
    match command {
        SriCommands::Generate { file, dgst } => {
            println!("{}", generate(&file, dgst, url_safe)?);
        }
        SriCommands::Verify { file, sri } => {
            let verification = verify(&file, &sri, url_safe)?;
            println!("{}", verification.report());

            if !verification.is_match() {
                eprintln!(
                    "{}: {} != {}",
                    file.display(),
                    verification.real,
                    verification.claimed
                );
                return Ok(ExitCode::FAILURE);
            }
        }
        SriCommands::Decode { sri } => {
            println!("{}", decode(&sri)?);
        }
    }

    Ok(ExitCode::SUCCESS)
}

/// SRI of a file, URL-safe when asked
pub fn generate(file: &Path, algorithm: DigestAlgorithm, url_safe: bool) -> Result<String> {
    let digest = digest_file(file, algorithm)?;

    Ok(if url_safe {
        digest.to_url_safe()
    } else {
        digest.to_sri()
    })
}

/// Hash `file` with the algorithm named in `sri` and compare
pub fn verify(file: &Path, sri: &str, url_safe: bool) -> Result<Verification> {
    let claimed = if url_safe {
        Digest::from_url_safe(sri)
    } else {
        sri.parse()
    }
    .with_context(|| format!("Invalid SRI: {}", sri))?;

    let real = digest_file(file, claimed.algorithm())?;
    Ok(Verification { real, claimed })
}

/// Decoding always assumes the URL-safe form
pub fn decode(sri: &str) -> Result<String> {
    let digest = Digest::from_url_safe(sri).with_context(|| format!("Invalid URL-safe SRI: {}", sri))?;
    Ok(digest.to_sri())
}

fn digest_file(file: &Path, algorithm: DigestAlgorithm) -> Result<Digest> {
    let value = hash_file(file, algorithm)?;
    Ok(Digest::new(algorithm, value)?)
}
