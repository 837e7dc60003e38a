//! PiperCI Subresource Integrity
//!
//! Computes file digests and renders them as SRI strings
//! (`sha256-<base64>`), plus a URL-safe wrapping of that string that can be
//! used as a path segment against ArtMan.
//!
//! # Example
//!
//! ```no_run
//! use piperci_sri::{Digest, compute_digest};
//!
//! # fn main() -> piperci_sri::Result<()> {
//! let digest = compute_digest("build/output.tar.gz", "sha256")?;
//! println!("{}", digest);                 // sha256-...
//! println!("{}", digest.to_url_safe());   // c2hhMjU2LS...
//!
//! let parsed: Digest = digest.to_string().parse()?;
//! assert_eq!(parsed, digest);
//! # Ok(())
//! # }
//! ```

mod algorithm;
mod sri;
pub mod error;

pub use algorithm::DigestAlgorithm;
pub use sri::{CHUNK_SIZE, Digest, DigestValue, compute_digest, hash_file, hash_reader};
pub use error::{Result, SriError};
