//! Digest values and their SRI text encodings

use std::fmt;
use std::fs::File;
use std::io::{ErrorKind, Read};
use std::path::Path;
use std::str::FromStr;

use base64::Engine as _;
use base64::alphabet;
use base64::engine::general_purpose::STANDARD;
use base64::engine::{DecodePaddingMode, GeneralPurpose, GeneralPurposeConfig};
use tracing::debug;

use crate::algorithm::DigestAlgorithm;
use crate::error::{Result, SriError};

/// Files are hashed in chunks of this many bytes
pub const CHUNK_SIZE: usize = 4096;

/// URL-safe alphabet, padded on encode, padding optional on decode
const URL_SAFE: GeneralPurpose = GeneralPurpose::new(
    &alphabet::URL_SAFE,
    GeneralPurposeConfig::new().with_decode_padding_mode(DecodePaddingMode::Indifferent),
);

/// An algorithm name plus the raw hash bytes it produced
///
/// The value length always matches [`DigestAlgorithm::output_size`].
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Digest {
    algorithm: DigestAlgorithm,
    value: Vec<u8>,
}

/// Value handed to [`Digest::rebuild`]: raw hash bytes or their base64 text
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DigestValue {
    Raw(Vec<u8>),
    Encoded(String),
}

impl From<Vec<u8>> for DigestValue {
    fn from(bytes: Vec<u8>) -> Self {
        DigestValue::Raw(bytes)
    }
}

impl From<&[u8]> for DigestValue {
    fn from(bytes: &[u8]) -> Self {
        DigestValue::Raw(bytes.to_vec())
    }
}

impl From<String> for DigestValue {
    fn from(text: String) -> Self {
        DigestValue::Encoded(text)
    }
}

impl From<&str> for DigestValue {
    fn from(text: &str) -> Self {
        DigestValue::Encoded(text.to_string())
    }
}

impl Digest {
    /// Wrap raw hash bytes, checking their length against the algorithm
    pub fn new(algorithm: DigestAlgorithm, value: Vec<u8>) -> Result<Self> {
        if value.len() != algorithm.output_size() {
            return Err(SriError::InvalidLength {
                algorithm: algorithm.name().to_string(),
                expected: algorithm.output_size(),
                actual: value.len(),
            });
        }
        Ok(Self { algorithm, value })
    }

    /// Build a digest from an algorithm name and either raw bytes or base64 text
    pub fn rebuild(algorithm: &str, value: impl Into<DigestValue>) -> Result<Self> {
        let algorithm: DigestAlgorithm = algorithm.parse()?;
        let bytes = match value.into() {
            DigestValue::Raw(bytes) => bytes,
            DigestValue::Encoded(text) => STANDARD
                .decode(text.trim())
                .map_err(|e| SriError::InvalidValue(format!("'{}' is not base64: {}", text, e)))?,
        };
        Self::new(algorithm, bytes)
    }

    pub fn algorithm(&self) -> DigestAlgorithm {
        self.algorithm
    }

    pub fn value(&self) -> &[u8] {
        &self.value
    }

    /// Standard base64 of the raw value, without the algorithm prefix
    pub fn value_base64(&self) -> String {
        STANDARD.encode(&self.value)
    }

    /// `<algorithm>-<base64(value)>`
    pub fn to_sri(&self) -> String {
        self.to_string()
    }

    /// URL-safe base64 of the whole SRI text, not of the raw value
    pub fn to_url_safe(&self) -> String {
        URL_SAFE.encode(self.to_sri().as_bytes())
    }

    /// Inverse of [`Digest::to_url_safe`]; accepts text or raw ASCII bytes
    pub fn from_url_safe(encoded: impl AsRef<[u8]>) -> Result<Self> {
        let encoded = encoded.as_ref().trim_ascii();
        let decoded = URL_SAFE
            .decode(encoded)
            .map_err(|e| SriError::Decode(e.to_string()))?;
        let text = String::from_utf8(decoded)
            .map_err(|_| SriError::Decode("decoded SRI is not valid UTF-8".to_string()))?;

        text.parse::<Digest>().map_err(|e| SriError::Decode(e.to_string()))
    }

    /// Whether two digests hash the same content
    ///
    /// Only meaningful when both use the same algorithm.
    pub fn matches(&self, other: &Digest) -> bool {
        self.algorithm == other.algorithm && self.value == other.value
    }
}

impl fmt::Display for Digest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.algorithm, self.value_base64())
    }
}

impl FromStr for Digest {
    type Err = SriError;

    /// Parses the first entry of an SRI string, ignoring any `?options` suffix
    fn from_str(s: &str) -> Result<Self> {
        let entry = s
            .split_whitespace()
            .next()
            .ok_or_else(|| SriError::Parse("empty SRI string".to_string()))?;
        let entry = entry.split('?').next().unwrap_or(entry);

        let (name, encoded) = entry
            .split_once('-')
            .ok_or_else(|| SriError::Parse(format!("'{}' has no algorithm prefix", entry)))?;
        if encoded.is_empty() {
            return Err(SriError::Parse(format!("'{}' has no digest value", entry)));
        }

        let algorithm: DigestAlgorithm = name.parse()?;
        let value = STANDARD
            .decode(encoded)
            .map_err(|e| SriError::Parse(format!("'{}': {}", entry, e)))?;

        Self::new(algorithm, value)
    }
}

/// Hash everything `reader` yields, [`CHUNK_SIZE`] bytes at a time
pub fn hash_reader<R: Read>(mut reader: R, algorithm: DigestAlgorithm) -> std::io::Result<Vec<u8>> {
    let mut hasher = algorithm.hasher();
    let mut buf = [0u8; CHUNK_SIZE];

    loop {
        let n = match reader.read(&mut buf) {
            Ok(0) => break,
            Ok(n) => n,
            Err(e) if e.kind() == ErrorKind::Interrupted => continue,
            Err(e) => return Err(e),
        };
        hasher.update(&buf[..n]);
    }

    Ok(hasher.finalize().into_vec())
}

/// Raw digest bytes of a file
pub fn hash_file(path: impl AsRef<Path>, algorithm: DigestAlgorithm) -> Result<Vec<u8>> {
    let path = path.as_ref();
    let file = File::open(path).map_err(|e| SriError::io(path, e))?;
    hash_reader(file, algorithm).map_err(|e| SriError::io(path, e))
}

/// Hash a file with the named algorithm
///
/// The algorithm name is validated before the file is touched.
pub fn compute_digest(path: impl AsRef<Path>, algorithm: &str) -> Result<Digest> {
    let algorithm: DigestAlgorithm = algorithm.parse()?;
    let path = path.as_ref();

    debug!("Hashing {} with {}", path.display(), algorithm);

    let value = hash_file(path, algorithm)?;
    Digest::new(algorithm, value)
}
