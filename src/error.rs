//! Error types for certificate extraction and identification

use thiserror::Error;

/// Errors surfaced by keystore decoding, chain export and identifier
/// derivation.
///
/// All failures are deterministic decode or logic errors; nothing is retried
/// internally and no partial results are produced alongside an error.
#[derive(Debug, Error)]
pub enum Error {
    /// Keystore bytes are malformed or the password is incorrect
    #[error("invalid keystore: {0}")]
    InvalidKeystore(String),

    /// The keystore contains no entry with an associated private key
    #[error("no private key entry found in keystore")]
    NoKeyEntryFound,

    /// The export selection requested the private key but none was supplied
    #[error("export selection requested a private key but none was supplied")]
    ExportFlagMismatch,

    /// Certificate bytes could not be parsed or re-encoded
    #[error("certificate decode failed: {0}")]
    CertificateDecode(String),
}

/// Result type for all fallible operations in this crate
pub type Result<T> = std::result::Result<T, Error>;
