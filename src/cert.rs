//! Certificate and private key value types

use std::fmt;

use der::Decode;
use sha1::{Digest, Sha1};
use zeroize::{Zeroize, ZeroizeOnDrop};

use crate::error::{Error, Result};

/// An immutable X.509 certificate.
///
/// Holds both the raw DER bytes and the parsed structure so callers can
/// round-trip the exact encoding while still reading identity fields.
/// Never mutated after decode.
#[derive(Clone)]
pub struct Certificate {
    der: Vec<u8>,
    parsed: x509_cert::Certificate,
}

impl Certificate {
    /// Decode a certificate from DER bytes.
    pub fn from_der(der: impl Into<Vec<u8>>) -> Result<Self> {
        let der = der.into();
        let parsed = x509_cert::Certificate::from_der(&der)
            .map_err(|e| Error::CertificateDecode(e.to_string()))?;
        Ok(Self { der, parsed })
    }

    /// The exact DER bytes this certificate was decoded from.
    pub fn as_der(&self) -> &[u8] {
        &self.der
    }

    /// The serial number as big-endian bytes, exactly as stored in the
    /// certificate.
    pub fn serial_number(&self) -> &[u8] {
        self.parsed.tbs_certificate.serial_number.as_bytes()
    }

    /// The subject distinguished name, rendered as a string.
    pub fn subject(&self) -> String {
        self.parsed.tbs_certificate.subject.to_string()
    }

    /// The issuer distinguished name, rendered as a string.
    pub fn issuer(&self) -> String {
        self.parsed.tbs_certificate.issuer.to_string()
    }

    /// SHA-1 thumbprint of the DER encoding, lowercase hex.
    ///
    /// This is the key used by native certificate stores to address a
    /// persisted certificate.
    pub fn thumbprint(&self) -> String {
        hex::encode(Sha1::digest(&self.der))
    }

    pub(crate) fn parsed(&self) -> &x509_cert::Certificate {
        &self.parsed
    }
}

impl fmt::Debug for Certificate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Certificate")
            .field("subject", &self.subject())
            .field("issuer", &self.issuer())
            .field("serial", &hex::encode(self.serial_number()))
            .finish()
    }
}

/// Private key material extracted from a keystore entry, as PKCS#8 DER.
///
/// Ownership is exclusive to the extraction call that produced it; the
/// buffer is zeroized on drop and `Debug` never reveals the bytes.
#[derive(Zeroize, ZeroizeOnDrop)]
pub struct PrivateKey {
    der: Vec<u8>,
}

impl PrivateKey {
    /// Wrap PKCS#8 `PrivateKeyInfo` DER bytes.
    pub fn from_pkcs8_der(der: impl Into<Vec<u8>>) -> Self {
        Self { der: der.into() }
    }

    pub(crate) fn pkcs8_der(&self) -> &[u8] {
        &self.der
    }
}

impl fmt::Debug for PrivateKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("PrivateKey(<redacted>)")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const LEAF: &[u8] = include_bytes!("../tests/data/leaf.der");

    #[test]
    fn decodes_der_and_reads_identity() {
        let cert = Certificate::from_der(LEAF).unwrap();
        assert!(cert.subject().contains("leaf.certpem.example"));
        assert!(cert.issuer().contains("Certpem Test Intermediate CA"));
        assert_eq!(cert.as_der(), LEAF);
        assert!(!cert.serial_number().is_empty());
    }

    #[test]
    fn rejects_garbage() {
        let err = Certificate::from_der(&b"not a certificate"[..]).unwrap_err();
        assert!(matches!(err, Error::CertificateDecode(_)));
    }

    #[test]
    fn thumbprint_is_stable_hex_sha1() {
        let a = Certificate::from_der(LEAF).unwrap();
        let b = Certificate::from_der(LEAF).unwrap();
        assert_eq!(a.thumbprint(), b.thumbprint());
        assert_eq!(a.thumbprint().len(), 40);
    }

    #[test]
    fn private_key_debug_is_redacted() {
        let key = PrivateKey::from_pkcs8_der(vec![1, 2, 3]);
        assert_eq!(format!("{key:?}"), "PrivateKey(<redacted>)");
    }
}
