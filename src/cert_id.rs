//! OCSP-style certificate identifier derivation
//!
//! Builds the `CertID` structure (RFC 6960) for a certificate, serializes it
//! to DER and renders it as URL-safe Base64 without padding. The result is a
//! stable correlation key: the same certificate bytes always produce the
//! same string, across runs and across implementations.

use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine as _;
use der::asn1::{ObjectIdentifier, OctetString};
use der::{Any, AnyRef, Encode, Sequence};
use sha1::{Digest, Sha1};
use spki::AlgorithmIdentifierOwned;
use tracing::trace;
use x509_cert::serial_number::SerialNumber;

use crate::cert::Certificate;
use crate::error::{Error, Result};
use crate::keystore::KeystoreBundle;

/// id-sha1, the fixed CertID digest. Not caller-configurable.
const ID_SHA1: ObjectIdentifier = ObjectIdentifier::new_unwrap("1.3.14.3.2.26");

/// RFC 6960 CertID.
///
/// ```text
/// CertID ::= SEQUENCE {
///     hashAlgorithm   AlgorithmIdentifier,
///     issuerNameHash  OCTET STRING,
///     issuerKeyHash   OCTET STRING,
///     serialNumber    CertificateSerialNumber }
/// ```
#[derive(Sequence)]
struct CertId {
    hash_algorithm: AlgorithmIdentifierOwned,
    issuer_name_hash: OctetString,
    issuer_key_hash: OctetString,
    serial_number: SerialNumber,
}

/// Derive the URL-safe Base64 CertID for a certificate.
///
/// The certificate stands in for its own issuer record: the name hash covers
/// its subject distinguished name DER and the key hash covers the contents
/// of its subject-public-key BIT STRING. The serial number is read from the
/// certificate itself, never supplied externally, so the identifier cannot
/// drift from the certificate it names.
///
/// The rendering strips `=` padding and uses the `-`/`_` alphabet.
pub fn derive_id(cert: &Certificate) -> Result<String> {
    let tbs = &cert.parsed().tbs_certificate;

    let name_der = tbs
        .subject
        .to_der()
        .map_err(|e| Error::CertificateDecode(e.to_string()))?;
    let key_bits = tbs
        .subject_public_key_info
        .subject_public_key
        .raw_bytes();

    let cert_id = CertId {
        hash_algorithm: AlgorithmIdentifierOwned {
            oid: ID_SHA1,
            parameters: Some(Any::from(AnyRef::NULL)),
        },
        issuer_name_hash: octet_string(Sha1::digest(&name_der).to_vec())?,
        issuer_key_hash: octet_string(Sha1::digest(key_bits).to_vec())?,
        serial_number: tbs.serial_number.clone(),
    };

    let der = cert_id
        .to_der()
        .map_err(|e| Error::CertificateDecode(e.to_string()))?;
    trace!(len = der.len(), "encoded CertID");
    Ok(URL_SAFE_NO_PAD.encode(der))
}

/// Derive the CertID of the end-entity certificate inside a PFX blob.
///
/// Uses the key-pair entry's certificate when the bundle has one; a
/// cert-only bundle falls back to its first certificate entry, so a
/// truststore still yields an identifier.
pub fn derive_id_from_pfx(pfx_data: &[u8], password: &str) -> Result<String> {
    let bundle = KeystoreBundle::open(pfx_data, password)?;
    let cert = bundle.end_entity_certificate()?;
    derive_id(&cert)
}

fn octet_string(bytes: Vec<u8>) -> Result<OctetString> {
    OctetString::new(bytes).map_err(|e| Error::CertificateDecode(e.to_string()))
}
