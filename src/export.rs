//! Chain classification and PEM assembly
//!
//! Takes an externally built, leaf-first certificate chain plus a set of
//! export facets and emits the requested segments as concatenated PEM text.
//! Output order is fixed regardless of which facets are enabled: private
//! key, end-entity certificate, intermediates in chain order, root.

use der::{Decode, Encode};
use pem::{EncodeConfig, LineEnding, Pem};
use pkcs8::PrivateKeyInfo;
use sec1::{EcParameters, EcPrivateKey};
use tracing::trace;

use crate::cert::{Certificate, PrivateKey};
use crate::error::{Error, Result};
use crate::keystore::KeystoreBundle;

const RSA_ENCRYPTION_OID: pkcs8::ObjectIdentifier =
    pkcs8::ObjectIdentifier::new_unwrap("1.2.840.113549.1.1.1");
const EC_PUBLIC_KEY_OID: pkcs8::ObjectIdentifier =
    pkcs8::ObjectIdentifier::new_unwrap("1.2.840.10045.2.1");

/// Positional role of a certificate within a leaf-first chain.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChainPosition {
    /// Index 0, the certificate issued to the subject
    EndEntity,
    /// Strictly between the end-entity and the root
    Intermediate,
    /// Last index of a chain longer than one element
    Root,
}

/// Classify the certificate at `index` of a chain of length `chain_len`.
///
/// Pure index arithmetic; certificate contents are never consulted. The
/// end-entity check is evaluated first, so in a single-element chain the
/// sole certificate is end-entity and never root.
///
/// `index` must be less than `chain_len`.
pub fn classify(index: usize, chain_len: usize) -> ChainPosition {
    debug_assert!(index < chain_len);
    if index == 0 {
        ChainPosition::EndEntity
    } else if index == chain_len - 1 {
        ChainPosition::Root
    } else {
        ChainPosition::Intermediate
    }
}

/// Which segments of the chain to emit.
///
/// Four independent facets; enabling or disabling one never changes whether
/// another facet's segment is emitted. Modeled as explicit booleans rather
/// than a bitmask so no facet value can alias another.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ExportSelection {
    /// Emit the private key block first
    pub private_key: bool,
    /// Emit the end-entity certificate
    pub end_entity: bool,
    /// Emit intermediate certificates, in chain order
    pub intermediates: bool,
    /// Emit the root certificate
    pub root: bool,
}

impl ExportSelection {
    /// Nothing selected.
    pub fn none() -> Self {
        Self::default()
    }

    /// Every certificate segment, without the private key.
    pub fn full_chain() -> Self {
        Self::none().with_end_entity().with_intermediates().with_root()
    }

    /// Enable the private-key facet.
    pub fn with_private_key(mut self) -> Self {
        self.private_key = true;
        self
    }

    /// Enable the end-entity facet.
    pub fn with_end_entity(mut self) -> Self {
        self.end_entity = true;
        self
    }

    /// Enable the intermediates facet.
    pub fn with_intermediates(mut self) -> Self {
        self.intermediates = true;
        self
    }

    /// Enable the root facet.
    pub fn with_root(mut self) -> Self {
        self.root = true;
        self
    }

    fn includes(self, position: ChainPosition) -> bool {
        match position {
            ChainPosition::EndEntity => self.end_entity,
            ChainPosition::Intermediate => self.intermediates,
            ChainPosition::Root => self.root,
        }
    }
}

/// Emit the selected chain segments as concatenated PEM text.
///
/// `chain` is leaf-first, as produced by an external chain builder or by
/// [`KeystoreBundle::private_key_chain`]. Fails with
/// [`Error::ExportFlagMismatch`] when the private-key facet is selected but
/// no key was supplied; an unrequested key is silently ignored. Purely
/// functional: the same inputs always yield byte-identical text.
pub fn assemble(
    chain: &[Certificate],
    selection: ExportSelection,
    private_key: Option<&PrivateKey>,
) -> Result<String> {
    if selection.private_key && private_key.is_none() {
        return Err(Error::ExportFlagMismatch);
    }

    let mut out = String::new();

    if selection.private_key {
        if let Some(key) = private_key {
            out.push_str(&private_key_pem(key)?);
        }
    }

    for (index, cert) in chain.iter().enumerate() {
        let position = classify(index, chain.len());
        if selection.includes(position) {
            trace!(index, ?position, "emitting chain segment");
            out.push_str(&certificate_pem(cert));
        }
    }

    Ok(out)
}

/// [`assemble`], as the ASCII byte encoding of the same text.
pub fn assemble_bytes(
    chain: &[Certificate],
    selection: ExportSelection,
    private_key: Option<&PrivateKey>,
) -> Result<Vec<u8>> {
    Ok(assemble(chain, selection, private_key)?.into_bytes())
}

/// Re-encode a certificate as a `CERTIFICATE` PEM block.
pub fn certificate_pem(cert: &Certificate) -> String {
    encode_block("CERTIFICATE", cert.as_der().to_vec())
}

/// Re-encode a private key as a PEM block using its native type.
///
/// The PKCS#8 algorithm identifier selects the framing: RSA keys are emitted
/// as PKCS#1 `RSA PRIVATE KEY`, EC keys as SEC1 `EC PRIVATE KEY` with the
/// curve named inline, anything else as the PKCS#8 document itself under
/// `PRIVATE KEY`.
pub fn private_key_pem(key: &PrivateKey) -> Result<String> {
    let info = PrivateKeyInfo::try_from(key.pkcs8_der())
        .map_err(|e| Error::InvalidKeystore(format!("private key is not valid PKCS#8: {e}")))?;

    let (label, body) = if info.algorithm.oid == RSA_ENCRYPTION_OID {
        ("RSA PRIVATE KEY", info.private_key.to_vec())
    } else if info.algorithm.oid == EC_PUBLIC_KEY_OID {
        ("EC PRIVATE KEY", sec1_key_body(&info)?)
    } else {
        ("PRIVATE KEY", key.pkcs8_der().to_vec())
    };

    Ok(encode_block(label, body))
}

/// Build a standalone SEC1 `ECPrivateKey` body from a PKCS#8 EC key.
///
/// PKCS#8 keeps the curve in the outer algorithm identifier and usually
/// omits it from the inner SEC1 structure; a standalone body must name the
/// curve inline or consumers cannot load the key.
fn sec1_key_body(info: &PrivateKeyInfo<'_>) -> Result<Vec<u8>> {
    let mut ec_key = EcPrivateKey::from_der(info.private_key)
        .map_err(|e| Error::InvalidKeystore(format!("EC key body is not valid SEC1: {e}")))?;

    if ec_key.parameters.is_none() {
        let curve = info
            .algorithm
            .parameters_oid()
            .map_err(|e| Error::InvalidKeystore(format!("EC key names no curve: {e}")))?;
        ec_key.parameters = Some(EcParameters::NamedCurve(curve));
    }

    ec_key
        .to_der()
        .map_err(|e| Error::InvalidKeystore(e.to_string()))
}

/// Extract only the private key from a PFX blob, as PEM text.
pub fn key_pem_from_pfx(pfx_data: &[u8], password: &str) -> Result<String> {
    let bundle = KeystoreBundle::open(pfx_data, password)?;
    let (key, _) = bundle.find_private_key_entry()?;
    private_key_pem(&key)
}

fn encode_block(label: &str, der: Vec<u8>) -> String {
    // LF line endings keep output byte-stable across platforms.
    pem::encode_config(
        &Pem::new(label, der),
        EncodeConfig::default().set_line_ending(LineEnding::LF),
    )
}
