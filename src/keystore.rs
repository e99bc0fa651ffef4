//! PKCS#12 keystore reading
//!
//! Opens a PFX byte blob with its password and isolates the single
//! private-key entry together with its certificate. Decode only: no network,
//! no disk, and nothing outlives the extraction call.

use p12_keystore::{Certificate as StoreCertificate, KeyStore, KeyStoreEntry, PrivateKeyChain};
use tracing::debug;

use crate::cert::{Certificate, PrivateKey};
use crate::error::{Error, Result};

/// A decoded PKCS#12 container.
///
/// Entries are addressed by alias. At most one key-pair entry is expected;
/// when several are present, [`KeystoreBundle::find_private_key_entry`] picks
/// the first by ascending alias order so selection stays reproducible for
/// the same input bytes regardless of the underlying container's iteration
/// order.
#[derive(Debug)]
pub struct KeystoreBundle {
    store: KeyStore,
}

impl KeystoreBundle {
    /// Decode a PKCS#12 blob with the given password.
    ///
    /// Fails with [`Error::InvalidKeystore`] when the bytes are malformed or
    /// the password does not verify.
    pub fn open(pfx_data: &[u8], password: &str) -> Result<Self> {
        let store = KeyStore::from_pkcs12(pfx_data, password)
            .map_err(|e| Error::InvalidKeystore(e.to_string()))?;
        debug!(entries = store.entries().count(), "decoded PKCS#12 keystore");
        Ok(Self { store })
    }

    /// Entry aliases, sorted ascending.
    pub fn aliases(&self) -> Vec<&str> {
        let mut aliases: Vec<&str> = self.store.entries().map(|(alias, _)| alias.as_ref()).collect();
        aliases.sort_unstable();
        aliases
    }

    /// Isolate the sole private-key entry and its end-entity certificate.
    ///
    /// Fails with [`Error::NoKeyEntryFound`] when no entry carries a private
    /// key, or when the key entry has no certificate attached.
    pub fn find_private_key_entry(&self) -> Result<(PrivateKey, Certificate)> {
        let (alias, chain) = self.first_key_chain()?;
        let leaf = chain.chain().first().ok_or(Error::NoKeyEntryFound)?;
        debug!(alias, "selected private key entry");
        let key = PrivateKey::from_pkcs8_der(chain.key());
        let cert = Certificate::from_der(leaf.as_der())?;
        Ok((key, cert))
    }

    /// The certificate chain embedded in the key-pair entry, leaf first.
    ///
    /// PKCS#12 files produced by issuance tooling usually carry the full
    /// chain alongside the key; this exposes it in the order required by
    /// [`crate::export::assemble`] for callers that do not run a separate
    /// chain builder.
    pub fn private_key_chain(&self) -> Result<Vec<Certificate>> {
        let (_, chain) = self.first_key_chain()?;
        chain
            .chain()
            .iter()
            .map(|c| Certificate::from_der(c.as_der()))
            .collect()
    }

    /// The certificate playing the end-entity role for this bundle.
    ///
    /// Prefers the key-pair entry's certificate; a bundle without any key
    /// entry falls back to the first certificate-only entry by ascending
    /// alias order. Fails with [`Error::InvalidKeystore`] only when the
    /// bundle holds no certificates at all.
    pub fn end_entity_certificate(&self) -> Result<Certificate> {
        match self.find_private_key_entry() {
            Ok((_, cert)) => Ok(cert),
            Err(Error::NoKeyEntryFound) => self.first_certificate_entry(),
            Err(e) => Err(e),
        }
    }

    fn first_certificate_entry(&self) -> Result<Certificate> {
        let mut candidates: Vec<(&str, &StoreCertificate)> = self
            .store
            .entries()
            .filter_map(|(alias, entry)| match entry {
                KeyStoreEntry::Certificate(cert) => Some((alias.as_ref(), cert)),
                _ => None,
            })
            .collect();
        candidates.sort_unstable_by(|a, b| a.0.cmp(b.0));
        let (_, cert) = candidates
            .into_iter()
            .next()
            .ok_or_else(|| Error::InvalidKeystore("keystore holds no certificates".into()))?;
        Certificate::from_der(cert.as_der())
    }

    fn first_key_chain(&self) -> Result<(&str, &PrivateKeyChain)> {
        let mut candidates: Vec<(&str, &PrivateKeyChain)> = self
            .store
            .entries()
            .filter_map(|(alias, entry)| match entry {
                KeyStoreEntry::PrivateKeyChain(chain) => Some((alias.as_ref(), chain)),
                _ => None,
            })
            .collect();
        candidates.sort_unstable_by(|a, b| a.0.cmp(b.0));
        candidates.into_iter().next().ok_or(Error::NoKeyEntryFound)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const BUNDLE: &[u8] = include_bytes!("../tests/data/bundle.pfx");
    const TRUSTSTORE: &[u8] = include_bytes!("../tests/data/truststore.pfx");

    #[test]
    fn opens_with_correct_password() {
        let bundle = KeystoreBundle::open(BUNDLE, "changeit").unwrap();
        assert!(!bundle.aliases().is_empty());
    }

    #[test]
    fn rejects_wrong_password() {
        let err = KeystoreBundle::open(BUNDLE, "wrong").unwrap_err();
        assert!(matches!(err, Error::InvalidKeystore(_)));
    }

    #[test]
    fn rejects_malformed_bytes() {
        let err = KeystoreBundle::open(b"definitely not pkcs12", "changeit").unwrap_err();
        assert!(matches!(err, Error::InvalidKeystore(_)));
    }

    #[test]
    fn finds_key_entry_and_leaf_cert() {
        let bundle = KeystoreBundle::open(BUNDLE, "changeit").unwrap();
        let (_key, cert) = bundle.find_private_key_entry().unwrap();
        assert!(cert.subject().contains("leaf.certpem.example"));
    }

    #[test]
    fn cert_only_store_has_no_key_entry() {
        let bundle = KeystoreBundle::open(TRUSTSTORE, "changeit").unwrap();
        let err = bundle.find_private_key_entry().unwrap_err();
        assert!(matches!(err, Error::NoKeyEntryFound));
    }

    #[test]
    fn cert_only_store_still_yields_a_certificate() {
        let bundle = KeystoreBundle::open(TRUSTSTORE, "changeit").unwrap();
        let cert = bundle.end_entity_certificate().unwrap();
        assert!(cert.subject().contains("Root CA"));
    }

    #[test]
    fn embedded_chain_is_leaf_first() {
        let bundle = KeystoreBundle::open(BUNDLE, "changeit").unwrap();
        let chain = bundle.private_key_chain().unwrap();
        assert_eq!(chain.len(), 3);
        assert!(chain[0].subject().contains("leaf.certpem.example"));
        assert!(chain[2].subject().contains("Root CA"));
    }
}
