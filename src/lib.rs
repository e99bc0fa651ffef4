//! # certpem
//!
//! Certificate-material extraction and identification for PKCS#12 bundles.
//!
//! Three synchronous, allocation-only components:
//!
//! - **Keystore reading**: open a PFX blob with its password and isolate the
//!   private-key entry and its certificate ([`KeystoreBundle`]).
//! - **Chain export**: classify a leaf-first certificate chain by position
//!   and emit selected segments as PEM text in a fixed order
//!   ([`assemble`], [`ExportSelection`]).
//! - **Identifier derivation**: compute the OCSP-style CertID of a
//!   certificate as URL-safe Base64 ([`derive_id`]).
//!
//! Chain building and validation are the caller's concern; chains are
//! consumed as already ordered sequences and never re-ordered or
//! re-validated here.
//!
//! ## Quick start
//!
//! ```rust,ignore
//! use certpem::{assemble, derive_id, ExportSelection, KeystoreBundle};
//!
//! let bundle = KeystoreBundle::open(&pfx_bytes, "changeit")?;
//! let (key, cert) = bundle.find_private_key_entry()?;
//!
//! // Leaf-first chain, here taken from the bundle itself.
//! let chain = bundle.private_key_chain()?;
//!
//! let selection = ExportSelection::full_chain().with_private_key();
//! let pem = assemble(&chain, selection, Some(&key))?;
//!
//! let id = derive_id(&cert)?;
//! # Ok::<(), certpem::Error>(())
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod cert;
pub mod cert_id;
pub mod error;
pub mod export;
pub mod keystore;

pub use cert::{Certificate, PrivateKey};
pub use cert_id::{derive_id, derive_id_from_pfx};
pub use error::{Error, Result};
pub use export::{
    assemble, assemble_bytes, certificate_pem, classify, key_pem_from_pfx, private_key_pem,
    ChainPosition, ExportSelection,
};
pub use keystore::KeystoreBundle;
