//! Cryptography helper library for filevault.
//!
//! This crate is deliberately free of any notion of "Datastore" or
//! "Keystore" addressing; it only knows how to derive keys and seal/open
//! byte strings. `filevault-core` builds the addressed, serialized envelope
//! layer on top of the primitives exposed here.

#[macro_use]
mod newtype_macros;

mod envelope;
mod error;
mod kdf;
mod keys;
mod pke;
mod sign;
mod symenc;

pub use envelope::{asym_open, asym_seal};
pub use error::CryptoError;
pub use kdf::{derive_enc_key, derive_mac_key, derive_root_key, derive_session_subkey, KdfProfile};
pub use keys::{EncKey, FileKey, Iv, MacKey, MacTag, RootKey, Salt, SessionKey};
pub use pke::{generate_keypair as generate_pke_keypair, PkeKeyPair, RSA_KEY_BITS};
pub use sign::{generate_keypair as generate_signing_keypair, SigningKeyPair, SIGNATURE_LEN};
pub use symenc::{open as sym_open, seal as sym_seal};
