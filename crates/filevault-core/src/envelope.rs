//! Addressed, serialized envelopes built on top of `filevault_crypto`'s
//! byte-level `sym_seal`/`asym_seal`. Everything in this module talks to a
//! `Datastore`/`Keystore`; the crypto crate itself never does.

use filevault_crypto::{EncKey, MacKey};
use rsa::{RsaPrivateKey, RsaPublicKey};
use serde::{de::DeserializeOwned, Serialize};

use crate::addr::{verify_key_addr, Id};
use crate::error::FileVaultError;
use crate::store::{Datastore, Keystore};

pub fn sym_seal<T: Serialize>(datastore: &dyn Datastore, enc: &EncKey, mac: &MacKey, id: Id, value: &T) -> Result<(), FileVaultError> {
	let plaintext = serde_json::to_vec(value)?;
	let sealed = filevault_crypto::sym_seal(enc, mac, &plaintext);
	datastore.put(id, sealed);
	Ok(())
}

pub fn sym_open<T: DeserializeOwned>(datastore: &dyn Datastore, enc: &EncKey, mac: &MacKey, id: Id) -> Result<T, FileVaultError> {
	let sealed = datastore.get(id).ok_or(FileVaultError::NotFound)?;
	let plaintext = filevault_crypto::sym_open(enc, mac, &sealed)?;
	Ok(serde_json::from_slice(&plaintext)?)
}

pub fn fetch_pke_pubkey(keystore: &dyn Keystore, username: &str) -> Result<RsaPublicKey, FileVaultError> {
	let bytes = keystore.get(crate::addr::pke_pubkey_addr(username)).ok_or(FileVaultError::NotFound)?;
	serde_json::from_slice(&bytes).map_err(FileVaultError::from)
}

pub fn fetch_verify_key(keystore: &dyn Keystore, username: &str) -> Result<RsaPublicKey, FileVaultError> {
	let bytes = keystore.get(verify_key_addr(username)).ok_or(FileVaultError::NotFound)?;
	serde_json::from_slice(&bytes).map_err(FileVaultError::from)
}

pub fn asym_seal<T: Serialize>(
	datastore: &dyn Datastore,
	keystore: &dyn Keystore,
	recipient: &str,
	signer_sign_key: &RsaPrivateKey,
	id: Id,
	value: &T,
) -> Result<(), FileVaultError> {
	let recipient_pub = fetch_pke_pubkey(keystore, recipient)?;
	let plaintext = serde_json::to_vec(value)?;
	let sealed = filevault_crypto::asym_seal(&recipient_pub, signer_sign_key, &plaintext)?;
	datastore.put(id, sealed);
	Ok(())
}

pub fn asym_open<T: DeserializeOwned>(
	datastore: &dyn Datastore,
	keystore: &dyn Keystore,
	sender: &str,
	recipient_pke_key: &RsaPrivateKey,
	id: Id,
) -> Result<T, FileVaultError> {
	let sender_verify = fetch_verify_key(keystore, sender)?;
	let sealed = datastore.get(id).ok_or(FileVaultError::NotFound)?;
	let plaintext = filevault_crypto::asym_open(&sender_verify, recipient_pke_key, &sealed)?;
	Ok(serde_json::from_slice(&plaintext)?)
}
