//! Hybrid asymmetric seal: RSA-OAEP wraps a fresh session key, which in turn
//! keys a symmetric encrypt-then-MAC envelope for the actual payload. This
//! removes RSA-OAEP's small plaintext bound from the public `AsymSeal`
//! surface without weakening authentication, since the outer signature still
//! covers the wrapped key and the inner envelope together.

use rand::{rngs::OsRng, RngCore};
use rsa::{RsaPrivateKey, RsaPublicKey};

use crate::error::CryptoError;
use crate::kdf::derive_session_subkey;
use crate::keys::{EncKey, MacKey, SessionKey};
use crate::{pke, sign, symenc};

/// `wrapped_session_key_len(2048) || wrapped_session_key || symenc::seal(payload)`, signed.
pub fn asym_seal(recipient_pke_public: &RsaPublicKey, sender_signing_private: &RsaPrivateKey, plaintext: &[u8]) -> Result<Vec<u8>, CryptoError> {
	let mut session_key = SessionKey([0u8; 32]);
	OsRng.fill_bytes(&mut session_key.0);

	let wrapped_key = pke::encrypt(recipient_pke_public, &session_key[..])?;
	let (sess_enc, sess_mac) = session_subkeys(&session_key);
	let inner = symenc::seal(&sess_enc, &sess_mac, plaintext);

	let mut body = Vec::with_capacity(2 + wrapped_key.len() + inner.len());
	body.extend_from_slice(&(wrapped_key.len() as u16).to_le_bytes());
	body.extend_from_slice(&wrapped_key);
	body.extend_from_slice(&inner);

	let signature = sign::sign(sender_signing_private, &body);

	let mut out = Vec::with_capacity(sign::SIGNATURE_LEN + body.len());
	out.extend_from_slice(&signature);
	out.extend_from_slice(&body);
	Ok(out)
}

pub fn asym_open(sender_verify_public: &RsaPublicKey, recipient_pke_private: &RsaPrivateKey, sealed: &[u8]) -> Result<Vec<u8>, CryptoError> {
	if sealed.len() < sign::SIGNATURE_LEN + 2 {
		return Err(CryptoError::TruncatedData);
	}
	let (signature, body) = sealed.split_at(sign::SIGNATURE_LEN);
	sign::verify(sender_verify_public, body, signature)?;

	if body.len() < 2 {
		return Err(CryptoError::TruncatedData);
	}
	let (len_bytes, rest) = body.split_at(2);
	let wrapped_len = u16::from_le_bytes([len_bytes[0], len_bytes[1]]) as usize;
	if rest.len() < wrapped_len {
		return Err(CryptoError::TruncatedData);
	}
	let (wrapped_key, inner) = rest.split_at(wrapped_len);

	let session_key_bytes = pke::decrypt(recipient_pke_private, wrapped_key)?;
	let session_key = SessionKey::from_slice(&session_key_bytes).ok_or(CryptoError::DecryptionError)?;
	let (sess_enc, sess_mac) = session_subkeys(&session_key);

	symenc::open(&sess_enc, &sess_mac, inner)
}

fn session_subkeys(session_key: &SessionKey) -> (EncKey, MacKey) {
	let enc_bytes = derive_session_subkey(&session_key[..], b"enc-key", 16);
	let mac_bytes = derive_session_subkey(&session_key[..], b"mac-key", 16);
	(EncKey::from_slice(&enc_bytes).expect("16 bytes"), MacKey::from_slice(&mac_bytes).expect("16 bytes"))
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::{pke, sign};

	fn actors() -> (pke::PkeKeyPair, sign::SigningKeyPair) {
		(pke::generate_keypair().unwrap(), sign::generate_keypair().unwrap())
	}

	#[test]
	fn round_trip_large_payload() {
		let (recipient_pke, sender_signing) = actors();
		let payload = vec![0x5au8; 4096];
		let sealed = asym_seal(&recipient_pke.public, &sender_signing.sign, &payload).unwrap();
		let opened = asym_open(&sender_signing.verify, &recipient_pke.private, &sealed).unwrap();
		assert_eq!(opened, payload);
	}

	#[test]
	fn wrong_signer_fails() {
		let (recipient_pke, _) = actors();
		let (_, impostor_signing) = actors();
		let (_, real_signing) = actors();
		let sealed = asym_seal(&recipient_pke.public, &impostor_signing.sign, b"hi").unwrap();
		assert!(asym_open(&real_signing.verify, &recipient_pke.private, &sealed).is_err());
	}

	#[test]
	fn wrong_recipient_fails() {
		let (_, sender_signing) = actors();
		let (impostor_pke, _) = actors();
		let (real_pke, _) = actors();
		let sealed = asym_seal(&real_pke.public, &sender_signing.sign, b"hi").unwrap();
		assert!(asym_open(&sender_signing.verify, &impostor_pke.private, &sealed).is_err());
	}

	#[test]
	fn tamper_detection() {
		let (recipient_pke, sender_signing) = actors();
		let mut sealed = asym_seal(&recipient_pke.public, &sender_signing.sign, b"hello").unwrap();
		let last = sealed.len() - 1;
		sealed[last] ^= 1;
		assert!(asym_open(&sender_signing.verify, &recipient_pke.private, &sealed).is_err());
	}
}
