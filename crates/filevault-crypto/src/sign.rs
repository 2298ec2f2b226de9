use rand::rngs::OsRng;
use rsa::pkcs1v15::{Signature, SigningKey, VerifyingKey};
use rsa::{RsaPrivateKey, RsaPublicKey};
use sha2::Sha256;
use signature::{RandomizedSigner, SignatureEncoding, Verifier};

use crate::error::CryptoError;
use crate::pke::RSA_KEY_BITS;

/// Fixed width of an RSA-2048 PKCS#1 v1.5 signature; callers use this to split
/// a signature prefix off the front of a signed blob.
pub const SIGNATURE_LEN: usize = RSA_KEY_BITS / 8;

/// A signing keypair. `verify` is published to the keystore so others can
/// authenticate messages from this user; `sign` never leaves the user's handle.
#[derive(Clone)]
pub struct SigningKeyPair {
	pub verify: RsaPublicKey,
	pub sign: RsaPrivateKey,
}

pub fn generate_keypair() -> Result<SigningKeyPair, CryptoError> {
	let sign = RsaPrivateKey::new(&mut OsRng, RSA_KEY_BITS).map_err(CryptoError::from)?;
	let verify = RsaPublicKey::from(&sign);
	Ok(SigningKeyPair { verify, sign })
}

pub fn sign(key: &RsaPrivateKey, message: &[u8]) -> Vec<u8> {
	let signing_key = SigningKey::<Sha256>::new(key.clone());
	let signature = signing_key.sign_with_rng(&mut OsRng, message);
	signature.to_vec()
}

pub fn verify(key: &RsaPublicKey, message: &[u8], signature: &[u8]) -> Result<(), CryptoError> {
	let verifying_key = VerifyingKey::<Sha256>::new(key.clone());
	let signature = Signature::try_from(signature).map_err(|_| CryptoError::BadSignature)?;
	verifying_key.verify(message, &signature).map_err(|_| CryptoError::BadSignature)
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn round_trip() {
		let pair = generate_keypair().unwrap();
		let sig = sign(&pair.sign, b"hello world");
		assert_eq!(sig.len(), SIGNATURE_LEN);
		verify(&pair.verify, b"hello world", &sig).unwrap();
	}

	#[test]
	fn tampered_message_fails() {
		let pair = generate_keypair().unwrap();
		let sig = sign(&pair.sign, b"hello world");
		assert!(verify(&pair.verify, b"hello worlD", &sig).is_err());
	}

	#[test]
	fn wrong_key_fails() {
		let pair_a = generate_keypair().unwrap();
		let pair_b = generate_keypair().unwrap();
		let sig = sign(&pair_a.sign, b"hello world");
		assert!(verify(&pair_b.verify, b"hello world", &sig).is_err());
	}
}
