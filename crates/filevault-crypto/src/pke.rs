use rand::rngs::OsRng;
use rsa::{Oaep, RsaPrivateKey, RsaPublicKey};
use sha2::Sha256;

use crate::error::CryptoError;

/// RSA modulus size used for both encryption and signing keypairs.
pub const RSA_KEY_BITS: usize = 2048;

/// An asymmetric encryption keypair. `public` is published to the keystore
/// for others to seal messages to this user; `private` never leaves the user's handle.
#[derive(Clone)]
pub struct PkeKeyPair {
	pub public: RsaPublicKey,
	pub private: RsaPrivateKey,
}

pub fn generate_keypair() -> Result<PkeKeyPair, CryptoError> {
	let private = RsaPrivateKey::new(&mut OsRng, RSA_KEY_BITS).map_err(CryptoError::from)?;
	let public = RsaPublicKey::from(&private);
	Ok(PkeKeyPair { public, private })
}

/// RSA-OAEP encrypt. Used only to wrap a fixed-size session key, never the
/// actual sealed payload, since OAEP plaintext is bounded by the modulus size.
pub fn encrypt(public: &RsaPublicKey, plaintext: &[u8]) -> Result<Vec<u8>, CryptoError> {
	public.encrypt(&mut OsRng, Oaep::new::<Sha256>(), plaintext).map_err(CryptoError::from)
}

pub fn decrypt(private: &RsaPrivateKey, ciphertext: &[u8]) -> Result<Vec<u8>, CryptoError> {
	private.decrypt(Oaep::new::<Sha256>(), ciphertext).map_err(CryptoError::from)
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn round_trip() {
		let pair = generate_keypair().unwrap();
		let session_key = [42u8; 32];
		let wrapped = encrypt(&pair.public, &session_key).unwrap();
		let unwrapped = decrypt(&pair.private, &wrapped).unwrap();
		assert_eq!(unwrapped, session_key);
	}

	#[test]
	fn wrong_key_fails() {
		let pair_a = generate_keypair().unwrap();
		let pair_b = generate_keypair().unwrap();
		let wrapped = encrypt(&pair_a.public, &[1u8; 32]).unwrap();
		assert!(decrypt(&pair_b.private, &wrapped).is_err());
	}
}
