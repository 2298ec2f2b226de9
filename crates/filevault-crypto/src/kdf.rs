use argon2::Argon2;
use hkdf::Hkdf;
use sha2::Sha256;

use crate::error::CryptoError;
use crate::keys::{EncKey, MacKey, RootKey, Salt};

/// Argon2 cost parameters. Cheap in debug builds so tests run fast; expensive
/// in release builds, mirroring the debug/release cost split used for this
/// crate's scrypt-based predecessor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KdfProfile {
	pub mem_cost_kib: u32,
	pub time_cost: u32,
	pub parallelism: u32,
}

#[cfg(debug_assertions)]
impl Default for KdfProfile {
	fn default() -> KdfProfile {
		KdfProfile {
			mem_cost_kib: 8 * 1024,
			time_cost: 1,
			parallelism: 1,
		}
	}
}

#[cfg(not(debug_assertions))]
impl Default for KdfProfile {
	fn default() -> KdfProfile {
		KdfProfile {
			mem_cost_kib: 19 * 1024,
			time_cost: 2,
			parallelism: 1,
		}
	}
}

/// Derives a user's 16-byte root key from their password and salt using Argon2id.
pub fn derive_root_key(password: &[u8], salt: &Salt, profile: &KdfProfile) -> Result<RootKey, CryptoError> {
	let params = argon2::Params::new(profile.mem_cost_kib, profile.time_cost, profile.parallelism, Some(16))
		.map_err(|_| CryptoError::BadKey)?;
	let argon2 = Argon2::new(argon2::Algorithm::Argon2id, argon2::Version::V0x13, params);

	let mut out = [0u8; 16];
	argon2
		.hash_password_into(password, &salt[..], &mut out)
		.map_err(|_| CryptoError::BadKey)?;

	Ok(RootKey(out))
}

fn hkdf_expand(ikm: &[u8], label: &[u8], out: &mut [u8]) {
	let hk = Hkdf::<Sha256>::new(None, ikm);
	hk.expand(label, out).expect("hkdf output length is always valid for our fixed key sizes");
}

/// Derives the symmetric encryption subkey for a root or file key, domain-separated by `"enc-key"`.
pub fn derive_enc_key(ikm: &[u8]) -> EncKey {
	let mut out = [0u8; 16];
	hkdf_expand(ikm, b"enc-key", &mut out);
	EncKey(out)
}

/// Derives the symmetric MAC subkey for a root or file key, domain-separated by `"mac-key"`.
pub fn derive_mac_key(ikm: &[u8]) -> MacKey {
	let mut out = [0u8; 16];
	hkdf_expand(ikm, b"mac-key", &mut out);
	MacKey(out)
}

/// Derives an arbitrary-length subkey for a session key, used to key the inner
/// envelope of a hybrid asymmetric seal.
pub fn derive_session_subkey(session_key: &[u8], label: &[u8], out_len: usize) -> Vec<u8> {
	let mut out = vec![0u8; out_len];
	hkdf_expand(session_key, label, &mut out);
	out
}
