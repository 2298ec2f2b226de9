use aes::Aes128;
use ctr::cipher::{KeyIvInit, StreamCipher};
use hmac::{Hmac, Mac};
use rand::{rngs::OsRng, RngCore};
use sha2::Sha512;

use crate::error::CryptoError;
use crate::keys::{EncKey, Iv, MacKey, MacTag};

type Aes128Ctr = ctr::Ctr128BE<Aes128>;
type HmacSha512 = Hmac<Sha512>;

/// AES-128-CTR encrypt. The caller supplies a fresh IV; the same (key, IV)
/// pair must never be reused.
fn ctr_xor(enc: &EncKey, iv: &Iv, data: &mut [u8]) {
	let key = generic_array::GenericArray::from_slice(&enc[..]);
	let nonce = generic_array::GenericArray::from_slice(&iv[..]);
	let mut cipher = Aes128Ctr::new(key, nonce);
	cipher.apply_keystream(data);
}

fn hmac_tag(mac: &MacKey, data: &[u8]) -> MacTag {
	let mut hmac = HmacSha512::new_from_slice(&mac[..]).expect("HMAC accepts any key length");
	hmac.update(data);
	let bytes = hmac.finalize().into_bytes();
	MacTag::from_slice(&bytes).expect("HMAC-SHA-512 output is always 64 bytes")
}

/// Encrypt-then-MAC a byte string under independent encryption and MAC keys.
/// Output layout: `tag(64) || iv(16) || ciphertext`.
pub fn seal(enc: &EncKey, mac: &MacKey, plaintext: &[u8]) -> Vec<u8> {
	let mut iv = Iv([0u8; 16]);
	OsRng.fill_bytes(&mut iv.0);

	let mut ciphertext = plaintext.to_vec();
	ctr_xor(enc, &iv, &mut ciphertext);

	let mut body = Vec::with_capacity(16 + ciphertext.len());
	body.extend_from_slice(&iv[..]);
	body.extend_from_slice(&ciphertext);

	let tag = hmac_tag(mac, &body);

	let mut out = Vec::with_capacity(64 + body.len());
	out.extend_from_slice(&tag[..]);
	out.extend_from_slice(&body);
	out
}

/// Verify the MAC and decrypt a blob produced by [`seal`]. Fails closed:
/// mismatched tags and truncated input are both reported as `DecryptionError`,
/// never partially decrypted.
pub fn open(enc: &EncKey, mac: &MacKey, sealed: &[u8]) -> Result<Vec<u8>, CryptoError> {
	if sealed.len() < 64 + 16 {
		return Err(CryptoError::TruncatedData);
	}

	let (tag_bytes, body) = sealed.split_at(64);
	let expected = hmac_tag(mac, body);
	let actual = MacTag::from_slice(tag_bytes).expect("split at 64");

	use subtle::ConstantTimeEq;
	if !bool::from(expected.ct_eq(&actual)) {
		return Err(CryptoError::DecryptionError);
	}

	let (iv_bytes, ciphertext) = body.split_at(16);
	let iv = Iv::from_slice(iv_bytes).expect("split at 16");

	let mut plaintext = ciphertext.to_vec();
	ctr_xor(enc, &iv, &mut plaintext);
	Ok(plaintext)
}
