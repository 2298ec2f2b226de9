#[derive(Debug)]
pub enum CryptoError {
	/// The encrypted data was corrupted, tampered with, or sealed under a different key.
	DecryptionError,
	/// Truncated data was provided (shorter than the envelope's fixed-width prefix).
	TruncatedData,
	/// A signature did not verify against the claimed signer's key.
	BadSignature,
	/// The recipient or sender's public key could not be parsed.
	BadKey,
	/// RSA operation failed (e.g. plaintext too large for the modulus).
	RsaError(rsa::Error),
}

impl From<rsa::Error> for CryptoError {
	fn from(e: rsa::Error) -> Self {
		CryptoError::RsaError(e)
	}
}

impl std::error::Error for CryptoError {}

impl std::fmt::Display for CryptoError {
	fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
		match self {
			CryptoError::DecryptionError => write!(f, "decryption error"),
			CryptoError::TruncatedData => write!(f, "truncated data"),
			CryptoError::BadSignature => write!(f, "bad signature"),
			CryptoError::BadKey => write!(f, "bad key"),
			CryptoError::RsaError(e) => write!(f, "RSA error: {e}"),
		}
	}
}
