use filevault_crypto::CryptoError;

#[derive(Debug)]
pub enum FileVaultError {
	/// Argument was empty or otherwise malformed.
	Invalid,
	/// The identity or filename already exists.
	Exists,
	/// The user record could not be opened. Deliberately returned for both a
	/// wrong password and a tampered record, since the MAC key is
	/// password-derived and the two cases are indistinguishable to the client.
	BadCredential,
	/// An expected Datastore entry was absent.
	NotFound,
	/// A MAC or signature check failed, or a blob was truncated.
	Integrity,
	/// The named user does not have access to this file.
	NotShared,
	/// The caller is not the owner of this file.
	NotOwner,
	Crypto(CryptoError),
	Serialization(serde_json::Error),
}

impl From<serde_json::Error> for FileVaultError {
	fn from(e: serde_json::Error) -> Self {
		FileVaultError::Serialization(e)
	}
}

/// Any envelope failure (bad MAC, bad signature, truncated blob) is surfaced
/// to callers as `Integrity`; only key-derivation/key-generation failures are
/// worth distinguishing further.
impl From<CryptoError> for FileVaultError {
	fn from(e: CryptoError) -> Self {
		match e {
			CryptoError::DecryptionError | CryptoError::BadSignature | CryptoError::TruncatedData => FileVaultError::Integrity,
			other => FileVaultError::Crypto(other),
		}
	}
}

impl std::error::Error for FileVaultError {}

impl std::fmt::Display for FileVaultError {
	fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
		match self {
			FileVaultError::Invalid => write!(f, "invalid argument"),
			FileVaultError::Exists => write!(f, "already exists"),
			FileVaultError::BadCredential => write!(f, "bad credential"),
			FileVaultError::NotFound => write!(f, "not found"),
			FileVaultError::Integrity => write!(f, "integrity check failed"),
			FileVaultError::NotShared => write!(f, "not shared with this user"),
			FileVaultError::NotOwner => write!(f, "caller is not the owner"),
			FileVaultError::Crypto(e) => write!(f, "cryptography error: {e}"),
			FileVaultError::Serialization(e) => write!(f, "serialization error: {e}"),
		}
	}
}
