use rsa::RsaPrivateKey;
use serde::{Deserialize, Serialize};

/// A user's long-term private state, sealed under their password-derived
/// symmetric keys. The corresponding public keys are republished to the
/// Keystore at registration and are not duplicated here.
#[derive(Serialize, Deserialize)]
pub(crate) struct UserRecord {
	pub username: String,
	pub signing_key: RsaPrivateKey,
	pub pke_key: RsaPrivateKey,
}
