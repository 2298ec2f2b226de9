use std::rc::Rc;

use filevault_crypto::{EncKey, KdfProfile, MacKey, Salt};
use rsa::RsaPrivateKey;

use crate::addr::{pke_pubkey_addr, salt_addr, user_record_addr, verify_key_addr, Id};
use crate::envelope;
use crate::error::FileVaultError;
use crate::file;
use crate::record::UserRecord;
use crate::revocation;
use crate::sharing;
use crate::store::{Datastore, Keystore};

/// A single-threaded, single-user handle onto a shared Datastore and
/// Keystore. All eight public operations are synchronous method calls;
/// nothing here spans multiple threads or suspends.
pub struct Client {
	datastore: Rc<dyn Datastore>,
	keystore: Rc<dyn Keystore>,
	username: String,
	u_enc: EncKey,
	u_mac: MacKey,
	signing_key: RsaPrivateKey,
	pke_key: RsaPrivateKey,
}

impl Client {
	pub(crate) fn datastore(&self) -> &dyn Datastore {
		&*self.datastore
	}

	pub(crate) fn keystore(&self) -> &dyn Keystore {
		&*self.keystore
	}

	pub(crate) fn username(&self) -> &str {
		&self.username
	}

	pub(crate) fn u_enc(&self) -> &EncKey {
		&self.u_enc
	}

	pub(crate) fn u_mac(&self) -> &MacKey {
		&self.u_mac
	}

	pub(crate) fn signing_key(&self) -> &RsaPrivateKey {
		&self.signing_key
	}

	pub(crate) fn pke_key(&self) -> &RsaPrivateKey {
		&self.pke_key
	}

	/// Registers a brand new user. Fails `Exists` if the name is already
	/// registered (checked against the Keystore, which rejects overwrites) or
	/// `Invalid` if the name is empty.
	pub fn init_user(datastore: Rc<dyn Datastore>, keystore: Rc<dyn Keystore>, username: &str, password: &[u8], profile: &KdfProfile) -> Result<Client, FileVaultError> {
		if username.is_empty() {
			return Err(FileVaultError::Invalid);
		}

		let salt_id = salt_addr(username);
		if datastore.get(salt_id).is_some() {
			return Err(FileVaultError::Exists);
		}

		let signing = filevault_crypto::generate_signing_keypair()?;
		let pke = filevault_crypto::generate_pke_keypair()?;

		keystore
			.put(verify_key_addr(username), serde_json::to_vec(&signing.verify)?)
			.map_err(|_| FileVaultError::Exists)?;
		keystore
			.put(pke_pubkey_addr(username), serde_json::to_vec(&pke.public)?)
			.map_err(|_| FileVaultError::Exists)?;

		let salt = Salt::from_rng(&mut rand::rngs::OsRng);
		datastore.put(salt_id, salt[..].to_vec());

		let root = filevault_crypto::derive_root_key(password, &salt, profile)?;
		let u_enc = filevault_crypto::derive_enc_key(&root[..]);
		let u_mac = filevault_crypto::derive_mac_key(&root[..]);

		let record = UserRecord {
			username: username.to_string(),
			signing_key: signing.sign,
			pke_key: pke.private,
		};
		envelope::sym_seal(&*datastore, &u_enc, &u_mac, user_record_addr(username), &record)?;

		tracing::info!(username, "registered new user");

		Ok(Client {
			datastore,
			keystore,
			username: username.to_string(),
			u_enc,
			u_mac,
			signing_key: record.signing_key,
			pke_key: record.pke_key,
		})
	}

	/// Logs an existing user in. A wrong password and a tampered user record
	/// are both reported as `BadCredential`; the client cannot and must not
	/// distinguish them.
	pub fn get_user(datastore: Rc<dyn Datastore>, keystore: Rc<dyn Keystore>, username: &str, password: &[u8], profile: &KdfProfile) -> Result<Client, FileVaultError> {
		let salt_bytes = datastore.get(salt_addr(username)).ok_or(FileVaultError::BadCredential)?;
		let salt = Salt::from_slice(&salt_bytes).ok_or(FileVaultError::BadCredential)?;

		let root = filevault_crypto::derive_root_key(password, &salt, profile).map_err(|_| FileVaultError::BadCredential)?;
		let u_enc = filevault_crypto::derive_enc_key(&root[..]);
		let u_mac = filevault_crypto::derive_mac_key(&root[..]);

		let record: UserRecord =
			envelope::sym_open(&*datastore, &u_enc, &u_mac, user_record_addr(username)).map_err(|_| FileVaultError::BadCredential)?;

		tracing::info!(username, "logged in");

		Ok(Client {
			datastore,
			keystore,
			username: record.username,
			u_enc,
			u_mac,
			signing_key: record.signing_key,
			pke_key: record.pke_key,
		})
	}

	pub fn store_file(&self, filename: &str, data: &[u8]) -> Result<(), FileVaultError> {
		file::store_file(self, filename, data)
	}

	pub fn append_to_file(&self, filename: &str, data: &[u8]) -> Result<(), FileVaultError> {
		file::append_to_file(self, filename, data)
	}

	pub fn load_file(&self, filename: &str) -> Result<Vec<u8>, FileVaultError> {
		file::load_file(self, filename)
	}

	pub fn create_invitation(&self, filename: &str, recipient: &str) -> Result<Id, FileVaultError> {
		sharing::create_invitation(self, filename, recipient)
	}

	pub fn accept_invitation(&self, sender: &str, invitation_id: Id, filename: &str) -> Result<(), FileVaultError> {
		sharing::accept_invitation(self, sender, invitation_id, filename)
	}

	pub fn revoke_access(&self, filename: &str, target: &str) -> Result<(), FileVaultError> {
		revocation::revoke_access(self, filename, target)
	}
}
