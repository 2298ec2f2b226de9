//! End-to-end encrypted file sharing over an untrusted Datastore and an
//! append-only authenticated Keystore. No trusted server is assumed; every
//! confidentiality and integrity guarantee comes from the envelopes built in
//! `filevault_crypto` and applied here at addressed, serialized boundaries.

pub mod addr;
mod client;
mod envelope;
pub mod error;
mod file;
mod record;
mod revocation;
mod sharing;
pub mod store;

pub use addr::Id;
pub use client::Client;
pub use error::FileVaultError;
pub use filevault_crypto::KdfProfile;
pub use store::{AlreadyExists, Datastore, Keystore, MemoryDatastore, MemoryKeystore};

#[cfg(test)]
mod tests {
	use super::*;
	use std::rc::Rc;

	fn fixtures() -> (Rc<dyn Datastore>, Rc<dyn Keystore>, KdfProfile) {
		(Rc::new(MemoryDatastore::new()), Rc::new(MemoryKeystore::new()), KdfProfile::default())
	}

	#[test]
	fn init_then_get_user() {
		let (ds, ks, profile) = fixtures();
		Client::init_user(ds.clone(), ks.clone(), "alice", b"pw", &profile).unwrap();
		Client::get_user(ds, ks, "alice", b"pw", &profile).unwrap();
	}

	#[test]
	fn double_init_fails_exists() {
		let (ds, ks, profile) = fixtures();
		Client::init_user(ds.clone(), ks.clone(), "alice", b"pw", &profile).unwrap();
		let err = Client::init_user(ds, ks, "alice", b"pw", &profile).unwrap_err();
		assert!(matches!(err, FileVaultError::Exists));
	}

	#[test]
	fn wrong_password_fails_bad_credential() {
		let (ds, ks, profile) = fixtures();
		Client::init_user(ds.clone(), ks.clone(), "alice", b"pw", &profile).unwrap();
		let err = Client::get_user(ds, ks, "alice", b"wrong", &profile).unwrap_err();
		assert!(matches!(err, FileVaultError::BadCredential));
	}

	#[test]
	fn empty_username_fails_invalid() {
		let (ds, ks, profile) = fixtures();
		let err = Client::init_user(ds, ks, "", b"pw", &profile).unwrap_err();
		assert!(matches!(err, FileVaultError::Invalid));
	}

	#[test]
	fn store_append_load_round_trip() {
		let (ds, ks, profile) = fixtures();
		let alice = Client::init_user(ds, ks, "alice", b"pw", &profile).unwrap();

		alice.store_file("f", b"hello ").unwrap();
		alice.append_to_file("f", b"world").unwrap();
		assert_eq!(alice.load_file("f").unwrap(), b"hello world");
	}

	#[test]
	fn overwrite_replaces_content() {
		let (ds, ks, profile) = fixtures();
		let alice = Client::init_user(ds, ks, "alice", b"pw", &profile).unwrap();

		alice.store_file("f", b"first").unwrap();
		alice.store_file("f", b"second").unwrap();
		assert_eq!(alice.load_file("f").unwrap(), b"second");
	}

	#[test]
	fn share_then_append_visible_to_sharee() {
		let (ds, ks, profile) = fixtures();
		let alice = Client::init_user(ds.clone(), ks.clone(), "alice", b"pw", &profile).unwrap();
		let bob = Client::init_user(ds, ks, "bob", b"pw", &profile).unwrap();

		alice.store_file("f", b"a").unwrap();
		let invitation = alice.create_invitation("f", "bob").unwrap();
		bob.accept_invitation("alice", invitation, "g").unwrap();

		assert_eq!(bob.load_file("g").unwrap(), b"a");
		alice.append_to_file("f", b"b").unwrap();
		assert_eq!(bob.load_file("g").unwrap(), b"ab");
	}

	#[test]
	fn accept_rejects_existing_filename() {
		let (ds, ks, profile) = fixtures();
		let alice = Client::init_user(ds.clone(), ks.clone(), "alice", b"pw", &profile).unwrap();
		let bob = Client::init_user(ds, ks, "bob", b"pw", &profile).unwrap();

		alice.store_file("f", b"a").unwrap();
		let invitation = alice.create_invitation("f", "bob").unwrap();

		bob.store_file("g", b"already here").unwrap();
		let err = bob.accept_invitation("alice", invitation, "g").unwrap_err();
		assert!(matches!(err, FileVaultError::Exists));
	}

	#[test]
	fn revoke_cuts_off_direct_sharee() {
		let (ds, ks, profile) = fixtures();
		let alice = Client::init_user(ds.clone(), ks.clone(), "alice", b"pw", &profile).unwrap();
		let bob = Client::init_user(ds, ks, "bob", b"pw", &profile).unwrap();

		alice.store_file("f", b"a").unwrap();
		let invitation = alice.create_invitation("f", "bob").unwrap();
		bob.accept_invitation("alice", invitation, "g").unwrap();

		alice.revoke_access("f", "bob").unwrap();

		assert!(bob.load_file("g").is_err());
		assert_eq!(alice.load_file("f").unwrap(), b"a");

		alice.append_to_file("f", b"c").unwrap();
		assert_eq!(alice.load_file("f").unwrap(), b"ac");
	}

	#[test]
	fn revoke_cascades_through_subtree() {
		let (ds, ks, profile) = fixtures();
		let alice = Client::init_user(ds.clone(), ks.clone(), "alice", b"pw", &profile).unwrap();
		let bob = Client::init_user(ds.clone(), ks.clone(), "bob", b"pw", &profile).unwrap();
		let carol = Client::init_user(ds, ks, "carol", b"pw", &profile).unwrap();

		alice.store_file("f", b"a").unwrap();
		let inv_to_bob = alice.create_invitation("f", "bob").unwrap();
		bob.accept_invitation("alice", inv_to_bob, "g").unwrap();

		let inv_to_carol = bob.create_invitation("g", "carol").unwrap();
		carol.accept_invitation("bob", inv_to_carol, "h").unwrap();

		assert_eq!(carol.load_file("h").unwrap(), b"a");

		alice.revoke_access("f", "bob").unwrap();

		assert!(bob.load_file("g").is_err());
		assert!(carol.load_file("h").is_err(), "revoking bob must cascade to carol's subtree");
	}

	#[test]
	fn revoke_fails_not_shared_for_indirect_grandchild() {
		let (ds, ks, profile) = fixtures();
		let alice = Client::init_user(ds.clone(), ks.clone(), "alice", b"pw", &profile).unwrap();
		let bob = Client::init_user(ds.clone(), ks.clone(), "bob", b"pw", &profile).unwrap();
		let carol = Client::init_user(ds, ks, "carol", b"pw", &profile).unwrap();

		alice.store_file("f", b"a").unwrap();
		let inv_to_bob = alice.create_invitation("f", "bob").unwrap();
		bob.accept_invitation("alice", inv_to_bob, "g").unwrap();

		let inv_to_carol = bob.create_invitation("g", "carol").unwrap();
		carol.accept_invitation("bob", inv_to_carol, "h").unwrap();

		// Carol has content access only through bob, not as a direct child of
		// alice, so alice revoking her directly must fail: alice can only
		// revoke her own direct sharees.
		let err = alice.revoke_access("f", "carol").unwrap_err();
		assert!(matches!(err, FileVaultError::NotShared));

		// The failed revoke attempt must not have disturbed anyone's access.
		assert_eq!(carol.load_file("h").unwrap(), b"a");
	}

	#[test]
	fn revoke_one_sharee_preserves_another_sharees_access() {
		let (ds, ks, profile) = fixtures();
		let alice = Client::init_user(ds.clone(), ks.clone(), "alice", b"pw", &profile).unwrap();
		let bob = Client::init_user(ds.clone(), ks.clone(), "bob", b"pw", &profile).unwrap();
		let dave = Client::init_user(ds, ks, "dave", b"pw", &profile).unwrap();

		alice.store_file("f", b"a").unwrap();
		let inv_to_bob = alice.create_invitation("f", "bob").unwrap();
		bob.accept_invitation("alice", inv_to_bob, "g").unwrap();
		let inv_to_dave = alice.create_invitation("f", "dave").unwrap();
		dave.accept_invitation("alice", inv_to_dave, "k").unwrap();

		alice.revoke_access("f", "bob").unwrap();

		assert!(bob.load_file("g").is_err());
		assert_eq!(dave.load_file("k").unwrap(), b"a", "dave's own share must survive bob's revocation");

		alice.append_to_file("f", b"c").unwrap();
		assert_eq!(dave.load_file("k").unwrap(), b"ac");
	}

	#[test]
	fn revoke_non_shared_user_fails_not_shared() {
		let (ds, ks, profile) = fixtures();
		let alice = Client::init_user(ds, ks, "alice", b"pw", &profile).unwrap();
		alice.store_file("f", b"a").unwrap();
		let err = alice.revoke_access("f", "mallory").unwrap_err();
		assert!(matches!(err, FileVaultError::NotShared));
	}

	#[test]
	fn revoke_by_non_owner_fails_not_owner() {
		let (ds, ks, profile) = fixtures();
		let alice = Client::init_user(ds.clone(), ks.clone(), "alice", b"pw", &profile).unwrap();
		let bob = Client::init_user(ds.clone(), ks.clone(), "bob", b"pw", &profile).unwrap();
		let carol = Client::init_user(ds, ks, "carol", b"pw", &profile).unwrap();

		alice.store_file("f", b"a").unwrap();
		let inv_to_bob = alice.create_invitation("f", "bob").unwrap();
		bob.accept_invitation("alice", inv_to_bob, "g").unwrap();
		let inv_to_carol = bob.create_invitation("g", "carol").unwrap();
		carol.accept_invitation("bob", inv_to_carol, "h").unwrap();

		let err = bob.revoke_access("g", "carol").unwrap_err();
		assert!(matches!(err, FileVaultError::NotOwner));
	}

	#[test]
	fn tamper_detection_on_file_content() {
		let (ds, ks, profile) = fixtures();
		let alice = Client::init_user(ds.clone(), ks.clone(), "alice", b"pw", &profile).unwrap();
		alice.store_file("f", b"hello").unwrap();

		// Flip a bit in every stored blob; the file must fail to load afterwards.
		// (We don't know which address holds which blob without reaching into
		// internals, so this test instead confirms a targeted corruption of the
		// metadata node is caught.)
		let meta_id = addr::file_metadata_addr("f", "alice");
		let mut bytes = ds.get(meta_id).unwrap();
		let last = bytes.len() - 1;
		bytes[last] ^= 1;
		ds.put(meta_id, bytes);

		assert!(alice.load_file("f").is_err());
	}
}
