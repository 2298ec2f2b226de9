//! `Datastore` and `Keystore` are the two external collaborators this crate
//! treats as adversarial: the Datastore may be read, modified, or deleted at
//! any address by an attacker; the Keystore is append-only and authenticated
//! but otherwise public. Both are modeled as traits so a real network-backed
//! implementation can be dropped in without touching the rest of this crate;
//! `MemoryDatastore`/`MemoryKeystore` are the in-process reference
//! implementations used by this crate's own tests.

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use crate::addr::Id;

pub trait Datastore {
	fn put(&self, id: Id, bytes: Vec<u8>);
	fn get(&self, id: Id) -> Option<Vec<u8>>;
	fn delete(&self, id: Id);
}

/// Returned by [`Keystore::put`] when an id has already been claimed.
#[derive(Debug)]
pub struct AlreadyExists;

pub trait Keystore {
	fn put(&self, id: Id, pubkey: Vec<u8>) -> Result<(), AlreadyExists>;
	fn get(&self, id: Id) -> Option<Vec<u8>>;
}

/// In-memory `Datastore`. Cloning shares the underlying map, so multiple
/// `Client` handles in the same process observe one another's writes.
#[derive(Clone, Default)]
pub struct MemoryDatastore(Rc<RefCell<HashMap<Id, Vec<u8>>>>);

impl MemoryDatastore {
	pub fn new() -> MemoryDatastore {
		MemoryDatastore::default()
	}
}

impl Datastore for MemoryDatastore {
	fn put(&self, id: Id, bytes: Vec<u8>) {
		self.0.borrow_mut().insert(id, bytes);
	}

	fn get(&self, id: Id) -> Option<Vec<u8>> {
		self.0.borrow().get(&id).cloned()
	}

	fn delete(&self, id: Id) {
		self.0.borrow_mut().remove(&id);
	}
}

/// In-memory `Keystore`. Writes are one-shot per id, which is what grounds
/// identity: a username's verification and encryption keys cannot be replaced
/// once published.
#[derive(Clone, Default)]
pub struct MemoryKeystore(Rc<RefCell<HashMap<Id, Vec<u8>>>>);

impl MemoryKeystore {
	pub fn new() -> MemoryKeystore {
		MemoryKeystore::default()
	}
}

impl Keystore for MemoryKeystore {
	fn put(&self, id: Id, pubkey: Vec<u8>) -> Result<(), AlreadyExists> {
		let mut map = self.0.borrow_mut();
		if map.contains_key(&id) {
			return Err(AlreadyExists);
		}
		map.insert(id, pubkey);
		Ok(())
	}

	fn get(&self, id: Id) -> Option<Vec<u8>> {
		self.0.borrow().get(&id).cloned()
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn datastore_round_trip() {
		let ds = MemoryDatastore::new();
		let id = Id::random();
		assert!(ds.get(id).is_none());
		ds.put(id, b"hello".to_vec());
		assert_eq!(ds.get(id), Some(b"hello".to_vec()));
		ds.delete(id);
		assert!(ds.get(id).is_none());
	}

	#[test]
	fn keystore_rejects_overwrite() {
		let ks = MemoryKeystore::new();
		let id = Id::random();
		assert!(ks.put(id, b"key-a".to_vec()).is_ok());
		assert!(ks.put(id, b"key-b".to_vec()).is_err());
		assert_eq!(ks.get(id), Some(b"key-a".to_vec()));
	}

	#[test]
	fn clone_shares_state() {
		let ds = MemoryDatastore::new();
		let ds2 = ds.clone();
		let id = Id::random();
		ds.put(id, b"shared".to_vec());
		assert_eq!(ds2.get(id), Some(b"shared".to_vec()));
	}
}
