//! Deterministic Datastore/Keystore addressing.

use data_encoding::HEXLOWER_PERMISSIVE;
use rand::RngCore;
use serde::{de, Deserialize, Deserializer, Serialize, Serializer};
use sha2::{Digest, Sha256};
use std::fmt;

/// A 128-bit Datastore or Keystore address.
#[derive(Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Id(pub [u8; 16]);

impl Id {
	pub fn from_slice(bs: &[u8]) -> Option<Id> {
		if bs.len() != 16 {
			return None;
		}
		let mut out = [0u8; 16];
		out.copy_from_slice(bs);
		Some(Id(out))
	}

	/// A fresh random id, used for content chunks, payloads, and invitations
	/// (anything not addressed deterministically by [`addr`]).
	pub fn random() -> Id {
		let mut out = [0u8; 16];
		rand::rngs::OsRng.fill_bytes(&mut out);
		Id(out)
	}
}

impl fmt::Debug for Id {
	fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
		write!(f, "Id({})", HEXLOWER_PERMISSIVE.encode(&self.0))
	}
}

impl Serialize for Id {
	fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
		serializer.serialize_str(&HEXLOWER_PERMISSIVE.encode(&self.0))
	}
}

impl<'de> Deserialize<'de> for Id {
	fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Id, D::Error> {
		let s = String::deserialize(deserializer)?;
		let bytes = HEXLOWER_PERMISSIVE.decode(s.as_bytes()).map_err(de::Error::custom)?;
		Id::from_slice(&bytes).ok_or_else(|| de::Error::invalid_length(bytes.len(), &"16 bytes"))
	}
}

/// Deterministic address for a named resource: `hash(tag)[:8] || hash(owner)[:8]`.
///
/// Disjoint tag strings keep distinct resource kinds from colliding even when
/// they share an owner.
pub fn addr(tag: &str, owner: &str) -> Id {
	let tag_hash = Sha256::digest(tag.as_bytes());
	let owner_hash = Sha256::digest(owner.as_bytes());

	let mut out = [0u8; 16];
	out[..8].copy_from_slice(&tag_hash[..8]);
	out[8..].copy_from_slice(&owner_hash[..8]);
	Id(out)
}

pub fn salt_addr(username: &str) -> Id {
	addr("salt", username)
}

pub fn user_record_addr(username: &str) -> Id {
	addr("struct", username)
}

pub fn file_metadata_addr(filename: &str, username: &str) -> Id {
	addr(filename, username)
}

pub fn file_key_addr(filename: &str, username: &str) -> Id {
	addr(&format!("{filename}key"), username)
}

pub fn file_owner_addr(filename: &str, username: &str) -> Id {
	addr(&format!("{filename}owner"), username)
}

/// Keystore address of a user's asymmetric-encryption public key.
pub fn pke_pubkey_addr(username: &str) -> Id {
	addr("pke", username)
}

/// Keystore address of a user's signature verification key.
pub fn verify_key_addr(username: &str) -> Id {
	addr("ds", username)
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn deterministic() {
		assert_eq!(addr("salt", "alice"), addr("salt", "alice"));
	}

	#[test]
	fn tag_isolation() {
		assert_ne!(file_key_addr("f", "alice"), file_owner_addr("f", "alice"));
		assert_ne!(file_metadata_addr("f", "alice"), file_metadata_addr("g", "alice"));
		assert_ne!(file_metadata_addr("f", "alice"), file_metadata_addr("f", "bob"));
	}

	#[test]
	fn hex_round_trip() {
		let id = Id::random();
		let json = serde_json::to_string(&id).unwrap();
		let back: Id = serde_json::from_str(&json).unwrap();
		assert_eq!(id, back);
	}
}
