use filevault_crypto::{EncKey, FileKey, MacKey};
use serde::{Deserialize, Serialize};

use crate::addr::{file_key_addr, file_metadata_addr, file_owner_addr, Id};
use crate::client::Client;
use crate::envelope;
use crate::error::FileVaultError;

/// A file's shared content pointer: the first and last chunk in its forward
/// link chain. `last` exists purely so append can reach the tail in O(1)
/// instead of walking the whole chain.
#[derive(Serialize, Deserialize)]
pub(crate) struct FileHead {
	pub first: Id,
	pub last: Id,
}

#[derive(Serialize, Deserialize)]
pub(crate) struct ContentChunk {
	pub payload_id: Id,
	pub next: Option<Id>,
}

#[derive(Serialize, Deserialize, Clone)]
pub(crate) struct Payload(pub Vec<u8>);

/// One node of the sharing tree: the owner's node is rooted at their own
/// username; each accepted invitation adds one node under the inviter.
#[derive(Serialize, Deserialize)]
pub(crate) struct FileMetadataNode {
	pub username: String,
	pub filename: String,
	pub head: Id,
	pub children: Vec<Id>,
	pub children_names: Vec<String>,
}

/// Derives the symmetric keys that protect a file's content chain and
/// metadata node from its file key. The file key itself doubles as the
/// encryption key; only the MAC key is HKDF-derived.
pub(crate) fn file_sym_keys(file_key: &FileKey) -> (EncKey, MacKey) {
	let enc = EncKey(file_key.0);
	let mac = filevault_crypto::derive_mac_key(&file_key[..]);
	(enc, mac)
}

/// Resolves the current file key for `filename` as seen by `client`.
///
/// Tries the symmetric slot first (the common case); falls back to the
/// asymmetric slot republished by the owner after a revocation. This
/// fallback is the only way a non-revoked sharee ever receives a rotated key.
pub(crate) fn resolve_file_key(client: &Client, filename: &str) -> Result<FileKey, FileVaultError> {
	let id = file_key_addr(filename, client.username());

	match envelope::sym_open::<FileKey>(client.datastore(), client.u_enc(), client.u_mac(), id) {
		Ok(key) => Ok(key),
		Err(_) => {
			let owner: String = envelope::sym_open(client.datastore(), client.u_enc(), client.u_mac(), file_owner_addr(filename, client.username()))?;
			envelope::asym_open(client.datastore(), client.keystore(), &owner, client.pke_key(), id)
		}
	}
}

pub(crate) fn store_file(client: &Client, filename: &str, data: &[u8]) -> Result<(), FileVaultError> {
	let meta_id = file_metadata_addr(filename, client.username());

	if client.datastore().get(meta_id).is_none() {
		create_file(client, filename, data)
	} else {
		overwrite_file(client, filename, data)
	}
}

fn create_file(client: &Client, filename: &str, data: &[u8]) -> Result<(), FileVaultError> {
	let file_key = FileKey::from_rng(&mut rand::rngs::OsRng);
	let (enc, mac) = file_sym_keys(&file_key);

	let payload_id = Id::random();
	envelope::sym_seal(client.datastore(), &enc, &mac, payload_id, &Payload(data.to_vec()))?;

	let chunk_id = Id::random();
	envelope::sym_seal(client.datastore(), &enc, &mac, chunk_id, &ContentChunk { payload_id, next: None })?;

	let head_id = Id::random();
	envelope::sym_seal(client.datastore(), &enc, &mac, head_id, &FileHead { first: chunk_id, last: chunk_id })?;

	let node = FileMetadataNode {
		username: client.username().to_string(),
		filename: filename.to_string(),
		head: head_id,
		children: Vec::new(),
		children_names: Vec::new(),
	};
	let meta_id = file_metadata_addr(filename, client.username());
	envelope::sym_seal(client.datastore(), &enc, &mac, meta_id, &node)?;

	envelope::sym_seal(client.datastore(), client.u_enc(), client.u_mac(), file_key_addr(filename, client.username()), &file_key)?;
	envelope::sym_seal(
		client.datastore(),
		client.u_enc(),
		client.u_mac(),
		file_owner_addr(filename, client.username()),
		&client.username().to_string(),
	)?;

	tracing::info!(filename, "created new file");
	Ok(())
}

fn overwrite_file(client: &Client, filename: &str, data: &[u8]) -> Result<(), FileVaultError> {
	let file_key = resolve_file_key(client, filename)?;
	let (enc, mac) = file_sym_keys(&file_key);

	let meta_id = file_metadata_addr(filename, client.username());
	let node: FileMetadataNode = envelope::sym_open(client.datastore(), &enc, &mac, meta_id)?;
	let head_id = node.head;
	let head: FileHead = envelope::sym_open(client.datastore(), &enc, &mac, head_id)?;

	let mut cursor = Some(head.first);
	while let Some(chunk_id) = cursor {
		let chunk: ContentChunk = envelope::sym_open(client.datastore(), &enc, &mac, chunk_id)?;
		client.datastore().delete(chunk.payload_id);
		client.datastore().delete(chunk_id);
		cursor = chunk.next;
	}

	let payload_id = Id::random();
	envelope::sym_seal(client.datastore(), &enc, &mac, payload_id, &Payload(data.to_vec()))?;
	let chunk_id = Id::random();
	envelope::sym_seal(client.datastore(), &enc, &mac, chunk_id, &ContentChunk { payload_id, next: None })?;
	envelope::sym_seal(client.datastore(), &enc, &mac, head_id, &FileHead { first: chunk_id, last: chunk_id })?;

	tracing::info!(filename, "overwrote file");
	Ok(())
}

/// Appends `data` as a new final chunk. Cost is independent of file length:
/// one read of the metadata node, head, and former tail, and four writes.
pub(crate) fn append_to_file(client: &Client, filename: &str, data: &[u8]) -> Result<(), FileVaultError> {
	let file_key = resolve_file_key(client, filename)?;
	let (enc, mac) = file_sym_keys(&file_key);

	let meta_id = file_metadata_addr(filename, client.username());
	let node: FileMetadataNode = envelope::sym_open(client.datastore(), &enc, &mac, meta_id)?;
	let head_id = node.head;
	let mut head: FileHead = envelope::sym_open(client.datastore(), &enc, &mac, head_id)?;

	let payload_id = Id::random();
	envelope::sym_seal(client.datastore(), &enc, &mac, payload_id, &Payload(data.to_vec()))?;

	let new_chunk_id = Id::random();
	envelope::sym_seal(client.datastore(), &enc, &mac, new_chunk_id, &ContentChunk { payload_id, next: None })?;

	let mut tail: ContentChunk = envelope::sym_open(client.datastore(), &enc, &mac, head.last)?;
	tail.next = Some(new_chunk_id);
	envelope::sym_seal(client.datastore(), &enc, &mac, head.last, &tail)?;

	head.last = new_chunk_id;
	envelope::sym_seal(client.datastore(), &enc, &mac, head_id, &head)?;

	Ok(())
}

pub(crate) fn load_file(client: &Client, filename: &str) -> Result<Vec<u8>, FileVaultError> {
	let file_key = resolve_file_key(client, filename)?;
	let (enc, mac) = file_sym_keys(&file_key);

	let meta_id = file_metadata_addr(filename, client.username());
	let node: FileMetadataNode = envelope::sym_open(client.datastore(), &enc, &mac, meta_id)?;
	let head: FileHead = envelope::sym_open(client.datastore(), &enc, &mac, node.head)?;

	let mut out = Vec::new();
	let mut cursor = Some(head.first);
	while let Some(chunk_id) = cursor {
		let chunk: ContentChunk = envelope::sym_open(client.datastore(), &enc, &mac, chunk_id)?;
		let payload: Payload = envelope::sym_open(client.datastore(), &enc, &mac, chunk.payload_id)?;
		out.extend_from_slice(&payload.0);
		cursor = chunk.next;
	}

	Ok(out)
}
