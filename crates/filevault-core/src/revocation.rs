use filevault_crypto::{EncKey, FileKey, MacKey};

use crate::addr::{file_key_addr, file_metadata_addr, file_owner_addr, Id};
use crate::client::Client;
use crate::envelope;
use crate::error::FileVaultError;
use crate::file::{self, ContentChunk, FileHead, FileMetadataNode};

/// Rotates the file key, re-encrypts all content, prunes `target` (and
/// everything only reachable through them) from the sharing tree, and
/// republishes the new key to every surviving node.
///
/// Restricted to the verified owner: only the owner's signing key can validly
/// republish file-key envelopes to the rest of the tree.
pub(crate) fn revoke_access(client: &Client, filename: &str, target: &str) -> Result<(), FileVaultError> {
	let owner: String = envelope::sym_open(client.datastore(), client.u_enc(), client.u_mac(), file_owner_addr(filename, client.username()))?;
	if owner != client.username() {
		return Err(FileVaultError::NotOwner);
	}

	let old_file_key = file::resolve_file_key(client, filename)?;
	let (old_enc, old_mac) = file::file_sym_keys(&old_file_key);

	let owner_meta_id = file_metadata_addr(filename, client.username());
	let mut owner_node: FileMetadataNode = envelope::sym_open(client.datastore(), &old_enc, &old_mac, owner_meta_id)?;

	if !owner_node.children_names.iter().any(|name| name == target) {
		return Err(FileVaultError::NotShared);
	}
	owner_node.children_names.retain(|name| name != target);

	let mut surviving_children = Vec::new();
	for child_id in owner_node.children.iter().copied() {
		let child_node: FileMetadataNode = envelope::sym_open(client.datastore(), &old_enc, &old_mac, child_id)?;
		if child_node.username != target {
			surviving_children.push(child_id);
		}
	}
	owner_node.children = surviving_children;

	let new_file_key = FileKey::from_rng(&mut rand::rngs::OsRng);
	let (new_enc, new_mac) = file::file_sym_keys(&new_file_key);

	let new_head_id = reencrypt_chain(client, &old_enc, &old_mac, &new_enc, &new_mac, owner_node.head)?;
	owner_node.head = new_head_id;

	envelope::sym_seal(client.datastore(), &new_enc, &new_mac, owner_meta_id, &owner_node)?;

	// The owner's own file-key slot switches to an asymmetric, self-sealed
	// envelope too: the sharing tree is rooted at the owner, and every node
	// in it (owner included) gets the same asymmetric treatment once any
	// revocation has occurred, per the Data Model's "after any revocation"
	// rule for `Addr(F+"key", U)`.
	envelope::asym_seal(
		client.datastore(),
		client.keystore(),
		client.username(),
		client.signing_key(),
		file_key_addr(filename, client.username()),
		&new_file_key,
	)?;

	for child_id in owner_node.children.iter().copied() {
		republish_subtree(client, &old_enc, &old_mac, &new_enc, &new_mac, &new_file_key, new_head_id, child_id)?;
	}

	tracing::warn!(filename, target, "revoked access");
	Ok(())
}

/// Decrypts the content chain under the old keys and rebuilds it at fresh
/// ids under the new keys, deleting every old blob along the way. Returns the
/// new head id.
fn reencrypt_chain(client: &Client, old_enc: &EncKey, old_mac: &MacKey, new_enc: &EncKey, new_mac: &MacKey, old_head_id: Id) -> Result<Id, FileVaultError> {
	let old_head: FileHead = envelope::sym_open(client.datastore(), old_enc, old_mac, old_head_id)?;

	let mut new_first = None;
	let mut prev_new_id: Option<Id> = None;
	let mut cursor = Some(old_head.first);

	while let Some(old_chunk_id) = cursor {
		let old_chunk: ContentChunk = envelope::sym_open(client.datastore(), old_enc, old_mac, old_chunk_id)?;
		let payload: file::Payload = envelope::sym_open(client.datastore(), old_enc, old_mac, old_chunk.payload_id)?;

		let new_payload_id = Id::random();
		envelope::sym_seal(client.datastore(), new_enc, new_mac, new_payload_id, &payload)?;
		let new_chunk_id = Id::random();
		envelope::sym_seal(client.datastore(), new_enc, new_mac, new_chunk_id, &ContentChunk { payload_id: new_payload_id, next: None })?;

		if let Some(prev_id) = prev_new_id {
			let mut prev_chunk: ContentChunk = envelope::sym_open(client.datastore(), new_enc, new_mac, prev_id)?;
			prev_chunk.next = Some(new_chunk_id);
			envelope::sym_seal(client.datastore(), new_enc, new_mac, prev_id, &prev_chunk)?;
		} else {
			new_first = Some(new_chunk_id);
		}

		client.datastore().delete(old_chunk.payload_id);
		client.datastore().delete(old_chunk_id);

		prev_new_id = Some(new_chunk_id);
		cursor = old_chunk.next;
	}
	client.datastore().delete(old_head_id);

	let new_head_id = Id::random();
	let new_head = FileHead {
		first: new_first.expect("a stored file always has at least one chunk"),
		last: prev_new_id.expect("a stored file always has at least one chunk"),
	};
	envelope::sym_seal(client.datastore(), new_enc, new_mac, new_head_id, &new_head)?;

	Ok(new_head_id)
}

/// Depth-first walk over the surviving sharing tree, rewriting each node
/// under the new key and republishing the new key to that node's user.
/// Must never be called on a revoked id. The caller is responsible for
/// excluding the revoked subtree from the child list it recurses over.
///
/// Each node's own `filename` field (its own locally-chosen name for the
/// file, not the owner's) is what the rest of the crate looks up the file
/// key under, so the republished key must land at that address rather than
/// the owner's.
fn republish_subtree(
	client: &Client,
	old_enc: &EncKey,
	old_mac: &MacKey,
	new_enc: &EncKey,
	new_mac: &MacKey,
	new_file_key: &FileKey,
	new_head_id: Id,
	node_id: Id,
) -> Result<(), FileVaultError> {
	let mut node: FileMetadataNode = envelope::sym_open(client.datastore(), old_enc, old_mac, node_id)?;
	let children = node.children.clone();
	let node_username = node.username.clone();
	let node_filename = node.filename.clone();

	node.head = new_head_id;
	envelope::sym_seal(client.datastore(), new_enc, new_mac, node_id, &node)?;

	envelope::asym_seal(
		client.datastore(),
		client.keystore(),
		&node_username,
		client.signing_key(),
		file_key_addr(&node_filename, &node_username),
		new_file_key,
	)?;

	for child_id in children {
		republish_subtree(client, old_enc, old_mac, new_enc, new_mac, new_file_key, new_head_id, child_id)?;
	}

	Ok(())
}
