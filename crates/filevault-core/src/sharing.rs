use serde::{Deserialize, Serialize};

use filevault_crypto::FileKey;

use crate::addr::{file_key_addr, file_metadata_addr, file_owner_addr, Id};
use crate::client::Client;
use crate::envelope;
use crate::error::FileVaultError;
use crate::file::{self, FileHead, FileMetadataNode};

/// An out-of-band sharing capability: sealed to the recipient, signed by the
/// inviter, holding everything needed to graft a new node onto the sharing
/// tree. The invitation id is the capability; it is transmitted by some
/// external channel this crate does not define.
#[derive(Serialize, Deserialize)]
struct Invitation {
	owner: String,
	parent: Id,
	file_key: FileKey,
}

pub(crate) fn create_invitation(client: &Client, filename: &str, recipient: &str) -> Result<Id, FileVaultError> {
	let file_key = file::resolve_file_key(client, filename)?;
	let (enc, mac) = file::file_sym_keys(&file_key);

	let meta_id = file_metadata_addr(filename, client.username());
	let node: FileMetadataNode = envelope::sym_open(client.datastore(), &enc, &mac, meta_id)?;
	// Confirm the file is actually reachable before handing out a capability for it.
	let _head: FileHead = envelope::sym_open(client.datastore(), &enc, &mac, node.head)?;

	let owner: String = envelope::sym_open(client.datastore(), client.u_enc(), client.u_mac(), file_owner_addr(filename, client.username()))?;

	let invitation = Invitation { owner, parent: meta_id, file_key };
	let invitation_id = Id::random();
	envelope::asym_seal(client.datastore(), client.keystore(), recipient, client.signing_key(), invitation_id, &invitation)?;

	let mut node = node;
	node.children_names.push(recipient.to_string());
	envelope::sym_seal(client.datastore(), &enc, &mac, meta_id, &node)?;

	tracing::info!(filename, recipient, "created invitation");
	Ok(invitation_id)
}

pub(crate) fn accept_invitation(client: &Client, sender: &str, invitation_id: Id, filename: &str) -> Result<(), FileVaultError> {
	let own_meta_id = file_metadata_addr(filename, client.username());
	if client.datastore().get(own_meta_id).is_some() || file::resolve_file_key(client, filename).is_ok() {
		return Err(FileVaultError::Exists);
	}

	let invitation: Invitation = envelope::asym_open(client.datastore(), client.keystore(), sender, client.pke_key(), invitation_id)?;
	let (enc, mac) = file::file_sym_keys(&invitation.file_key);

	let mut parent_node: FileMetadataNode = envelope::sym_open(client.datastore(), &enc, &mac, invitation.parent)?;

	let new_node = FileMetadataNode {
		username: client.username().to_string(),
		filename: filename.to_string(),
		head: parent_node.head,
		children: Vec::new(),
		children_names: Vec::new(),
	};
	envelope::sym_seal(client.datastore(), &enc, &mac, own_meta_id, &new_node)?;

	parent_node.children.push(own_meta_id);
	envelope::sym_seal(client.datastore(), &enc, &mac, invitation.parent, &parent_node)?;

	envelope::sym_seal(client.datastore(), client.u_enc(), client.u_mac(), file_key_addr(filename, client.username()), &invitation.file_key)?;
	envelope::sym_seal(
		client.datastore(),
		client.u_enc(),
		client.u_mac(),
		file_owner_addr(filename, client.username()),
		&invitation.owner,
	)?;

	client.datastore().delete(invitation_id);

	tracing::info!(filename, sender, "accepted invitation");
	Ok(())
}
