//! Storage operations
//!
//! Produces the child entries of a folder: queried from the provider,
//! sorted folders-first, identifiers obfuscated before they cross the
//! client boundary.

use log::info;

use crate::crypto::TokenCodec;
use crate::error::ListingError;
use crate::storage::provider::DriveProvider;
use crate::storage::results::{DirectoryEntry, DriveFile};

/// Lists the children of a folder.
///
/// `folder_id` must already be a raw provider identifier; tokens are decoded
/// upstream. Ordering is part of the contract: folders before files, then
/// case-insensitive by name.
pub async fn list_directory<P: DriveProvider>(
    provider: &P,
    codec: &TokenCodec,
    folder_id: &str,
) -> Result<Vec<DirectoryEntry>, ListingError> {
    let mut children = provider
        .list_children(folder_id)
        .await
        .map_err(|source| ListingError {
            folder_id: folder_id.to_string(),
            source,
        })?;

    sort_entries(&mut children);

    info!("Listed folder {} - {} entries", folder_id, children.len());

    Ok(children
        .into_iter()
        .map(|file| to_entry(file, codec))
        .collect())
}

fn sort_entries(entries: &mut [DriveFile]) {
    entries.sort_by(|a, b| {
        b.is_folder()
            .cmp(&a.is_folder())
            .then_with(|| a.name.to_lowercase().cmp(&b.name.to_lowercase()))
    });
}

fn to_entry(file: DriveFile, codec: &TokenCodec) -> DirectoryEntry {
    DirectoryEntry {
        id: codec.encode(&file.id),
        name: file.name,
        mime_type: file.mime_type,
        size: file.size,
        modified_time: file.modified_time,
        parents: file
            .parents
            .map(|ids| ids.iter().map(|id| codec.encode(id)).collect()),
    }
}
