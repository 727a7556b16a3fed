//! Path resolution
//!
//! Best-effort by contract: a failed lookup or a missing parent ends the
//! walk with whatever trail has accumulated. The trail may be incomplete
//! but never contains a wrong entry, and resolution never fails.

use log::warn;

use crate::crypto::TokenCodec;
use crate::navigate::results::Breadcrumb;
use crate::storage::DriveProvider;

/// Upper bound on parent-chain hops, in case the provider reports a cyclic
/// or pathologically deep hierarchy
pub const MAX_PATH_DEPTH: usize = 100;

/// Walks the parent chain from `folder_id` up to `root_id`, returning the
/// trail outermost-first, root excluded, current folder included.
///
/// Both identifiers must be raw; the returned trail carries encoded ones.
/// An empty trail means `folder_id` is the root itself or nothing could be
/// resolved.
pub async fn resolve_path<P: DriveProvider>(
    provider: &P,
    codec: &TokenCodec,
    folder_id: &str,
    root_id: &str,
) -> Vec<Breadcrumb> {
    let mut trail = Vec::new();
    if folder_id == root_id {
        return trail;
    }

    let mut current = folder_id.to_string();
    for _ in 0..MAX_PATH_DEPTH {
        let file = match provider.file_metadata(&current).await {
            Ok(file) => file,
            Err(e) => {
                warn!("Breadcrumb walk stopped at {}: {}", current, e);
                break;
            }
        };

        trail.insert(
            0,
            Breadcrumb {
                id: codec.encode(&file.id),
                name: file.name,
            },
        );

        match file.parents.as_ref().and_then(|parents| parents.first()) {
            Some(parent) if parent != root_id => current = parent.clone(),
            // Reached the configured root, or the top of the drive
            Some(_) | None => break,
        }
    }

    trail
}
