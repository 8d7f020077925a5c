use std::collections::{HashMap, HashSet};

use crate::artifact::FileData;
use crate::error::{Result, SizeReportError};
use crate::rename::RenameResolver;

/// Difference between two builds. `changed_items` holds (old, new) pairs in
/// insertion order, including zero-delta renames; an artifact never appears
/// in more than one bucket.
#[derive(Debug, Default, Clone)]
pub struct BuildChanges {
    pub new_items: Vec<FileData>,
    pub deleted_items: Vec<FileData>,
    pub changed_items: Vec<(FileData, FileData)>,
}

/// Match the previous artifact set against the current one.
///
/// Paths are the sole matching key. A previous artifact with no current
/// counterpart is removed, an unmatched current artifact is new, and a
/// matched pair is reported as changed only when the gzip sizes differ.
///
/// With a resolver, removals are then re-examined in their original
/// deletion order (a snapshot taken before any reclassification) against
/// the live list of still-unmatched new paths. The candidate list shrinks
/// as renames are accepted, so an earlier rename can consume a later
/// resolver's target; a resolver answer outside the live list is a hard
/// `InvalidRenameTarget` failure either way. That order dependence is part
/// of the contract.
pub async fn get_changes(
    previous: &[FileData],
    current: &[FileData],
    resolver: Option<&dyn RenameResolver>,
) -> Result<BuildChanges> {
    // Index current artifacts by path; artifact counts run into the
    // hundreds, a linear scan per lookup doesn't.
    let current_by_path: HashMap<&str, usize> = current
        .iter()
        .enumerate()
        .map(|(index, file)| (file.path.as_str(), index))
        .collect();

    let mut consumed: HashSet<usize> = HashSet::new();
    let mut deleted_items: Vec<FileData> = Vec::new();
    let mut changed_items: Vec<(FileData, FileData)> = Vec::new();

    for old in previous {
        match current_by_path.get(old.path.as_str()) {
            Some(&index) => {
                consumed.insert(index);
                let new = &current[index];
                if old.gzip_size != new.gzip_size {
                    changed_items.push((old.clone(), new.clone()));
                }
            }
            None => deleted_items.push(old.clone()),
        }
    }

    let mut new_items: Vec<FileData> = current
        .iter()
        .enumerate()
        .filter(|(index, _)| !consumed.contains(index))
        .map(|(_, file)| file.clone())
        .collect();

    if let Some(resolver) = resolver {
        let removal_snapshot = deleted_items.clone();
        let mut candidate_paths: Vec<String> =
            new_items.iter().map(|file| file.path.clone()).collect();

        for old in &removal_snapshot {
            let Some(target) = resolver.resolve(&old.path, &candidate_paths).await else {
                continue;
            };
            if !candidate_paths.contains(&target) {
                return Err(SizeReportError::InvalidRenameTarget(target));
            }

            candidate_paths.retain(|path| path != &target);
            deleted_items.retain(|file| file.path != old.path);
            if let Some(index) = new_items.iter().position(|file| file.path == target) {
                let matched = new_items.remove(index);
                changed_items.push((old.clone(), matched));
            }
        }
    }

    Ok(BuildChanges {
        new_items,
        deleted_items,
        changed_items,
    })
}
