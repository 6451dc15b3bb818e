use std::cmp::Reverse;
use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};
use walkdir::WalkDir;

/// Check whether a directory is empty.
///
/// Missing paths and non-directories are not removal candidates and report
/// false. A directory whose entries all have names starting with `.` is
/// reported as non-empty: hidden-only directories are deliberately kept so
/// marker and metadata files survive. Inspection failures (permissions,
/// races with external deletion) are logged and conservatively report
/// false.
pub fn is_directory_empty(path: &Path) -> bool {
    is_directory_empty_filtered(path, &HashSet::new())
}

/// Emptiness check that treats paths in `removed` as already deleted.
///
/// Dry runs feed the set of virtually-deleted entries through here so a
/// simulated pass reports the same directories a real pass would remove.
pub(crate) fn is_directory_empty_filtered(path: &Path, removed: &HashSet<PathBuf>) -> bool {
    if !path.is_dir() {
        return false;
    }

    let entries = match fs::read_dir(path) {
        Ok(entries) => entries,
        Err(err) => {
            warn!("Cannot inspect directory {:?}: {}", path, err);
            return false;
        }
    };

    let mut hidden = 0;
    for entry in entries {
        let entry = match entry {
            Ok(entry) => entry,
            Err(err) => {
                warn!("Cannot inspect directory {:?}: {}", path, err);
                return false;
            }
        };
        if removed.contains(&entry.path()) {
            continue;
        }
        if !entry.file_name().to_string_lossy().starts_with('.') {
            debug!("Directory {:?} contains {:?}", path, entry.file_name());
            return false;
        }
        hidden += 1;
    }

    if hidden > 0 {
        debug!("Directory {:?} only contains hidden entries, keeping", path);
        return false;
    }
    true
}

/// Enumerate every subdirectory below `root`, deepest first.
///
/// The descending depth sort is what makes a single deletion pass
/// sufficient: every child is evaluated (and possibly removed) before its
/// parent is examined. Walk errors are logged and the affected entries
/// skipped.
pub fn collect_subdirectories(root: &Path) -> Vec<PathBuf> {
    let mut dirs: Vec<PathBuf> = WalkDir::new(root)
        .min_depth(1)
        .into_iter()
        .filter_map(|entry| match entry {
            Ok(entry) if entry.file_type().is_dir() => Some(entry.into_path()),
            Ok(_) => None,
            Err(err) => {
                warn!("Walk error under {:?}: {}", root, err);
                None
            }
        })
        .collect();

    dirs.sort_by_key(|path| Reverse(path.components().count()));
    dirs
}
