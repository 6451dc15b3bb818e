use std::path::{Path, PathBuf};
use tracing::debug;

/// Set of directories protected from deletion.
///
/// A candidate is excluded when it equals, or lies inside, any configured
/// exclude directory. Matching happens on canonicalized paths so symlinked
/// spellings of the same directory agree; exclusion only protects the
/// directory itself from removal, files inside it are still cleaned.
#[derive(Debug, Clone, Default)]
pub struct ExcludeSet {
    roots: Vec<PathBuf>,
}

impl ExcludeSet {
    pub fn new(exclude_dirs: &[PathBuf]) -> Self {
        let roots = exclude_dirs
            .iter()
            .map(|dir| canonicalize_or_raw(dir))
            .collect();
        Self { roots }
    }

    pub fn is_empty(&self) -> bool {
        self.roots.is_empty()
    }

    /// Whether `candidate` equals or descends from any exclude directory.
    pub fn is_excluded(&self, candidate: &Path) -> bool {
        if self.roots.is_empty() {
            return false;
        }

        let candidate = canonicalize_or_raw(candidate);
        let excluded = self.roots.iter().any(|root| candidate.starts_with(root));
        if excluded {
            debug!("Path {:?} lies within an excluded directory", candidate);
        }
        excluded
    }
}

fn canonicalize_or_raw(path: &Path) -> PathBuf {
    path.canonicalize().unwrap_or_else(|_| path.to_path_buf())
}
