use anyhow::Result;
use std::collections::HashSet;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::RwLock;
use thiserror::Error;
use tracing::{debug, info, warn};
use walkdir::WalkDir;

use crate::config::CleanupConfig;
use crate::exclude::ExcludeSet;
use crate::notify::Reporter;
use crate::scanner::{collect_subdirectories, is_directory_empty, is_directory_empty_filtered};
use crate::{CleanupResult, ScanResult};

/// Why a candidate item was skipped instead of cleaned.
///
/// Item-level filesystem failures never abort a pass; they surface as one
/// of these, logged as a warning by the enclosing pass.
#[derive(Debug, Error)]
pub enum SkipReason {
    #[error("metadata unavailable: {0}")]
    Metadata(#[source] io::Error),
    #[error("deletion failed: {0}")]
    Deletion(#[source] io::Error),
}

/// Outcome of inspecting one file during the file pass.
enum FileOutcome {
    /// File qualified and was deleted (or recorded, in a dry run).
    Removed(u64),
    /// File is above the threshold and was left alone.
    Kept,
}

/// Removes empty files and, optionally, directories left empty as a
/// result, from a configured set of target trees.
///
/// One instance serves both operations of the component: [`clean`] is the
/// destructive pass, [`scan_empty_directories`] the read-only report. The
/// internal guard serializes overlapping cleans and keeps scans from
/// observing a tree mid-deletion; scans may run concurrently with each
/// other.
///
/// [`clean`]: Cleaner::clean
/// [`scan_empty_directories`]: Cleaner::scan_empty_directories
pub struct Cleaner {
    config: CleanupConfig,
    run_guard: RwLock<()>,
}

impl Cleaner {
    pub fn new(config: CleanupConfig) -> Self {
        Self {
            config,
            run_guard: RwLock::new(()),
        }
    }

    pub fn config(&self) -> &CleanupConfig {
        &self.config
    }

    /// Run the cleanup over all target directories.
    ///
    /// Per-item failures are logged and skipped; a missing target is
    /// skipped with a warning; an empty target list exits early with an
    /// empty result. Deletions already performed stay performed if the run
    /// is aborted, there is no rollback.
    pub fn clean(&self) -> Result<CleanupResult> {
        let _guard = self
            .run_guard
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner());

        let mut result = CleanupResult::new();

        if self.config.target_dirs.is_empty() {
            warn!("No target directories configured, nothing to clean");
            return Ok(result);
        }

        info!(
            "Starting cleanup of {} target directories (min_size={}, dry_run={})",
            self.config.target_dirs.len(),
            self.config.min_size,
            self.config.dry_run
        );

        let exclude = ExcludeSet::new(&self.config.exclude_dirs);

        // Tracks what this run has (really or virtually) deleted, so the
        // passes below see the post-cleanup tree even in a dry run. Scoped
        // to the whole run: duplicate or nested targets must not count the
        // same item twice.
        let mut removed = HashSet::new();

        for target in &self.config.target_dirs {
            if !target.exists() {
                warn!("Target directory does not exist: {:?}", target);
                continue;
            }

            info!("Cleaning target directory {:?}", target);

            self.clean_files_in_directory(target, &mut removed, &mut result);

            if self.config.include_empty_dirs {
                self.clean_empty_directories(target, &exclude, &mut removed, &mut result);
            }
        }

        info!(
            "Cleanup finished: {} files, {} directories, {} freed",
            result.cleaned_files.len(),
            result.cleaned_dirs.len(),
            result.format_size()
        );

        Ok(result)
    }

    /// Run [`clean`](Cleaner::clean) and deliver the summary through the
    /// host's reporting collaborator.
    pub fn run(&self, reporter: &dyn Reporter) -> Result<CleanupResult> {
        match self.clean() {
            Ok(result) => {
                let summary = if self.config.dry_run {
                    format!("[dry run] {}", result.summary())
                } else {
                    result.summary()
                };
                reporter.report(&summary, true);
                Ok(result)
            }
            Err(err) => {
                reporter.report(&format!("Cleanup failed: {err}"), false);
                Err(err)
            }
        }
    }

    /// List every empty directory under the targets without deleting.
    ///
    /// Applies the same exclusion and emptiness rules as the directory
    /// pass of [`clean`](Cleaner::clean), so the report previews what that
    /// pass would remove from the tree as it stands.
    pub fn scan_empty_directories(&self) -> ScanResult {
        let _guard = self
            .run_guard
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner());

        let mut scan = ScanResult::default();

        if self.config.target_dirs.is_empty() {
            warn!("No target directories configured, nothing to scan");
            return scan;
        }

        let exclude = ExcludeSet::new(&self.config.exclude_dirs);

        for target in &self.config.target_dirs {
            if !target.exists() {
                warn!("Target directory does not exist: {:?}", target);
                continue;
            }

            info!("Scanning target directory {:?}", target);

            for dir in collect_subdirectories(target) {
                if exclude.is_excluded(&dir) {
                    debug!("Skipping excluded directory {:?}", dir);
                    continue;
                }
                if is_directory_empty(&dir) {
                    info!("Found empty directory {:?}", dir);
                    scan.empty_dirs.push(dir);
                }
            }
        }

        info!("Scan finished, found {} empty directories", scan.count());
        scan
    }

    /// File pass: delete every file at or below the size threshold.
    ///
    /// Walks the whole tree unconditionally; exclusion protects directory
    /// deletion only, not the files inside excluded directories.
    fn clean_files_in_directory(
        &self,
        root: &Path,
        removed: &mut HashSet<PathBuf>,
        result: &mut CleanupResult,
    ) {
        for entry in WalkDir::new(root) {
            let entry = match entry {
                Ok(entry) => entry,
                Err(err) => {
                    warn!("Walk error under {:?}: {}", root, err);
                    continue;
                }
            };
            if !entry.file_type().is_file() {
                continue;
            }
            if removed.contains(entry.path()) {
                continue;
            }

            match self.process_file(entry.path()) {
                Ok(FileOutcome::Removed(size)) => {
                    removed.insert(entry.path().to_path_buf());
                    result.add_file(entry.path().to_path_buf(), size);
                }
                Ok(FileOutcome::Kept) => {}
                Err(reason) => warn!("Skipping file {:?}: {}", entry.path(), reason),
            }
        }
    }

    fn process_file(&self, path: &Path) -> Result<FileOutcome, SkipReason> {
        let size = fs::metadata(path).map_err(SkipReason::Metadata)?.len();
        if size > self.config.min_size {
            return Ok(FileOutcome::Kept);
        }

        if self.config.dry_run {
            info!("[dry run] Would delete empty file {:?}", path);
        } else {
            fs::remove_file(path).map_err(SkipReason::Deletion)?;
            info!("Deleted empty file {:?}", path);
        }
        Ok(FileOutcome::Removed(size))
    }

    /// Directory pass: remove unexcluded directories that ended up empty.
    ///
    /// Candidates are processed deepest-first so a parent whose children
    /// were all just removed qualifies within the same pass.
    fn clean_empty_directories(
        &self,
        root: &Path,
        exclude: &ExcludeSet,
        removed: &mut HashSet<PathBuf>,
        result: &mut CleanupResult,
    ) {
        let dirs = collect_subdirectories(root);
        debug!("Collected {} subdirectories under {:?}", dirs.len(), root);

        for dir in dirs {
            if removed.contains(&dir) {
                continue;
            }
            if exclude.is_excluded(&dir) {
                debug!("Skipping excluded directory {:?}", dir);
                continue;
            }
            if !is_directory_empty_filtered(&dir, removed) {
                continue;
            }

            if self.config.dry_run {
                info!("[dry run] Would delete empty directory {:?}", dir);
            } else {
                // remove_dir refuses non-empty directories, so a race with
                // something writing into the tree fails safe here.
                if let Err(err) = fs::remove_dir(&dir) {
                    warn!(
                        "Skipping directory {:?}: {}",
                        dir,
                        SkipReason::Deletion(err)
                    );
                    continue;
                }
                info!("Deleted empty directory {:?}", dir);
            }
            removed.insert(dir.clone());
            result.add_dir(dir);
        }
    }
}
