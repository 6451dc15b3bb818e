use serde::{Deserialize, Serialize};
use std::path::PathBuf;

pub mod cleaner;
pub mod config;
pub mod exclude;
pub mod notify;
pub mod scanner;

pub use cleaner::Cleaner;
pub use config::{CleanupConfig, Settings, parse_dir_list, parse_size_string};
pub use exclude::ExcludeSet;
pub use notify::{LogReporter, Reporter};
pub use scanner::is_directory_empty;

/// Accumulated outcome of one cleanup run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CleanupResult {
    pub cleaned_files: Vec<PathBuf>,
    pub cleaned_dirs: Vec<PathBuf>,
    pub total_size_saved: u64,
}

impl Default for CleanupResult {
    fn default() -> Self {
        Self::new()
    }
}

impl CleanupResult {
    pub fn new() -> Self {
        Self {
            cleaned_files: Vec::new(),
            cleaned_dirs: Vec::new(),
            total_size_saved: 0,
        }
    }

    pub fn add_file(&mut self, path: PathBuf, size: u64) {
        self.cleaned_files.push(path);
        self.total_size_saved += size;
    }

    pub fn add_dir(&mut self, path: PathBuf) {
        self.cleaned_dirs.push(path);
    }

    pub fn is_empty(&self) -> bool {
        self.cleaned_files.is_empty() && self.cleaned_dirs.is_empty()
    }

    pub fn format_size(&self) -> String {
        format_bytes(self.total_size_saved)
    }

    /// Human-readable completion summary, the payload handed to reporters.
    pub fn summary(&self) -> String {
        let mut summary = String::from("Cleanup completed!");
        if !self.cleaned_files.is_empty() {
            let count = self.cleaned_files.len();
            summary.push_str(&format!(
                "\nDeleted {} empty file{}, freed {}",
                count,
                if count == 1 { "" } else { "s" },
                self.format_size()
            ));
        }
        if !self.cleaned_dirs.is_empty() {
            let count = self.cleaned_dirs.len();
            summary.push_str(&format!(
                "\nDeleted {} empty director{}",
                count,
                if count == 1 { "y" } else { "ies" }
            ));
        }
        if self.is_empty() {
            summary.push_str("\nNo empty files or directories found");
        }
        summary
    }
}

/// Outcome of a read-only empty-directory scan.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ScanResult {
    pub empty_dirs: Vec<PathBuf>,
}

impl ScanResult {
    pub fn count(&self) -> usize {
        self.empty_dirs.len()
    }

    /// Summary listing at most the first ten directories.
    pub fn summary(&self) -> String {
        let mut summary = format!(
            "Scan finished, found {} empty director{}",
            self.count(),
            if self.count() == 1 { "y" } else { "ies" }
        );
        if !self.empty_dirs.is_empty() {
            summary.push(':');
            for dir in self.empty_dirs.iter().take(10) {
                summary.push_str(&format!("\n{}", dir.display()));
            }
            if self.count() > 10 {
                summary.push_str(&format!("\n... and {} more", self.count() - 10));
            }
        }
        summary
    }
}

/// Format a byte count with binary unit scaling.
pub fn format_bytes(bytes: u64) -> String {
    const UNITS: &[&str] = &["B", "KB", "MB", "GB", "TB"];
    let mut size = bytes as f64;
    let mut unit_index = 0;

    while size >= 1024.0 && unit_index < UNITS.len() - 1 {
        size /= 1024.0;
        unit_index += 1;
    }

    if unit_index == 0 {
        format!("{} {}", bytes, UNITS[unit_index])
    } else {
        format!("{:.2} {}", size, UNITS[unit_index])
    }
}
