use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Parse a newline-delimited directory spec into an ordered path list.
///
/// Lines are trimmed and blank lines dropped. Duplicates are kept as-is;
/// an empty or whitespace-only spec yields an empty list, which callers
/// treat as "not configured".
pub fn parse_dir_list(text: &str) -> Vec<PathBuf> {
    text.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(PathBuf::from)
        .collect()
}

/// Per-run cleanup options. Built once per invocation, never mutated.
#[derive(Debug, Clone, Default)]
pub struct CleanupConfig {
    /// Directory trees to clean.
    pub target_dirs: Vec<PathBuf>,
    /// Directories protected from deletion (their files are still cleaned).
    pub exclude_dirs: Vec<PathBuf>,
    /// Inclusive byte threshold below which a file counts as empty.
    pub min_size: u64,
    /// Also remove directories left empty after the file pass.
    pub include_empty_dirs: bool,
    /// Report candidates without deleting anything.
    pub dry_run: bool,
}

/// Persisted host settings, as stored by the host application.
///
/// `enabled`, `run_once`, `schedule` and `notify` belong to the host's
/// scheduler and notification layer; they are carried here so one settings
/// document round-trips, but the library itself never schedules a run.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub enabled: bool,
    pub run_once: bool,
    pub schedule: String,
    /// Newline-separated absolute paths to scan.
    pub target_dirs: String,
    /// Newline-separated absolute paths protected from directory deletion.
    pub exclude_dirs: String,
    pub min_size: u64,
    pub include_empty_dirs: bool,
    pub notify: bool,
    pub dry_run: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            enabled: false,
            run_once: false,
            schedule: "0 2 * * *".to_string(),
            target_dirs: String::new(),
            exclude_dirs: String::new(),
            min_size: 0,
            include_empty_dirs: false,
            notify: true,
            dry_run: false,
        }
    }
}

impl Settings {
    /// Load settings from a TOML file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read settings file {path:?}"))?;
        toml::from_str(&content).with_context(|| format!("Failed to parse settings file {path:?}"))
    }

    /// Build the per-run configuration from the persisted text fields.
    pub fn cleanup_config(&self) -> CleanupConfig {
        CleanupConfig {
            target_dirs: parse_dir_list(&self.target_dirs),
            exclude_dirs: parse_dir_list(&self.exclude_dirs),
            min_size: self.min_size,
            include_empty_dirs: self.include_empty_dirs,
            dry_run: self.dry_run,
        }
    }
}

/// Parse a size string such as "100", "4KB" or "1GiB" into bytes.
pub fn parse_size_string(size_str: &str) -> Result<u64> {
    let size_str = size_str.trim().to_uppercase();

    let (number_part, unit_part) = if let Some(pos) = size_str.find(|c: char| c.is_alphabetic()) {
        (&size_str[..pos], &size_str[pos..])
    } else {
        (size_str.as_str(), "")
    };

    let number: f64 = number_part
        .parse()
        .map_err(|_| anyhow::anyhow!("Invalid number: {}", number_part))?;

    let multiplier = match unit_part {
        "" | "B" => 1,
        "KB" | "K" => 1_000,
        "KIB" => 1_024,
        "MB" | "M" => 1_000_000,
        "MIB" => 1_024 * 1_024,
        "GB" | "G" => 1_000_000_000,
        "GIB" => 1_024 * 1_024 * 1_024,
        "TB" | "T" => 1_000_000_000_000,
        "TIB" => 1_024_u64.pow(4),
        _ => return Err(anyhow::anyhow!("Unsupported unit: {}", unit_part)),
    };

    Ok((number * multiplier as f64) as u64)
}
