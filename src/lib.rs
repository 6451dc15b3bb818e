//! # Sweeper
//!
//! A tool for cleaning empty files and leftover empty directories.
//!
//! Sweeper walks a configured set of directory trees, deletes files at or
//! below a size threshold, and can remove the directories left empty as a
//! result. Excluded directories are never deleted themselves, although the
//! files inside them are still cleaned.
//!
//! ## Usage
//!
//! ### Command Line
//!
//! ```bash
//! # Preview which directories are empty
//! sweeper scan --target /data/downloads
//!
//! # Delete zero-byte files and collapse empty directories
//! sweeper clean --target /data/downloads --include-empty-dirs
//!
//! # Dry run to see what would be removed
//! sweeper clean --target /data/downloads --dry-run
//! ```
//!
//! ### As a Library
//!
//! ```rust
//! use sweeper_core::{Cleaner, CleanupConfig};
//! use std::path::PathBuf;
//!
//! let config = CleanupConfig {
//!     target_dirs: vec![PathBuf::from("/data/downloads")],
//!     min_size: 0,
//!     include_empty_dirs: true,
//!     dry_run: true, // report candidates without deleting
//!     ..Default::default()
//! };
//!
//! let cleaner = Cleaner::new(config);
//! let result = cleaner.clean()?;
//! println!("{}", result.summary());
//! # Ok::<(), anyhow::Error>(())
//! ```

// Re-export core functionality
pub use sweeper_core::*;

// Re-export commonly used types
pub use sweeper_core::{
    Cleaner, CleanupConfig, CleanupResult, LogReporter, Reporter, ScanResult, Settings,
};
