use anyhow::Result;
use clap::{Parser, Subcommand};
use std::io::{self, Write};
use std::path::PathBuf;

use sweeper_core::{
    Cleaner, CleanupConfig, CleanupResult, ScanResult, Settings, format_bytes, parse_size_string,
};

/// Shared inputs for building the per-run configuration.
#[derive(Debug, Default)]
struct ConfigArgs {
    targets: Vec<PathBuf>,
    excludes: Vec<PathBuf>,
    config: Option<PathBuf>,
    min_size: Option<String>,
    include_empty_dirs: bool,
    dry_run: bool,
}

#[derive(Parser)]
#[command(name = "sweeper")]
#[command(about = "Removes empty files and leftover empty directories")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    pub debug: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// List empty directories under the targets without deleting anything
    Scan {
        /// Directory to scan (can be specified multiple times)
        #[arg(short = 't', long = "target", action = clap::ArgAction::Append)]
        targets: Vec<PathBuf>,

        /// Directory protected from deletion (can be specified multiple times)
        #[arg(short = 'e', long = "exclude", action = clap::ArgAction::Append)]
        excludes: Vec<PathBuf>,

        /// Settings file (TOML); paths and sizes given on the command line
        /// replace its values, boolean switches can only enable
        #[arg(short, long)]
        config: Option<PathBuf>,
    },
    /// Delete empty files (and optionally empty directories) under the targets
    Clean {
        /// Directory to clean (can be specified multiple times)
        #[arg(short = 't', long = "target", action = clap::ArgAction::Append)]
        targets: Vec<PathBuf>,

        /// Directory protected from deletion (can be specified multiple times)
        #[arg(short = 'e', long = "exclude", action = clap::ArgAction::Append)]
        excludes: Vec<PathBuf>,

        /// Settings file (TOML); paths and sizes given on the command line
        /// replace its values, boolean switches can only enable
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Files at or below this size count as empty (e.g. "0", "4KB")
        #[arg(short = 's', long)]
        min_size: Option<String>,

        /// Also remove directories left empty after file cleanup
        #[arg(short = 'D', long)]
        include_empty_dirs: bool,

        /// Show what would be deleted without deleting
        #[arg(short = 'n', long)]
        dry_run: bool,

        /// Skip confirmation prompt
        #[arg(short = 'y', long)]
        yes: bool,
    },
}

pub fn run_cli() -> Result<()> {
    let cli = Cli::parse();

    let log_level = if cli.debug {
        "debug"
    } else if cli.verbose {
        "info"
    } else {
        "warn"
    };

    tracing_subscriber::fmt()
        .with_env_filter(format!("sweeper_core={log_level},sweeper_cli={log_level}"))
        .init();

    match cli.command {
        Commands::Scan {
            targets,
            excludes,
            config,
        } => handle_scan_command(ConfigArgs {
            targets,
            excludes,
            config,
            ..Default::default()
        }),
        Commands::Clean {
            targets,
            excludes,
            config,
            min_size,
            include_empty_dirs,
            dry_run,
            yes,
        } => handle_clean_command(
            ConfigArgs {
                targets,
                excludes,
                config,
                min_size,
                include_empty_dirs,
                dry_run,
            },
            yes,
        ),
    }
}

fn handle_scan_command(args: ConfigArgs) -> Result<()> {
    let config = build_cleanup_config(args)?;
    if config.target_dirs.is_empty() {
        println!("No target directories configured.");
        return Ok(());
    }

    let cleaner = Cleaner::new(config);
    let scan = cleaner.scan_empty_directories();
    display_scan_result(&scan);
    Ok(())
}

fn handle_clean_command(args: ConfigArgs, yes: bool) -> Result<()> {
    let config = build_cleanup_config(args)?;
    if config.target_dirs.is_empty() {
        println!("No target directories configured.");
        return Ok(());
    }

    if !yes && !config.dry_run && !confirm_clean(&config)? {
        println!("Cleaning cancelled.");
        return Ok(());
    }

    let dry_run = config.dry_run;
    let cleaner = Cleaner::new(config);
    let result = cleaner.clean()?;
    display_cleanup_result(&result, dry_run);
    Ok(())
}

/// Merge the optional settings file with command-line overrides.
///
/// Target/exclude lists and the size threshold replace the file's values
/// when given. The boolean switches have no negated form, so they can
/// enable `include_empty_dirs`/`dry_run` over the file but never disable
/// a value the file sets.
fn build_cleanup_config(args: ConfigArgs) -> Result<CleanupConfig> {
    let mut config = match &args.config {
        Some(path) => Settings::load(path)?.cleanup_config(),
        None => CleanupConfig::default(),
    };

    if !args.targets.is_empty() {
        config.target_dirs = args.targets;
    }
    if !args.excludes.is_empty() {
        config.exclude_dirs = args.excludes;
    }
    if let Some(size_str) = args.min_size {
        config.min_size = parse_size_string(&size_str)?;
    }
    config.include_empty_dirs |= args.include_empty_dirs;
    config.dry_run |= args.dry_run;

    Ok(config)
}

fn confirm_clean(config: &CleanupConfig) -> Result<bool> {
    print!(
        "\nThis will delete files of size <= {} under {} directories{}. Continue? [y/N]: ",
        format_bytes(config.min_size),
        config.target_dirs.len(),
        if config.include_empty_dirs {
            ", plus directories left empty"
        } else {
            ""
        }
    );

    io::stdout().flush()?;

    let mut input = String::new();
    io::stdin().read_line(&mut input)?;

    Ok(input.trim().to_lowercase() == "y" || input.trim().to_lowercase() == "yes")
}

fn display_scan_result(scan: &ScanResult) {
    if scan.empty_dirs.is_empty() {
        println!("No empty directories found.");
        return;
    }

    println!("Found {} empty directories:", scan.count());
    for dir in &scan.empty_dirs {
        println!("  {}", dir.display());
    }
}

fn display_cleanup_result(result: &CleanupResult, dry_run: bool) {
    if dry_run {
        println!("\nDry run - nothing was deleted.");
    } else {
        println!("\nCleanup completed!");
    }
    println!("Files removed: {}", result.cleaned_files.len());
    println!("Directories removed: {}", result.cleaned_dirs.len());
    println!("Space freed: {}", result.format_size());
}
