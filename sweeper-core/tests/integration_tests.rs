use anyhow::Result;
use std::fs;
use std::path::Path;
use std::sync::Arc;
use tempfile::TempDir;

use sweeper_core::{Cleaner, CleanupConfig, parse_dir_list};

/// Build a small media-library-like tree with empty leftovers mixed in.
fn build_library_tree(root: &Path) -> Result<()> {
    fs::create_dir_all(root.join("movies").join("finished"))?;
    fs::write(
        root.join("movies").join("finished").join("movie.mkv"),
        "x".repeat(4096),
    )?;
    fs::write(root.join("movies").join("sample.nfo"), "")?;

    fs::create_dir_all(root.join("downloads").join("stale").join("parts"))?;
    fs::write(
        root.join("downloads").join("stale").join("parts").join("p0.part"),
        "",
    )?;
    fs::write(
        root.join("downloads").join("stale").join("parts").join("p1.part"),
        "",
    )?;

    fs::create_dir_all(root.join("downloads").join("keep"))?;
    fs::write(root.join("downloads").join("keep").join("leftover.tmp"), "")?;

    fs::create_dir(root.join("orphan"))?;

    Ok(())
}

#[test]
fn test_end_to_end_clean() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let root = temp_dir.path();
    build_library_tree(root)?;

    let config = CleanupConfig {
        target_dirs: vec![root.to_path_buf()],
        exclude_dirs: vec![root.join("downloads").join("keep")],
        min_size: 0,
        include_empty_dirs: true,
        dry_run: false,
    };
    let result = Cleaner::new(config).clean()?;

    // Four zero-byte files: sample.nfo, p0.part, p1.part, leftover.tmp.
    assert_eq!(result.cleaned_files.len(), 4);
    assert_eq!(result.total_size_saved, 0);
    assert!(root.join("movies").join("finished").join("movie.mkv").exists());

    // stale/parts then stale collapse bottom-up, orphan goes too; the
    // excluded keep directory stays even though its file was removed.
    assert!(!root.join("downloads").join("stale").exists());
    assert!(!root.join("orphan").exists());
    assert!(root.join("downloads").join("keep").exists());
    assert!(!root.join("downloads").join("keep").join("leftover.tmp").exists());
    assert_eq!(result.cleaned_dirs.len(), 3);

    Ok(())
}

#[test]
fn test_dry_run_then_real_run_agree() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let root = temp_dir.path();
    build_library_tree(root)?;

    let config = CleanupConfig {
        target_dirs: vec![root.to_path_buf()],
        exclude_dirs: vec![root.join("downloads").join("keep")],
        min_size: 0,
        include_empty_dirs: true,
        dry_run: true,
    };

    let dry = Cleaner::new(config.clone()).clean()?;

    // Dry run touched nothing.
    assert!(root.join("movies").join("sample.nfo").exists());
    assert!(root.join("downloads").join("stale").join("parts").exists());
    assert!(root.join("orphan").exists());

    let real = Cleaner::new(CleanupConfig {
        dry_run: false,
        ..config
    })
    .clean()?;

    let mut dry_files = dry.cleaned_files.clone();
    let mut real_files = real.cleaned_files.clone();
    dry_files.sort();
    real_files.sort();
    assert_eq!(dry_files, real_files);

    let mut dry_dirs = dry.cleaned_dirs.clone();
    let mut real_dirs = real.cleaned_dirs.clone();
    dry_dirs.sort();
    real_dirs.sort();
    assert_eq!(dry_dirs, real_dirs);

    assert_eq!(dry.total_size_saved, real.total_size_saved);

    Ok(())
}

#[test]
fn test_zero_threshold_keeps_nonempty_files() -> Result<()> {
    // /data/x.tmp (0 bytes) goes, /data/sub/y.tmp (5 bytes) stays.
    let temp_dir = TempDir::new()?;
    let root = temp_dir.path();
    fs::create_dir(root.join("sub"))?;
    fs::write(root.join("x.tmp"), "")?;
    fs::write(root.join("sub").join("y.tmp"), "12345")?;

    let result = Cleaner::new(CleanupConfig {
        target_dirs: vec![root.to_path_buf()],
        min_size: 0,
        ..Default::default()
    })
    .clean()?;

    assert_eq!(result.cleaned_files, vec![root.join("x.tmp")]);
    assert_eq!(result.total_size_saved, 0);
    assert!(root.join("sub").join("y.tmp").exists());

    Ok(())
}

#[test]
fn test_hidden_named_directories_follow_normal_rules() -> Result<()> {
    // empty1 and .hidden both have zero entries: both are removed, the
    // hidden rule applies to contents rather than the directory's name.
    let temp_dir = TempDir::new()?;
    let root = temp_dir.path();
    fs::create_dir(root.join("empty1"))?;
    fs::create_dir(root.join(".hidden"))?;

    let result = Cleaner::new(CleanupConfig {
        target_dirs: vec![root.to_path_buf()],
        include_empty_dirs: true,
        ..Default::default()
    })
    .clean()?;

    assert_eq!(result.cleaned_dirs.len(), 2);
    assert!(!root.join("empty1").exists());
    assert!(!root.join(".hidden").exists());

    Ok(())
}

#[test]
fn test_scan_matches_directory_pass_on_static_tree() -> Result<()> {
    // With no deletable files in play, scan and clean report the same
    // directories.
    let temp_dir = TempDir::new()?;
    let root = temp_dir.path();
    fs::create_dir_all(root.join("a").join("b"))?;
    fs::create_dir(root.join("full"))?;
    fs::write(root.join("full").join("data.bin"), "x".repeat(128))?;

    let config = CleanupConfig {
        target_dirs: vec![root.to_path_buf()],
        include_empty_dirs: true,
        dry_run: true,
        ..Default::default()
    };
    let cleaner = Cleaner::new(config);

    let scanned = cleaner.scan_empty_directories();
    // Only the leaf is empty right now; the dry-run clean also folds in
    // the parent that would empty out.
    assert_eq!(scanned.empty_dirs, vec![root.join("a").join("b")]);

    let cleaned = cleaner.clean()?;
    assert!(cleaned.cleaned_dirs.contains(&root.join("a").join("b")));
    assert!(cleaned.cleaned_dirs.contains(&root.join("a")));

    Ok(())
}

#[test]
fn test_multiline_spec_to_clean() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let root = temp_dir.path();
    fs::create_dir(root.join("one"))?;
    fs::create_dir(root.join("two"))?;
    fs::write(root.join("one").join("a.tmp"), "")?;
    fs::write(root.join("two").join("b.tmp"), "")?;

    let spec = format!("{}\n\n  {}  \n", root.join("one").display(), root.join("two").display());
    let result = Cleaner::new(CleanupConfig {
        target_dirs: parse_dir_list(&spec),
        ..Default::default()
    })
    .clean()?;

    assert_eq!(result.cleaned_files.len(), 2);

    Ok(())
}

#[test]
fn test_scan_during_clean_smoke() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let root = temp_dir.path();
    for i in 0..50 {
        let dir = root.join(format!("d{i}"));
        fs::create_dir(&dir)?;
        fs::write(dir.join("zero.tmp"), "")?;
    }

    let cleaner = Arc::new(Cleaner::new(CleanupConfig {
        target_dirs: vec![root.to_path_buf()],
        ..Default::default()
    }));

    let scanner = {
        let cleaner = Arc::clone(&cleaner);
        std::thread::spawn(move || cleaner.scan_empty_directories())
    };
    let result = cleaner.clean()?;
    let scan = scanner.join().expect("scan thread panicked");

    assert_eq!(result.cleaned_files.len(), 50);
    // The scan ran either before the clean (every directory still holds
    // its file) or after it (all fifty are empty), never mid-way.
    assert!(scan.count() == 0 || scan.count() == 50);

    Ok(())
}
