//! Tests for the atomic write protocol
//!
//! These tests verify:
//! - Full content lands at the target path
//! - Existing files are replaced atomically
//! - Parent directories are created on demand
//! - No temp file survives a completed write
//! - Idempotent removal

use std::ffi::OsString;
use std::fs;

use dirkv::bucket::{is_temp_name, remove_if_exists, temp_path, write_atomic, TEMP_PREFIX};
use tempfile::TempDir;

// =============================================================================
// Write Tests
// =============================================================================

#[test]
fn test_write_creates_file() {
    let temp = TempDir::new().unwrap();
    let target = temp.path().join("0a3");

    write_atomic(&target, b"hello").unwrap();

    assert_eq!(fs::read(&target).unwrap(), b"hello");
}

#[test]
fn test_write_replaces_existing_file() {
    let temp = TempDir::new().unwrap();
    let target = temp.path().join("0a3");

    write_atomic(&target, b"old content").unwrap();
    write_atomic(&target, b"new").unwrap();

    assert_eq!(fs::read(&target).unwrap(), b"new");
}

#[test]
fn test_write_creates_missing_parents() {
    let temp = TempDir::new().unwrap();
    let target = temp.path().join("a/b/c/0a3");

    write_atomic(&target, b"deep").unwrap();

    assert_eq!(fs::read(&target).unwrap(), b"deep");
}

#[test]
fn test_no_temp_file_left_behind() {
    let temp = TempDir::new().unwrap();
    let target = temp.path().join("0a3");

    write_atomic(&target, b"data").unwrap();

    let leftovers: Vec<_> = fs::read_dir(temp.path())
        .unwrap()
        .filter(|e| is_temp_name(&e.as_ref().unwrap().file_name()))
        .collect();
    assert!(leftovers.is_empty());
}

#[test]
fn test_write_replaces_stale_temp_file() {
    let temp = TempDir::new().unwrap();
    let target = temp.path().join("0a3");

    // Simulate a previous interrupted write
    fs::write(temp_path(&target), b"half-written junk").unwrap();

    write_atomic(&target, b"fresh").unwrap();

    assert_eq!(fs::read(&target).unwrap(), b"fresh");
    assert!(!temp_path(&target).exists());
}

// =============================================================================
// Naming Tests
// =============================================================================

#[test]
fn test_temp_path_prefixes_file_name() {
    let temp = TempDir::new().unwrap();
    let target = temp.path().join("abc");

    let tmp = temp_path(&target);

    assert_eq!(tmp.parent(), target.parent());
    assert_eq!(
        tmp.file_name().unwrap().to_string_lossy(),
        format!("{}abc", TEMP_PREFIX)
    );
    assert!(is_temp_name(tmp.file_name().unwrap()));
}

#[test]
fn test_is_temp_name() {
    assert!(is_temp_name(&OsString::from("~0a3")));
    assert!(is_temp_name(&OsString::from("~labuda")));
    assert!(!is_temp_name(&OsString::from("0a3")));
    assert!(!is_temp_name(&OsString::from("readme.txt")));
}

// =============================================================================
// Removal Tests
// =============================================================================

#[test]
fn test_remove_if_exists() {
    let temp = TempDir::new().unwrap();
    let target = temp.path().join("0a3");

    fs::write(&target, b"data").unwrap();
    remove_if_exists(&target).unwrap();
    assert!(!target.exists());

    // Already absent: still Ok
    remove_if_exists(&target).unwrap();
}
