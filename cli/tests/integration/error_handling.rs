//! Error handling integration tests for tcopy CLI.
//!
//! These tests verify proper error handling behaviors:
//! - Errors are reported as `error[category]: message`
//! - Invalid input exits with 2, copy failures with 1
//! - A failed copy leaves already-copied entries in place

#[path = "../common/mod.rs"]
mod common;

use assert_cmd::cargo::cargo_bin_cmd;
use common::TestFixture;
use predicates::prelude::*;
use std::fs;

#[test]
fn test_missing_source() {
    let fixture = TestFixture::new();

    let mut cmd = cargo_bin_cmd!("tcopy");
    cmd.arg(fixture.src.path().join("does-not-exist"))
        .arg(fixture.target())
        .assert()
        .code(1)
        .stderr(predicate::str::contains("error[source_access]"));

    assert!(!fixture.target().exists());
}

#[test]
fn test_missing_destination_operand() {
    let fixture = TestFixture::new();

    let mut cmd = cargo_bin_cmd!("tcopy");
    cmd.arg(fixture.src.path()).assert().code(2);
}

#[test]
fn test_invalid_exclude_pattern() {
    let fixture = TestFixture::new();
    fixture.write("a.txt", "a");

    let mut cmd = cargo_bin_cmd!("tcopy");
    cmd.arg("--exclude")
        .arg("[ab")
        .arg(fixture.src.path())
        .arg(fixture.target())
        .assert()
        .code(2)
        .stderr(predicate::str::contains("error[invalid_input]"));

    assert!(!fixture.target().exists());
}

#[test]
fn test_invalid_chmod_value() {
    let fixture = TestFixture::new();

    let mut cmd = cargo_bin_cmd!("tcopy");
    cmd.arg("--chmod-add")
        .arg("899")
        .arg(fixture.src.path())
        .arg(fixture.target())
        .assert()
        .code(2)
        .stderr(predicate::str::contains("not an octal mode"));
}

#[test]
fn test_destination_inside_source() {
    let fixture = TestFixture::new();
    fixture.write("a.txt", "a");

    let mut cmd = cargo_bin_cmd!("tcopy");
    cmd.arg(fixture.src.path())
        .arg(fixture.src.path().join("nested/copy"))
        .assert()
        .code(2)
        .stderr(predicate::str::contains("is inside source directory"));

    assert!(!fixture.src.path().join("nested").exists());
}

/// Copying a file onto itself must not truncate it.
#[test]
fn test_same_file_refused() {
    let fixture = TestFixture::new();
    fixture.write("f.txt", "precious");
    let file = fixture.src.path().join("f.txt");

    let mut cmd = cargo_bin_cmd!("tcopy");
    cmd.arg(&file)
        .arg(fixture.src.path().join("./f.txt"))
        .assert()
        .code(2)
        .stderr(predicate::str::contains("error[invalid_input]"))
        .stderr(predicate::str::contains("are the same file"));

    fixture.assert_file_content(&file, "precious");
}

#[test]
fn test_same_directory_refused() {
    let fixture = TestFixture::new();
    fixture.write("a.txt", "a");

    let mut cmd = cargo_bin_cmd!("tcopy");
    cmd.arg(fixture.src.path())
        .arg(fixture.src.path())
        .assert()
        .code(2)
        .stderr(predicate::str::contains("are the same file"));

    fixture.assert_file_content(&fixture.src.path().join("a.txt"), "a");
}

/// A file cannot replace a directory; the directory must survive intact.
#[test]
fn test_file_onto_directory_fails() {
    let fixture = TestFixture::new();
    fixture.write("name", "file content");
    let target = fixture.target();
    fs::create_dir_all(target.join("name")).unwrap();
    fs::write(target.join("name/inside.txt"), "inside content").unwrap();

    let mut cmd = cargo_bin_cmd!("tcopy");
    cmd.arg(fixture.src.path())
        .arg(&target)
        .assert()
        .code(1)
        .stderr(predicate::str::contains("error[destination_create]"));

    fixture.assert_file_content(&target.join("name/inside.txt"), "inside content");
}

/// Entries copied before a failure stay on disk.
#[test]
fn test_partial_copy_is_not_rolled_back() {
    let fixture = TestFixture::new();
    fixture.write("a_first.txt", "first");
    fixture.write("b_blocked", "file");
    let target = fixture.target();
    fs::create_dir_all(target.join("b_blocked")).unwrap();

    let mut cmd = cargo_bin_cmd!("tcopy");
    cmd.arg(fixture.src.path()).arg(&target).assert().code(1);

    fixture.assert_file_content(&target.join("a_first.txt"), "first");
}

#[cfg(unix)]
#[test]
fn test_specials_ignored_without_flag() {
    use std::os::unix::fs::symlink;

    // A device node reached through a dereferenced link
    let fixture = TestFixture::new();
    fixture.write("a.txt", "a");
    symlink("/dev/null", fixture.src.path().join("null")).unwrap();

    let mut cmd = cargo_bin_cmd!("tcopy");
    cmd.arg("-L")
        .arg(fixture.src.path())
        .arg(fixture.target())
        .assert()
        .success();

    assert!(fixture.target().join("a.txt").exists());
    assert!(fs::symlink_metadata(fixture.target().join("null")).is_err());

    let mut cmd = cargo_bin_cmd!("tcopy");
    cmd.arg("-L")
        .arg("--specials")
        .arg(fixture.src.path())
        .arg(fixture.dst.path().join("with_specials"))
        .assert()
        .success();

    let copied = fixture.dst.path().join("with_specials/null");
    assert!(fs::symlink_metadata(&copied).unwrap().is_file());
    assert_eq!(fs::read(&copied).unwrap().len(), 0);
}
