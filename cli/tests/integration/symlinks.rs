//! Symlink policy integration tests for tcopy CLI.

#![cfg(unix)]

#[path = "../common/mod.rs"]
mod common;

use assert_cmd::cargo::cargo_bin_cmd;
use common::TestFixture;
use predicates::prelude::*;
use std::fs;
use std::os::unix::fs::symlink;
use std::path::PathBuf;

fn fixture_with_links() -> TestFixture {
    let fixture = TestFixture::new();
    fixture.write("real.txt", "real");
    fixture.write("dir/inner.txt", "inner");
    symlink("real.txt", fixture.src.path().join("file_link")).unwrap();
    symlink("dir", fixture.src.path().join("dir_link")).unwrap();
    fixture
}

#[test]
fn test_symlinks_recreated_by_default() {
    let fixture = fixture_with_links();

    let mut cmd = cargo_bin_cmd!("tcopy");
    cmd.arg(fixture.src.path())
        .arg(fixture.target())
        .assert()
        .success();

    let target = fixture.target();
    assert_eq!(
        fs::read_link(target.join("file_link")).unwrap(),
        PathBuf::from("real.txt")
    );
    assert_eq!(
        fs::read_link(target.join("dir_link")).unwrap(),
        PathBuf::from("dir")
    );
}

#[test]
fn test_dereference() {
    let fixture = fixture_with_links();

    let mut cmd = cargo_bin_cmd!("tcopy");
    cmd.arg("-L")
        .arg(fixture.src.path())
        .arg(fixture.target())
        .assert()
        .success();

    let target = fixture.target();
    let file_meta = fs::symlink_metadata(target.join("file_link")).unwrap();
    assert!(file_meta.is_file());
    fixture.assert_file_content(&target.join("file_link"), "real");

    let dir_meta = fs::symlink_metadata(target.join("dir_link")).unwrap();
    assert!(dir_meta.is_dir());
    fixture.assert_file_content(&target.join("dir_link/inner.txt"), "inner");
}

#[test]
fn test_skip_symlinks() {
    let fixture = fixture_with_links();

    let mut cmd = cargo_bin_cmd!("tcopy");
    cmd.arg("--skip-symlinks")
        .arg(fixture.src.path())
        .arg(fixture.target())
        .assert()
        .success();

    let target = fixture.target();
    assert!(target.join("real.txt").exists());
    assert!(fs::symlink_metadata(target.join("file_link")).is_err());
    assert!(fs::symlink_metadata(target.join("dir_link")).is_err());
}

#[test]
fn test_dereference_conflicts_with_skip() {
    let fixture = fixture_with_links();

    let mut cmd = cargo_bin_cmd!("tcopy");
    cmd.arg("-L")
        .arg("--skip-symlinks")
        .arg(fixture.src.path())
        .arg(fixture.target())
        .assert()
        .code(2)
        .stderr(predicate::str::contains("cannot be used with"));
}

#[test]
fn test_dereference_cycle_is_reported() {
    let fixture = TestFixture::new();
    fixture.write("a.txt", "a");
    symlink(".", fixture.src.path().join("again")).unwrap();

    let mut cmd = cargo_bin_cmd!("tcopy");
    cmd.arg("-L")
        .arg(fixture.src.path())
        .arg(fixture.target())
        .assert()
        .code(1)
        .stderr(predicate::str::contains("error[symlink_cycle]"));

    fixture.assert_file_content(&fixture.target().join("a.txt"), "a");
}

#[test]
fn test_dereference_cycle_stops_at_max_depth() {
    let fixture = TestFixture::new();
    fixture.write("a.txt", "a");
    symlink(".", fixture.src.path().join("again")).unwrap();

    let mut cmd = cargo_bin_cmd!("tcopy");
    cmd.arg("-L")
        .arg("--max-depth")
        .arg("1")
        .arg(fixture.src.path())
        .arg(fixture.target())
        .assert()
        .code(1)
        .stderr(predicate::str::contains("error[depth_limit]"));
}
