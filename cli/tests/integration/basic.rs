//! Basic functionality integration tests for tcopy CLI.

#[path = "../common/mod.rs"]
mod common;

use assert_cmd::cargo::cargo_bin_cmd;
use common::TestFixture;
use predicates::prelude::*;
use std::fs;
use tempfile::TempDir;

#[test]
fn test_basic_file_copy() {
    let src = TempDir::new().unwrap();
    let dst = TempDir::new().unwrap();

    fs::write(src.path().join("test.txt"), "hello world").unwrap();

    let mut cmd = cargo_bin_cmd!("tcopy");
    cmd.arg(src.path().join("test.txt"))
        .arg(dst.path().join("test.txt"))
        .assert()
        .success();

    assert_eq!(
        fs::read_to_string(dst.path().join("test.txt")).unwrap(),
        "hello world"
    );
}

#[test]
fn test_recursive_directory_copy() {
    let fixture = TestFixture::new();
    fixture.create_nested_structure(3, 2);

    let mut cmd = cargo_bin_cmd!("tcopy");
    cmd.arg(fixture.src.path())
        .arg(fixture.target())
        .assert()
        .success();

    let target = fixture.target();
    assert_eq!(fixture.count_files_recursive(&target), 6);
    fixture.assert_file_content(
        &target.join("level0/level1/level2/file1.txt"),
        "content at level 2",
    );
}

#[test]
fn test_copy_merges_into_existing_destination() {
    let fixture = TestFixture::new();
    fixture.write("sub/new.txt", "new");
    let target = fixture.target();
    fs::create_dir_all(target.join("sub")).unwrap();
    fs::write(target.join("sub/stale.txt"), "stale").unwrap();

    let mut cmd = cargo_bin_cmd!("tcopy");
    cmd.arg(fixture.src.path()).arg(&target).assert().success();

    fixture.assert_file_content(&target.join("sub/new.txt"), "new");
    fixture.assert_file_content(&target.join("sub/stale.txt"), "stale");
}

#[test]
fn test_on_dir_exists_replace() {
    let fixture = TestFixture::new();
    fixture.write("sub/new.txt", "new");
    let target = fixture.target();
    fs::create_dir_all(target.join("sub")).unwrap();
    fs::write(target.join("sub/stale.txt"), "stale").unwrap();

    let mut cmd = cargo_bin_cmd!("tcopy");
    cmd.arg("--on-dir-exists")
        .arg("replace")
        .arg(fixture.src.path())
        .arg(&target)
        .assert()
        .success();

    assert!(target.join("sub/new.txt").exists());
    assert!(!target.join("sub/stale.txt").exists());
}

#[test]
fn test_on_dir_exists_keep() {
    let fixture = TestFixture::new();
    fixture.write("sub/new.txt", "new");
    let target = fixture.target();
    fs::create_dir_all(target.join("sub")).unwrap();
    fs::write(target.join("sub/old.txt"), "old").unwrap();

    let mut cmd = cargo_bin_cmd!("tcopy");
    cmd.arg("--on-dir-exists")
        .arg("keep")
        .arg(fixture.src.path())
        .arg(&target)
        .assert()
        .success();

    assert!(!target.join("sub/new.txt").exists());
    fixture.assert_file_content(&target.join("sub/old.txt"), "old");
}

#[test]
fn test_exclude_patterns() {
    let fixture = TestFixture::new();
    fixture.write("keep.txt", "k");
    fixture.write("scratch.tmp", "t");
    fixture.write("node_modules/pkg/index.js", "js");
    fixture.write("src/cache_old/data", "d");

    let mut cmd = cargo_bin_cmd!("tcopy");
    cmd.arg("--exclude")
        .arg("*.tmp")
        .arg("--exclude")
        .arg("node_modules")
        .arg("--exclude")
        .arg("cache*")
        .arg(fixture.src.path())
        .arg(fixture.target())
        .assert()
        .success();

    let target = fixture.target();
    assert!(target.join("keep.txt").exists());
    assert!(target.join("src").is_dir());
    assert!(!target.join("scratch.tmp").exists());
    assert!(!target.join("node_modules").exists());
    assert!(!target.join("src/cache_old").exists());
}

#[test]
fn test_exclude_glob_syntax() {
    let fixture = TestFixture::new();
    fixture.write("file1.txt", "1");
    fixture.write("file10.txt", "10");
    fixture.write("a.log", "a");
    fixture.write("c.log", "c");
    fixture.write("build-out-bin", "b");

    let mut cmd = cargo_bin_cmd!("tcopy");
    cmd.arg("--exclude")
        .arg("file?.txt")
        .arg("--exclude")
        .arg("[ab].log")
        .arg("--exclude")
        .arg("build*bin")
        .arg(fixture.src.path())
        .arg(fixture.target())
        .assert()
        .success();

    let target = fixture.target();
    assert!(!target.join("file1.txt").exists());
    assert!(target.join("file10.txt").exists());
    assert!(!target.join("a.log").exists());
    assert!(target.join("c.log").exists());
    assert!(!target.join("build-out-bin").exists());
}

#[cfg(unix)]
#[test]
fn test_preserve_times_flag() {
    use std::time::{Duration, SystemTime};

    let fixture = TestFixture::new();
    fixture.write("old.txt", "old");
    let past = SystemTime::UNIX_EPOCH + Duration::from_secs(1_000_000_000);
    fs::File::options()
        .write(true)
        .open(fixture.src.path().join("old.txt"))
        .unwrap()
        .set_modified(past)
        .unwrap();

    let mut cmd = cargo_bin_cmd!("tcopy");
    cmd.arg("-p")
        .arg(fixture.src.path())
        .arg(fixture.target())
        .assert()
        .success();

    let modified = fs::metadata(fixture.target().join("old.txt"))
        .unwrap()
        .modified()
        .unwrap();
    assert_eq!(modified, past);
}

#[test]
fn test_no_times_overrides_archive_profile() {
    use std::time::{Duration, SystemTime};

    let fixture = TestFixture::new();
    fixture.write("old.txt", "old");
    let past = SystemTime::UNIX_EPOCH + Duration::from_secs(1_000_000_000);
    fs::File::options()
        .write(true)
        .open(fixture.src.path().join("old.txt"))
        .unwrap()
        .set_modified(past)
        .unwrap();

    let mut cmd = cargo_bin_cmd!("tcopy");
    cmd.arg("--profile")
        .arg("archive")
        .arg("--no-times")
        .arg("--no-owner")
        .arg(fixture.src.path())
        .arg(fixture.target())
        .assert()
        .success();

    let modified = fs::metadata(fixture.target().join("old.txt"))
        .unwrap()
        .modified()
        .unwrap();
    assert!(modified > past);
}

#[cfg(unix)]
#[test]
fn test_chmod_add() {
    use std::os::unix::fs::PermissionsExt;

    let fixture = TestFixture::new();
    fixture.write("file.txt", "x");
    fs::set_permissions(
        fixture.src.path().join("file.txt"),
        fs::Permissions::from_mode(0o600),
    )
    .unwrap();

    let mut cmd = cargo_bin_cmd!("tcopy");
    cmd.arg("--chmod-add")
        .arg("060")
        .arg(fixture.src.path())
        .arg(fixture.target())
        .assert()
        .success();

    let mode = fs::metadata(fixture.target().join("file.txt"))
        .unwrap()
        .permissions()
        .mode();
    assert_eq!(mode & 0o777, 0o660);
}

#[cfg(unix)]
#[test]
fn test_read_only_directory_is_populated() {
    use std::os::unix::fs::PermissionsExt;

    let fixture = TestFixture::new();
    fixture.write("locked/inner.txt", "inner");
    let locked = fixture.src.path().join("locked");
    fs::set_permissions(&locked, fs::Permissions::from_mode(0o555)).unwrap();

    let mut cmd = cargo_bin_cmd!("tcopy");
    cmd.arg(fixture.src.path())
        .arg(fixture.target())
        .assert()
        .success();

    let copied = fixture.target().join("locked");
    fixture.assert_file_content(&copied.join("inner.txt"), "inner");
    let mode = fs::metadata(&copied).unwrap().permissions().mode();
    assert_eq!(mode & 0o777, 0o555);

    // Let TempDir clean up
    fs::set_permissions(&copied, fs::Permissions::from_mode(0o755)).unwrap();
    fs::set_permissions(&locked, fs::Permissions::from_mode(0o755)).unwrap();
}

#[test]
fn test_verbose_logs_decisions() {
    let fixture = TestFixture::new();
    fixture.write("keep.txt", "k");
    fixture.write("drop.tmp", "d");

    let mut cmd = cargo_bin_cmd!("tcopy");
    cmd.env_remove("RUST_LOG")
        .arg("-v")
        .arg("--exclude")
        .arg("*.tmp")
        .arg(fixture.src.path())
        .arg(fixture.target())
        .assert()
        .success()
        .stderr(predicate::str::contains("skipped"));
}

#[test]
fn test_quiet_prints_nothing_on_success() {
    let fixture = TestFixture::new();
    fixture.write("a.txt", "a");

    let mut cmd = cargo_bin_cmd!("tcopy");
    cmd.env_remove("RUST_LOG")
        .arg("-q")
        .arg(fixture.src.path())
        .arg(fixture.target())
        .assert()
        .success()
        .stdout(predicate::str::is_empty())
        .stderr(predicate::str::is_empty());
}

#[test]
fn test_progress_flag() {
    let fixture = TestFixture::new();
    fixture.create_nested_structure(2, 3);

    let mut cmd = cargo_bin_cmd!("tcopy");
    cmd.arg("--progress")
        .arg("--buffer-size")
        .arg("7")
        .arg(fixture.src.path())
        .arg(fixture.target())
        .assert()
        .success();

    assert_eq!(fixture.count_files_recursive(&fixture.target()), 6);
}

#[test]
fn test_help_and_version() {
    cargo_bin_cmd!("tcopy")
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("--on-dir-exists"));

    cargo_bin_cmd!("tcopy")
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("tcopy"));
}
