//! End-to-end pruning against a real directory tree.

mod common;

use std::fs;

use assert_fs::TempDir;
use assert_fs::prelude::*;
use common::{clock_ahead, write_aged};
use dir_prune::error::PruneError;
use dir_prune::prune::{ErrorPolicy, Pruner, RemovalStrategy};
use predicates::prelude::*;

fn pruner(days: u32) -> Pruner {
    Pruner::builder()
        .age_threshold_days(days)
        .strategy(RemovalStrategy::Permanent)
        .quiet(true)
        .build()
}

#[test]
fn test_mixed_tree() {
    let temp = TempDir::new().unwrap();
    let clock = clock_ahead(30);

    write_aged(temp.child("a.txt").path(), "aaaa", &clock, 20);
    write_aged(temp.child("b.txt").path(), "bb", &clock, 3);
    write_aged(temp.child("sub1/keep.txt").path(), "k", &clock, 1);
    write_aged(temp.child("sub2/sub3/c.txt").path(), "c", &clock, 40);
    temp.child("sub2/empty").create_dir_all().unwrap();

    let stats = pruner(10).prune_at(temp.path(), &clock).unwrap();

    temp.child("a.txt").assert(predicate::path::missing());
    temp.child("b.txt").assert(predicate::path::exists());
    temp.child("sub1/keep.txt").assert(predicate::path::exists());
    temp.child("sub2").assert(predicate::path::missing());
    temp.assert(predicate::path::is_dir());

    assert_eq!(stats.files_deleted, 2);
    assert_eq!(stats.files_retained, 2);
    assert_eq!(stats.dirs_removed, 3);
    assert_eq!(stats.bytes_freed, 5);
    assert!(stats.skipped.is_empty());
}

#[test]
fn test_empty_root_is_kept() {
    let temp = TempDir::new().unwrap();
    let stats = pruner(7).prune_at(temp.path(), &clock_ahead(30)).unwrap();

    temp.assert(predicate::path::is_dir());
    assert_eq!(stats.files_deleted, 0);
    assert_eq!(stats.dirs_removed, 0);
}

#[test]
fn test_directory_with_young_file_survives() {
    let temp = TempDir::new().unwrap();
    let clock = clock_ahead(30);
    write_aged(temp.child("outer/inner/young.txt").path(), "y", &clock, 2);
    write_aged(temp.child("outer/old.txt").path(), "o", &clock, 60);

    let stats = pruner(7).prune_at(temp.path(), &clock).unwrap();

    temp.child("outer/inner/young.txt").assert(predicate::path::exists());
    temp.child("outer/old.txt").assert(predicate::path::missing());
    assert_eq!(stats.dirs_removed, 0);
}

#[test]
fn test_second_run_removes_nothing() {
    let temp = TempDir::new().unwrap();
    let clock = clock_ahead(30);
    write_aged(temp.child("x/y/z.txt").path(), "z", &clock, 30);
    write_aged(temp.child("x/fresh.txt").path(), "f", &clock, 0);

    let first = pruner(7).prune_at(temp.path(), &clock).unwrap();
    let second = pruner(7).prune_at(temp.path(), &clock).unwrap();

    assert_eq!(first.files_deleted, 1);
    assert_eq!(first.dirs_removed, 1);
    assert_eq!(second.files_deleted, 0);
    assert_eq!(second.dirs_removed, 0);
    assert_eq!(second.files_retained, 1);
}

#[test]
fn test_dry_run_matches_real_run() {
    let temp = TempDir::new().unwrap();
    let clock = clock_ahead(30);
    write_aged(temp.child("a/old.txt").path(), "old", &clock, 20);
    write_aged(temp.child("a/b/old.txt").path(), "old", &clock, 20);
    write_aged(temp.child("c/new.txt").path(), "new", &clock, 1);

    let dry = Pruner::builder()
        .dry_run(true)
        .quiet(true)
        .build()
        .prune_at(temp.path(), &clock)
        .unwrap();

    temp.child("a/old.txt").assert(predicate::path::exists());
    temp.child("a/b/old.txt").assert(predicate::path::exists());

    let real = pruner(7).prune_at(temp.path(), &clock).unwrap();

    assert_eq!(dry.removed, real.removed);
    assert_eq!(dry.files_deleted, real.files_deleted);
    assert_eq!(dry.dirs_removed, real.dirs_removed);
    temp.child("a").assert(predicate::path::missing());
    temp.child("c/new.txt").assert(predicate::path::exists());
}

#[test]
fn test_missing_root_is_rejected() {
    let temp = TempDir::new().unwrap();
    let missing = temp.child("does-not-exist");

    let err = pruner(7).prune_at(missing.path(), &clock_ahead(30)).unwrap_err();
    assert!(matches!(err, PruneError::DirectoryNotFound(ref p) if p == missing.path()));
}

#[cfg(unix)]
#[test]
fn test_read_only_directory_is_removed() {
    use std::os::unix::fs::PermissionsExt;

    let temp = TempDir::new().unwrap();
    let locked = temp.child("locked");
    locked.create_dir_all().unwrap();
    fs::set_permissions(locked.path(), fs::Permissions::from_mode(0o555)).unwrap();

    let stats = pruner(7).prune_at(temp.path(), &clock_ahead(30)).unwrap();

    locked.assert(predicate::path::missing());
    assert_eq!(stats.dirs_removed, 1);
}

#[cfg(unix)]
#[test]
fn test_symlinked_directory_is_not_followed() {
    let temp = TempDir::new().unwrap();
    let outside = TempDir::new().unwrap();
    let clock = clock_ahead(30);
    write_aged(outside.child("precious.txt").path(), "p", &clock, 90);

    std::os::unix::fs::symlink(outside.path(), temp.child("link").path()).unwrap();

    let stats = Pruner::builder()
        .strategy(RemovalStrategy::Permanent)
        .error_policy(ErrorPolicy::Continue)
        .quiet(true)
        .build()
        .prune_at(temp.path(), &clock)
        .unwrap();

    outside.child("precious.txt").assert(predicate::path::exists());
    assert_eq!(stats.dirs_removed, 0);
}
