use gart::engine::{copy_directory, copy_file, mirror, prune};
use std::fs;
use std::path::PathBuf;
use tempfile::TempDir;

#[test]
fn test_copy_file_creates_parents_and_copies_bytes() {
    let tmp = TempDir::new().unwrap();
    let src = tmp.path().join("zshrc");
    fs::write(&src, "export EDITOR=vim\n").unwrap();
    let dst = tmp.path().join("store/zsh/zshrc");

    copy_file(&src, &dst).unwrap();
    assert_eq!(fs::read_to_string(&dst).unwrap(), "export EDITOR=vim\n");
}

#[test]
fn test_copy_file_overwrites_existing_destination() {
    let tmp = TempDir::new().unwrap();
    let src = tmp.path().join("a");
    let dst = tmp.path().join("b");
    fs::write(&src, "new").unwrap();
    fs::write(&dst, "old contents").unwrap();

    copy_file(&src, &dst).unwrap();
    assert_eq!(fs::read_to_string(&dst).unwrap(), "new");
}

#[cfg(unix)]
#[test]
fn test_copy_file_preserves_mode() {
    use std::os::unix::fs::PermissionsExt;

    let tmp = TempDir::new().unwrap();
    let src = tmp.path().join("script.sh");
    fs::write(&src, "#!/bin/sh\n").unwrap();
    fs::set_permissions(&src, fs::Permissions::from_mode(0o750)).unwrap();
    let dst = tmp.path().join("out/script.sh");

    copy_file(&src, &dst).unwrap();
    let mode = fs::metadata(&dst).unwrap().permissions().mode() & 0o777;
    assert_eq!(mode, 0o750);
}

#[test]
fn test_copy_directory_nested_tree() {
    let tmp = TempDir::new().unwrap();
    let src = tmp.path().join("app");
    fs::create_dir_all(src.join("lua/plugins")).unwrap();
    fs::write(src.join("init.lua"), "require('plugins')").unwrap();
    fs::write(src.join("lua/plugins/lsp.lua"), "-- lsp").unwrap();
    let dst = tmp.path().join("store/app");

    let stats = copy_directory(&src, &dst).unwrap();
    assert_eq!(stats.files, 2);
    assert_eq!(stats.dirs, 3);
    assert_eq!(
        fs::read_to_string(dst.join("init.lua")).unwrap(),
        "require('plugins')"
    );
    assert_eq!(
        fs::read_to_string(dst.join("lua/plugins/lsp.lua")).unwrap(),
        "-- lsp"
    );
}

#[test]
fn test_copy_directory_empty_dir() {
    let tmp = TempDir::new().unwrap();
    let src = tmp.path().join("empty");
    fs::create_dir(&src).unwrap();
    let dst = tmp.path().join("store/empty");

    let stats = copy_directory(&src, &dst).unwrap();
    assert_eq!(stats.files, 0);
    assert!(dst.is_dir());
}

#[test]
fn test_copy_directory_with_file_source() {
    let tmp = TempDir::new().unwrap();
    let src = tmp.path().join("gitconfig");
    fs::write(&src, "[user]\n").unwrap();
    let dst = tmp.path().join("store/git/gitconfig");

    let stats = copy_directory(&src, &dst).unwrap();
    assert_eq!(stats.files, 1);
    assert_eq!(fs::read_to_string(&dst).unwrap(), "[user]\n");
}

#[test]
fn test_copy_directory_is_idempotent() {
    let tmp = TempDir::new().unwrap();
    let src = tmp.path().join("app");
    fs::create_dir_all(src.join("sub")).unwrap();
    fs::write(src.join("sub/f"), "v1").unwrap();
    let dst = tmp.path().join("store/app");

    copy_directory(&src, &dst).unwrap();
    copy_directory(&src, &dst).unwrap();
    assert_eq!(fs::read_to_string(dst.join("sub/f")).unwrap(), "v1");
}

#[test]
fn test_copy_directory_missing_source_is_copy_error() {
    let tmp = TempDir::new().unwrap();
    let err = copy_directory(&tmp.path().join("nope"), &tmp.path().join("out")).unwrap_err();
    assert!(matches!(err, gart::GartError::Copy { .. }));
}

#[cfg(unix)]
#[test]
fn test_copy_directory_recreates_symlinks() {
    let tmp = TempDir::new().unwrap();
    let src = tmp.path().join("app");
    fs::create_dir(&src).unwrap();
    fs::write(src.join("real.conf"), "x").unwrap();
    std::os::unix::fs::symlink("real.conf", src.join("link.conf")).unwrap();
    let dst = tmp.path().join("store/app");

    let stats = copy_directory(&src, &dst).unwrap();
    assert_eq!(stats.symlinks, 1);
    assert_eq!(
        fs::read_link(dst.join("link.conf")).unwrap(),
        PathBuf::from("real.conf")
    );
}

#[test]
fn test_mirror_deletes_removed_paths() {
    let tmp = TempDir::new().unwrap();
    let src = tmp.path().join("app");
    let dst = tmp.path().join("store/app");
    fs::create_dir_all(&src).unwrap();
    fs::write(src.join("keep"), "k").unwrap();
    fs::write(src.join("gone"), "g").unwrap();
    copy_directory(&src, &dst).unwrap();

    fs::remove_file(src.join("gone")).unwrap();
    fs::write(src.join("keep"), "k2").unwrap();
    mirror(&src, &dst, &[PathBuf::from("gone")]).unwrap();

    assert_eq!(fs::read_to_string(dst.join("keep")).unwrap(), "k2");
    assert!(!dst.join("gone").exists());
}

#[test]
fn test_prune_nested_and_missing_paths() {
    let tmp = TempDir::new().unwrap();
    let root = tmp.path();
    fs::create_dir_all(root.join("a/b")).unwrap();
    fs::write(root.join("a/b/c"), "x").unwrap();

    prune(
        root,
        &[
            PathBuf::from("a"),
            PathBuf::from("a/b/c"),
            PathBuf::from("never-existed"),
        ],
    )
    .unwrap();
    assert!(!root.join("a").exists());
}
