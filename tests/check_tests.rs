use gart::{AddOutcome, GartError, GartOpts, add_path, check_for_changes};
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// `<tmp>/home/config/app` with a nested file, registered as `app` in `<tmp>/store`.
fn registered_app(tmp: &TempDir) -> (PathBuf, PathBuf) {
    let app = tmp.path().join("home/config/app");
    fs::create_dir_all(app.join("themes")).unwrap();
    fs::write(app.join("app.conf"), "font_size = 12\n").unwrap();
    fs::write(app.join("themes/dark.conf"), "bg = black\n").unwrap();
    let store = tmp.path().join("store");
    add_path(
        app.to_str().unwrap(),
        "app",
        &store,
        &GartOpts::default(),
    )
    .unwrap();
    (app, store)
}

#[test]
fn test_add_single_mirrors_directory() {
    let tmp = TempDir::new().unwrap();
    let (_, store) = registered_app(&tmp);
    assert_eq!(
        fs::read_to_string(store.join("app/app.conf")).unwrap(),
        "font_size = 12\n"
    );
    assert_eq!(
        fs::read_to_string(store.join("app/themes/dark.conf")).unwrap(),
        "bg = black\n"
    );
}

#[test]
fn test_check_unchanged_after_add() {
    let tmp = TempDir::new().unwrap();
    let (app, store) = registered_app(&tmp);
    let result = check_for_changes("app", &app, &store, &GartOpts::default()).unwrap();
    assert!(!result.changed());
    assert!(!result.baseline_created);
}

#[test]
fn test_check_detects_modification_then_settles() {
    let tmp = TempDir::new().unwrap();
    let (app, store) = registered_app(&tmp);
    fs::write(app.join("app.conf"), "font_size = 14\n").unwrap();

    let first = check_for_changes("app", &app, &store, &GartOpts::default()).unwrap();
    assert!(first.changed());
    assert_eq!(first.modified, vec![PathBuf::from("app.conf")]);
    assert_eq!(
        fs::read_to_string(store.join("app/app.conf")).unwrap(),
        "font_size = 14\n"
    );

    let second = check_for_changes("app", &app, &store, &GartOpts::default()).unwrap();
    assert!(!second.changed());
}

#[test]
fn test_check_same_size_edit_is_detected() {
    let tmp = TempDir::new().unwrap();
    let (app, store) = registered_app(&tmp);
    fs::write(app.join("themes/dark.conf"), "bg = white\n").unwrap();

    let result = check_for_changes("app", &app, &store, &GartOpts::default()).unwrap();
    assert_eq!(result.modified, vec![PathBuf::from("themes/dark.conf")]);
}

#[test]
fn test_check_detects_added_and_deleted_files() {
    let tmp = TempDir::new().unwrap();
    let (app, store) = registered_app(&tmp);
    fs::remove_file(app.join("themes/dark.conf")).unwrap();
    fs::write(app.join("keys.conf"), "map ctrl+c copy\n").unwrap();

    let result = check_for_changes("app", &app, &store, &GartOpts::default()).unwrap();
    assert_eq!(result.added, vec![PathBuf::from("keys.conf")]);
    assert_eq!(result.removed, vec![PathBuf::from("themes/dark.conf")]);
    assert!(!store.join("app/themes/dark.conf").exists());
    assert!(store.join("app/keys.conf").is_file());
}

#[test]
fn test_check_dry_run_leaves_store_untouched() {
    let tmp = TempDir::new().unwrap();
    let (app, store) = registered_app(&tmp);
    fs::write(app.join("app.conf"), "font_size = 16\n").unwrap();
    let opts = GartOpts {
        dry_run: true,
        ..GartOpts::default()
    };

    assert!(check_for_changes("app", &app, &store, &opts).unwrap().changed());
    assert!(check_for_changes("app", &app, &store, &opts).unwrap().changed());
    assert_eq!(
        fs::read_to_string(store.join("app/app.conf")).unwrap(),
        "font_size = 12\n"
    );
}

#[test]
fn test_check_missing_store_creates_baseline() {
    let tmp = TempDir::new().unwrap();
    let app = tmp.path().join("app");
    fs::create_dir_all(&app).unwrap();
    fs::write(app.join("a"), "1").unwrap();
    let store = tmp.path().join("store");

    let result = check_for_changes("app", &app, &store, &GartOpts::default()).unwrap();
    assert!(result.baseline_created);
    assert!(!result.changed());
    assert!(store.join("app/a").is_file());
}

#[test]
fn test_check_single_file_entry() {
    let tmp = TempDir::new().unwrap();
    let rc = tmp.path().join("zshrc");
    fs::write(&rc, "alias ll='ls -l'\n").unwrap();
    let store = tmp.path().join("store");

    let outcome = add_path(rc.to_str().unwrap(), "zshrc", &store, &GartOpts::default()).unwrap();
    let AddOutcome::Single { store_path, .. } = outcome else {
        panic!("expected a single outcome");
    };
    assert_eq!(store_path, store.join("zshrc/zshrc"));

    fs::write(&rc, "alias ll='ls -la'\n").unwrap();
    let result = check_for_changes("zshrc", &rc, &store, &GartOpts::default()).unwrap();
    assert!(result.changed());
    assert_eq!(result.modified, vec![PathBuf::new()]);
    assert_eq!(
        fs::read_to_string(&store_path).unwrap(),
        "alias ll='ls -la'\n"
    );
}

#[test]
fn test_check_missing_source_is_error() {
    let tmp = TempDir::new().unwrap();
    let (app, store) = registered_app(&tmp);
    fs::remove_dir_all(&app).unwrap();
    assert!(check_for_changes("app", &app, &store, &GartOpts::default()).is_err());
}

#[test]
fn test_add_rejects_store_inside_source() {
    let tmp = TempDir::new().unwrap();
    let app = tmp.path().join("app");
    fs::create_dir_all(&app).unwrap();
    let err = add_path(
        app.to_str().unwrap(),
        "app",
        &app.join("store"),
        &GartOpts::default(),
    )
    .unwrap_err();
    assert!(matches!(err, GartError::SelfReference { .. }));
}

#[test]
fn test_add_missing_source_is_error() {
    let tmp = TempDir::new().unwrap();
    let missing = tmp.path().join("nope");
    let err = add_path(
        missing.to_str().unwrap(),
        "nope",
        &tmp.path().join("store"),
        &GartOpts::default(),
    )
    .unwrap_err();
    assert!(matches!(err, GartError::Copy { .. }));
}

fn bulk_fixture(tmp: &TempDir) -> (PathBuf, PathBuf, PathBuf) {
    let base = tmp.path().join("home/config");
    for dir in [".app", ".nvim"] {
        fs::create_dir_all(base.join(dir)).unwrap();
        fs::write(base.join(dir).join("rc"), dir).unwrap();
    }
    let store = tmp.path().join("store");
    let outcome = add_path(
        &format!("{}/*", base.display()),
        "configs",
        &store,
        &GartOpts::default(),
    )
    .unwrap();
    let source = outcome.entry().source_path.clone();
    (base, source, store)
}

#[test]
fn test_check_bulk_umbrella() {
    let tmp = TempDir::new().unwrap();
    let (base, source, store) = bulk_fixture(&tmp);
    assert!(
        !check_for_changes("configs", &source, &store, &GartOpts::default())
            .unwrap()
            .changed()
    );

    fs::write(base.join(".app/rc"), "changed").unwrap();
    fs::create_dir_all(base.join(".tmux")).unwrap();
    fs::remove_dir_all(base.join(".nvim")).unwrap();

    let result = check_for_changes("configs", &source, &store, &GartOpts::default()).unwrap();
    assert_eq!(result.added, vec![PathBuf::from(".tmux")]);
    assert_eq!(result.removed, vec![PathBuf::from(".nvim")]);
    assert_eq!(result.modified, vec![Path::new(".app").join("rc")]);

    let dest = store.join("configs");
    assert_eq!(fs::read_to_string(dest.join(".app/rc")).unwrap(), "changed");
    assert!(dest.join(".tmux").is_dir());
    assert!(!dest.join(".nvim").exists());
    assert!(
        !check_for_changes("configs", &source, &store, &GartOpts::default())
            .unwrap()
            .changed()
    );
}
