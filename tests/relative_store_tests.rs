//! Store roots given relative to the working directory. One test only: it changes the process cwd.

use gart::{AddOutcome, GartError, GartOpts, add_path, check_for_changes};
use std::fs;
use std::path::Path;
use tempfile::TempDir;

#[test]
fn test_relative_store_root_is_resolved_against_cwd() {
    let tmp = TempDir::new().unwrap();
    let root = tmp.path().canonicalize().unwrap();
    fs::create_dir_all(root.join("src/app")).unwrap();
    fs::write(root.join("src/app/app.conf"), "a = 1\n").unwrap();
    fs::create_dir_all(root.join("home/.nvim")).unwrap();
    fs::write(root.join("home/.nvim/init.lua"), "-- nvim").unwrap();
    std::env::set_current_dir(&root).unwrap();
    let opts = GartOpts::default();

    // Store nested inside the source it would copy.
    let src = root.join("src");
    let err = add_path(src.to_str().unwrap(), "x", Path::new("src/store"), &opts).unwrap_err();
    assert!(matches!(err, GartError::SelfReference { .. }));
    assert!(!root.join("src/store").exists());

    let err = check_for_changes("x", &src, Path::new("src/store"), &opts).unwrap_err();
    assert!(matches!(err, GartError::SelfReference { .. }));
    assert!(!root.join("src/store").exists());

    // Unrelated relative store: copies land under cwd and compare cleanly.
    let app = root.join("src/app");
    add_path(app.to_str().unwrap(), "app", Path::new("store"), &opts).unwrap();
    assert!(root.join("store/app/app.conf").is_file());
    let result = check_for_changes("app", &app, Path::new("./store"), &opts).unwrap();
    assert!(!result.changed());
    assert!(!result.baseline_created);

    // Bulk root that contains a relative store: the store is filtered out, siblings still copy.
    fs::create_dir_all(root.join("home/.store")).unwrap();
    let pattern = format!("{}/*", root.join("home").display());
    let outcome = add_path(&pattern, "cfg", Path::new("home/.store"), &opts).unwrap();
    let AddOutcome::Bulk { report, .. } = outcome else {
        panic!("expected a bulk outcome");
    };
    assert_eq!(report.copied.len(), 1);
    assert_eq!(report.ignored, vec![root.join("home/.store")]);
    assert!(root.join("home/.store/cfg/.nvim/init.lua").is_file());
    assert!(!root.join("home/.store/cfg/.store").exists());
}
