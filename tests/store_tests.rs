use gart::StoreIndex;
use gart::utils::{GartToml, SettingsSection, load_gart_toml, save_gart_toml};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::thread;
use tempfile::TempDir;

#[test]
fn test_insert_get_remove() {
    let index = StoreIndex::new();
    assert!(index.is_empty());
    assert_eq!(index.insert("nvim", Path::new("/h/.config/nvim")), None);
    assert!(index.contains("nvim"));
    assert_eq!(index.get("nvim"), Some(PathBuf::from("/h/.config/nvim")));
    assert_eq!(
        index.remove("nvim"),
        Some(PathBuf::from("/h/.config/nvim"))
    );
    assert!(index.get("nvim").is_none());
}

#[test]
fn test_insert_last_write_wins() {
    let index = StoreIndex::new();
    index.insert("zsh", Path::new("/h/.zshrc"));
    let previous = index.insert("zsh", Path::new("/h/.config/zsh"));
    assert_eq!(previous, Some(PathBuf::from("/h/.zshrc")));
    assert_eq!(index.len(), 1);
    assert_eq!(index.get("zsh"), Some(PathBuf::from("/h/.config/zsh")));
}

#[test]
fn test_entries_sorted_by_name() {
    let index = StoreIndex::new();
    index.insert("zsh", Path::new("/h/.zshrc"));
    index.insert("alacritty", Path::new("/h/.config/alacritty"));
    let names: Vec<String> = index.entries().into_iter().map(|e| e.name).collect();
    assert_eq!(names, vec!["alacritty", "zsh"]);
}

#[test]
fn test_concurrent_inserts() {
    let index = Arc::new(StoreIndex::new());
    let handles: Vec<_> = (0..8)
        .map(|i| {
            let index = Arc::clone(&index);
            thread::spawn(move || {
                index.insert(&format!("entry{i}"), Path::new("/h/x"));
            })
        })
        .collect();
    for h in handles {
        h.join().unwrap();
    }
    assert_eq!(index.len(), 8);
}

#[test]
fn test_load_missing_file_is_empty() {
    let tmp = TempDir::new().unwrap();
    let index = StoreIndex::load(&tmp.path().join("config.toml")).unwrap();
    assert!(index.is_empty());
}

#[test]
fn test_save_load_round_trip_keeps_settings() {
    let tmp = TempDir::new().unwrap();
    let config = tmp.path().join("gart/config.toml");
    let file = GartToml {
        settings: SettingsSection {
            storage_path: Some("/h/dotfiles".to_string()),
            strict: Some(true),
            ..SettingsSection::default()
        },
        ..GartToml::default()
    };
    save_gart_toml(&config, &file).unwrap();

    let index = StoreIndex::load(&config).unwrap();
    index.insert("nvim", Path::new("/h/.config/nvim"));
    index.insert("configs", Path::new("/h/.config/*"));
    index.save(&config).unwrap();

    let reloaded = StoreIndex::load(&config).unwrap();
    assert_eq!(reloaded.to_map(), index.to_map());
    assert_eq!(reloaded.get("configs"), Some(PathBuf::from("/h/.config/*")));

    let raw = load_gart_toml(&config).unwrap();
    assert_eq!(raw.settings.storage_path.as_deref(), Some("/h/dotfiles"));
    assert_eq!(raw.settings.strict, Some(true));
}

#[test]
fn test_load_malformed_file_is_config_error() {
    let tmp = TempDir::new().unwrap();
    let config = tmp.path().join("config.toml");
    fs::write(&config, "[dotfiles\nbroken").unwrap();
    let err = StoreIndex::load(&config).unwrap_err();
    assert!(matches!(err, gart::GartError::Config { .. }));
}

#[test]
fn test_dotfiles_table_format() {
    let tmp = TempDir::new().unwrap();
    let config = tmp.path().join("config.toml");
    fs::write(
        &config,
        "[settings]\nverbose = true\n\n[dotfiles]\nnvim = \"/h/.config/nvim\"\n",
    )
    .unwrap();
    let index = StoreIndex::load(&config).unwrap();
    assert_eq!(index.get("nvim"), Some(PathBuf::from("/h/.config/nvim")));
}
