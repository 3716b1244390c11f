use data_organizer::config::{unknown_keys, Config, ConfigError, ConfigOverrides};
use figment::providers::{Env, Serialized};
use figment::Figment;
use std::fs;
use tempfile::tempdir;

#[test]
fn test_config_defaults_extract() {
    // Figment directly, without Env, so other tests cannot interfere
    let config: Config = Figment::from(Serialized::defaults(Config::default()))
        .extract()
        .unwrap();
    assert_eq!(config, Config::default());
    assert!(config.dry_run);
}

#[test]
fn test_config_env_layer() {
    std::env::set_var("DATA_ORGANIZER_BATCH_SIZE", "7");

    let config: Config = Figment::from(Serialized::defaults(Config::default()))
        .merge(Env::prefixed("DATA_ORGANIZER_"))
        .extract()
        .unwrap();
    assert_eq!(config.batch_size, 7);

    std::env::remove_var("DATA_ORGANIZER_BATCH_SIZE");
}

#[test]
fn test_config_file_layer_and_cli_precedence() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("config.toml");
    fs::write(
        &path,
        "max_depth = 4\nfollow_symlinks = true\nhash_size_ceiling = 2048\n",
    )
    .unwrap();

    let from_file = Config::load_from_path(&path).unwrap();
    assert_eq!(from_file.max_depth, 4);
    assert!(from_file.follow_symlinks);
    assert_eq!(from_file.hash_size_ceiling, 2048);

    let overrides = ConfigOverrides {
        hash_size_ceiling: Some(4096),
        ..Default::default()
    };
    let layered = Config::load(Some(&path), &overrides).unwrap();
    assert_eq!(layered.max_depth, 4);
    assert_eq!(layered.hash_size_ceiling, 4096);
}

#[test]
fn test_config_invalid_value_names_key() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("config.toml");
    fs::write(&path, "worker_threads = 0\n").unwrap();

    match Config::load_from_path(&path) {
        Err(ConfigError::Invalid { key, .. }) => assert_eq!(key, "worker_threads"),
        other => panic!("expected invalid worker_threads, got {other:?}"),
    }
}

#[test]
fn test_config_malformed_toml() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("config.toml");
    fs::write(&path, "max_depth = [unclosed").unwrap();

    assert!(matches!(
        Config::load_from_path(&path),
        Err(ConfigError::Load(_))
    ));
}

#[test]
fn test_config_unknown_keys_are_reported() {
    let unknown = unknown_keys("include_hiden = true\nworker_threads = 2\n");
    assert_eq!(unknown, vec![("include_hiden".to_string(), Some("include_hidden"))]);
}
