use std::time::Duration;
use tempfile::TempDir;
use update_checker::test_utils::{StaticLookup, interactive_environment};
use update_checker::{UpdateCheckConfig, UpdateChecker, UpdateCheckerOptions};

#[tokio::test]
async fn test_checker_from_host_config_file() {
    let temp_dir = TempDir::new().unwrap();
    let stamps = temp_dir.path().join("stamps");
    let config_path = temp_dir.path().join("tool.toml");
    let content = format!(
        "name = \"xpm\"\n\n[update-check]\ncheck_interval = 3600\ntimestamps_folder = \"{}\"\ninstall_command = \"pnpm add\"\n",
        stamps.display().to_string().replace('\\', "\\\\")
    );
    tokio::fs::write(&config_path, content).await.unwrap();

    let config = UpdateCheckConfig::load_from(&config_path).await.unwrap();
    let options = UpdateCheckerOptions::from_config("xpm", "0.0.1", &config).unwrap();
    let mut checker = UpdateChecker::new(options, interactive_environment())
        .unwrap()
        .with_lookup(StaticLookup::new("1.0.0"))
        .with_notification_sink(|_: &str| {});

    assert_eq!(checker.check_interval(), Duration::from_secs(3600));
    assert_eq!(checker.timestamps_folder(), stamps.as_path());

    checker.initiate_version_retrieval().await;
    checker.notify_if_update_is_available().await;

    assert!(stamps.join("xpm-update-check").exists());
}

#[tokio::test]
async fn test_zero_interval_in_config_disables_checks() {
    let temp_dir = TempDir::new().unwrap();
    let config = UpdateCheckConfig::from_host_toml("[update-check]\ncheck_interval = 0\n").unwrap();
    let options = UpdateCheckerOptions::from_config("xpm", "0.0.1", &config)
        .unwrap()
        .with_timestamps_folder(temp_dir.path());

    let lookup = StaticLookup::new("1.0.0");
    let mut checker = UpdateChecker::new(options, interactive_environment())
        .unwrap()
        .with_lookup(lookup.clone());

    checker.initiate_version_retrieval().await;
    checker.notify_if_update_is_available().await;

    assert_eq!(lookup.calls(), 0);
    assert!(!temp_dir.path().join("xpm-update-check").exists());
}

#[tokio::test]
async fn test_missing_config_file_uses_defaults() {
    let temp_dir = TempDir::new().unwrap();
    let config = UpdateCheckConfig::load_from(&temp_dir.path().join("absent.toml")).await.unwrap();
    let options = UpdateCheckerOptions::from_config("xpm", "0.0.1", &config).unwrap();

    assert_eq!(options.check_interval(), Duration::from_secs(86400));
    assert_eq!(options.install_command, "npm install");
}
