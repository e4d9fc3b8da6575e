use crate::common::MockRegistry;
use update_checker::checker::CheckState;
use update_checker::test_utils::{RecordingSink, TestEnvironment, interactive_environment};
use update_checker::{UpdateCheckError, UpdateChecker};

#[tokio::test]
async fn test_newer_version_from_registry_is_announced() {
    let registry = MockRegistry::start().await;
    let mock = registry.publish("xpm", "1.0.0").await;
    let env = TestEnvironment::new().unwrap();
    let sink = RecordingSink::new();

    let options = env.options().with_registry_url(registry.url());
    let mut checker = UpdateChecker::new(options, interactive_environment())
        .unwrap()
        .with_notification_sink(sink.clone());

    checker.initiate_version_retrieval().await;
    checker.notify_if_update_is_available().await;

    mock.assert_async().await;
    assert_eq!(
        sink.joined(),
        "\n>>> New version 0.0.1 -> 1.0.0 available. <<<\n>>> Run 'npm install xpm' to update. <<<"
    );
    assert_eq!(checker.latest_version(), Some("1.0.0"));
    assert!(env.marker_exists());
}

#[tokio::test]
async fn test_registry_queried_once_per_interval() {
    let registry = MockRegistry::start().await;
    let mock = registry.publish("xpm", "1.0.0").await;
    let env = TestEnvironment::new().unwrap();

    for _ in 0..3 {
        let options = env.options().with_registry_url(registry.url());
        let mut checker = UpdateChecker::new(options, interactive_environment())
            .unwrap()
            .with_notification_sink(RecordingSink::new());

        checker.initiate_version_retrieval().await;
        checker.notify_if_update_is_available().await;
    }

    mock.assert_hits_async(1).await;
}

#[tokio::test]
async fn test_registry_from_npm_config_environment() {
    let registry = MockRegistry::start().await;
    let mock = registry.publish("xpm", "2.0.0").await;
    let env = TestEnvironment::new().unwrap();
    let sink = RecordingSink::new();

    let environment = interactive_environment().with_var("npm_config_registry", registry.url());
    let mut checker = env.checker_with(environment).unwrap().with_notification_sink(sink.clone());

    checker.initiate_version_retrieval().await;
    checker.notify_if_update_is_available().await;

    mock.assert_async().await;
    assert!(sink.joined().contains("0.0.1 -> 2.0.0"));
}

#[tokio::test]
async fn test_up_to_date_against_registry() {
    let registry = MockRegistry::start().await;
    registry.publish("xpm", "0.0.1").await;
    let env = TestEnvironment::new().unwrap();
    let sink = RecordingSink::new();

    let options = env.options().with_registry_url(registry.url());
    let mut checker = UpdateChecker::new(options, interactive_environment())
        .unwrap()
        .with_notification_sink(sink.clone());

    checker.initiate_version_retrieval().await;
    checker.notify_if_update_is_available().await;

    assert!(sink.messages().is_empty());
    assert_eq!(checker.state(), CheckState::Resolved);
    assert!(env.marker_exists());
}

#[tokio::test]
async fn test_unknown_package_is_recorded() {
    let registry = MockRegistry::start().await;
    registry.fail("xpm", 404).await;
    let env = TestEnvironment::new().unwrap();
    let sink = RecordingSink::new();

    let options = env.options().with_registry_url(registry.url());
    let mut checker = UpdateChecker::new(options, interactive_environment())
        .unwrap()
        .with_notification_sink(sink.clone());

    checker.initiate_version_retrieval().await;
    checker.notify_if_update_is_available().await;

    assert!(sink.messages().is_empty());
    assert!(matches!(
        checker.returned_error(),
        Some(UpdateCheckError::PackageNotFound { .. })
    ));
    assert!(env.marker_exists());
}

#[tokio::test]
async fn test_registry_server_error_is_recorded() {
    let registry = MockRegistry::start().await;
    registry.fail("xpm", 503).await;
    let env = TestEnvironment::new().unwrap();

    let options = env.options().with_registry_url(registry.url());
    let mut checker = UpdateChecker::new(options, interactive_environment())
        .unwrap()
        .with_notification_sink(RecordingSink::new());

    checker.initiate_version_retrieval().await;
    checker.notify_if_update_is_available().await;

    let error = checker.returned_error().unwrap();
    assert!(matches!(error, UpdateCheckError::Registry { .. }));
    assert!(error.to_string().contains("503"));
    assert_eq!(checker.state(), CheckState::Errored);
}

#[tokio::test]
async fn test_skipped_run_never_contacts_registry() {
    let registry = MockRegistry::start().await;
    let mock = registry.publish("xpm", "1.0.0").await;
    let env = TestEnvironment::new().unwrap();

    let options = env.options().with_registry_url(registry.url());
    let mut checker = UpdateChecker::new(options, interactive_environment().ci(true)).unwrap();

    checker.initiate_version_retrieval().await;
    checker.notify_if_update_is_available().await;

    mock.assert_hits_async(0).await;
    assert!(!env.marker_exists());
}
