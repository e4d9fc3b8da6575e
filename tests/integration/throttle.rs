use std::time::Duration;
use update_checker::test_utils::{
    RecordingSink, StaticLookup, TestEnvironment, interactive_environment, write_marker_aged,
};
use update_checker::{UpdateChecker, UpdateCheckerOptions};

const HOUR: Duration = Duration::from_secs(60 * 60);

#[tokio::test]
async fn test_second_process_is_throttled() {
    let env = TestEnvironment::new().unwrap();
    let lookup = StaticLookup::new("1.0.0");
    let sink = RecordingSink::new();

    for _ in 0..2 {
        let mut checker = env
            .checker()
            .unwrap()
            .with_lookup(lookup.clone())
            .with_notification_sink(sink.clone());

        checker.initiate_version_retrieval().await;
        checker.notify_if_update_is_available().await;
    }

    assert_eq!(lookup.calls(), 1);
    assert_eq!(sink.messages().len(), 1);
}

#[tokio::test]
async fn test_custom_interval_is_honoured() {
    let env = TestEnvironment::new().unwrap();
    env.write_marker_aged(2 * HOUR).unwrap();

    // A day has not passed, but an hour has.
    let daily = StaticLookup::new("1.0.0");
    let mut checker = env.checker().unwrap().with_lookup(daily.clone());
    checker.initiate_version_retrieval().await;
    assert!(!checker.is_pending());
    assert_eq!(daily.calls(), 0);

    let hourly = StaticLookup::new("1.0.0");
    let options = env.options().with_check_interval_seconds(HOUR.as_secs());
    let mut checker = UpdateChecker::new(options, interactive_environment())
        .unwrap()
        .with_lookup(hourly.clone())
        .with_notification_sink(RecordingSink::new());
    checker.initiate_version_retrieval().await;
    assert!(checker.is_pending());
    checker.notify_if_update_is_available().await;
    assert_eq!(hourly.calls(), 1);
}

#[tokio::test]
async fn test_packages_are_throttled_independently() {
    let env = TestEnvironment::new().unwrap();
    write_marker_aged(&env.timestamps_folder.join("xpm-update-check"), HOUR).unwrap();

    let lookup = StaticLookup::new("1.0.0");
    let options = UpdateCheckerOptions::new("xcdl", "0.0.1")
        .with_timestamps_folder(&env.timestamps_folder);
    let mut checker = UpdateChecker::new(options, interactive_environment())
        .unwrap()
        .with_lookup(lookup.clone())
        .with_notification_sink(RecordingSink::new());

    checker.initiate_version_retrieval().await;
    checker.notify_if_update_is_available().await;

    assert_eq!(lookup.calls(), 1);
    assert!(env.timestamps_folder.join("xcdl-update-check").exists());
}

#[tokio::test]
async fn test_scoped_package_marker_is_created() {
    let env = TestEnvironment::new().unwrap();
    let options = UpdateCheckerOptions::new("@xpack/xpm", "0.0.1")
        .with_timestamps_folder(&env.timestamps_folder);
    let mut checker = UpdateChecker::new(options, interactive_environment())
        .unwrap()
        .with_lookup(StaticLookup::new("0.0.1"));

    checker.initiate_version_retrieval().await;
    checker.notify_if_update_is_available().await;

    assert!(env.timestamps_folder.join("@xpack").join("xpm-update-check").exists());
}

#[tokio::test]
async fn test_slow_lookup_overlaps_host_work() {
    let env = TestEnvironment::new().unwrap();
    let lookup = StaticLookup::new("1.0.0").with_delay(Duration::from_millis(50));
    let sink = RecordingSink::new();
    let mut checker = env
        .checker()
        .unwrap()
        .with_lookup(lookup)
        .with_notification_sink(sink.clone());

    checker.initiate_version_retrieval().await;
    assert!(sink.messages().is_empty());

    tokio::time::sleep(Duration::from_millis(10)).await;
    checker.notify_if_update_is_available().await;

    assert_eq!(sink.messages().len(), 1);
}
