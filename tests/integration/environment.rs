use serial_test::serial;
use update_checker::EnvironmentSnapshot;
use update_checker::test_utils::{StaticLookup, TestEnvironment};

const SUPPRESS_VAR: &str = "NO_XPM_UPDATE_NOTIFIER";

#[tokio::test]
#[serial]
async fn test_suppress_variable_in_process_environment() {
    let previous = std::env::var(SUPPRESS_VAR).ok();
    unsafe {
        std::env::set_var(SUPPRESS_VAR, "true");
    }

    // Force the interactive flags so only the variable decides.
    let environment = EnvironmentSnapshot::detect().ci(false).tty(true).running_as_root(false);

    match previous {
        Some(value) => unsafe { std::env::set_var(SUPPRESS_VAR, value) },
        None => unsafe { std::env::remove_var(SUPPRESS_VAR) },
    }

    assert!(environment.has_var(SUPPRESS_VAR));

    let env = TestEnvironment::new().unwrap();
    let lookup = StaticLookup::new("1.0.0");
    let mut checker = env.checker_with(environment).unwrap().with_lookup(lookup.clone());

    checker.initiate_version_retrieval().await;
    checker.notify_if_update_is_available().await;

    assert_eq!(lookup.calls(), 0);
    assert!(!env.marker_exists());
}

#[tokio::test]
#[serial]
async fn test_snapshot_is_not_reevaluated() {
    let previous = std::env::var(SUPPRESS_VAR).ok();
    unsafe {
        std::env::remove_var(SUPPRESS_VAR);
    }

    let environment = EnvironmentSnapshot::detect().ci(false).tty(true).running_as_root(false);
    let env = TestEnvironment::new().unwrap();
    let lookup = StaticLookup::new("1.0.0");
    let mut checker = env.checker_with(environment).unwrap().with_lookup(lookup.clone());

    // Set after construction: the checker keeps what it saw at creation.
    unsafe {
        std::env::set_var(SUPPRESS_VAR, "1");
    }

    checker.initiate_version_retrieval().await;
    checker.notify_if_update_is_available().await;

    match previous {
        Some(value) => unsafe { std::env::set_var(SUPPRESS_VAR, value) },
        None => unsafe { std::env::remove_var(SUPPRESS_VAR) },
    }

    assert_eq!(lookup.calls(), 1);
}
