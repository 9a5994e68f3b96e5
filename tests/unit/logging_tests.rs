// Logging initialization tests

use transform_url::logging::{init_subscriber, LogFormat};

#[test]
fn test_subscriber_installs_once() {
    // Another test in this binary may have installed it already
    let _ = init_subscriber(LogFormat::Text);

    assert!(init_subscriber(LogFormat::Json).is_err());
    tracing::info!(format = ?LogFormat::Json, "Logging initialized");
}

#[test]
fn test_default_format_is_text() {
    assert_eq!(LogFormat::default(), LogFormat::Text);
}
