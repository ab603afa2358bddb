//! Logging configuration tests

use task_lingo::infrastructure::config::Logging;

fn with_level(level: &str) -> Logging {
    Logging {
        level: level.to_string(),
        ..Logging::default()
    }
}

#[test]
fn test_log_level_parsing() {
    assert_eq!(with_level("DEBUG").filter_level(), "debug");
    assert_eq!(with_level("INFO").filter_level(), "info");
    assert_eq!(with_level("WARN").filter_level(), "warn");
    assert_eq!(with_level("ERROR").filter_level(), "error");
}

#[test]
fn test_unknown_level_falls_back_to_warn() {
    assert_eq!(with_level("verbose").filter_level(), "warn");
    assert_eq!(with_level("debug").filter_level(), "warn");
}

#[test]
fn test_log_level_default() {
    let logging = Logging::default();

    assert!(logging.enable);
    assert!(logging.path.is_none());
    assert_eq!(logging.level, "INFO");
    assert_eq!(logging.filter_level(), "info");
}
