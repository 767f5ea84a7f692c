use daynote_sync::config::LoggingConfig;
use daynote_sync::logger::{build_dispatch, LogBuffer};

#[test]
fn test_log_buffer_newest_first() {
    let buffer = LogBuffer::new();
    buffer.log("first".to_string());
    buffer.log("second".to_string());

    assert_eq!(buffer.get_logs(), vec!["second".to_string(), "first".to_string()]);

    buffer.clear();
    assert!(buffer.get_logs().is_empty());
}

#[test]
fn test_log_buffer_drops_oldest_when_full() {
    let buffer = LogBuffer::with_capacity(2);
    for i in 0..5 {
        buffer.log(format!("line {i}"));
    }

    assert_eq!(buffer.get_logs(), vec!["line 4".to_string(), "line 3".to_string()]);
}

#[test]
fn test_clones_share_entries() {
    let buffer = LogBuffer::new();
    buffer.clone().log("from clone".to_string());
    assert_eq!(buffer.get_logs().len(), 1);
}

#[test]
fn test_dispatch_records_into_buffer() {
    let config = LoggingConfig {
        enabled: true,
        level: "debug".to_string(),
        log_to_file: false,
    };
    let buffer = LogBuffer::new();
    let (_, logger) = build_dispatch(&config, buffer.clone()).unwrap().into_log();

    logger.log(
        &log::Record::builder()
            .args(format_args!("phase done"))
            .level(log::Level::Info)
            .target("daynote_sync::sync")
            .build(),
    );

    let logs = buffer.get_logs();
    assert_eq!(logs.len(), 1);
    assert!(logs[0].contains("INFO"));
    assert!(logs[0].contains("phase done"));
}

#[test]
fn test_disabled_logging_builds() {
    let config = LoggingConfig::default();
    let buffer = LogBuffer::new();
    assert!(build_dispatch(&config, buffer.clone()).is_ok());
    assert!(buffer.get_logs().is_empty());
}

#[test]
fn test_invalid_level_is_rejected() {
    let config = LoggingConfig {
        enabled: true,
        level: "loud".to_string(),
        log_to_file: false,
    };
    assert!(build_dispatch(&config, LogBuffer::new()).is_err());
}
