use super::*;

#[test]
fn test_write_and_read() {
    let log = LogCore::new(LogLevel::Debug, LogLevel::Emergency);

    test_log!(log, LogLevel::Info, "tcdtne: Loading");

    assert_eq!(log._log_len(), 1);
    let entry = log._read_log().unwrap();
    assert_eq!(entry.message(), "tcdtne: Loading");
    assert_eq!(entry.level(), LogLevel::Info);
    assert_eq!(log._log_len(), 0);
}

#[test]
fn test_format_arguments() {
    let log = LogCore::new(LogLevel::Debug, LogLevel::Emergency);

    test_log!(log, LogLevel::Debug, "pos={} count={}", 7, 12);
    test_log!(log, LogLevel::Debug, "dev={:#x}", 0xf00000);

    assert_eq!(log._read_log().unwrap().message(), "pos=7 count=12");
    assert_eq!(log._read_log().unwrap().message(), "dev=0xf00000");
}

#[test]
fn test_fifo_order() {
    let log = LogCore::new(LogLevel::Debug, LogLevel::Emergency);

    for i in 0..5 {
        test_log!(log, LogLevel::Debug, "chunk {}", i);
    }

    for i in 0..5 {
        let expected = alloc::format!("chunk {}", i);
        assert_eq!(log._read_log().unwrap().message(), expected.as_str());
    }
    assert!(log._read_log().is_none());
}

#[test]
fn test_unregistered_context_defaults_to_zero() {
    let log = LogCore::new(LogLevel::Debug, LogLevel::Emergency);

    test_log!(log, LogLevel::Info, "ctx");

    let entry = log._read_log().unwrap();
    assert_eq!(entry.cpu_id(), 0);
    assert_eq!(entry.task_id(), 0);
    assert_eq!(entry.timestamp(), 0);
}
