//! End-to-end: load the module into a real registry and use `/dev/tcdtne` like a process would.

use std::sync::{Arc, Mutex, MutexGuard, Once};
use std::thread;

use klog::LogLevel;
use tcdtne::{LYRICS, TcdtneModule};
use vfs::{CharDevRegistry, File, FsError, OpenFlags, SeekWhence, major};

static INIT: Once = Once::new();

/// The klog buffer is shared by every test in this binary.
static SERIAL: Mutex<()> = Mutex::new(());

fn setup() -> MutexGuard<'static, ()> {
    let guard = SERIAL.lock().unwrap_or_else(|e| e.into_inner());
    INIT.call_once(|| {
        klog::init_logger(LogLevel::Debug).unwrap();
    });
    klog::set_global_level(LogLevel::Info);
    while klog::read_log().is_some() {}
    guard
}

fn drain_log() -> Vec<String> {
    let mut lines = Vec::new();
    while let Some(entry) = klog::read_log() {
        lines.push(entry.message().to_string());
    }
    lines
}

fn load() -> (Arc<CharDevRegistry>, TcdtneModule) {
    let registry = Arc::new(CharDevRegistry::new());
    let module = TcdtneModule::init(registry.clone()).unwrap();
    (registry, module)
}

fn open(registry: &CharDevRegistry) -> Arc<dyn File> {
    registry.open("/dev/tcdtne", OpenFlags::O_RDONLY).unwrap()
}

/// Expected bytes for reading `count` bytes starting at `position`.
fn expected(position: usize, count: usize) -> Vec<u8> {
    LYRICS
        .as_bytes()
        .iter()
        .copied()
        .cycle()
        .skip(position % LYRICS.len())
        .take(count)
        .collect()
}

#[test]
fn test_load_creates_node() {
    let _guard = setup();
    let (registry, module) = load();

    assert_eq!(module.node_path(), "/dev/tcdtne");
    assert_eq!(registry.lookup_node("/dev/tcdtne"), Some(module.dev()));
    assert!(registry.has_class("tcdtne"));
    assert_eq!(major(module.dev()), 254);

    let log = drain_log();
    assert!(log.iter().any(|l| l.ends_with("Loading")));
    assert!(log.iter().any(|l| l.ends_with("Loaded")));
}

#[test]
fn test_read_sequence_from_fresh_open() {
    let _guard = setup();
    let (registry, _module) = load();
    let file = open(&registry);

    let mut first = [0u8; 100];
    let mut second = [0u8; 400];
    assert_eq!(file.read(&mut first).unwrap(), 100);
    assert_eq!(file.read(&mut second).unwrap(), 400);
    assert_eq!(file.offset(), 500);

    assert_eq!(first.as_slice(), expected(0, 100));
    assert_eq!(second.as_slice(), expected(100, 400));
}

#[test]
fn test_seek_then_read() {
    let _guard = setup();
    let (registry, _module) = load();
    let file = open(&registry);

    assert_eq!(file.lseek(1000, SeekWhence::Set), Ok(1000));
    assert_eq!(file.lseek(-10, SeekWhence::Cur), Ok(990));
    let mut buf = [0u8; 20];
    file.read(&mut buf).unwrap();
    assert_eq!(buf.as_slice(), expected(990, 20));
}

#[test]
fn test_rejected_seeks_keep_position() {
    let _guard = setup();
    let (registry, _module) = load();
    let file = open(&registry);
    file.lseek(42, SeekWhence::Set).unwrap();

    assert_eq!(
        file.lseek(0, SeekWhence::End),
        Err(FsError::InvalidArgument)
    );
    assert_eq!(
        file.lseek(-43, SeekWhence::Cur),
        Err(FsError::InvalidArgument)
    );
    assert_eq!(file.offset(), 42);

    let log = drain_log();
    assert!(log.iter().any(|l| l.contains("Whence value of 2 not supported")));
    assert!(log.iter().any(|l| l.contains("Seek position of -1 is out of range")));
}

#[test]
fn test_write_is_rejected() {
    let _guard = setup();
    let (registry, _module) = load();
    let file = registry.open("/dev/tcdtne", OpenFlags::O_RDWR).unwrap();

    let err = file.write(b"the end").unwrap_err();
    assert_eq!(err, FsError::InvalidArgument);
    assert_eq!(err.to_errno(), -22);
    assert_eq!(file.offset(), 0);
}

#[test]
fn test_pread_leaves_position() {
    let _guard = setup();
    let (registry, _module) = load();
    let file = open(&registry);

    let mut buf = [0u8; 8];
    assert_eq!(file.read_at(LYRICS.len() as i64 + 5, &mut buf), Ok(8));
    assert_eq!(buf.as_slice(), expected(5, 8));
    assert_eq!(file.offset(), 0);
}

#[test]
fn test_handles_are_independent() {
    let _guard = setup();
    let (registry, _module) = load();

    let readers: Vec<_> = (0..2)
        .map(|_| {
            let file = open(&registry);
            thread::spawn(move || {
                let mut out = Vec::new();
                let mut buf = [0u8; 37];
                for _ in 0..20 {
                    let n = file.read(&mut buf).unwrap();
                    out.extend_from_slice(&buf[..n]);
                }
                (out, file.offset())
            })
        })
        .collect();

    for reader in readers {
        let (out, offset) = reader.join().unwrap();
        assert_eq!(offset, 37 * 20);
        assert_eq!(out, expected(0, 37 * 20));
    }
}

#[test]
fn test_unload_removes_node() {
    let _guard = setup();
    let (registry, module) = load();
    let file = open(&registry);

    module.exit();
    assert_eq!(registry.lookup_node("/dev/tcdtne"), None);
    assert!(!registry.has_class("tcdtne"));
    assert!(registry.stats().is_empty());
    assert_eq!(
        registry.open("/dev/tcdtne", OpenFlags::O_RDONLY).err(),
        Some(FsError::NotFound)
    );

    // 已打开的句柄仍然持有操作表
    let mut buf = [0u8; 4];
    assert_eq!(file.read(&mut buf), Ok(4));
    assert_eq!(&buf, b"This");

    assert!(drain_log().iter().any(|l| l.ends_with("Exiting")));
}

#[test]
fn test_reload_after_unload() {
    let _guard = setup();
    let registry = Arc::new(CharDevRegistry::new());

    let first = TcdtneModule::init(registry.clone()).unwrap();
    let dev = first.dev();
    drop(first);

    let second = TcdtneModule::init(registry.clone()).unwrap();
    assert_eq!(second.dev(), dev);
    let file = open(&registry);
    let mut buf = [0u8; 4];
    file.read(&mut buf).unwrap();
    assert_eq!(&buf, b"This");
}

#[test]
fn test_second_load_fails_cleanly() {
    let _guard = setup();
    let (registry, _module) = load();
    let before = registry.stats();

    let err = TcdtneModule::init(registry.clone()).err();
    assert_eq!(
        err,
        Some(tcdtne::LifecycleError::ClassCreationFailed(
            FsError::AlreadyExists
        ))
    );
    assert_eq!(registry.stats(), before);
    assert!(drain_log().iter().any(|l| l.contains("Failed to load")));
}
