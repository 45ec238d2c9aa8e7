use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use vfs::{
    CharDevRegistry, CharDeviceFile, DeviceRegistry, FileContext, FileOperations, FsError,
    OpenFlags, SeekWhence, UserBuffer, chrdev_major, major, makedev, minor,
};

/// 每次读取返回一个固定字节，记录 open/release 次数
#[derive(Default)]
struct Fill {
    byte: u8,
    opened: AtomicUsize,
    released: AtomicUsize,
}

impl FileOperations for Fill {
    fn open(&self, _file: &FileContext) -> Result<(), FsError> {
        self.opened.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    fn release(&self, _file: &FileContext) {
        self.released.fetch_add(1, Ordering::SeqCst);
    }

    fn read(
        &self,
        _file: &FileContext,
        buf: &mut dyn UserBuffer,
        count: usize,
        pos: &mut i64,
    ) -> Result<usize, FsError> {
        for i in 0..count {
            buf.copy_to_user(i, &[self.byte])?;
        }
        *pos += count as i64;
        Ok(count)
    }

    fn llseek(
        &self,
        _file: &FileContext,
        pos: i64,
        offset: i64,
        whence: SeekWhence,
    ) -> Result<i64, FsError> {
        match whence {
            SeekWhence::Set => Ok(offset),
            SeekWhence::Cur => Ok(pos + offset),
            _ => Err(FsError::InvalidArgument),
        }
    }
}

fn fill(byte: u8) -> Arc<Fill> {
    Arc::new(Fill {
        byte,
        ..Default::default()
    })
}

/// 在新注册表上完成一整套注册，返回设备号与类句柄
fn setup(reg: &CharDevRegistry, ops: Arc<Fill>, name: &str) -> (u64, vfs::ClassId) {
    let dev = reg.alloc_chrdev_region(0, 1, name).unwrap();
    reg.cdev_add(dev, 1, ops).unwrap();
    let class = reg.class_create(name).unwrap();
    reg.device_create(class, dev, name).unwrap();
    (dev, class)
}

#[test]
fn test_alloc_starts_at_254() {
    let reg = CharDevRegistry::new();
    let dev = reg.alloc_chrdev_region(0, 1, "a").unwrap();
    assert_eq!(major(dev), 254);
    assert_eq!(minor(dev), 0);

    let dev = reg.alloc_chrdev_region(3, 2, "b").unwrap();
    assert_eq!(major(dev), 253);
    assert_eq!(minor(dev), 3);
}

#[test]
fn test_alloc_reuses_freed_major() {
    let reg = CharDevRegistry::new();
    let first = reg.alloc_chrdev_region(0, 1, "a").unwrap();
    let _second = reg.alloc_chrdev_region(0, 1, "b").unwrap();

    reg.unregister_chrdev_region(first, 1);
    let again = reg.alloc_chrdev_region(0, 1, "c").unwrap();
    assert_eq!(major(again), 254);
}

#[test]
fn test_alloc_falls_back_to_extended_range() {
    let reg = CharDevRegistry::new();
    for _ in 234..=254 {
        reg.alloc_chrdev_region(0, 1, "fill").unwrap();
    }
    let dev = reg.alloc_chrdev_region(0, 1, "ext").unwrap();
    assert_eq!(major(dev), 511);
}

#[test]
fn test_alloc_exhausted_is_busy() {
    let reg = CharDevRegistry::new();
    let total = vfs::dynamic_majors().count();
    for _ in 0..total {
        reg.alloc_chrdev_region(0, 1, "fill").unwrap();
    }
    assert_eq!(
        reg.alloc_chrdev_region(0, 1, "late"),
        Err(FsError::DeviceBusy)
    );
    assert_eq!(FsError::DeviceBusy.to_errno(), -16);
}

#[test]
fn test_alloc_rejects_zero_count() {
    let reg = CharDevRegistry::new();
    assert_eq!(
        reg.alloc_chrdev_region(0, 0, "zero"),
        Err(FsError::InvalidArgument)
    );
    assert!(reg.stats().is_empty());
}

#[test]
fn test_register_static_region() {
    let reg = CharDevRegistry::new();
    let first = makedev(chrdev_major::MISC, 0);
    reg.register_chrdev_region(first, 4, "misc").unwrap();
    assert_eq!(reg.region_name(makedev(chrdev_major::MISC, 3)), Some("misc".into()));
    assert_eq!(reg.region_name(makedev(chrdev_major::MISC, 4)), None);

    assert_eq!(
        reg.register_chrdev_region(makedev(chrdev_major::MISC, 2), 1, "other"),
        Err(FsError::DeviceBusy)
    );
    reg.register_chrdev_region(makedev(chrdev_major::MISC, 4), 1, "next")
        .unwrap();
}

#[test]
fn test_cdev_overlap_is_busy() {
    let reg = CharDevRegistry::new();
    let dev = reg.alloc_chrdev_region(0, 4, "x").unwrap();
    reg.cdev_add(dev, 2, fill(b'x')).unwrap();
    assert_eq!(
        reg.cdev_add(makedev(major(dev), 1), 1, fill(b'y')),
        Err(FsError::DeviceBusy)
    );
    reg.cdev_add(makedev(major(dev), 2), 2, fill(b'y')).unwrap();
}

#[test]
fn test_class_and_node_names_are_unique() {
    let reg = CharDevRegistry::new();
    let class = reg.class_create("c").unwrap();
    assert_eq!(reg.class_create("c"), Err(FsError::AlreadyExists));

    reg.device_create(class, makedev(200, 0), "n").unwrap();
    assert_eq!(
        reg.device_create(class, makedev(200, 1), "n"),
        Err(FsError::AlreadyExists)
    );
    assert_eq!(reg.lookup_node("/dev/n"), Some(makedev(200, 0)));
}

#[test]
fn test_device_create_unknown_class() {
    let reg = CharDevRegistry::new();
    let class = reg.class_create("gone").unwrap();
    reg.class_destroy(class);
    assert_eq!(
        reg.device_create(class, makedev(200, 0), "n"),
        Err(FsError::NoDevice)
    );
    assert!(!reg.has_class("gone"));
}

#[test]
fn test_class_destroy_removes_leftover_nodes() {
    let reg = CharDevRegistry::new();
    let class = reg.class_create("c").unwrap();
    reg.device_create(class, makedev(200, 0), "a").unwrap();
    reg.device_create(class, makedev(200, 1), "b").unwrap();
    assert_eq!(reg.nodes(), vec!["/dev/a", "/dev/b"]);

    reg.class_destroy(class);
    assert!(reg.nodes().is_empty());
}

#[test]
fn test_open_and_read() {
    let reg = CharDevRegistry::new();
    let ops = fill(b'z');
    setup(&reg, ops.clone(), "zero");

    let file = reg.open("/dev/zero", OpenFlags::O_RDONLY).unwrap();
    let mut buf = [0u8; 5];
    assert_eq!(file.read(&mut buf).unwrap(), 5);
    assert_eq!(&buf, b"zzzzz");
    assert_eq!(file.offset(), 5);
    assert_eq!(ops.opened.load(Ordering::SeqCst), 1);

    drop(file);
    assert_eq!(ops.released.load(Ordering::SeqCst), 1);
}

#[test]
fn test_open_missing_node() {
    let reg = CharDevRegistry::new();
    assert_eq!(
        reg.open("/dev/nothing", OpenFlags::O_RDONLY).err(),
        Some(FsError::NotFound)
    );
}

#[test]
fn test_open_unbound_node_is_enxio() {
    let reg = CharDevRegistry::new();
    let dev = reg.alloc_chrdev_region(0, 1, "u").unwrap();
    let class = reg.class_create("u").unwrap();
    reg.device_create(class, dev, "u").unwrap();

    let err = reg.open("/dev/u", OpenFlags::O_RDONLY).err();
    assert_eq!(err, Some(FsError::NoSuchDeviceOrAddress));
    assert_eq!(FsError::NoSuchDeviceOrAddress.to_errno(), -6);
}

#[test]
fn test_offsets_are_per_open() {
    let reg = CharDevRegistry::new();
    setup(&reg, fill(b'q'), "q");

    let a = reg.open("/dev/q", OpenFlags::O_RDONLY).unwrap();
    let b = reg.open("/dev/q", OpenFlags::O_RDONLY).unwrap();
    let mut buf = [0u8; 3];
    a.read(&mut buf).unwrap();
    a.read(&mut buf).unwrap();
    b.read(&mut buf).unwrap();
    assert_eq!(a.offset(), 6);
    assert_eq!(b.offset(), 3);
}

#[test]
fn test_lseek_failure_keeps_offset() {
    let reg = CharDevRegistry::new();
    setup(&reg, fill(b'q'), "q");

    let file = reg.open("/dev/q", OpenFlags::O_RDONLY).unwrap();
    assert_eq!(file.lseek(10, SeekWhence::Set).unwrap(), 10);
    assert_eq!(
        file.lseek(0, SeekWhence::End),
        Err(FsError::InvalidArgument)
    );
    assert_eq!(file.offset(), 10);
}

#[test]
fn test_write_default_and_access_mode() {
    let reg = CharDevRegistry::new();
    setup(&reg, fill(b'w'), "w");

    let ro = reg.open("/dev/w", OpenFlags::O_RDONLY).unwrap();
    assert_eq!(ro.write(b"hi"), Err(FsError::BadFileDescriptor));

    let rw = reg.open("/dev/w", OpenFlags::O_RDWR).unwrap();
    assert_eq!(rw.write(b"hi"), Err(FsError::InvalidArgument));
    assert_eq!(rw.offset(), 0);

    let wo = reg.open("/dev/w", OpenFlags::O_WRONLY).unwrap();
    let mut buf = [0u8; 1];
    assert_eq!(wo.read(&mut buf), Err(FsError::BadFileDescriptor));
}

#[test]
fn test_read_at_keeps_offset() {
    let reg = CharDevRegistry::new();
    setup(&reg, fill(b'p'), "p");

    let file = reg.open("/dev/p", OpenFlags::O_RDONLY).unwrap();
    let mut buf = [0u8; 4];
    assert_eq!(file.read_at(100, &mut buf).unwrap(), 4);
    assert_eq!(file.offset(), 0);
    assert_eq!(file.read_at(-1, &mut buf), Err(FsError::InvalidArgument));
}

#[test]
fn test_full_teardown_leaves_registry_empty() {
    let reg = CharDevRegistry::new();
    let (dev, class) = setup(&reg, fill(b'e'), "e");
    assert_eq!(
        reg.stats(),
        vfs::RegistryStats {
            regions: 1,
            cdevs: 1,
            classes: 1,
            nodes: 1,
        }
    );

    reg.device_destroy(class, dev);
    reg.class_destroy(class);
    reg.cdev_del(dev, 1);
    reg.unregister_chrdev_region(dev, 1);
    assert!(reg.stats().is_empty());
    assert_eq!(
        reg.open("/dev/e", OpenFlags::O_RDONLY).err(),
        Some(FsError::NotFound)
    );
}

#[test]
fn test_open_file_outlives_cdev_del() {
    let reg = CharDevRegistry::new();
    let (dev, _class) = setup(&reg, fill(b'k'), "k");

    let file = reg.open("/dev/k", OpenFlags::O_RDONLY).unwrap();
    reg.cdev_del(dev, 1);
    let mut buf = [0u8; 2];
    assert_eq!(file.read(&mut buf).unwrap(), 2);
    let chr = file.as_any().downcast_ref::<CharDeviceFile>().unwrap();
    assert_eq!(chr.dev(), dev);
    assert_eq!(chr.context().flags, OpenFlags::O_RDONLY);
    assert_eq!(chr.context().dev, dev);
}

#[test]
fn test_each_open_gets_its_own_context() {
    let reg = CharDevRegistry::new();
    let (dev, _class) = setup(&reg, fill(b'c'), "c");

    let a = reg.open("/dev/c", OpenFlags::O_RDONLY).unwrap();
    let b = reg.open("/dev/c", OpenFlags::O_RDWR).unwrap();
    let a = a.as_any().downcast_ref::<CharDeviceFile>().unwrap();
    let b = b.as_any().downcast_ref::<CharDeviceFile>().unwrap();

    assert_eq!(a.dev(), b.dev());
    assert_eq!(a.dev(), dev);
    assert_ne!(a.context().id, b.context().id);
    assert_eq!(b.context().flags, OpenFlags::O_RDWR);
}

#[test]
fn test_cdev_add_requires_region() {
    let reg = CharDevRegistry::new();
    assert_eq!(
        reg.cdev_add(makedev(240, 0), 1, fill(b'n')),
        Err(FsError::DeviceBusy)
    );

    let dev = reg.alloc_chrdev_region(0, 1, "one").unwrap();
    assert_eq!(
        reg.cdev_add(dev, 2, fill(b'n')),
        Err(FsError::DeviceBusy)
    );
    reg.cdev_add(dev, 1, fill(b'n')).unwrap();
}
