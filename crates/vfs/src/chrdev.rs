//! 字符设备注册表
//!
//! 宿主侧的字符设备管理，集中了四类资源：
//!
//! - 设备号区间（`alloc_chrdev_region` / `register_chrdev_region`）
//! - 设备号到驱动操作表的绑定（`cdev_add`）
//! - 设备类（`class_create`）
//! - 设备类下的设备节点（`device_create`），以 `/dev/<name>` 路径对外可见
//!
//! 注册与注销只在驱动初始化和卸载时发生，打开文件时只取读锁，
//! 数据传输路径完全不经过注册表。

use alloc::collections::BTreeMap;
use alloc::format;
use alloc::string::{String, ToString};
use alloc::sync::Arc;
use alloc::vec::Vec;
use core::sync::atomic::{AtomicU64, Ordering};

use lazy_static::lazy_static;
use sync::RwLock;

use crate::dev::{major, makedev, minor};
use crate::devno::{CHRDEV_MAJOR_MAX, MINORMASK, dynamic_majors};
use crate::{
    CharDeviceFile, ClassId, DeviceRegistry, File, FileContext, FileOperations, FsError, OpenFlags,
};

/// 设备节点所在目录
pub const DEV_ROOT: &str = "/dev";

/// 设备号区间
struct ChrdevRegion {
    major: u32,
    baseminor: u32,
    count: u32,
    name: String,
}

impl ChrdevRegion {
    fn overlaps(&self, major: u32, baseminor: u32, count: u32) -> bool {
        self.major == major
            && baseminor < self.baseminor + self.count
            && self.baseminor < baseminor + count
    }
}

/// 设备号区间到操作表的绑定
struct Cdev {
    dev: u64,
    count: u32,
    ops: Arc<dyn FileOperations>,
}

impl Cdev {
    fn contains(&self, dev: u64) -> bool {
        major(dev) == major(self.dev)
            && minor(dev) >= minor(self.dev)
            && minor(dev) - minor(self.dev) < self.count
    }
}

/// 设备类及其下的设备节点
struct Class {
    name: String,
    /// 设备号 -> 节点路径
    devices: BTreeMap<u64, String>,
}

#[derive(Default)]
struct ChrdevTables {
    regions: Vec<ChrdevRegion>,
    cdevs: Vec<Cdev>,
    classes: BTreeMap<ClassId, Class>,
    /// 节点路径 -> 设备号
    nodes: BTreeMap<String, u64>,
    next_class_id: u32,
}

/// 注册表中各类资源的数量
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RegistryStats {
    /// 已登记的设备号区间
    pub regions: usize,
    /// 已绑定的操作表
    pub cdevs: usize,
    /// 设备类
    pub classes: usize,
    /// 设备节点
    pub nodes: usize,
}

impl RegistryStats {
    /// 没有任何已注册资源
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

/// 字符设备注册表
pub struct CharDevRegistry {
    tables: RwLock<ChrdevTables>,
    next_file_id: AtomicU64,
}

impl Default for CharDevRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl CharDevRegistry {
    /// 创建空注册表
    pub fn new() -> Self {
        Self {
            tables: RwLock::new(ChrdevTables::default()),
            next_file_id: AtomicU64::new(1),
        }
    }

    /// 登记一个指定 major 的设备号区间
    pub fn register_chrdev_region(&self, first: u64, count: u32, name: &str) -> Result<(), FsError> {
        let (maj, baseminor) = (major(first), minor(first));
        Self::check_range(maj, baseminor, count)?;

        let mut tables = self.tables.write();
        if tables
            .regions
            .iter()
            .any(|r| r.overlaps(maj, baseminor, count))
        {
            log::warn!(
                "chrdev: region {}:{}+{} for {} is busy",
                maj,
                baseminor,
                count,
                name
            );
            return Err(FsError::DeviceBusy);
        }
        tables.regions.push(ChrdevRegion {
            major: maj,
            baseminor,
            count,
            name: name.to_string(),
        });
        Ok(())
    }

    /// 打开设备节点
    ///
    /// 节点不存在时返回 [`FsError::NotFound`]；节点存在但设备号没有绑定操作表时
    /// 返回 [`FsError::NoSuchDeviceOrAddress`]。
    pub fn open(&self, path: &str, flags: OpenFlags) -> Result<Arc<dyn File>, FsError> {
        let (dev, ops) = {
            let tables = self.tables.read();
            let dev = *tables.nodes.get(path).ok_or(FsError::NotFound)?;
            let cdev = tables
                .cdevs
                .iter()
                .find(|c| c.contains(dev))
                .ok_or(FsError::NoSuchDeviceOrAddress)?;
            (dev, cdev.ops.clone())
        };

        let ctx = FileContext {
            dev,
            flags,
            id: self.next_file_id.fetch_add(1, Ordering::Relaxed),
        };
        Ok(Arc::new(CharDeviceFile::open(ctx, ops)?))
    }

    /// 查找节点对应的设备号
    pub fn lookup_node(&self, path: &str) -> Option<u64> {
        self.tables.read().nodes.get(path).copied()
    }

    /// 所有节点路径，按字典序
    pub fn nodes(&self) -> Vec<String> {
        self.tables.read().nodes.keys().cloned().collect()
    }

    /// 是否存在指定名称的设备类
    pub fn has_class(&self, name: &str) -> bool {
        self.tables.read().classes.values().any(|c| c.name == name)
    }

    /// 持有区间 `dev` 的驱动名
    pub fn region_name(&self, dev: u64) -> Option<String> {
        let (maj, min) = (major(dev), minor(dev));
        self.tables
            .read()
            .regions
            .iter()
            .find(|r| r.overlaps(maj, min, 1))
            .map(|r| r.name.clone())
    }

    /// 各类资源的数量
    pub fn stats(&self) -> RegistryStats {
        let tables = self.tables.read();
        RegistryStats {
            regions: tables.regions.len(),
            cdevs: tables.cdevs.len(),
            classes: tables.classes.len(),
            nodes: tables.nodes.len(),
        }
    }

    fn check_range(maj: u32, baseminor: u32, count: u32) -> Result<(), FsError> {
        if maj == 0 || maj >= CHRDEV_MAJOR_MAX || count == 0 {
            return Err(FsError::InvalidArgument);
        }
        match baseminor.checked_add(count - 1) {
            Some(last) if last <= MINORMASK => Ok(()),
            _ => Err(FsError::InvalidArgument),
        }
    }
}

impl DeviceRegistry for CharDevRegistry {
    fn alloc_chrdev_region(
        &self,
        baseminor: u32,
        count: u32,
        name: &str,
    ) -> Result<u64, FsError> {
        let mut tables = self.tables.write();
        let maj = dynamic_majors()
            .find(|&m| tables.regions.iter().all(|r| r.major != m))
            .ok_or_else(|| {
                log::warn!("chrdev: no free dynamic major for {}", name);
                FsError::DeviceBusy
            })?;
        Self::check_range(maj, baseminor, count)?;

        tables.regions.push(ChrdevRegion {
            major: maj,
            baseminor,
            count,
            name: name.to_string(),
        });
        log::debug!("chrdev: allocated major {} for {}", maj, name);
        Ok(makedev(maj, baseminor))
    }

    fn unregister_chrdev_region(&self, dev: u64, count: u32) {
        let (maj, baseminor) = (major(dev), minor(dev));
        let mut tables = self.tables.write();
        let before = tables.regions.len();
        tables
            .regions
            .retain(|r| !(r.major == maj && r.baseminor == baseminor && r.count == count));
        if tables.regions.len() == before {
            log::warn!("chrdev: unregistering unknown region {}:{}+{}", maj, baseminor, count);
        }
    }

    fn cdev_add(
        &self,
        dev: u64,
        count: u32,
        ops: Arc<dyn FileOperations>,
    ) -> Result<(), FsError> {
        Self::check_range(major(dev), minor(dev), count)?;

        let mut tables = self.tables.write();
        let (maj, base) = (major(dev), minor(dev));
        let registered = tables.regions.iter().any(|r| {
            r.major == maj && base >= r.baseminor && base + count <= r.baseminor + r.count
        });
        if !registered {
            log::warn!("chrdev: cdev_add on unregistered range {}:{}+{}", maj, base, count);
            return Err(FsError::DeviceBusy);
        }
        let busy = tables.cdevs.iter().any(|c| {
            major(c.dev) == maj && base < minor(c.dev) + c.count && minor(c.dev) < base + count
        });
        if busy {
            return Err(FsError::DeviceBusy);
        }
        tables.cdevs.push(Cdev { dev, count, ops });
        Ok(())
    }

    fn cdev_del(&self, dev: u64, count: u32) {
        let mut tables = self.tables.write();
        tables.cdevs.retain(|c| !(c.dev == dev && c.count == count));
    }

    fn class_create(&self, name: &str) -> Result<ClassId, FsError> {
        if name.is_empty() {
            return Err(FsError::InvalidArgument);
        }

        let mut tables = self.tables.write();
        if tables.classes.values().any(|c| c.name == name) {
            return Err(FsError::AlreadyExists);
        }
        let id = ClassId::new(tables.next_class_id);
        tables.next_class_id += 1;
        tables.classes.insert(
            id,
            Class {
                name: name.to_string(),
                devices: BTreeMap::new(),
            },
        );
        Ok(id)
    }

    fn class_destroy(&self, class: ClassId) {
        let mut tables = self.tables.write();
        let Some(removed) = tables.classes.remove(&class) else {
            log::warn!("chrdev: destroying unknown class {}", class.raw());
            return;
        };
        if !removed.devices.is_empty() {
            log::warn!(
                "chrdev: class {} destroyed with {} device(s) left",
                removed.name,
                removed.devices.len()
            );
        }
        for path in removed.devices.values() {
            tables.nodes.remove(path);
        }
    }

    fn device_create(&self, class: ClassId, dev: u64, name: &str) -> Result<(), FsError> {
        if name.is_empty() {
            return Err(FsError::InvalidArgument);
        }
        let path = format!("{}/{}", DEV_ROOT, name);

        let mut tables = self.tables.write();
        if tables.nodes.contains_key(&path) {
            return Err(FsError::AlreadyExists);
        }
        let entry = tables.classes.get_mut(&class).ok_or(FsError::NoDevice)?;
        if entry.devices.contains_key(&dev) {
            return Err(FsError::AlreadyExists);
        }
        entry.devices.insert(dev, path.clone());
        log::debug!("chrdev: created {} ({}:{})", path, major(dev), minor(dev));
        tables.nodes.insert(path, dev);
        Ok(())
    }

    fn device_destroy(&self, class: ClassId, dev: u64) {
        let mut tables = self.tables.write();
        let path = tables
            .classes
            .get_mut(&class)
            .and_then(|c| c.devices.remove(&dev));
        match path {
            Some(path) => {
                tables.nodes.remove(&path);
            }
            None => log::warn!("chrdev: no device {}:{} to destroy", major(dev), minor(dev)),
        }
    }
}

lazy_static! {
    // NOTE: 写操作只发生在驱动加载/卸载阶段，运行时只有 open 的读操作
    /// 全局字符设备注册表
    pub static ref CHRDEV_REGISTRY: Arc<CharDevRegistry> = Arc::new(CharDevRegistry::new());
}
