//! 设备注册接口的 Mock 实现

use alloc::string::{String, ToString};
use alloc::sync::Arc;
use alloc::vec::Vec;

use sync::SpinLock;
use vfs::{ClassId, DeviceRegistry, FileOperations, FsError, makedev};

/// 可注入失败的注册步骤
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailAt {
    /// `alloc_chrdev_region`
    AllocRegion,
    /// `cdev_add`
    CdevAdd,
    /// `class_create`
    ClassCreate,
    /// `device_create`
    DeviceCreate,
}

/// 一次注册接口调用
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RegistryCall {
    AllocRegion {
        baseminor: u32,
        count: u32,
        name: String,
    },
    UnregisterRegion {
        dev: u64,
        count: u32,
    },
    CdevAdd {
        dev: u64,
        count: u32,
    },
    CdevDel {
        dev: u64,
        count: u32,
    },
    ClassCreate {
        name: String,
    },
    ClassDestroy(ClassId),
    DeviceCreate {
        class: ClassId,
        dev: u64,
        name: String,
    },
    DeviceDestroy {
        class: ClassId,
        dev: u64,
    },
}

impl RegistryCall {
    /// 是否为撤销类调用
    pub fn is_release(&self) -> bool {
        matches!(
            self,
            RegistryCall::UnregisterRegion { .. }
                | RegistryCall::CdevDel { .. }
                | RegistryCall::ClassDestroy(_)
                | RegistryCall::DeviceDestroy { .. }
        )
    }
}

/// Mock 的设备注册表
///
/// 按顺序记录所有调用。分配出的设备号固定为 `major:baseminor`，
/// 设备类句柄从 1 开始递增。
pub struct MockDeviceRegistry {
    major: u32,
    fail: Option<(FailAt, FsError)>,
    calls: SpinLock<Vec<RegistryCall>>,
    bound: SpinLock<Option<Arc<dyn FileOperations>>>,
    next_class: SpinLock<u32>,
    live: SpinLock<usize>,
}

impl Default for MockDeviceRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl MockDeviceRegistry {
    /// 所有调用都成功，分配 major 254
    pub fn new() -> Self {
        Self::with_major(254)
    }

    /// 所有调用都成功，分配指定的 major
    pub fn with_major(major: u32) -> Self {
        Self {
            major,
            fail: None,
            calls: SpinLock::new(Vec::new()),
            bound: SpinLock::new(None),
            next_class: SpinLock::new(1),
            live: SpinLock::new(0),
        }
    }

    /// 在 `step` 处返回 `err`，其余调用成功
    pub fn failing(step: FailAt, err: FsError) -> Self {
        Self {
            fail: Some((step, err)),
            ..Self::new()
        }
    }

    /// 到目前为止的全部调用
    pub fn calls(&self) -> Vec<RegistryCall> {
        self.calls.lock().clone()
    }

    /// 已获取但尚未撤销的资源数
    pub fn live(&self) -> usize {
        *self.live.lock()
    }

    /// 最近一次 `cdev_add` 绑定且尚未解除的操作表
    pub fn bound_ops(&self) -> Option<Arc<dyn FileOperations>> {
        self.bound.lock().clone()
    }

    fn record(&self, call: RegistryCall) {
        let release = call.is_release();
        self.calls.lock().push(call);
        let mut live = self.live.lock();
        if release {
            *live = live.saturating_sub(1);
        }
    }

    fn acquire(&self, step: FailAt) -> Result<(), FsError> {
        match self.fail {
            Some((at, err)) if at == step => Err(err),
            _ => {
                *self.live.lock() += 1;
                Ok(())
            }
        }
    }
}

impl DeviceRegistry for MockDeviceRegistry {
    fn alloc_chrdev_region(
        &self,
        baseminor: u32,
        count: u32,
        name: &str,
    ) -> Result<u64, FsError> {
        self.record(RegistryCall::AllocRegion {
            baseminor,
            count,
            name: name.to_string(),
        });
        self.acquire(FailAt::AllocRegion)?;
        Ok(makedev(self.major, baseminor))
    }

    fn unregister_chrdev_region(&self, dev: u64, count: u32) {
        self.record(RegistryCall::UnregisterRegion { dev, count });
    }

    fn cdev_add(
        &self,
        dev: u64,
        count: u32,
        ops: Arc<dyn FileOperations>,
    ) -> Result<(), FsError> {
        self.record(RegistryCall::CdevAdd { dev, count });
        self.acquire(FailAt::CdevAdd)?;
        *self.bound.lock() = Some(ops);
        Ok(())
    }

    fn cdev_del(&self, dev: u64, count: u32) {
        self.record(RegistryCall::CdevDel { dev, count });
        *self.bound.lock() = None;
    }

    fn class_create(&self, name: &str) -> Result<ClassId, FsError> {
        self.record(RegistryCall::ClassCreate {
            name: name.to_string(),
        });
        self.acquire(FailAt::ClassCreate)?;
        let mut next = self.next_class.lock();
        let id = ClassId::new(*next);
        *next += 1;
        Ok(id)
    }

    fn class_destroy(&self, class: ClassId) {
        self.record(RegistryCall::ClassDestroy(class));
    }

    fn device_create(&self, class: ClassId, dev: u64, name: &str) -> Result<(), FsError> {
        self.record(RegistryCall::DeviceCreate {
            class,
            dev,
            name: name.to_string(),
        });
        self.acquire(FailAt::DeviceCreate)
    }

    fn device_destroy(&self, class: ClassId, dev: u64) {
        self.record(RegistryCall::DeviceDestroy { class, dev });
    }
}
