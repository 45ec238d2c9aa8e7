//! 设备注册与注销
//!
//! 初始化依次完成四个步骤，每一步产生一个守卫对象，守卫析构时执行对应的逆操作：
//!
//! | 步骤 | 注册                  | 守卫             | 逆操作                      |
//! |------|-----------------------|------------------|-----------------------------|
//! | 1    | `alloc_chrdev_region` | [`ChrdevRegion`] | `unregister_chrdev_region`  |
//! | 2    | `cdev_add`            | [`CdevBinding`]  | `cdev_del`                  |
//! | 3    | `class_create`        | [`DeviceClass`]  | `class_destroy`             |
//! | 4    | `device_create`       | [`DeviceNode`]   | `device_destroy`            |
//!
//! 第 k 步失败时，`?` 提前返回，已创建的守卫按与创建相反的顺序析构，
//! 恰好撤销第 k-1 到第 1 步。全部成功后守卫移入 [`DeviceHandle`]，
//! 其字段顺序保证注销同样按 4、3、2、1 的顺序进行。

use alloc::format;
use alloc::string::String;
use alloc::sync::Arc;

use vfs::{ClassId, DEV_ROOT, DeviceRegistry, FileOperations, FsError, major, minor};

use crate::config::{BASE_MINOR, CLASS_NAME, DEVICE_NAME, MINOR_COUNT};
use crate::{LifecycleError, PeriodicStream};

/// 已分配的设备号区间
pub struct ChrdevRegion {
    registry: Arc<dyn DeviceRegistry>,
    dev: u64,
    count: u32,
}

impl ChrdevRegion {
    fn alloc(registry: &Arc<dyn DeviceRegistry>) -> Result<Self, LifecycleError> {
        let dev = registry
            .alloc_chrdev_region(BASE_MINOR, MINOR_COUNT, DEVICE_NAME)
            .map_err(|err| {
                log::warn!(
                    "Failed to alloc_chrdev_region with error code {}",
                    err.to_errno()
                );
                match err {
                    FsError::DeviceBusy => LifecycleError::IdentityExhausted,
                    err => LifecycleError::IdentityAllocation(err),
                }
            })?;
        log::debug!("Allocated device number {}:{}", major(dev), minor(dev));

        Ok(Self {
            registry: registry.clone(),
            dev,
            count: MINOR_COUNT,
        })
    }
}

impl Drop for ChrdevRegion {
    fn drop(&mut self) {
        self.registry.unregister_chrdev_region(self.dev, self.count);
    }
}

/// 设备号到操作表的绑定
pub struct CdevBinding {
    registry: Arc<dyn DeviceRegistry>,
    dev: u64,
    count: u32,
}

impl CdevBinding {
    fn add(region: &ChrdevRegion, ops: Arc<dyn FileOperations>) -> Result<Self, LifecycleError> {
        region
            .registry
            .cdev_add(region.dev, region.count, ops)
            .map_err(|err| {
                log::warn!("Failed to cdev_add with error code {}", err.to_errno());
                LifecycleError::BindingFailed(err)
            })?;

        Ok(Self {
            registry: region.registry.clone(),
            dev: region.dev,
            count: region.count,
        })
    }
}

impl Drop for CdevBinding {
    fn drop(&mut self) {
        self.registry.cdev_del(self.dev, self.count);
    }
}

/// 设备类
pub struct DeviceClass {
    registry: Arc<dyn DeviceRegistry>,
    id: ClassId,
}

impl DeviceClass {
    fn create(registry: &Arc<dyn DeviceRegistry>) -> Result<Self, LifecycleError> {
        let id = registry.class_create(CLASS_NAME).map_err(|err| {
            log::warn!("Failed to class_create");
            LifecycleError::ClassCreationFailed(err)
        })?;

        Ok(Self {
            registry: registry.clone(),
            id,
        })
    }
}

impl Drop for DeviceClass {
    fn drop(&mut self) {
        self.registry.class_destroy(self.id);
    }
}

/// 设备类下的设备节点
pub struct DeviceNode {
    registry: Arc<dyn DeviceRegistry>,
    class: ClassId,
    dev: u64,
}

impl DeviceNode {
    fn create(class: &DeviceClass, dev: u64) -> Result<Self, LifecycleError> {
        class
            .registry
            .device_create(class.id, dev, DEVICE_NAME)
            .map_err(|err| {
                log::warn!("Failed to device_create");
                LifecycleError::NodeCreationFailed(err)
            })?;

        Ok(Self {
            registry: class.registry.clone(),
            class: class.id,
            dev,
        })
    }
}

impl Drop for DeviceNode {
    fn drop(&mut self) {
        self.registry.device_destroy(self.class, self.dev);
    }
}

/// 已注册的设备
///
/// 持有全部四项注册资源。不可复制；[`DeviceHandle::teardown`] 或析构时
/// 注销全部资源。
pub struct DeviceHandle {
    // 字段按声明顺序析构
    node: DeviceNode,
    class: DeviceClass,
    binding: CdevBinding,
    region: ChrdevRegion,
}

impl DeviceHandle {
    /// 注册设备并把 `stream` 安装为节点的操作表
    ///
    /// 任一步失败时，之前完成的步骤按相反顺序撤销后返回该步的错误。
    pub fn initialize(
        registry: Arc<dyn DeviceRegistry>,
        stream: PeriodicStream,
    ) -> Result<Self, LifecycleError> {
        let region = ChrdevRegion::alloc(&registry)?;
        let binding = CdevBinding::add(&region, Arc::new(stream))?;
        let class = DeviceClass::create(&registry)?;
        let node = DeviceNode::create(&class, region.dev)?;

        Ok(Self {
            node,
            class,
            binding,
            region,
        })
    }

    /// 设备号
    pub fn dev(&self) -> u64 {
        self.region.dev
    }

    /// 设备类句柄
    pub fn class(&self) -> ClassId {
        self.class.id
    }

    /// 已绑定的次设备号个数
    pub fn count(&self) -> u32 {
        self.binding.count
    }

    /// 节点路径，即 `/dev/tcdtne`
    pub fn node_path(&self) -> String {
        format!("{}/{}", DEV_ROOT, DEVICE_NAME)
    }

    /// 注销设备：销毁节点、设备类，解除绑定，释放设备号
    pub fn teardown(self) {
        log::debug!(
            "Tearing down {}:{} (node class {})",
            major(self.node.dev),
            minor(self.node.dev),
            self.node.class.raw()
        );
        drop(self);
    }
}
