//! 模块入口

use alloc::string::String;
use alloc::sync::Arc;

use vfs::{CHRDEV_REGISTRY, DeviceRegistry};

use crate::{DeviceHandle, LifecycleError, PeriodicStream};

/// 已加载的模块
///
/// 加载成功即持有设备；析构即卸载。
pub struct TcdtneModule {
    /// 只在析构时取出
    device: Option<DeviceHandle>,
    dev: u64,
    node_path: String,
}

impl TcdtneModule {
    /// 模块名
    pub const NAME: &'static str = "tcdtne";
    /// 作者
    pub const AUTHOR: &'static str = "Aaron Rumpler";
    /// 描述
    pub const DESCRIPTION: &'static str = "The Character Device That Never Ends";
    /// 许可证
    pub const LICENSE: &'static str = "GPL";

    /// 加载模块：注册设备并创建 `/dev/tcdtne`
    ///
    /// 失败时所有已完成的注册都已撤销，调用者应拒绝加载该模块。
    pub fn init(registry: Arc<dyn DeviceRegistry>) -> Result<Self, LifecycleError> {
        log::info!("Loading");

        match DeviceHandle::initialize(registry, PeriodicStream::default()) {
            Ok(device) => {
                log::info!("Loaded");
                Ok(Self {
                    dev: device.dev(),
                    node_path: device.node_path(),
                    device: Some(device),
                })
            }
            Err(err) => {
                log::warn!("Failed to load: {}", err);
                Err(err)
            }
        }
    }

    /// 加载到全局字符设备注册表
    pub fn load() -> Result<Self, LifecycleError> {
        Self::init(CHRDEV_REGISTRY.clone())
    }

    /// 设备号
    pub fn dev(&self) -> u64 {
        self.dev
    }

    /// 设备节点路径
    pub fn node_path(&self) -> &str {
        &self.node_path
    }

    /// 卸载模块
    pub fn exit(self) {
        drop(self);
    }
}

impl Drop for TcdtneModule {
    fn drop(&mut self) {
        if let Some(device) = self.device.take() {
            device.teardown();
        }
        log::info!("Exiting");
    }
}
