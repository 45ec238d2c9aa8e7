//! 驱动与设备注册接口
//!
//! - [`FileOperations`]：字符设备驱动的操作表，由 [`crate::CharDeviceFile`] 调用。
//! - [`DeviceRegistry`]：驱动初始化时使用的注册接口（分配设备号、绑定操作表、
//!   创建设备类与设备节点，以及它们的逆操作）。
//!
//! 驱动只依赖这两个 trait，具体宿主实现为 [`crate::CharDevRegistry`]，
//! 测试中也可以替换为记录调用的 mock。

use alloc::sync::Arc;

use crate::{FsError, OpenFlags, SeekWhence, UserBuffer};

/// 打开文件时传给驱动的上下文
///
/// 每次 open 生成一个独立的上下文，文件偏移量不在其中，由宿主的文件对象持有。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FileContext {
    /// 打开的设备号
    pub dev: u64,
    /// 打开标志
    pub flags: OpenFlags,
    /// 打开实例编号，在同一宿主内唯一
    pub id: u64,
}

/// 字符设备驱动操作表
///
/// 未实现的方法采用与 Linux 缺省 `file_operations` 相同的行为。
pub trait FileOperations: Send + Sync {
    /// 打开设备
    fn open(&self, _file: &FileContext) -> Result<(), FsError> {
        Ok(())
    }

    /// 最后一个引用关闭时调用
    fn release(&self, _file: &FileContext) {}

    /// 从 `*pos` 开始读取 `count` 字节到 `buf`
    ///
    /// 成功时驱动把 `*pos` 推进到新位置，宿主随后提交为文件偏移量；
    /// 失败时宿主丢弃 `*pos`。
    fn read(
        &self,
        _file: &FileContext,
        _buf: &mut dyn UserBuffer,
        _count: usize,
        _pos: &mut i64,
    ) -> Result<usize, FsError> {
        Err(FsError::InvalidArgument)
    }

    /// 从 `*pos` 开始写入 `buf`
    fn write(&self, _file: &FileContext, _buf: &[u8], _pos: &mut i64) -> Result<usize, FsError> {
        Err(FsError::InvalidArgument)
    }

    /// 以当前位置 `pos` 为基准计算新位置
    fn llseek(
        &self,
        _file: &FileContext,
        _pos: i64,
        _offset: i64,
        _whence: SeekWhence,
    ) -> Result<i64, FsError> {
        Err(FsError::IllegalSeek)
    }
}

/// 设备类句柄，由 [`DeviceRegistry::class_create`] 分配
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ClassId(u32);

impl ClassId {
    /// 由原始编号构造
    pub const fn new(raw: u32) -> Self {
        Self(raw)
    }

    /// 原始编号
    pub const fn raw(&self) -> u32 {
        self.0
    }
}

/// 驱动可见的设备注册接口
///
/// 每个成功的注册调用都必须由对应的逆操作撤销；逆操作本身不会失败。
pub trait DeviceRegistry: Send + Sync {
    /// 动态分配一个 major 号，预留 `[baseminor, baseminor + count)` 的次设备号
    ///
    /// 没有可用 major 时返回 [`FsError::DeviceBusy`]。
    fn alloc_chrdev_region(&self, baseminor: u32, count: u32, name: &str)
    -> Result<u64, FsError>;

    /// 释放以 `dev` 开始的 `count` 个设备号
    fn unregister_chrdev_region(&self, dev: u64, count: u32);

    /// 把操作表绑定到以 `dev` 开始的 `count` 个设备号
    fn cdev_add(&self, dev: u64, count: u32, ops: Arc<dyn FileOperations>)
    -> Result<(), FsError>;

    /// 解除以 `dev` 开始的操作表绑定
    fn cdev_del(&self, dev: u64, count: u32);

    /// 创建设备类
    fn class_create(&self, name: &str) -> Result<ClassId, FsError>;

    /// 销毁设备类
    fn class_destroy(&self, class: ClassId);

    /// 在设备类下创建设备节点 `/dev/<name>`
    fn device_create(&self, class: ClassId, dev: u64, name: &str) -> Result<(), FsError>;

    /// 销毁设备类下设备号为 `dev` 的节点
    fn device_destroy(&self, class: ClassId, dev: u64);
}
