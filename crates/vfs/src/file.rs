//! 文件抽象层 - VFS 会话层接口
//!
//! 该模块定义了统一的文件操作接口 [`File`] trait。打开的文件以 `Arc<dyn File>`
//! 形式交给调用者，最后一个引用释放即为关闭。
//!
//! `File` 是“有状态”的：当前偏移量属于打开实例，不同实例之间互不影响。

use core::any::Any;

use crate::{FsError, OpenFlags, SeekWhence};

/// 文件操作的统一接口
pub trait File: Send + Sync {
    /// 检查文件是否可读
    fn readable(&self) -> bool;

    /// 检查文件是否可写
    fn writable(&self) -> bool;

    /// 从当前偏移量读取数据，成功后推进偏移量
    fn read(&self, buf: &mut [u8]) -> Result<usize, FsError>;

    /// 从当前偏移量写入数据
    fn write(&self, buf: &[u8]) -> Result<usize, FsError>;

    /// 设置文件偏移量（可选方法）
    fn lseek(&self, _offset: i64, _whence: SeekWhence) -> Result<i64, FsError> {
        Err(FsError::IllegalSeek)
    }

    /// 获取当前偏移量（可选方法）
    fn offset(&self) -> i64 {
        0
    }

    /// 获取打开标志（可选方法）
    fn flags(&self) -> OpenFlags {
        OpenFlags::empty()
    }

    /// 从指定位置读取数据，不改变当前偏移量（可选方法，用于 pread64）
    fn read_at(&self, _offset: i64, _buf: &mut [u8]) -> Result<usize, FsError> {
        Err(FsError::NotSupported)
    }

    /// 获取 Any trait 引用，用于安全的类型转换
    fn as_any(&self) -> &dyn Any;
}
