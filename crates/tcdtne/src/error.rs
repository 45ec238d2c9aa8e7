//! 模块错误类型
//!
//! [`StreamError`] 来自读取与定位，[`LifecycleError`] 来自设备注册。
//! 两者都可以通过 `to_errno()` 转换为系统调用错误码，并可转换为 [`FsError`]
//! 交给宿主。

use core::fmt;

use uapi::errno::{EBUSY, EFAULT, EINVAL, EOVERFLOW};
use vfs::FsError;

/// 读取或定位失败
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StreamError {
    /// 不支持的 whence（SEEK_END / SEEK_DATA / SEEK_HOLE）(-EINVAL)
    UnsupportedSeekMode,
    /// 定位结果为负或超出 `i64` (-EINVAL)
    InvalidSeekResult,
    /// 目标缓冲区拒绝了一次拷贝 (-EFAULT)
    CopyFault,
    /// 读取后的位置超出 `i64` (-EOVERFLOW)
    PositionOverflow,
}

impl StreamError {
    /// 转换为系统调用错误码（负数）
    pub fn to_errno(&self) -> isize {
        let errno = match self {
            StreamError::UnsupportedSeekMode | StreamError::InvalidSeekResult => EINVAL,
            StreamError::CopyFault => EFAULT,
            StreamError::PositionOverflow => EOVERFLOW,
        };
        -(errno as isize)
    }
}

impl fmt::Display for StreamError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let msg = match self {
            StreamError::UnsupportedSeekMode => "unsupported seek mode",
            StreamError::InvalidSeekResult => "seek position out of range",
            StreamError::CopyFault => "copy to user buffer failed",
            StreamError::PositionOverflow => "read position overflow",
        };
        write!(f, "{} ({})", msg, self.to_errno())
    }
}

impl From<StreamError> for FsError {
    fn from(err: StreamError) -> Self {
        match err {
            StreamError::UnsupportedSeekMode | StreamError::InvalidSeekResult => {
                FsError::InvalidArgument
            }
            StreamError::CopyFault => FsError::BadAddress,
            StreamError::PositionOverflow => FsError::Overflow,
        }
    }
}

/// 设备初始化失败
///
/// 返回之前已完成的步骤都已经按相反顺序撤销。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LifecycleError {
    /// 没有可用的动态 major 号 (-EBUSY)
    IdentityExhausted,
    /// 设备号分配因其他原因失败
    IdentityAllocation(FsError),
    /// 绑定操作表失败
    BindingFailed(FsError),
    /// 创建设备类失败
    ClassCreationFailed(FsError),
    /// 创建设备节点失败
    NodeCreationFailed(FsError),
}

impl LifecycleError {
    /// 宿主返回的原始错误
    pub fn source(&self) -> FsError {
        match *self {
            LifecycleError::IdentityExhausted => FsError::DeviceBusy,
            LifecycleError::IdentityAllocation(err)
            | LifecycleError::BindingFailed(err)
            | LifecycleError::ClassCreationFailed(err)
            | LifecycleError::NodeCreationFailed(err) => err,
        }
    }

    /// 转换为系统调用错误码（负数）
    pub fn to_errno(&self) -> isize {
        match self {
            LifecycleError::IdentityExhausted => -(EBUSY as isize),
            _ => self.source().to_errno(),
        }
    }
}

impl fmt::Display for LifecycleError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LifecycleError::IdentityExhausted => write!(f, "no free device number"),
            LifecycleError::IdentityAllocation(err) => {
                write!(f, "alloc_chrdev_region failed: {}", err)
            }
            LifecycleError::BindingFailed(err) => write!(f, "cdev_add failed: {}", err),
            LifecycleError::ClassCreationFailed(err) => write!(f, "class_create failed: {}", err),
            LifecycleError::NodeCreationFailed(err) => write!(f, "device_create failed: {}", err),
        }
    }
}

impl From<LifecycleError> for FsError {
    fn from(err: LifecycleError) -> Self {
        err.source()
    }
}
