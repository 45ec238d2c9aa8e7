//! VFS 错误类型
//!
//! 定义了与 POSIX 兼容的文件系统错误码，可通过 [`FsError::to_errno()`] 转换为系统调用错误码。

use core::fmt;

use uapi::errno::*;

/// VFS 错误类型
///
/// 各错误码对应标准 POSIX errno 值。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FsError {
    // 文件/目录相关
    /// 文件不存在 (-ENOENT)
    NotFound,
    /// 文件已存在 (-EEXIST)
    AlreadyExists,

    // 权限相关
    /// 权限被拒绝 (-EACCES)
    PermissionDenied,

    // 文件描述符相关
    /// 无效的文件描述符，或打开模式不允许该操作 (-EBADF)
    BadFileDescriptor,

    // 参数相关
    /// 无效参数 (-EINVAL)
    InvalidArgument,
    /// 用户缓冲区地址无效 (-EFAULT)
    BadAddress,
    /// 结果超出可表示范围 (-EOVERFLOW)
    Overflow,
    /// 不可定位的文件 (-ESPIPE)
    IllegalSeek,

    // 设备相关
    /// 设备不存在 (-ENODEV)
    NoDevice,
    /// 设备号没有绑定驱动 (-ENXIO)
    NoSuchDeviceOrAddress,
    /// 设备号或资源被占用 (-EBUSY)
    DeviceBusy,
    /// 内存不足 (-ENOMEM)
    NoMemory,

    // 其他
    /// 操作不支持 (-EOPNOTSUPP)
    NotSupported,
}

impl FsError {
    /// 转换为系统调用错误码（负数）
    pub fn to_errno(&self) -> isize {
        let errno = match self {
            FsError::NotFound => ENOENT,
            FsError::AlreadyExists => EEXIST,
            FsError::PermissionDenied => EACCES,
            FsError::BadFileDescriptor => EBADF,
            FsError::InvalidArgument => EINVAL,
            FsError::BadAddress => EFAULT,
            FsError::Overflow => EOVERFLOW,
            FsError::IllegalSeek => ESPIPE,
            FsError::NoDevice => ENODEV,
            FsError::NoSuchDeviceOrAddress => ENXIO,
            FsError::DeviceBusy => EBUSY,
            FsError::NoMemory => ENOMEM,
            FsError::NotSupported => EOPNOTSUPP,
        };
        -(errno as isize)
    }
}

impl fmt::Display for FsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let msg = match self {
            FsError::NotFound => "no such file or directory",
            FsError::AlreadyExists => "file exists",
            FsError::PermissionDenied => "permission denied",
            FsError::BadFileDescriptor => "bad file descriptor",
            FsError::InvalidArgument => "invalid argument",
            FsError::BadAddress => "bad address",
            FsError::Overflow => "value too large for defined data type",
            FsError::IllegalSeek => "illegal seek",
            FsError::NoDevice => "no such device",
            FsError::NoSuchDeviceOrAddress => "no such device or address",
            FsError::DeviceBusy => "device or resource busy",
            FsError::NoMemory => "out of memory",
            FsError::NotSupported => "operation not supported",
        };
        write!(f, "{} ({})", msg, self.to_errno())
    }
}
