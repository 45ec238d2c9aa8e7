//! 虚拟文件系统与字符设备层
//!
//! 此 crate 提供字符设备驱动运行所需的宿主侧抽象，包括：
//!
//! - [`File`] trait - 打开文件的操作接口
//! - [`FileOperations`] trait - 字符设备驱动的操作表
//! - [`DeviceRegistry`] trait - 驱动注册设备号、设备类与节点的接口
//! - [`CharDevRegistry`] - 基于内存的注册表实现，全局实例为 [`CHRDEV_REGISTRY`]
//! - [`UserBuffer`] trait - 向调用者缓冲区复制数据
//! - 设备号编码（[`makedev`] / [`major`] / [`minor`]）

#![no_std]
#![allow(clippy::module_inception)]

extern crate alloc;

pub mod dev;
pub mod error;
pub mod ops;

mod chrdev;
mod devno;
mod file;
pub mod impls;
mod uaccess;

// Re-export ops
pub use ops::{ClassId, DeviceRegistry, FileContext, FileOperations};

// Re-export error
pub use error::FsError;

// Re-export dev
pub use dev::{major, makedev, minor};

// Re-export devno
pub use devno::{
    CHRDEV_MAJOR_MAX, CHRDEV_MAJOR_DYN_END, CHRDEV_MAJOR_DYN_EXT_END, CHRDEV_MAJOR_DYN_EXT_START,
    CHRDEV_MAJOR_DYN_START, MINORBITS, MINORMASK, chrdev_major, dynamic_majors,
};

// Re-export file
pub use file::File;

// Re-export uaccess
pub use uaccess::UserBuffer;

// Re-export chrdev
pub use chrdev::{CHRDEV_REGISTRY, CharDevRegistry, DEV_ROOT, RegistryStats};

// Re-export impls
pub use impls::CharDeviceFile;

// Re-export uapi types used in signatures
pub use uapi::fcntl::{OpenFlags, SeekWhence};
