//! The Character Device That Never Ends
//!
//! 一个只读字符设备：打开 `/dev/tcdtne` 并读取，得到的是一段歌词的无限重复，
//! 无论从哪个偏移读取、读取多少字节都不会遇到文件尾。
//!
//! - [`PeriodicStream`] - 偏移到字节的映射、定位校验与分块拷贝，实现 [`vfs::FileOperations`]
//! - [`DeviceHandle`] - 设备号、操作表绑定、设备类与设备节点的注册与注销
//! - [`TcdtneModule`] - 模块入口，加载时注册，析构时注销
//!
//! # 使用
//!
//! 模块只依赖 [`vfs::DeviceRegistry`]，宿主可以是全局的 [`vfs::CHRDEV_REGISTRY`]，
//! 也可以是测试中自行创建的注册表：
//!
//! ```
//! use std::sync::Arc;
//! use tcdtne::TcdtneModule;
//! use vfs::{CharDevRegistry, OpenFlags};
//!
//! let registry = Arc::new(CharDevRegistry::new());
//! let module = TcdtneModule::init(registry.clone()).unwrap();
//!
//! let file = registry.open(module.node_path(), OpenFlags::O_RDONLY).unwrap();
//! let mut buf = [0u8; 11];
//! file.read(&mut buf).unwrap();
//! assert_eq!(&buf, b"This is the");
//! ```

#![no_std]

extern crate alloc;

pub mod config;
mod error;
pub mod lifecycle;
mod module;
mod pattern;
mod stream;

pub use error::{LifecycleError, StreamError};
pub use lifecycle::DeviceHandle;
pub use module::TcdtneModule;
pub use pattern::{LYRICS, Pattern};
pub use stream::PeriodicStream;
