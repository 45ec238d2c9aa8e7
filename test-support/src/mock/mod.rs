//! Mock 实现模块
//!
//! 这里只依赖 `vfs` 暴露的 trait，驱动 crate 通过 dev-dependency 使用。

mod registry;
mod uaccess;

pub use registry::{FailAt, MockDeviceRegistry, RegistryCall};
pub use uaccess::FaultingUserBuffer;
