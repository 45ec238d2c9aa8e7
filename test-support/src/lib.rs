//! 测试支持 crate
//!
//! 提供驱动测试所需的 Mock 实现：
//!
//! - [`mock::MockDeviceRegistry`]：记录注册调用，可在指定步骤注入失败
//! - [`mock::FaultingUserBuffer`]：在指定偏移处模拟 `copy_to_user` 失败

#![no_std]

extern crate alloc;

pub mod mock;
