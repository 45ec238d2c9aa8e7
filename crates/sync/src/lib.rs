//! 同步原语
//!
//! 向其它内核模块提供基本的锁原语：自旋锁与读写自旋锁。
//!
//! 两者均以 [`lock_api`] 的 raw lock trait 实现，守卫类型、`try_lock`
//! 以及 `const_new` 等接口由 `lock_api` 统一提供。

#![no_std]

mod raw_spin_lock;
mod rwlock;
mod spin_lock;

pub use raw_spin_lock::*;
pub use rwlock::*;
pub use spin_lock::*;
