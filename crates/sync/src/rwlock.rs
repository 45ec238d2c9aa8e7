//! 读写自旋锁
//!
//! 多读者并发、写者独占。适用于初始化阶段写、运行时以读为主的表。

use core::{
    hint,
    sync::atomic::{AtomicUsize, Ordering},
};

use lock_api::{GuardSend, RawRwLock};

/// 写者占用位
const WRITER: usize = 1;
/// 每个读者占用的计数单位
const READER: usize = 2;

/// 读写自旋锁的底层实现
///
/// `state` 最低位表示写者，其余位为读者计数。
#[derive(Debug)]
pub struct RawRwSpinLock {
    state: AtomicUsize,
}

impl RawRwSpinLock {
    /// 创建一个未加锁的读写锁
    pub const fn new() -> Self {
        Self {
            state: AtomicUsize::new(0),
        }
    }
}

impl Default for RawRwSpinLock {
    fn default() -> Self {
        Self::new()
    }
}

// Safety: 写者只在 state == 0 时获得锁，读者只在没有写者时递增计数，
// 因此写者与任何读者互斥。
unsafe impl RawRwLock for RawRwSpinLock {
    #[allow(clippy::declare_interior_mutable_const)]
    const INIT: Self = Self::new();

    type GuardMarker = GuardSend;

    fn lock_shared(&self) {
        while !self.try_lock_shared() {
            hint::spin_loop();
        }
    }

    fn try_lock_shared(&self) -> bool {
        let mut state = self.state.load(Ordering::Relaxed);
        loop {
            if state & WRITER != 0 {
                return false;
            }
            match self.state.compare_exchange_weak(
                state,
                state + READER,
                Ordering::Acquire,
                Ordering::Relaxed,
            ) {
                Ok(_) => return true,
                Err(current) => state = current,
            }
        }
    }

    unsafe fn unlock_shared(&self) {
        self.state.fetch_sub(READER, Ordering::Release);
    }

    fn lock_exclusive(&self) {
        while !self.try_lock_exclusive() {
            hint::spin_loop();
        }
    }

    fn try_lock_exclusive(&self) -> bool {
        self.state
            .compare_exchange(0, WRITER, Ordering::Acquire, Ordering::Relaxed)
            .is_ok()
    }

    unsafe fn unlock_exclusive(&self) {
        self.state.fetch_and(!WRITER, Ordering::Release);
    }

    fn is_locked(&self) -> bool {
        self.state.load(Ordering::Relaxed) != 0
    }

    fn is_locked_exclusive(&self) -> bool {
        self.state.load(Ordering::Relaxed) & WRITER != 0
    }
}

/// 读写自旋锁
pub type RwLock<T> = lock_api::RwLock<RawRwSpinLock, T>;

/// 读守卫
pub type RwLockReadGuard<'a, T> = lock_api::RwLockReadGuard<'a, RawRwSpinLock, T>;

/// 写守卫
pub type RwLockWriteGuard<'a, T> = lock_api::RwLockWriteGuard<'a, RawRwSpinLock, T>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_multiple_readers() {
        let lock = RwLock::new(5);
        let r1 = lock.read();
        let r2 = lock.read();
        assert_eq!(*r1 + *r2, 10);
        assert!(lock.try_write().is_none());
    }

    #[test]
    fn test_writer_excludes_readers() {
        let lock = RwLock::new(0);
        {
            let mut w = lock.write();
            *w = 3;
            assert!(lock.try_read().is_none());
            assert!(lock.is_locked_exclusive());
        }
        assert!(!lock.is_locked());
        assert_eq!(*lock.read(), 3);
    }
}
