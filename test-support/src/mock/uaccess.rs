//! 用户缓冲区的 Mock 实现

use alloc::vec;
use alloc::vec::Vec;

use vfs::{FsError, UserBuffer};

/// 只有前 `valid` 个字节可写的用户缓冲区
///
/// 任何触及 `valid` 之后的拷贝都整体失败并返回 [`FsError::BadAddress`]，
/// 模拟用户地址空间中部分页面未映射的情况。
pub struct FaultingUserBuffer {
    data: Vec<u8>,
    valid: usize,
    copies: usize,
}

impl FaultingUserBuffer {
    /// 创建长度为 `len`、前 `valid` 个字节可写的缓冲区
    pub fn new(len: usize, valid: usize) -> Self {
        Self {
            data: vec![0; len],
            valid,
            copies: 0,
        }
    }

    /// 从第一个字节起就不可写
    pub fn unmapped(len: usize) -> Self {
        Self::new(len, 0)
    }

    /// 当前内容
    pub fn data(&self) -> &[u8] {
        &self.data
    }

    /// 成功的拷贝次数
    pub fn copies(&self) -> usize {
        self.copies
    }
}

impl UserBuffer for FaultingUserBuffer {
    fn len(&self) -> usize {
        self.data.len()
    }

    fn copy_to_user(&mut self, offset: usize, src: &[u8]) -> Result<(), FsError> {
        let end = offset.checked_add(src.len()).ok_or(FsError::BadAddress)?;
        if end > self.valid || end > self.data.len() {
            return Err(FsError::BadAddress);
        }
        self.data[offset..end].copy_from_slice(src);
        self.copies += 1;
        Ok(())
    }
}
