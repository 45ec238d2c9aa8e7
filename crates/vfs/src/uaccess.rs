//! 用户缓冲区抽象
//!
//! 驱动只通过 [`UserBuffer::copy_to_user`] 向调用者交付数据。越界的拷贝
//! 以 [`FsError::BadAddress`] 失败，对应内核中 `copy_to_user` 返回 -EFAULT。

use alloc::vec::Vec;

use crate::FsError;

/// 读操作的目标缓冲区
pub trait UserBuffer {
    /// 缓冲区可写入的字节数
    fn len(&self) -> usize;

    /// 缓冲区是否为空
    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// 将 `src` 拷贝到缓冲区 `offset` 处
    fn copy_to_user(&mut self, offset: usize, src: &[u8]) -> Result<(), FsError>;
}

fn copy_into(dst: &mut [u8], offset: usize, src: &[u8]) -> Result<(), FsError> {
    let end = offset.checked_add(src.len()).ok_or(FsError::BadAddress)?;
    dst.get_mut(offset..end)
        .ok_or(FsError::BadAddress)?
        .copy_from_slice(src);
    Ok(())
}

impl UserBuffer for &mut [u8] {
    fn len(&self) -> usize {
        <[u8]>::len(self)
    }

    fn copy_to_user(&mut self, offset: usize, src: &[u8]) -> Result<(), FsError> {
        copy_into(self, offset, src)
    }
}

impl UserBuffer for Vec<u8> {
    fn len(&self) -> usize {
        Vec::len(self)
    }

    fn copy_to_user(&mut self, offset: usize, src: &[u8]) -> Result<(), FsError> {
        copy_into(self, offset, src)
    }
}

impl<const N: usize> UserBuffer for [u8; N] {
    fn len(&self) -> usize {
        N
    }

    fn copy_to_user(&mut self, offset: usize, src: &[u8]) -> Result<(), FsError> {
        copy_into(self, offset, src)
    }
}
