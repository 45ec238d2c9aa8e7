//! 字符设备文件的 File trait 实现

use alloc::sync::Arc;
use sync::SpinLock;

use crate::{File, FileContext, FileOperations, FsError, OpenFlags, SeekWhence};

/// 字符设备文件
///
/// 一次 open 对应一个实例。偏移量只属于本实例，
/// 读、写、定位只在驱动返回成功后才更新它。
pub struct CharDeviceFile {
    /// 传给驱动的上下文
    ctx: FileContext,

    /// 设备驱动操作表
    ops: Arc<dyn FileOperations>,

    /// 当前偏移量
    offset: SpinLock<i64>,
}

impl CharDeviceFile {
    /// 调用驱动的 `open`，成功后创建文件实例
    pub fn open(ctx: FileContext, ops: Arc<dyn FileOperations>) -> Result<Self, FsError> {
        ops.open(&ctx)?;
        Ok(Self {
            ctx,
            ops,
            offset: SpinLock::new(0),
        })
    }

    /// 设备号
    pub fn dev(&self) -> u64 {
        self.ctx.dev
    }

    /// 驱动上下文
    pub fn context(&self) -> &FileContext {
        &self.ctx
    }
}

impl File for CharDeviceFile {
    fn readable(&self) -> bool {
        self.ctx.flags.readable()
    }

    fn writable(&self) -> bool {
        self.ctx.flags.writable()
    }

    fn read(&self, buf: &mut [u8]) -> Result<usize, FsError> {
        if !self.readable() {
            return Err(FsError::BadFileDescriptor);
        }

        let count = buf.len();
        let mut dst = buf;
        let mut offset_guard = self.offset.lock();
        let mut pos = *offset_guard;

        let n = self.ops.read(&self.ctx, &mut dst, count, &mut pos)?;

        *offset_guard = pos;
        Ok(n)
    }

    fn write(&self, buf: &[u8]) -> Result<usize, FsError> {
        if !self.writable() {
            return Err(FsError::BadFileDescriptor);
        }

        let mut offset_guard = self.offset.lock();
        let mut pos = *offset_guard;

        let n = self.ops.write(&self.ctx, buf, &mut pos)?;

        *offset_guard = pos;
        Ok(n)
    }

    fn lseek(&self, offset: i64, whence: SeekWhence) -> Result<i64, FsError> {
        let mut offset_guard = self.offset.lock();
        let new_offset = self.ops.llseek(&self.ctx, *offset_guard, offset, whence)?;
        *offset_guard = new_offset;
        Ok(new_offset)
    }

    fn offset(&self) -> i64 {
        *self.offset.lock()
    }

    fn flags(&self) -> OpenFlags {
        self.ctx.flags
    }

    fn read_at(&self, offset: i64, buf: &mut [u8]) -> Result<usize, FsError> {
        if !self.readable() {
            return Err(FsError::BadFileDescriptor);
        }
        if offset < 0 {
            return Err(FsError::InvalidArgument);
        }

        let count = buf.len();
        let mut dst = buf;
        let mut pos = offset;
        self.ops.read(&self.ctx, &mut dst, count, &mut pos)
    }

    fn as_any(&self) -> &dyn core::any::Any {
        self
    }
}

impl Drop for CharDeviceFile {
    fn drop(&mut self) {
        self.ops.release(&self.ctx);
    }
}
