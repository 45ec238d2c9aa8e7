//! 无限循环字节流
//!
//! 把逻辑偏移 `pos` 映射到 `pattern[pos % L]`，因此读取永远不会遇到文件尾。
//! 流本身不持有任何可变状态，位置由宿主的打开文件对象保存并传入。

use core::cmp::min;

use uapi::fcntl::SeekWhence;
use vfs::{FileContext, FileOperations, FsError, UserBuffer};

use crate::{LYRICS, Pattern, StreamError};

/// 以固定内容为周期的无限字节流
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PeriodicStream {
    pattern: Pattern,
}

impl Default for PeriodicStream {
    fn default() -> Self {
        Self::new(LYRICS)
    }
}

impl PeriodicStream {
    /// 以 `pattern` 为周期创建字节流
    pub const fn new(pattern: Pattern) -> Self {
        Self { pattern }
    }

    /// 周期内容
    pub const fn pattern(&self) -> Pattern {
        self.pattern
    }

    /// 计算定位后的新位置
    ///
    /// 只支持 `SEEK_SET` 和 `SEEK_CUR`。结果为负或溢出时返回
    /// [`StreamError::InvalidSeekResult`]，调用者的位置保持不变。
    pub fn seek(
        &self,
        current: i64,
        offset: i64,
        whence: SeekWhence,
    ) -> Result<i64, StreamError> {
        log::debug!(
            "Seeking with f_pos={}, off={}, whence={}",
            current,
            offset,
            whence as i32
        );

        let new_pos = match whence {
            SeekWhence::Set => Some(offset),
            SeekWhence::Cur => current.checked_add(offset),
            _ => {
                log::warn!("Whence value of {} not supported", whence as i32);
                return Err(StreamError::UnsupportedSeekMode);
            }
        };

        match new_pos {
            Some(pos) if pos >= 0 => {
                log::debug!("Seeking to pos={}", pos);
                Ok(pos)
            }
            Some(pos) => {
                log::warn!("Seek position of {} is out of range", pos);
                Err(StreamError::InvalidSeekResult)
            }
            None => {
                log::warn!("Seek position of {} + {} is out of range", current, offset);
                Err(StreamError::InvalidSeekResult)
            }
        }
    }

    /// 从 `position` 开始向 `buf` 写入恰好 `count` 个字节
    ///
    /// 成功时返回 `(count, position + count)`。每次拷贝不跨越周期边界，
    /// 因此最多拷贝 ⌈count / L⌉ + 1 次。某次拷贝失败时返回
    /// [`StreamError::CopyFault`]，此前已写入的字节保留在 `buf` 中。
    pub fn read(
        &self,
        position: i64,
        count: usize,
        buf: &mut dyn UserBuffer,
    ) -> Result<(usize, i64), StreamError> {
        log::debug!("Reading, f_pos={}, count={}", position, count);

        if position < 0 {
            log::warn!("Read position of {} is out of range", position);
            return Err(StreamError::InvalidSeekResult);
        }
        let end = i64::try_from(count)
            .ok()
            .and_then(|count| position.checked_add(count))
            .ok_or(StreamError::PositionOverflow)?;

        let bytes = self.pattern.as_bytes();
        let len = bytes.len() as u64;
        let mut copied = 0;
        let mut pos = position as u64;

        while copied < count {
            let pattern_offset = (pos % len) as usize;
            let available = bytes.len() - pattern_offset;
            let chunk = min(available, count - copied);

            log::trace!(
                "Copying, f_pos={}, copied={}, available={}, chunk={}, offset={}",
                pos,
                copied,
                available,
                chunk,
                pattern_offset
            );

            buf.copy_to_user(copied, &bytes[pattern_offset..pattern_offset + chunk])
                .map_err(|_| StreamError::CopyFault)?;

            copied += chunk;
            pos += chunk as u64;
        }

        log::debug!("Read complete, copied={}", copied);
        Ok((copied, end))
    }
}

impl FileOperations for PeriodicStream {
    fn open(&self, file: &FileContext) -> Result<(), FsError> {
        log::debug!("File opened (file {})", file.id);
        Ok(())
    }

    fn release(&self, file: &FileContext) {
        log::debug!("File released (file {})", file.id);
    }

    fn read(
        &self,
        _file: &FileContext,
        buf: &mut dyn UserBuffer,
        count: usize,
        pos: &mut i64,
    ) -> Result<usize, FsError> {
        let (copied, new_pos) = PeriodicStream::read(self, *pos, count, buf)?;
        *pos = new_pos;
        Ok(copied)
    }

    fn llseek(
        &self,
        _file: &FileContext,
        pos: i64,
        offset: i64,
        whence: SeekWhence,
    ) -> Result<i64, FsError> {
        Ok(self.seek(pos, offset, whence)?)
    }
}
