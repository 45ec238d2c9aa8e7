//! 日志条目
//!
//! 条目大小固定，消息内联存储，构造过程不做堆分配。

use core::fmt::{self, Write};

use crate::config::MAX_LOG_MESSAGE_LENGTH;
use crate::level::LogLevel;

/// 单条内核日志
#[derive(Debug, Clone, Copy)]
pub struct LogEntry {
    level: LogLevel,
    cpu_id: usize,
    task_id: u32,
    timestamp: usize,
    len: usize,
    message: [u8; MAX_LOG_MESSAGE_LENGTH],
}

impl LogEntry {
    /// 空条目，用于初始化环形缓冲区
    pub(crate) const fn empty() -> Self {
        Self {
            level: LogLevel::Debug,
            cpu_id: 0,
            task_id: 0,
            timestamp: 0,
            len: 0,
            message: [0; MAX_LOG_MESSAGE_LENGTH],
        }
    }

    /// 由 `format_args!` 构造条目，超长消息在字符边界处截断
    pub fn from_args(
        level: LogLevel,
        cpu_id: usize,
        task_id: u32,
        timestamp: usize,
        args: fmt::Arguments,
    ) -> Self {
        let mut entry = Self {
            level,
            cpu_id,
            task_id,
            timestamp,
            ..Self::empty()
        };
        let mut writer = MessageWriter {
            buf: &mut entry.message,
            len: 0,
        };
        // MessageWriter 从不返回错误，截断是静默的
        let _ = writer.write_fmt(args);
        entry.len = writer.len;
        entry
    }

    /// 日志级别
    pub fn level(&self) -> LogLevel {
        self.level
    }

    /// 产生日志的 CPU
    pub fn cpu_id(&self) -> usize {
        self.cpu_id
    }

    /// 产生日志的任务，无任务时为 0
    pub fn task_id(&self) -> u32 {
        self.task_id
    }

    /// 时间戳
    pub fn timestamp(&self) -> usize {
        self.timestamp
    }

    /// 消息正文
    pub fn message(&self) -> &str {
        core::str::from_utf8(&self.message[..self.len]).unwrap_or("")
    }
}

struct MessageWriter<'a> {
    buf: &'a mut [u8; MAX_LOG_MESSAGE_LENGTH],
    len: usize,
}

impl Write for MessageWriter<'_> {
    fn write_str(&mut self, s: &str) -> fmt::Result {
        let remaining = MAX_LOG_MESSAGE_LENGTH - self.len;
        let mut end = s.len().min(remaining);
        while !s.is_char_boundary(end) {
            end -= 1;
        }
        self.buf[self.len..self.len + end].copy_from_slice(&s.as_bytes()[..end]);
        self.len += end;
        Ok(())
    }
}
