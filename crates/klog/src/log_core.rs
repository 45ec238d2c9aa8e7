//! 日志系统核心实现
//!
//! 该模块将所有日志状态和逻辑封装到一个单独的 `LogCore` 结构体中，
//! 全局单例与测试用的局部实例共用同一套实现。

use alloc::string::String;
use core::fmt;
use core::sync::atomic::{AtomicU8, Ordering};

use crate::buffer::LogBuffer;
use crate::config::{DEFAULT_CONSOLE_LEVEL, DEFAULT_LOG_LEVEL};
use crate::entry::LogEntry;
use crate::level::LogLevel;

/// 核心日志系统
///
/// 封装了环形缓冲区和过滤状态。
///
/// # 线程安全性
///
/// 级别阈值为原子变量，缓冲区内部加锁，整个结构体可在线程之间共享。
pub struct LogCore {
    /// 日志存储
    buffer: LogBuffer,

    /// 全局日志级别阈值（控制日志是否缓冲）
    global_level: AtomicU8,

    /// 控制台输出级别阈值（控制是否立即打印）
    console_level: AtomicU8,
}

impl LogCore {
    /// 使用默认日志级别创建新的 LogCore 实例
    ///
    /// `const fn`，可用于静态初始化：
    /// - 全局级别: Info (Debug 级别的日志将被过滤)
    /// - 控制台级别: Warning
    #[allow(clippy::should_implement_trait)]
    pub const fn default() -> Self {
        Self {
            buffer: LogBuffer::new(),
            global_level: AtomicU8::new(DEFAULT_LOG_LEVEL as u8),
            console_level: AtomicU8::new(DEFAULT_CONSOLE_LEVEL as u8),
        }
    }

    /// 使用自定义日志级别创建新的 LogCore 实例
    ///
    /// # 参数
    ///
    /// * `global_level` - 日志被缓冲的最低级别
    /// * `console_level` - 日志被打印到控制台的最低级别
    pub fn new(global_level: LogLevel, console_level: LogLevel) -> Self {
        Self {
            buffer: LogBuffer::new(),
            global_level: AtomicU8::new(global_level as u8),
            console_level: AtomicU8::new(console_level as u8),
        }
    }

    /// 核心日志记录实现
    ///
    /// 1. 按全局级别过滤
    /// 2. 收集上下文 (时间戳、CPU ID、任务 ID)
    /// 3. 构造条目并写入缓冲区
    /// 4. 满足控制台级别时立即输出
    pub fn _log(&self, level: LogLevel, args: fmt::Arguments) {
        if !self.is_level_enabled(level) {
            return;
        }

        let (cpu_id, task_id, timestamp) = match crate::get_context_provider() {
            Some(provider) => (provider.cpu_id(), provider.task_id(), provider.timestamp()),
            None => (0, 0, 0),
        };

        let entry = LogEntry::from_args(level, cpu_id, task_id, timestamp, args);
        self.buffer.write(&entry);

        if self.is_console_level(level) {
            self.direct_print_entry(&entry);
        }
    }

    /// 从缓冲区读取下一个日志条目
    pub fn _read_log(&self) -> Option<LogEntry> {
        self.buffer.read()
    }

    /// 非破坏性读取：按索引 peek 日志条目，不移动读指针
    pub fn _peek_log(&self, index: usize) -> Option<LogEntry> {
        self.buffer.peek(index)
    }

    /// 获取当前可读取的起始索引
    pub fn _log_reader_index(&self) -> usize {
        self.buffer.reader_index()
    }

    /// 获取当前写入位置
    pub fn _log_writer_index(&self) -> usize {
        self.buffer.writer_index()
    }

    /// 返回未读日志条目的数量
    pub fn _log_len(&self) -> usize {
        self.buffer.len()
    }

    /// 返回由于缓冲区溢出而丢弃的日志计数
    pub fn _log_dropped_count(&self) -> usize {
        self.buffer.dropped_count()
    }

    /// 设置全局日志级别阈值
    pub fn _set_global_level(&self, level: LogLevel) {
        self.global_level.store(level as u8, Ordering::Release);
    }

    /// 获取当前全局日志级别
    pub fn _get_global_level(&self) -> LogLevel {
        LogLevel::from_u8(self.global_level.load(Ordering::Acquire))
    }

    /// 设置控制台输出级别阈值
    pub fn _set_console_level(&self, level: LogLevel) {
        self.console_level.store(level as u8, Ordering::Release);
    }

    /// 获取当前控制台输出级别
    pub fn _get_console_level(&self) -> LogLevel {
        LogLevel::from_u8(self.console_level.load(Ordering::Acquire))
    }

    #[inline(always)]
    pub(crate) fn is_level_enabled(&self, level: LogLevel) -> bool {
        level as u8 <= self.global_level.load(Ordering::Acquire)
    }

    #[inline(always)]
    fn is_console_level(&self, level: LogLevel) -> bool {
        level as u8 <= self.console_level.load(Ordering::Acquire)
    }

    /// 通过已注册的 [`crate::LogOutput`] 打印条目，未注册时丢弃
    fn direct_print_entry(&self, entry: &LogEntry) {
        if let Some(output) = crate::get_log_output() {
            let mut line = format_log_entry(entry);
            line.push('\n');
            output.write_str(&line);
        }
    }
}

/// 格式化日志条目为字符串（带 ANSI 颜色和上下文信息）
///
/// # 格式
/// ```text
/// <color_code>[LEVEL] [timestamp] [CPU<id>/T<tid>] message<reset>
/// ```
pub fn format_log_entry(entry: &LogEntry) -> String {
    alloc::format!(
        "{}{} [{:12}] [CPU{}/T{:3}] {}{}",
        entry.level().color_code(),
        entry.level().as_str(),
        entry.timestamp(),
        entry.cpu_id(),
        entry.task_id(),
        entry.message(),
        entry.level().reset_color_code()
    )
}
