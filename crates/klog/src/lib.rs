//! 内核日志子系统
//!
//! 提供一个类似 **Linux 内核风格的日志系统**：
//!
//! - [`LogLevel`] - 日志级别定义（从 Emergency 到 Debug）
//! - [`LogEntry`] - 固定大小的日志条目
//! - `pr_info!`、`pr_err!` 等日志宏
//! - [`KernelLogger`] - `log` crate 的后端，使 `log::debug!` 等调用进入同一缓冲区
//!
//! # 双输出策略
//!
//! 1. **即时控制台输出**：达到控制台级别阈值（默认：Warning 及以上）的日志直接交给
//!    已注册的 [`LogOutput`]。
//! 2. **环形缓冲区存储**：达到全局级别阈值（默认：Info 及以上）的日志写入固定容量的
//!    环形缓冲区，供 [`read_log`] 等接口事后读取；满时覆盖最旧条目。
//!
//! # 架构解耦
//!
//! - **LogContextProvider**：提供 CPU ID、任务 ID、时间戳
//! - **LogOutput**：提供控制台输出能力
//!
//! 使用方在启动时注册这些 trait 的实现；未注册时上下文取 0，控制台输出被丢弃。

#![no_std]

extern crate alloc;

mod buffer;
mod config;
mod entry;
mod level;
mod log_core;
mod logger;
pub mod macros;

#[cfg(test)]
mod tests;

pub use config::{
    DEFAULT_CONSOLE_LEVEL, DEFAULT_LOG_LEVEL, LOG_BUFFER_CAPACITY, MAX_LOG_MESSAGE_LENGTH,
};
pub use entry::LogEntry;
pub use level::LogLevel;
pub use log_core::{LogCore, format_log_entry};
pub use logger::{KernelLogger, init_logger};

use sync::{RawSpinLock, SpinLock};

// ========== Trait 定义 ==========

/// 日志上下文提供者 trait
pub trait LogContextProvider: Send + Sync {
    /// 获取当前 CPU ID
    fn cpu_id(&self) -> usize;
    /// 获取当前任务 ID（如果没有任务则返回 0）
    fn task_id(&self) -> u32;
    /// 获取当前时间戳
    fn timestamp(&self) -> usize;
}

/// 日志输出 trait
pub trait LogOutput: Send + Sync {
    /// 输出字符串到控制台
    fn write_str(&self, s: &str);
}

// ========== 全局注册机制 ==========

static CONTEXT_PROVIDER: SpinLock<Option<&'static dyn LogContextProvider>> =
    SpinLock::const_new(RawSpinLock::new(), None);
static LOG_OUTPUT: SpinLock<Option<&'static dyn LogOutput>> =
    SpinLock::const_new(RawSpinLock::new(), None);

/// 注册日志上下文提供者，后注册的替换先注册的
pub fn register_context_provider(provider: &'static dyn LogContextProvider) {
    *CONTEXT_PROVIDER.lock() = Some(provider);
}

/// 注册日志输出，后注册的替换先注册的
pub fn register_log_output(output: &'static dyn LogOutput) {
    *LOG_OUTPUT.lock() = Some(output);
}

pub(crate) fn get_context_provider() -> Option<&'static dyn LogContextProvider> {
    *CONTEXT_PROVIDER.lock()
}

pub(crate) fn get_log_output() -> Option<&'static dyn LogOutput> {
    *LOG_OUTPUT.lock()
}

// ========== 全局单例 ==========

/// 全局日志系统实例，所有日志宏和公共 API 都委托给它
static GLOBAL_LOG: LogCore = LogCore::default();

// ========== 公共 API ==========

/// 核心日志实现（由宏调用）
#[doc(hidden)]
pub fn log_impl(level: LogLevel, args: core::fmt::Arguments) {
    GLOBAL_LOG._log(level, args);
}

/// 检查日志级别是否启用（由宏调用）
#[doc(hidden)]
pub fn is_level_enabled(level: LogLevel) -> bool {
    GLOBAL_LOG.is_level_enabled(level)
}

/// 从缓冲区读取下一个日志条目
pub fn read_log() -> Option<LogEntry> {
    GLOBAL_LOG._read_log()
}

/// 非破坏性读取：按索引 peek 日志条目，不移动读指针
pub fn peek_log(index: usize) -> Option<LogEntry> {
    GLOBAL_LOG._peek_log(index)
}

/// 获取当前可读取的起始索引
pub fn log_reader_index() -> usize {
    GLOBAL_LOG._log_reader_index()
}

/// 获取当前写入位置
pub fn log_writer_index() -> usize {
    GLOBAL_LOG._log_writer_index()
}

/// 返回未读日志条目的数量
pub fn log_len() -> usize {
    GLOBAL_LOG._log_len()
}

/// 返回已丢弃日志的计数
pub fn log_dropped_count() -> usize {
    GLOBAL_LOG._log_dropped_count()
}

/// 设置全局日志级别阈值
pub fn set_global_level(level: LogLevel) {
    GLOBAL_LOG._set_global_level(level);
}

/// 获取当前全局日志级别
pub fn get_global_level() -> LogLevel {
    GLOBAL_LOG._get_global_level()
}

/// 设置控制台输出级别阈值
pub fn set_console_level(level: LogLevel) {
    GLOBAL_LOG._set_console_level(level);
}

/// 获取当前控制台输出级别
pub fn get_console_level() -> LogLevel {
    GLOBAL_LOG._get_console_level()
}
