//! 日志系统配置常量

use crate::level::LogLevel;

/// 环形缓冲区可容纳的日志条目数
pub const LOG_BUFFER_CAPACITY: usize = 64;

/// 单条日志消息的最大字节数，超出部分被截断
pub const MAX_LOG_MESSAGE_LENGTH: usize = 256;

/// 默认全局级别：Info 及以上写入缓冲区
pub const DEFAULT_LOG_LEVEL: LogLevel = LogLevel::Info;

/// 默认控制台级别：Warning 及以上立即打印
pub const DEFAULT_CONSOLE_LEVEL: LogLevel = LogLevel::Warning;
