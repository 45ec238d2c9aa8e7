//! 日志级别定义（与 Linux printk 级别一致，数值越小越紧急）

/// 内核日志级别
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum LogLevel {
    /// 系统不可用
    Emergency = 0,
    /// 必须立即处理
    Alert = 1,
    /// 严重错误
    Critical = 2,
    /// 错误
    Error = 3,
    /// 警告
    Warning = 4,
    /// 正常但值得注意
    Notice = 5,
    /// 信息
    Info = 6,
    /// 调试
    Debug = 7,
}

impl LogLevel {
    /// 从原始数值恢复级别，越界值按 Debug 处理
    pub const fn from_u8(value: u8) -> Self {
        match value {
            0 => Self::Emergency,
            1 => Self::Alert,
            2 => Self::Critical,
            3 => Self::Error,
            4 => Self::Warning,
            5 => Self::Notice,
            6 => Self::Info,
            _ => Self::Debug,
        }
    }

    /// 级别标签
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Emergency => "[EMERG]",
            Self::Alert => "[ALERT]",
            Self::Critical => "[CRIT]",
            Self::Error => "[ERR]",
            Self::Warning => "[WARNING]",
            Self::Notice => "[NOTICE]",
            Self::Info => "[INFO]",
            Self::Debug => "[DEBUG]",
        }
    }

    /// ANSI 前景色
    pub const fn color_code(&self) -> &'static str {
        match self {
            Self::Emergency | Self::Alert | Self::Critical => "\x1b[1;31m",
            Self::Error => "\x1b[31m",
            Self::Warning => "\x1b[33m",
            Self::Notice => "\x1b[36m",
            Self::Info => "\x1b[37m",
            Self::Debug => "\x1b[90m",
        }
    }

    /// ANSI 颜色复位
    pub const fn reset_color_code(&self) -> &'static str {
        "\x1b[0m"
    }

    /// 对应的 `log` crate 过滤级别
    ///
    /// `log` 只有五级，Emergency 到 Error 合并为 Error，Notice 合并为 Info。
    pub const fn to_level_filter(self) -> log::LevelFilter {
        match self {
            Self::Emergency | Self::Alert | Self::Critical | Self::Error => log::LevelFilter::Error,
            Self::Warning => log::LevelFilter::Warn,
            Self::Notice | Self::Info => log::LevelFilter::Info,
            Self::Debug => log::LevelFilter::Debug,
        }
    }
}

impl From<log::Level> for LogLevel {
    fn from(level: log::Level) -> Self {
        match level {
            log::Level::Error => Self::Error,
            log::Level::Warn => Self::Warning,
            log::Level::Info => Self::Info,
            log::Level::Debug | log::Level::Trace => Self::Debug,
        }
    }
}
