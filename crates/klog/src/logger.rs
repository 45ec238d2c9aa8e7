//! `log` crate 适配
//!
//! 各子系统统一通过 `log::info!` 等宏记录日志，[`KernelLogger`] 将这些记录
//! 转交给全局 [`LogCore`](crate::log_core::LogCore)，消息以 target 作前缀。

use crate::level::LogLevel;

/// 将 `log` 记录写入内核日志缓冲区的 logger
pub struct KernelLogger;

impl log::Log for KernelLogger {
    fn enabled(&self, metadata: &log::Metadata) -> bool {
        crate::is_level_enabled(LogLevel::from(metadata.level()))
    }

    fn log(&self, record: &log::Record) {
        if !self.enabled(record.metadata()) {
            return;
        }
        crate::log_impl(
            LogLevel::from(record.level()),
            format_args!("{}: {}", record.target(), record.args()),
        );
    }

    fn flush(&self) {}
}

static LOGGER: KernelLogger = KernelLogger;

/// 安装 [`KernelLogger`] 并设置全局级别
///
/// 只能成功一次；重复调用返回 `log` 的 `SetLoggerError`。
pub fn init_logger(level: LogLevel) -> Result<(), log::SetLoggerError> {
    log::set_logger(&LOGGER)?;
    log::set_max_level(level.to_level_filter());
    crate::set_global_level(level);
    Ok(())
}
