//! 模块配置常量

/// 注册设备号区间时使用的驱动名
pub const DEVICE_NAME: &str = "tcdtne";

/// 设备类名
pub const CLASS_NAME: &str = "tcdtne";

/// 起始次设备号
pub const BASE_MINOR: u32 = 0;

/// 预留的次设备号个数
pub const MINOR_COUNT: u32 = 1;
