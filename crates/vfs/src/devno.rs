//! 字符设备号分配规则
//!
//! 静态 major 号沿用 Linux 的分配表；动态分配先从 254 向下找到 234，
//! 再从 511 向下找到 384，与 Linux `find_dynamic_major` 的顺序一致。

/// 次设备号位宽
pub const MINORBITS: u32 = 20;

/// 次设备号最大值
pub const MINORMASK: u32 = (1 << MINORBITS) - 1;

/// 字符设备 major 号上限（不含）
pub const CHRDEV_MAJOR_MAX: u32 = 512;

/// 第一段动态 major 区间的起点（向下搜索）
pub const CHRDEV_MAJOR_DYN_START: u32 = 254;
/// 第一段动态 major 区间的终点（含）
pub const CHRDEV_MAJOR_DYN_END: u32 = 234;
/// 扩展动态 major 区间的起点（向下搜索）
pub const CHRDEV_MAJOR_DYN_EXT_START: u32 = 511;
/// 扩展动态 major 区间的终点（含）
pub const CHRDEV_MAJOR_DYN_EXT_END: u32 = 384;

/// 标准字符设备 major 号
pub mod chrdev_major {
    /// /dev/null, /dev/zero 等
    pub const MEM: u32 = 1;
    /// /dev/tty*, /dev/ttyS*
    pub const TTY: u32 = 4;
    /// /dev/console
    pub const CONSOLE: u32 = 5;
    /// /dev/misc/*
    pub const MISC: u32 = 10;
    /// /dev/input/*
    pub const INPUT: u32 = 13;
}

/// 按分配优先级依次给出可用于动态分配的 major 号
pub fn dynamic_majors() -> impl Iterator<Item = u32> {
    (CHRDEV_MAJOR_DYN_END..=CHRDEV_MAJOR_DYN_START)
        .rev()
        .chain((CHRDEV_MAJOR_DYN_EXT_END..=CHRDEV_MAJOR_DYN_EXT_START).rev())
}
