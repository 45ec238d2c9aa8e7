//! 文件打开标志与 lseek 定位方式

use bitflags::bitflags;

use crate::errno::EINVAL;

bitflags! {
    /// open(2) 标志位
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct OpenFlags: u32 {
        const O_RDONLY    = 0o0;
        const O_WRONLY    = 0o1;
        const O_RDWR      = 0o2;
        const O_ACCMODE   = 0o3;
        const O_CREAT     = 0o100;
        const O_EXCL      = 0o200;
        const O_NOCTTY    = 0o400;
        const O_TRUNC     = 0o1000;
        const O_APPEND    = 0o2000;
        const O_NONBLOCK  = 0o4000;
        const O_LARGEFILE = 0o100000;
        const O_CLOEXEC   = 0o2000000;
    }
}

impl OpenFlags {
    /// 访问模式位（O_RDONLY / O_WRONLY / O_RDWR）
    #[inline]
    pub fn access_mode(&self) -> u32 {
        self.bits() & Self::O_ACCMODE.bits()
    }

    /// 以该标志打开的文件是否可读
    pub fn readable(&self) -> bool {
        matches!(self.access_mode(), 0o0 | 0o2)
    }

    /// 以该标志打开的文件是否可写
    pub fn writable(&self) -> bool {
        matches!(self.access_mode(), 0o1 | 0o2)
    }
}

/// lseek(2) 的 whence 参数
#[repr(i32)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SeekWhence {
    /// SEEK_SET：绝对位置
    Set = 0,
    /// SEEK_CUR：相对当前位置
    Cur = 1,
    /// SEEK_END：相对文件末尾
    End = 2,
    /// SEEK_DATA：下一个数据区
    Data = 3,
    /// SEEK_HOLE：下一个空洞
    Hole = 4,
}

impl TryFrom<i32> for SeekWhence {
    type Error = i32;

    /// 未知的 whence 值返回 `EINVAL`
    fn try_from(value: i32) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(Self::Set),
            1 => Ok(Self::Cur),
            2 => Ok(Self::End),
            3 => Ok(Self::Data),
            4 => Ok(Self::Hole),
            _ => Err(EINVAL),
        }
    }
}
