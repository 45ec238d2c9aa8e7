//! 循环输出的固定内容

/// 非空的只读字节序列
///
/// 设备的全部输出都是它的无限重复。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pattern(&'static [u8]);

impl Pattern {
    /// 由非空字节切片构造
    ///
    /// # Panics
    ///
    /// `bytes` 为空时 panic；在常量上下文中表现为编译错误。
    pub const fn new(bytes: &'static [u8]) -> Self {
        assert!(!bytes.is_empty(), "pattern must not be empty");
        Self(bytes)
    }

    /// 由字节切片构造，切片为空时返回 `None`
    pub const fn try_new(bytes: &'static [u8]) -> Option<Self> {
        if bytes.is_empty() {
            None
        } else {
            Some(Self(bytes))
        }
    }

    /// 周期长度，恒大于 0
    #[allow(clippy::len_without_is_empty)]
    pub const fn len(&self) -> usize {
        self.0.len()
    }

    /// 全部字节
    pub const fn as_bytes(&self) -> &'static [u8] {
        self.0
    }
}

/// 设备输出的歌词
pub const LYRICS: Pattern = Pattern::new(
    b"This is the character device that never ends,\n\
      It just goes on and on my friends.\n\
      Some process started reading it, not knowing what it was,\n\
      And it'll continue reading it forever just because...\n\n",
);
