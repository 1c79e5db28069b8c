/// FAT16 的簇编号，同时也是 FAT 表项的值
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(transparent)]
pub struct ClusterId(u16);

impl From<u16> for ClusterId {
    fn from(raw: u16) -> Self {
        Self(raw)
    }
}

impl From<ClusterId> for u16 {
    fn from(id: ClusterId) -> Self {
        id.0
    }
}

impl ClusterId {
    /// 最小的可用簇号
    pub const MIN: Self = Self(2);

    /// 0号表项：低字节为介质描述符，其余位全1
    pub const MEDIA: Self = Self(0xFFF8);

    /// 1号表项保留，全1
    pub const RESERVED: Self = Self(0xFFFF);

    /// 簇链表的结尾
    pub const EOF: Self = Self(0xFFFF);

    pub const fn new(raw: u16) -> Self {
        Self(raw)
    }

    pub const fn to_le_bytes(self) -> [u8; 2] {
        self.0.to_le_bytes()
    }
}
