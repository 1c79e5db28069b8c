use core::mem;

use enumflags2::{BitFlags, bitflags};

use crate::ClusterId;
use crate::layout::DIR_ENTRY_SIZE;

/// 8.3 短目录项
#[derive(Debug, Default, Clone, Copy)]
#[repr(C, packed)]
pub struct ShortDirEntry {
    /// 8字节主名 + 3字节扩展名，空格补齐
    name: [u8; 11],

    pub attr: BitFlags<AttrFlag>,

    _ntres: u8,

    /* 时间戳全部留0 */
    _crt_time_tenth: u8,
    _crt_time: u16,
    _crt_date: u16,
    _lst_acc_date: u16,

    /// FAT16 上恒为0
    _fst_clus_hi: u16,

    _wrt_time: u16,
    _wrt_date: u16,

    /// 首簇号
    fst_clus_lo: u16,

    /// 文件字节数，随内容变化
    file_size: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[bitflags]
#[repr(u8)]
pub enum AttrFlag {
    ReadOnly = 0x01,
    Hidden = 0x02,
    System = 0x04,
    /// 卷标
    VolumeID = 0x08,
    Directory = 0x10,
    /// 普通文件都带此标志
    Archive = 0x20,
}

impl ShortDirEntry {
    /// 创建一个普通文件的目录项，时间戳全部留0
    pub fn new_file(name: [u8; 11], id: ClusterId, size: u32) -> Self {
        Self {
            name,
            attr: AttrFlag::Archive.into(),
            fst_clus_lo: u16::from(id).to_le(),
            file_size: size.to_le(),
            ..Default::default()
        }
    }

    pub const fn name(&self) -> [u8; 11] {
        self.name
    }

    pub fn cluster_id(&self) -> ClusterId {
        u16::from_le(self.fst_clus_lo).into()
    }

    pub const fn size(&self) -> usize {
        u32::from_le(self.file_size) as usize
    }

    pub fn as_bytes(&self) -> [u8; DIR_ENTRY_SIZE] {
        unsafe { mem::transmute::<Self, [u8; DIR_ENTRY_SIZE]>(*self) }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn file_entry_bytes() {
        let dirent = ShortDirEntry::new_file(*b"DECIDER CHO", ClusterId::MIN, 17);
        let raw = dirent.as_bytes();

        assert_eq!(b"DECIDER CHO", &raw[..11]);
        assert_eq!(0x20, raw[11]);
        assert!(raw[12..26].iter().all(|&b| b == 0));
        assert_eq!([2u8, 0], raw[26..28]);
        assert_eq!([17u8, 0, 0, 0], raw[28..32]);

        assert_eq!(*b"DECIDER CHO", dirent.name());
        assert_eq!(ClusterId::MIN, dirent.cluster_id());
        assert_eq!(17, dirent.size());
        assert_eq!(BitFlags::from(AttrFlag::Archive), { dirent.attr });
    }
}
