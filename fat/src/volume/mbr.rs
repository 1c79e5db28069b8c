use core::mem;

use crate::layout::{PARTITION_SECTORS, PARTITION_START_LBA, PARTITION_TYPE_HIDDEN_FAT16, SECTOR_SIZE};

/// 主引导记录，位于磁盘0号扇区
#[derive(Debug, Clone)]
#[repr(C, packed)]
pub struct Mbr {
    /// 引导代码，全0
    _bootstrap: [u8; 446],

    pub partitions: [PartitionEntry; 4],

    /// [0x55, 0xAA]
    _signature_word: [u8; 2],
}

/// 分区表项
///
/// CHS 字段一律填0xFF，以 LBA 寻址为准。
#[derive(Debug, Clone, Copy, Default)]
#[repr(C, packed)]
pub struct PartitionEntry {
    /// 0x80 可引导，0x00 不可引导
    status: u8,
    chs_first: [u8; 3],
    kind: u8,
    chs_last: [u8; 3],
    /// 小端序
    lba_first: u32,
    /// 小端序
    sectors: u32,
}

const CHS_UNUSED: [u8; 3] = [0xFF; 3];

impl PartitionEntry {
    pub const fn new(kind: u8, lba_first: u32, sectors: u32) -> Self {
        Self {
            status: 0x00,
            chs_first: CHS_UNUSED,
            kind,
            chs_last: CHS_UNUSED,
            lba_first: lba_first.to_le(),
            sectors: sectors.to_le(),
        }
    }

    pub const fn kind(&self) -> u8 {
        self.kind
    }

    pub const fn lba_first(&self) -> u32 {
        u32::from_le(self.lba_first)
    }

    pub const fn sectors(&self) -> u32 {
        u32::from_le(self.sectors)
    }
}

impl Mbr {
    /// 只有一个隐藏 FAT16 分区的 MBR
    pub const fn new() -> Self {
        let mut partitions = [PartitionEntry {
            status: 0,
            chs_first: [0; 3],
            kind: 0,
            chs_last: [0; 3],
            lba_first: 0,
            sectors: 0,
        }; 4];
        partitions[0] = PartitionEntry::new(
            PARTITION_TYPE_HIDDEN_FAT16,
            PARTITION_START_LBA,
            PARTITION_SECTORS,
        );

        Self {
            _bootstrap: [0; 446],
            partitions,
            _signature_word: [0x55, 0xAA],
        }
    }

    pub fn write_to(&self, sector: &mut [u8; SECTOR_SIZE]) {
        *sector = unsafe { mem::transmute::<Self, [u8; SECTOR_SIZE]>(self.clone()) };
    }
}

impl Default for Mbr {
    fn default() -> Self {
        Self::new()
    }
}
