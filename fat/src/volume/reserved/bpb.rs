use core::mem;

use crate::SectorId;
use crate::layout::{
    NUM_FATS, PARTITION_SECTORS, PARTITION_START_LBA, RESERVED_SECTORS, ROOT_ENTRY_COUNT,
    SECTOR_SIZE, SECTORS_PER_CLUSTER, SECTORS_PER_FAT,
};

/// BIOS Parameter Block BIOS参数块
/// 位于分区的第一扇区，该扇区又名启动扇区。
///
/// 多字节字段一律以小端序存放。
#[derive(Debug, Clone)]
#[repr(C, packed)]
pub struct Bpb {
    /// 跳转至启动代码的指令
    _bs_jmp_boot: [u8; 3],

    /// 一般用于记录什么系统格式化此卷
    _bs_oem_name: [u8; 8],

    /// 一个扇区的字节量
    byts_per_sec: u16,

    /// 一个簇的扇区数
    sec_per_clus: ClusterSectors,

    /// 保留区的扇区数
    rsvd_sec_cnt: u16,

    /// 此卷的文件分配表(FAT)数量，建议为2
    num_fats: u8,

    /// 根目录能容纳的目录项数
    root_ent_cnt: u16,

    /// 为0时以`tot_sec32`为准
    tot_sec16: u16,

    /// 物理媒介的类型
    pub media: Media,

    /// 一个FAT占用的扇区数
    fat_sz16: u16,

    /// 中断0x13模式下，轨道的扇区数
    _sec_per_trk: u16,

    /// 中断0x13模式下，头数量
    _num_heads: u16,

    /// 分区之前的扇区数
    hidd_sec: u32,

    /// 此卷的扇区总数
    tot_sec32: u32,

    /*
     * Extended BPB fields for FAT12/16 volume
     */
    /// 中断0x13驱动号，为0x80或0x00
    _drv_num: u8,

    _reserved1: [u8; 1],

    /// 启用时，表示接下来的三个字段存在
    _boot_sig: BootSignature,

    /// 卷序列号
    _vol_id: u32,

    /// 卷标签，与根目录记录的卷标签一致
    _vol_lab: [u8; 11],

    /// 文件系统类型：FAT12/FAT16/FAT32
    ///
    /// 只用来做告示，不应信赖此字段。
    _fil_sys_type: [u8; 8],

    _boot_code: [u8; 448],

    /// [0x55, 0xAA]
    _signature_word: [u8; 2],
}

/* 扇区剩余部分皆填0x00 */

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum ClusterSectors {
    S1 = 1,
    S2 = 2,
    S4 = 4,
    S8 = 8,
    S16 = 16,
    S32 = 32,
    S64 = 64,
    S128 = 128,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum Media {
    Fixed = 0xF8,
    Removable = 0xF0,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum BootSignature {
    Set = 0x29,
    Unset = 0x00,
}

/// 固定的卷序列号
pub const VOLUME_ID: u32 = 0x2026_0216;

impl ClusterSectors {
    const fn from_count(count: u8) -> Self {
        match count {
            1 => Self::S1,
            2 => Self::S2,
            4 => Self::S4,
            8 => Self::S8,
            16 => Self::S16,
            32 => Self::S32,
            64 => Self::S64,
            _ => Self::S128,
        }
    }
}

impl Bpb {
    /// 按[`crate::layout`]描述的分区生成BPB
    pub const fn new() -> Self {
        Self {
            _bs_jmp_boot: [0xEB, 0x3C, 0x90],
            _bs_oem_name: *b"MSDOS5.0",
            byts_per_sec: (SECTOR_SIZE as u16).to_le(),
            sec_per_clus: ClusterSectors::from_count(SECTORS_PER_CLUSTER),
            rsvd_sec_cnt: RESERVED_SECTORS.to_le(),
            num_fats: NUM_FATS,
            root_ent_cnt: ROOT_ENTRY_COUNT.to_le(),
            // 64 MiB 超出了16位字段的表示范围
            tot_sec16: 0,
            media: Media::Fixed,
            fat_sz16: SECTORS_PER_FAT.to_le(),
            _sec_per_trk: 63u16.to_le(),
            _num_heads: 255u16.to_le(),
            hidd_sec: PARTITION_START_LBA.to_le(),
            tot_sec32: PARTITION_SECTORS.to_le(),
            _drv_num: 0x80,
            _reserved1: [0],
            _boot_sig: BootSignature::Set,
            _vol_id: VOLUME_ID.to_le(),
            _vol_lab: *b"DECIDER    ",
            _fil_sys_type: *b"FAT16   ",
            _boot_code: [0; 448],
            _signature_word: [0x55, 0xAA],
        }
    }

    pub fn write_to(&self, sector: &mut [u8; SECTOR_SIZE]) {
        *sector = unsafe { mem::transmute::<Self, [u8; SECTOR_SIZE]>(self.clone()) };
    }

    pub const fn sector_bytes(&self) -> usize {
        u16::from_le(self.byts_per_sec) as usize
    }

    pub const fn cluster_sectors(&self) -> usize {
        self.sec_per_clus as usize
    }

    pub const fn fat_count(&self) -> usize {
        self.num_fats as usize
    }

    /// FAT占用的扇区数
    pub const fn fat_sectors(&self) -> usize {
        u16::from_le(self.fat_sz16) as usize
    }

    pub const fn total_sectors(&self) -> usize {
        if self.tot_sec16 > 0 {
            u16::from_le(self.tot_sec16) as usize
        } else {
            u32::from_le(self.tot_sec32) as usize
        }
    }

    /// 以下扇区号都是相对整个磁盘的绝对扇区号
    pub const fn boot_sector(&self) -> SectorId {
        SectorId::new(u32::from_le(self.hidd_sec))
    }

    pub const fn fat_area(&self) -> SectorId {
        SectorId::new(u32::from_le(self.hidd_sec) + u16::from_le(self.rsvd_sec_cnt) as u32)
    }

    pub const fn root_dir_area(&self) -> SectorId {
        SectorId::new(
            self.fat_area().raw() + (self.fat_count() * self.fat_sectors()) as u32,
        )
    }

    pub const fn data_area(&self) -> SectorId {
        SectorId::new(self.root_dir_area().raw() + self.root_dir_sectors() as u32)
    }

    /// 计算根目录占用的扇区数
    const fn root_dir_sectors(&self) -> usize {
        let bytes = u16::from_le(self.root_ent_cnt) as usize * 32;
        bytes.div_ceil(self.sector_bytes())
    }
}

impl Default for Bpb {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::{DATA_START, FAT_1_START, PARTITION_BOOT_SECTOR, ROOT_DIR_START};

    #[test]
    fn agrees_with_layout() {
        let bpb = Bpb::new();
        assert_eq!(SECTOR_SIZE, bpb.sector_bytes());
        assert_eq!(4, bpb.cluster_sectors());
        assert_eq!(PARTITION_SECTORS as usize, bpb.total_sectors());
        assert_eq!(SectorId::new(PARTITION_BOOT_SECTOR), bpb.boot_sector());
        assert_eq!(SectorId::new(FAT_1_START), bpb.fat_area());
        assert_eq!(SectorId::new(ROOT_DIR_START), bpb.root_dir_area());
        assert_eq!(SectorId::new(DATA_START), bpb.data_area());
    }
}
