//! 虚拟磁盘的几何布局
//!
//! ```text
//! MBR | 空闲 | 引导扇区 | FAT1 | FAT2 | 根目录 | 数据区
//! 0     1..    2048       2049   2177   2305     2337..
//! ```

use crate::SectorId;

/// 一个扇区的字节量
pub const SECTOR_SIZE: usize = 512;

/// 磁盘总容量，64 MiB
pub const DISK_SIZE_BYTES: u32 = 64 * 1024 * 1024;

pub const TOTAL_SECTORS: u32 = DISK_SIZE_BYTES / SECTOR_SIZE as u32;

/// 分区按 1 MiB 对齐
pub const PARTITION_START_LBA: u32 = 2048;
pub const PARTITION_SECTORS: u32 = TOTAL_SECTORS - PARTITION_START_LBA;

/// 隐藏的 FAT16 分区
pub const PARTITION_TYPE_HIDDEN_FAT16: u8 = 0x16;

pub const RESERVED_SECTORS: u16 = 1;
pub const NUM_FATS: u8 = 2;
pub const ROOT_ENTRY_COUNT: u16 = 512;
pub const SECTORS_PER_CLUSTER: u8 = 4;
pub const SECTORS_PER_FAT: u16 = 128;

/// 目录项的字节量
pub const DIR_ENTRY_SIZE: usize = 32;

pub const ROOT_DIR_SECTORS: u32 =
    (ROOT_ENTRY_COUNT as u32 * DIR_ENTRY_SIZE as u32) / SECTOR_SIZE as u32;

pub const PARTITION_BOOT_SECTOR: u32 = PARTITION_START_LBA;
pub const FAT_1_START: u32 = PARTITION_BOOT_SECTOR + RESERVED_SECTORS as u32;
pub const FAT_2_START: u32 = FAT_1_START + SECTORS_PER_FAT as u32;
pub const ROOT_DIR_START: u32 = FAT_2_START + SECTORS_PER_FAT as u32;
pub const DATA_START: u32 = ROOT_DIR_START + ROOT_DIR_SECTORS;

/// 唯一文件占据的簇
pub const FILE_FIRST_CLUSTER: u16 = 2;
pub const FILE_FIRST_SECTOR: u32 =
    DATA_START + (FILE_FIRST_CLUSTER as u32 - 2) * SECTORS_PER_CLUSTER as u32;

/// 文件内容只是几行键值对，容量刻意做得很小
pub const FILE_MAX_SIZE: usize = 256;

/// 8.3 格式的文件名：`DECIDER.CHO`
pub const FILE_NAME: [u8; 11] = *b"DECIDER CHO";

/// 数据区的簇总数，决定了文件系统是否被识别为 FAT16
pub const fn data_clusters() -> u32 {
    (PARTITION_SECTORS - (DATA_START - PARTITION_START_LBA)) / SECTORS_PER_CLUSTER as u32
}

pub const fn file_first_sector() -> SectorId {
    SectorId::new(FILE_FIRST_SECTOR)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn region_boundaries() {
        assert_eq!(131072, TOTAL_SECTORS);
        assert_eq!(129024, PARTITION_SECTORS);
        assert_eq!(32, ROOT_DIR_SECTORS);
        assert_eq!(2049, FAT_1_START);
        assert_eq!(2177, FAT_2_START);
        assert_eq!(2305, ROOT_DIR_START);
        assert_eq!(2337, DATA_START);
        assert_eq!(DATA_START, FILE_FIRST_SECTOR);
    }

    #[test]
    fn fat16_cluster_count() {
        let clusters = data_clusters();
        assert!((4085..65525).contains(&clusters));
        // 每个 FAT 项两字节，保留的两项也要算上
        let needed = (clusters as usize + 2) * 2;
        assert!(needed <= SECTORS_PER_FAT as usize * SECTOR_SIZE);
    }
}
