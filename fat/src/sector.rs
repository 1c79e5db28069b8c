//! 扇区的合成
//!
//! 磁盘没有任何存储，每次读取都按扇区号现场生成512字节，
//! 除数据区与根目录外都只依赖编译期常量。

use core::ops::Range;

use derive_more::{Add, Display, From, Into};

use crate::layout::*;
use crate::store::FileStore;
use crate::volume::data::write_root_dir_sector;
use crate::volume::fat::write_fat_sector;
use crate::volume::mbr::Mbr;
use crate::volume::reserved::Bpb;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Add, From, Into)]
#[repr(transparent)]
pub struct SectorId(u32);

impl core::ops::Add<u32> for SectorId {
    type Output = Self;

    fn add(self, rhs: u32) -> Self::Output {
        self + Self(rhs)
    }
}

impl SectorId {
    pub const fn new(raw: u32) -> Self {
        Self(raw)
    }

    pub const fn raw(self) -> u32 {
        self.0
    }
}

#[derive(Debug, Display, Clone, Copy, PartialEq, Eq)]
pub enum SectorError {
    #[display(fmt = "sector {} is beyond the end of the disk", lba)]
    OutOfRange { lba: u32 },
}

/// 扇区所属的区域
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Region {
    Mbr,
    /// MBR 与分区之间的空白
    Reserved,
    BootSector,
    Fat,
    RootDir,
    Data,
}

/// 各区域的扇区范围，左闭右开，按优先级排列
static REGIONS: [(Range<u32>, Region); 7] = [
    (0..1, Region::Mbr),
    (1..PARTITION_START_LBA, Region::Reserved),
    (PARTITION_BOOT_SECTOR..FAT_1_START, Region::BootSector),
    (FAT_1_START..FAT_2_START, Region::Fat),
    (FAT_2_START..ROOT_DIR_START, Region::Fat),
    (ROOT_DIR_START..DATA_START, Region::RootDir),
    (DATA_START..TOTAL_SECTORS, Region::Data),
];

impl Region {
    /// 返回`id`所属的区域，以及它在该区域内的序号。
    /// 超出磁盘末尾则返回`None`。
    pub fn classify(id: SectorId) -> Option<(Self, u32)> {
        let lba = id.raw();
        REGIONS
            .iter()
            .find(|(range, _)| range.contains(&lba))
            .map(|(range, region)| (*region, lba - range.start))
    }
}

/// 生成`id`号扇区的完整内容
pub fn build_sector(
    store: &FileStore,
    id: SectorId,
    sector: &mut [u8; SECTOR_SIZE],
) -> Result<(), SectorError> {
    let (region, index) = Region::classify(id).ok_or(SectorError::OutOfRange { lba: id.raw() })?;
    log::trace!("build sector {} as {region:?}[{index}]", id.raw());

    match region {
        Region::Mbr => Mbr::new().write_to(sector),
        Region::Reserved => sector.fill(0),
        Region::BootSector => Bpb::new().write_to(sector),
        Region::Fat => write_fat_sector(index, sector),
        Region::RootDir => write_root_dir_sector(index, store.size(), sector),
        Region::Data => {
            sector.fill(0);
            if id == file_first_sector() {
                store.copy_range(sector, 0, SECTOR_SIZE as u32);
            }
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn build(store: &FileStore, lba: u32) -> [u8; SECTOR_SIZE] {
        let mut sector = [0xCC; SECTOR_SIZE];
        build_sector(store, SectorId::new(lba), &mut sector).unwrap();
        sector
    }

    fn le16(sector: &[u8], offset: usize) -> u16 {
        u16::from_le_bytes([sector[offset], sector[offset + 1]])
    }

    fn le32(sector: &[u8], offset: usize) -> u32 {
        u32::from_le_bytes(sector[offset..offset + 4].try_into().unwrap())
    }

    #[test]
    fn classify_boundaries() {
        let cases = [
            (0, Region::Mbr, 0),
            (1, Region::Reserved, 0),
            (2047, Region::Reserved, 2046),
            (2048, Region::BootSector, 0),
            (2049, Region::Fat, 0),
            (2176, Region::Fat, 127),
            (2177, Region::Fat, 0),
            (2304, Region::Fat, 127),
            (2305, Region::RootDir, 0),
            (2336, Region::RootDir, 31),
            (2337, Region::Data, 0),
            (TOTAL_SECTORS - 1, Region::Data, TOTAL_SECTORS - 1 - DATA_START),
        ];
        for (lba, region, index) in cases {
            assert_eq!(Some((region, index)), Region::classify(SectorId::new(lba)), "lba {lba}");
        }
        assert_eq!(None, Region::classify(SectorId::new(TOTAL_SECTORS)));
        assert_eq!(None, Region::classify(SectorId::new(u32::MAX)));
    }

    #[test]
    fn beyond_disk_fails() {
        let store = FileStore::new();
        let mut sector = [0xCC; SECTOR_SIZE];
        assert_eq!(
            Err(SectorError::OutOfRange { lba: TOTAL_SECTORS }),
            build_sector(&store, SectorId::new(TOTAL_SECTORS), &mut sector)
        );
        assert!(sector.iter().all(|&b| b == 0xCC));
    }

    #[test]
    fn mbr() {
        let sector = build(&FileStore::new(), 0);
        assert!(sector[..446].iter().all(|&b| b == 0));
        assert_eq!(
            [0x00u8, 0xFF, 0xFF, 0xFF, 0x16, 0xFF, 0xFF, 0xFF],
            sector[446..454]
        );
        assert_eq!(2048, le32(&sector, 454));
        assert_eq!(129024, le32(&sector, 458));
        assert!(sector[462..510].iter().all(|&b| b == 0));
        assert_eq!([0x55u8, 0xAA], sector[510..]);
    }

    #[test]
    fn gap_before_partition_is_zero() {
        let store = FileStore::new();
        for lba in [1, 100, 2047] {
            assert!(build(&store, lba).iter().all(|&b| b == 0));
        }
    }

    #[test]
    fn boot_sector() {
        let sector = build(&FileStore::new(), PARTITION_BOOT_SECTOR);
        assert_eq!([0xEBu8, 0x3C, 0x90], sector[..3]);
        assert_eq!(b"MSDOS5.0", &sector[3..11]);
        assert_eq!(512, le16(&sector, 11));
        assert_eq!(4, sector[13]);
        assert_eq!(1, le16(&sector, 14));
        assert_eq!(2, sector[16]);
        assert_eq!(512, le16(&sector, 17));
        assert_eq!(0, le16(&sector, 19));
        assert_eq!(0xF8, sector[21]);
        assert_eq!(128, le16(&sector, 22));
        assert_eq!(63, le16(&sector, 24));
        assert_eq!(255, le16(&sector, 26));
        assert_eq!(2048, le32(&sector, 28));
        assert_eq!(129024, le32(&sector, 32));
        assert_eq!([0x80u8, 0x00, 0x29], sector[36..39]);
        assert_eq!(0x2026_0216, le32(&sector, 39));
        assert_eq!(b"DECIDER    ", &sector[43..54]);
        assert_eq!(b"FAT16   ", &sector[54..62]);
        assert!(sector[62..510].iter().all(|&b| b == 0));
        assert_eq!([0x55u8, 0xAA], sector[510..]);
    }

    #[test]
    fn both_fat_copies() {
        let store = FileStore::new();
        for start in [FAT_1_START, FAT_2_START] {
            let first = build(&store, start);
            assert_eq!([0xF8u8, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF], first[..6]);
            assert!(first[6..].iter().all(|&b| b == 0));

            for lba in [start + 1, start + SECTORS_PER_FAT as u32 - 1] {
                assert!(build(&store, lba).iter().all(|&b| b == 0));
            }
        }
    }

    #[test]
    fn root_dir_tracks_live_size() {
        let store = FileStore::new();
        let sector = build(&store, ROOT_DIR_START);
        assert_eq!(b"DECIDER CHO", &sector[..11]);
        assert_eq!(0x20, sector[11]);
        assert_eq!(2, le16(&sector, 26));
        assert_eq!(0, le32(&sector, 28));
        assert!(sector[32..].iter().all(|&b| b == 0));

        store.set(b"choice_type=wifi\n");
        assert_eq!(17, le32(&build(&store, ROOT_DIR_START), 28));

        assert!(build(&store, ROOT_DIR_START + 1).iter().all(|&b| b == 0));
    }

    #[test]
    fn data_sectors() {
        let store = FileStore::new();
        store.set(b"choice_type=wifi\n");

        let first = build(&store, FILE_FIRST_SECTOR);
        assert_eq!(b"choice_type=wifi\n", &first[..17]);
        assert!(first[17..].iter().all(|&b| b == 0));

        for lba in [FILE_FIRST_SECTOR + 1, TOTAL_SECTORS - 1] {
            assert!(build(&store, lba).iter().all(|&b| b == 0));
        }
    }

    #[test]
    fn synthesis_is_pure() {
        let store = FileStore::new();
        store.set(b"choice_type=entry_id\nentry_id=backup-42\n");
        for lba in [0, 5, PARTITION_BOOT_SECTOR, FAT_2_START, ROOT_DIR_START, FILE_FIRST_SECTOR] {
            assert_eq!(build(&store, lba), build(&store, lba), "lba {lba}");
        }
    }
}
