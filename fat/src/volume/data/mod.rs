//! 数据区之前的根目录，以及数据区本身。
//!
//! FAT16 的根目录位置与大小都是固定的，不占用簇；
//! 数据区第一个可用的簇编号为2。

mod dir_entry;

pub use self::dir_entry::*;
use crate::layout::{DIR_ENTRY_SIZE, FILE_FIRST_CLUSTER, FILE_NAME, SECTOR_SIZE};
use crate::ClusterId;

/// 生成根目录内第`index`个扇区，只有首扇区存放唯一的目录项
pub fn write_root_dir_sector(index: u32, file_size: u32, sector: &mut [u8; SECTOR_SIZE]) {
    sector.fill(0);
    if index != 0 {
        return;
    }

    let dirent = ShortDirEntry::new_file(FILE_NAME, ClusterId::new(FILE_FIRST_CLUSTER), file_size);
    sector[..DIR_ENTRY_SIZE].copy_from_slice(&dirent.as_bytes());
}
