//! FAT区，两份完全相同的文件分配表。
//!
//! 整个卷只有一个文件、一个簇，只有每份FAT的首个扇区有内容。

use crate::ClusterId;
use crate::layout::SECTOR_SIZE;

/// 首扇区开头的表项：0号、1号保留，2号是文件唯一的簇，同时也是链表结尾
pub const HEAD_ENTRIES: [ClusterId; 3] = [ClusterId::MEDIA, ClusterId::RESERVED, ClusterId::EOF];

/// 生成FAT内第`index`个扇区
pub fn write_fat_sector(index: u32, sector: &mut [u8; SECTOR_SIZE]) {
    sector.fill(0);
    if index != 0 {
        return;
    }

    for (slot, entry) in sector.chunks_exact_mut(2).zip(HEAD_ENTRIES) {
        slot.copy_from_slice(&entry.to_le_bytes());
    }
}
