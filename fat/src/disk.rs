//! 以字节为单位的读取，可以跨越扇区边界

use block_dev::{BLOCK_SIZE, BlockDevice, BlockError};
use derive_more::Display;

use crate::layout::{SECTOR_SIZE, TOTAL_SECTORS};
use crate::sector::{SectorError, SectorId, build_sector};
use crate::store::FileStore;

#[derive(Debug, Display, Clone, Copy, PartialEq, Eq)]
pub enum DiskError {
    /// 调用者违约：扇区内偏移不小于扇区大小
    #[display(fmt = "offset {} is not inside a sector", offset)]
    InvalidOffset { offset: u32 },
    #[display(fmt = "sector {} is beyond the end of the disk", lba)]
    OutOfRange { lba: u32 },
}

impl From<SectorError> for DiskError {
    fn from(err: SectorError) -> Self {
        match err {
            SectorError::OutOfRange { lba } => Self::OutOfRange { lba },
        }
    }
}

/// 只读的虚拟磁盘，内容全部由[`FileStore`]与布局常量合成
#[derive(Debug, Clone, Copy)]
pub struct VirtualDisk<'a> {
    store: &'a FileStore,
}

impl<'a> VirtualDisk<'a> {
    pub const fn new(store: &'a FileStore) -> Self {
        Self { store }
    }

    pub const fn store(&self) -> &'a FileStore {
        self.store
    }

    /// 从`lba`号扇区的`offset`字节处开始读满`buf`。
    ///
    /// 整个读取范围在拷贝之前就会被检查，
    /// 失败时`buf`保持原样，不会返回读了一半的数据。
    pub fn read(&self, lba: u32, offset: u32, buf: &mut [u8]) -> Result<usize, DiskError> {
        if offset as usize >= SECTOR_SIZE {
            return Err(DiskError::InvalidOffset { offset });
        }
        if buf.is_empty() {
            return Ok(0);
        }

        let last = (offset as usize + buf.len() - 1) / SECTOR_SIZE;
        let last_lba = u32::try_from(last)
            .ok()
            .and_then(|last| lba.checked_add(last))
            .filter(|&last_lba| last_lba < TOTAL_SECTORS)
            .ok_or(DiskError::OutOfRange {
                lba: lba.saturating_add(last as u32),
            })?;
        log::trace!("read sectors {lba}..={last_lba}, offset {offset}, {} bytes", buf.len());

        let mut sector = [0u8; SECTOR_SIZE];
        let mut sid = SectorId::new(lba);
        let mut start = offset as usize;
        let mut read_size = 0;
        while read_size < buf.len() {
            build_sector(self.store, sid, &mut sector)?;

            let chunk = (buf.len() - read_size).min(SECTOR_SIZE - start);
            buf[read_size..read_size + chunk].copy_from_slice(&sector[start..start + chunk]);

            read_size += chunk;
            sid = sid + 1;
            start = 0;
        }

        Ok(read_size)
    }
}

impl BlockDevice for VirtualDisk<'_> {
    fn read_block(&self, block_id: usize, buf: &mut [u8]) -> Result<(), BlockError> {
        if buf.len() < BLOCK_SIZE {
            return Err(BlockError::ShortTransfer(buf.len()));
        }
        let lba = u32::try_from(block_id).map_err(|_| BlockError::OutOfRange(block_id))?;
        self.read(lba, 0, &mut buf[..BLOCK_SIZE])
            .map(|_| ())
            .map_err(|_| BlockError::OutOfRange(block_id))
    }

    fn write_block(&self, block_id: usize, _buf: &[u8]) -> Result<(), BlockError> {
        log::debug!("rejected write to block {block_id}");
        Err(BlockError::ReadOnly)
    }

    fn block_count(&self) -> usize {
        TOTAL_SECTORS as usize
    }
}
