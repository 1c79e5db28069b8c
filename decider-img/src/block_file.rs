use std::cell::RefCell;
use std::fs::File;
use std::io::{self, Read, Seek, SeekFrom, Write};

use block_dev::{BLOCK_SIZE, BlockDevice, BlockError};
use send_wrapper::SendWrapper;

/// 以普通文件模拟的块设备
#[derive(Debug)]
pub struct BlockFile {
    inner: SendWrapper<RefCell<File>>,
    blocks: usize,
}

impl BlockFile {
    pub fn new(fd: File) -> io::Result<Self> {
        let blocks = fd.metadata()?.len() as usize / BLOCK_SIZE;
        Ok(Self {
            inner: SendWrapper::new(RefCell::new(fd)),
            blocks,
        })
    }

    fn seek(&self, file: &mut File, block_id: usize) -> Result<(), BlockError> {
        if block_id >= self.blocks {
            return Err(BlockError::OutOfRange(block_id));
        }
        file.seek(SeekFrom::Start((block_id * BLOCK_SIZE) as u64))
            .map_err(|err| {
                log::error!("seeking block {block_id}: {err}");
                BlockError::Io
            })?;
        Ok(())
    }
}

impl BlockDevice for BlockFile {
    fn read_block(&self, block_id: usize, buf: &mut [u8]) -> Result<(), BlockError> {
        let mut file = self.inner.borrow_mut();
        self.seek(&mut file, block_id)?;
        let len = BLOCK_SIZE.min(buf.len());
        let size = file.read(&mut buf[..len]).map_err(|err| {
            log::error!("reading block {block_id}: {err}");
            BlockError::Io
        })?;
        if size != BLOCK_SIZE {
            return Err(BlockError::ShortTransfer(size));
        }
        Ok(())
    }

    fn write_block(&self, block_id: usize, buf: &[u8]) -> Result<(), BlockError> {
        let mut file = self.inner.borrow_mut();
        self.seek(&mut file, block_id)?;
        let len = BLOCK_SIZE.min(buf.len());
        let size = file.write(&buf[..len]).map_err(|err| {
            log::error!("writing block {block_id}: {err}");
            BlockError::Io
        })?;
        if size != BLOCK_SIZE {
            return Err(BlockError::ShortTransfer(size));
        }
        Ok(())
    }

    fn block_count(&self) -> usize {
        self.blocks
    }
}
