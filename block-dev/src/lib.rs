//! # 块设备接口层
//!
//! 块设备是以**块**为单位存储数据的设备，例如磁盘、U盘、镜像文件等；
//! [`BlockDevice`] 就是对读写块设备的抽象，
//! 实现了此特质的类型称为**块设备驱动**。
//!
//! 虚拟磁盘与主机侧的镜像文件都通过它交换扇区。

#![no_std]

use derive_more::Display;

/// 块的字节量
pub const BLOCK_SIZE: usize = 512;

#[derive(Debug, Display, Clone, Copy, PartialEq, Eq)]
pub enum BlockError {
    /// 块号超出设备容量
    #[display(fmt = "block {} is out of range", _0)]
    OutOfRange(usize),
    /// 设备只读
    #[display(fmt = "device is read-only")]
    ReadOnly,
    /// 缓冲区不足一个块
    #[display(fmt = "buffer holds {} bytes, less than a block", _0)]
    ShortTransfer(usize),
    /// 底层介质报错
    #[display(fmt = "I/O failure")]
    Io,
}

/// 块设备驱动特质
pub trait BlockDevice: Send + Sync {
    /// 将`block_id`号块读入`buf`的前[`BLOCK_SIZE`]字节。
    fn read_block(&self, block_id: usize, buf: &mut [u8]) -> Result<(), BlockError>;

    /// 将`buf`的前[`BLOCK_SIZE`]字节写入`block_id`号块。
    fn write_block(&self, block_id: usize, buf: &[u8]) -> Result<(), BlockError>;

    /// 设备的块总数
    fn block_count(&self) -> usize;
}
