//! 在内存中现场合成的只读 FAT16 磁盘，只含一个文件`DECIDER.CHO`。

#![no_std]

mod cluster;
mod disk;
pub mod layout;
mod sector;
mod store;
pub mod volume;

pub use self::{
    cluster::ClusterId,
    disk::{DiskError, VirtualDisk},
    sector::{Region, SectorError, SectorId, build_sector},
    store::FileStore,
};
