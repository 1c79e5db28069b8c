//! 大容量存储类的 SCSI 命令处理
//!
//! 协议栈收到主机命令后调用[`MassStorage`]，
//! 失败时返回的[`Sense`]由协议栈记录并在 REQUEST SENSE 中报告给主机。

use decider_fat::layout::{SECTOR_SIZE, TOTAL_SECTORS};
use decider_fat::{FileStore, VirtualDisk};
use derive_more::Display;

use crate::config::{PRODUCT_ID, PRODUCT_REV, VENDOR_ID};

/// SCSI 操作码
pub mod opcode {
    /// 协议栈不认识，交给[`super::MassStorage::scsi_command`]
    pub const PREVENT_ALLOW_MEDIUM_REMOVAL: u8 = 0x1E;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum SenseKey {
    IllegalRequest = 0x5,
    UnitAttention = 0x6,
    DataProtect = 0x7,
}

/// 感知数据：感知键 + 附加感知码(ASC) + 附加感知码限定符(ASCQ)
#[derive(Debug, Display, Clone, Copy, PartialEq, Eq)]
#[display(fmt = "{:?} (asc={:#04x}, ascq={:#04x})", key, asc, ascq)]
pub struct Sense {
    pub key: SenseKey,
    pub asc: u8,
    pub ascq: u8,
}

impl Sense {
    pub const fn new(key: SenseKey, asc: u8, ascq: u8) -> Self {
        Self { key, asc, ascq }
    }

    pub const INVALID_COMMAND: Self = Self::new(SenseKey::IllegalRequest, 0x20, 0x00);
    pub const LBA_OUT_OF_RANGE: Self = Self::new(SenseKey::IllegalRequest, 0x21, 0x00);
    pub const WRITE_PROTECTED: Self = Self::new(SenseKey::DataProtect, 0x27, 0x00);
    pub const MEDIUM_CHANGED: Self = Self::new(SenseKey::UnitAttention, 0x28, 0x00);
}

/// INQUIRY 应答中的标识字段
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Inquiry {
    pub vendor_id: [u8; 8],
    pub product_id: [u8; 16],
    pub product_rev: [u8; 4],
}

/// READ CAPACITY 应答
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Capacity {
    pub block_count: u32,
    pub block_size: u16,
}

/// 协议栈对逻辑单元的回调
pub trait MassStorage {
    /// 最大的逻辑单元号
    fn max_lun(&self) -> u8 {
        0
    }

    fn inquiry(&self) -> Inquiry;

    fn capacity(&self) -> Capacity;

    fn test_unit_ready(&self) -> Result<(), Sense>;

    /// 从`lba`号块的`offset`字节处读满`buf`，返回读取的字节数
    fn read10(&self, lba: u32, offset: u32, buf: &mut [u8]) -> Result<usize, Sense>;

    fn write10(&self, lba: u32, offset: u32, buf: &[u8]) -> Result<usize, Sense>;

    fn is_writable(&self) -> bool;

    /// 返回`false`时协议栈会让命令失败
    fn start_stop(&self, power_condition: u8, start: bool, load_eject: bool) -> bool;

    /// 协议栈自身不处理的其它命令
    fn scsi_command(&self, cmd: &[u8; 16], buf: &mut [u8]) -> Result<usize, Sense>;
}

/// 唯一的逻辑单元，一块只读的虚拟磁盘
#[derive(Debug, Clone, Copy)]
pub struct DeciderLun<'a> {
    disk: VirtualDisk<'a>,
}

impl<'a> DeciderLun<'a> {
    pub const fn new(store: &'a FileStore) -> Self {
        Self {
            disk: VirtualDisk::new(store),
        }
    }
}

impl MassStorage for DeciderLun<'_> {
    fn inquiry(&self) -> Inquiry {
        Inquiry {
            vendor_id: VENDOR_ID,
            product_id: PRODUCT_ID,
            product_rev: PRODUCT_REV,
        }
    }

    fn capacity(&self) -> Capacity {
        Capacity {
            block_count: TOTAL_SECTORS,
            block_size: SECTOR_SIZE as u16,
        }
    }

    /// 文件被替换后报告一次“介质已更换”，迫使主机重新读取文件系统
    fn test_unit_ready(&self) -> Result<(), Sense> {
        if self.disk.store().consume_changed() {
            log::debug!("report medium changed");
            return Err(Sense::MEDIUM_CHANGED);
        }
        Ok(())
    }

    fn read10(&self, lba: u32, offset: u32, buf: &mut [u8]) -> Result<usize, Sense> {
        self.disk.read(lba, offset, buf).map_err(|err| {
            log::warn!("read10 failed: {err}");
            Sense::LBA_OUT_OF_RANGE
        })
    }

    fn write10(&self, lba: u32, _offset: u32, buf: &[u8]) -> Result<usize, Sense> {
        log::debug!("rejected write10 of {} bytes at {lba}", buf.len());
        Err(Sense::WRITE_PROTECTED)
    }

    fn is_writable(&self) -> bool {
        false
    }

    /// 没有可以转动或弹出的介质
    fn start_stop(&self, _power_condition: u8, _start: bool, _load_eject: bool) -> bool {
        true
    }

    fn scsi_command(&self, cmd: &[u8; 16], _buf: &mut [u8]) -> Result<usize, Sense> {
        match cmd[0] {
            opcode::PREVENT_ALLOW_MEDIUM_REMOVAL => Ok(0),
            op => {
                log::debug!("unsupported SCSI command {op:#04x}");
                Err(Sense::INVALID_COMMAND)
            }
        }
    }
}
