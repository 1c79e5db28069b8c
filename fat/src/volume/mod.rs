//! 卷的布局
//!
//! MBR | 保留区(引导扇区) | FAT区 | 根目录 | 数据区
//!
//! 各结构体都按磁盘上的字节序排布，直接转成扇区字节写出。

pub mod data;
pub mod fat;
pub mod mbr;
pub mod reserved;
