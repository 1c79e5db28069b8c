//! 保留区，FAT16 下只有引导扇区一个扇区。

mod bpb;

pub use self::bpb::*;
