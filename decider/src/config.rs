//! Constants used by the decider USB component

use crate::boot_option::BootOption;

/* SCSI INQUIRY 应答，不足部分以空格补齐 */
pub const VENDOR_ID: [u8; 8] = *b"ROTFRONT";
pub const PRODUCT_ID: [u8; 16] = *b"DECIDER         ";
pub const PRODUCT_REV: [u8; 4] = *b"1.0 ";

/* 进入下载模式的厂商控制请求 */
pub const FLASH_MODE_REQUEST: u8 = 0xA5;
pub const FLASH_MODE_VALUE: u16 = 0xDCD1;
pub const FLASH_MODE_INDEX: u16 = 0x0001;

/// ESP32-S3 RTC 控制器寄存器
pub mod esp32s3 {
    pub const RTC_CNTL_BASE: usize = 0x6000_8000;
    pub const RTC_CNTL_OPTIONS0_REG: usize = RTC_CNTL_BASE;
    pub const RTC_CNTL_OPTION1_REG: usize = RTC_CNTL_BASE + 0x12C;
}

/// ESP32-S2 RTC 控制器寄存器
pub mod esp32s2 {
    pub const RTC_CNTL_BASE: usize = 0x3F40_8000;
    pub const RTC_CNTL_OPTIONS0_REG: usize = RTC_CNTL_BASE;
    pub const RTC_CNTL_OPTION1_REG: usize = RTC_CNTL_BASE + 0x128;
}

/// OPTION1 寄存器：下次启动时强制进入 ROM 下载模式
pub const RTC_CNTL_FORCE_DOWNLOAD_BOOT: u32 = 1 << 0;
/// OPTIONS0 寄存器：整个系统软复位
pub const RTC_CNTL_SW_SYS_RST: u32 = 1 << 31;

/// 组件的运行时配置
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Config {
    /// 启动时写入文件的引导选项，缺省时文件为空
    pub initial_boot_option: Option<BootOption>,
}
