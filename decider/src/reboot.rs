//! 复位进入 ROM 下载模式
//!
//! 只提供 ESP32-S3 与 ESP32-S2 的寄存器地址。ESP32-P4 没有 RTC_CNTL 外设，
//! 下载模式标志位于 LP 系统寄存器中，目前不支持；
//! 其它芯片可以用[`RtcDownloadMode::new`]自行给出地址。

use crate::config::{RTC_CNTL_FORCE_DOWNLOAD_BOOT, RTC_CNTL_SW_SYS_RST, esp32s2, esp32s3};
use crate::ptr::Volatile;

/// 重启进入下载模式。硬件实现不会返回。
pub trait DownloadMode {
    fn enter(&self, trigger: &str);
}

/// 通过 RTC 控制器寄存器实现的下载模式复位
#[derive(Debug, Clone, Copy)]
pub struct RtcDownloadMode {
    options0: usize,
    option1: usize,
}

impl RtcDownloadMode {
    /// # Safety
    ///
    /// `options0`和`option1`必须是可以读写的 RTC 控制寄存器地址，
    /// 并且在此对象存活期间一直有效。
    pub const unsafe fn new(options0: usize, option1: usize) -> Self {
        Self { options0, option1 }
    }

    pub const fn esp32s3() -> Self {
        unsafe { Self::new(esp32s3::RTC_CNTL_OPTIONS0_REG, esp32s3::RTC_CNTL_OPTION1_REG) }
    }

    pub const fn esp32s2() -> Self {
        unsafe { Self::new(esp32s2::RTC_CNTL_OPTIONS0_REG, esp32s2::RTC_CNTL_OPTION1_REG) }
    }

    unsafe fn register<'r>(addr: usize) -> &'r mut Volatile<u32> {
        unsafe { &mut *(addr as *mut Volatile<u32>) }
    }

    /// 下次启动时由 ROM 进入下载模式
    fn force_download_boot(&self) {
        unsafe { Self::register(self.option1) }.write(RTC_CNTL_FORCE_DOWNLOAD_BOOT);
    }

    fn restart(&self) -> ! {
        unsafe { Self::register(self.options0) }.update(|options| options | RTC_CNTL_SW_SYS_RST);
        #[allow(clippy::empty_loop)]
        loop {}
    }
}

impl DownloadMode for RtcDownloadMode {
    fn enter(&self, trigger: &str) {
        log::warn!("{trigger} accepted, rebooting into ROM download mode");
        self.force_download_boot();
        self.restart()
    }
}
